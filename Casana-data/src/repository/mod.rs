// Repository module structure
pub mod errors;
mod in_memory;
mod vendor_api;

use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{VendorAlert, VendorVitalReading};

// Re-export commonly used types
pub use errors::RepositoryError;
pub use in_memory::InMemoryVitalsRepository;
pub use vendor_api::{VendorApiConfig, VendorApiRepository};

/// Filter for reading history queries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadingFilter {
    /// RFC 3339 lower bound (inclusive)
    pub start_date: Option<String>,
    /// RFC 3339 upper bound (inclusive)
    pub end_date: Option<String>,
    /// Maximum number of readings to return
    pub limit: Option<usize>,
    /// Number of readings to skip
    pub offset: Option<usize>,
    /// Newest first when true (the default)
    pub sort_desc: Option<bool>,
}

/// Filter for alert queries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertFilter {
    /// Restrict to one monitored user
    pub user_id: Option<String>,
    /// Maximum number of alerts to return
    pub limit: Option<usize>,
}

/// Read access to vendor-owned monitoring data
#[async_trait]
pub trait VitalsRepositoryTrait: Send + Sync {
    /// Short name of the backing source, used in logs and health checks
    fn source_name(&self) -> &'static str;

    /// Get a page of readings for a user, plus the total matching count
    async fn get_readings(
        &self,
        user_id: &str,
        filter: &ReadingFilter,
    ) -> Result<(Vec<VendorVitalReading>, usize), RepositoryError>;

    /// Get the most recent reading for a user
    async fn get_latest_reading(
        &self,
        user_id: &str,
    ) -> Result<Option<VendorVitalReading>, RepositoryError>;

    /// Get alerts, unordered
    async fn get_alerts(&self, filter: &AlertFilter) -> Result<Vec<VendorAlert>, RepositoryError>;

    /// Check that the source is reachable
    async fn ping(&self) -> Result<(), RepositoryError>;
}

#[async_trait]
impl<T: VitalsRepositoryTrait + ?Sized> VitalsRepositoryTrait for Arc<T> {
    fn source_name(&self) -> &'static str {
        (**self).source_name()
    }

    async fn get_readings(
        &self,
        user_id: &str,
        filter: &ReadingFilter,
    ) -> Result<(Vec<VendorVitalReading>, usize), RepositoryError> {
        (**self).get_readings(user_id, filter).await
    }

    async fn get_latest_reading(
        &self,
        user_id: &str,
    ) -> Result<Option<VendorVitalReading>, RepositoryError> {
        (**self).get_latest_reading(user_id).await
    }

    async fn get_alerts(&self, filter: &AlertFilter) -> Result<Vec<VendorAlert>, RepositoryError> {
        (**self).get_alerts(filter).await
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        (**self).ping().await
    }
}
