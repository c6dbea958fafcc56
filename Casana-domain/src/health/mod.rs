//! Domain layer health check functionality
//! This module provides health check services for the application

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use casana_data::repository::VitalsRepositoryTrait;

use crate::rules::ThresholdTable;

/// Component name of the vendor data source
pub const VENDOR_SOURCE_COMPONENT: &str = "vendor_source";
/// Component name of the threshold table and taxonomy
pub const RULES_ENGINE_COMPONENT: &str = "rules_engine";

/// System health status
#[derive(Debug, Clone, PartialEq)]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// Some components are degraded but the system is functional
    Degraded,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentStatus {
    /// Component is functioning normally
    Healthy,
    /// Component is functioning but with reduced performance
    Degraded,
    /// Component is not functioning
    Unhealthy,
}

/// Represents a health component with status and optional details
#[derive(Debug, Clone)]
pub struct HealthComponent {
    /// Status of the component
    pub status: ComponentStatus,
    /// Optional details about the component status
    pub details: Option<String>,
}

/// Represents the overall health of the system
#[derive(Debug, Clone)]
pub struct SystemHealth {
    /// Overall system status
    pub status: SystemStatus,
    /// Map of component names to their health status
    pub components: HashMap<String, HealthComponent>,
}

/// Trait for health services
#[async_trait]
pub trait HealthServiceTrait: Send + Sync {
    /// Get the overall system health
    async fn get_system_health(&self) -> SystemHealth;

    /// Check that the vendor source answers
    async fn check_vendor_status(&self) -> Result<(), String>;
}

/// Health service over the vendor repository and the active rules
pub struct HealthService {
    repository: Arc<dyn VitalsRepositoryTrait>,
    thresholds: Arc<ThresholdTable>,
}

impl HealthService {
    pub fn new(repository: Arc<dyn VitalsRepositoryTrait>, thresholds: Arc<ThresholdTable>) -> Self {
        Self { repository, thresholds }
    }
}

impl std::fmt::Debug for HealthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthService")
            .field("source", &self.repository.source_name())
            .field("thresholds", &self.thresholds.version)
            .finish()
    }
}

#[async_trait]
impl HealthServiceTrait for HealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let source = self.repository.source_name();

        // An unreachable vendor leaves ad-hoc assessment working
        let vendor = match self.check_vendor_status().await {
            Ok(()) => HealthComponent {
                status: ComponentStatus::Healthy,
                details: Some(format!("source: {}", source)),
            },
            Err(e) => {
                warn!("Vendor source {} failed health check: {}", source, e);
                HealthComponent {
                    status: ComponentStatus::Degraded,
                    details: Some(e),
                }
            }
        };

        let rules = match self.thresholds.validate() {
            Ok(()) => HealthComponent {
                status: ComponentStatus::Healthy,
                details: Some(format!("thresholds {}", self.thresholds.version)),
            },
            Err(e) => HealthComponent {
                status: ComponentStatus::Unhealthy,
                details: Some(e.to_string()),
            },
        };

        let components: HashMap<String, HealthComponent> = vec![
            (VENDOR_SOURCE_COMPONENT.to_string(), vendor),
            (RULES_ENGINE_COMPONENT.to_string(), rules),
        ]
        .into_iter()
        .collect();

        let status = if components.values().any(|c| c.status == ComponentStatus::Unhealthy) {
            SystemStatus::Unhealthy
        } else if components.values().any(|c| c.status == ComponentStatus::Degraded) {
            SystemStatus::Degraded
        } else {
            SystemStatus::Healthy
        };

        SystemHealth { status, components }
    }

    async fn check_vendor_status(&self) -> Result<(), String> {
        self.repository
            .ping()
            .await
            .map_err(|e| format!("Vendor source unavailable: {}", e))
    }
}
