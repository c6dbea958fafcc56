use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use casana_data::repository::{AlertFilter, ReadingFilter, RepositoryError, VitalsRepositoryTrait};

use crate::entities::conversions;
use crate::entities::{AlertRecord, VitalReading};
use crate::rules::{AlertSummary, AlertTaxonomy, AlertTaxonomyEntry, ThresholdTable, VitalAssessment};
use crate::services::insights::VitalsInsights;

/// Longest user id accepted before hitting the vendor
pub const MAX_USER_ID_LENGTH: usize = 128;

/// Readings requested per page when collecting an insights window
pub const INSIGHTS_PAGE_SIZE: usize = 1000;
const MAX_INSIGHTS_PAGES: usize = 100;

/// Vitals service errors
#[derive(Debug, Error)]
pub enum VitalsServiceError {
    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Not found error
    #[error("Not found: {0}")]
    NotFound(String),

    /// Vendor source failed or returned something unusable
    #[error("Upstream error: {0}")]
    UpstreamError(String),

    /// Insufficient data error
    #[error("Insufficient data: {0}")]
    InsufficientData(String),
}

/// A reading paired with its assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct AssessedReading {
    pub reading: VitalReading,
    pub assessment: VitalAssessment,
}

/// An alert with its resolved severity and reason metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct RankedAlert {
    #[serde(flatten)]
    pub record: AlertRecord,
    /// Highest reason severity, 0 when the alert has no reasons
    pub max_severity: u8,
    /// Taxonomy entry per reason code, in the record's order
    pub reason_details: Vec<AlertTaxonomyEntry>,
}

/// Alerts in priority order with tallies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct RankedAlerts {
    pub alerts: Vec<RankedAlert>,
    #[cfg_attr(feature = "with-api", schema(value_type = Object))]
    pub counts: IndexMap<String, usize>,
    pub summary: AlertSummary,
}

/// Trait for vitals service operations
#[async_trait]
pub trait VitalsServiceTrait: Send + Sync {
    /// Active threshold table
    fn thresholds(&self) -> &ThresholdTable;

    /// Taxonomy built from the active table
    fn taxonomy(&self) -> &AlertTaxonomy;

    /// Classify one reading
    fn assess(&self, reading: &VitalReading) -> VitalAssessment;

    /// Sort alerts by severity and recency and tally their reasons
    fn rank_alerts(&self, alerts: Vec<AlertRecord>) -> RankedAlerts;

    /// Summary statistics over a set of readings
    fn calculate_insights(
        &self,
        readings: &[VitalReading],
        period_days: u32,
    ) -> Result<VitalsInsights, VitalsServiceError>;

    /// Get a page of assessed readings for a user, plus the total count
    async fn get_user_readings(
        &self,
        user_id: &str,
        filter: ReadingFilter,
    ) -> Result<(Vec<AssessedReading>, usize), VitalsServiceError>;

    /// Get the newest assessed reading for a user
    async fn get_latest_reading(&self, user_id: &str) -> Result<AssessedReading, VitalsServiceError>;

    /// Get vendor alerts in priority order
    async fn get_ranked_alerts(&self, filter: AlertFilter) -> Result<RankedAlerts, VitalsServiceError>;

    /// Insights over the last `period_days` days of a user's readings
    async fn get_insights(&self, user_id: &str, period_days: u32) -> Result<VitalsInsights, VitalsServiceError>;
}

/// Vitals service over a vendor repository
pub struct VitalsService<R: VitalsRepositoryTrait> {
    repository: R,
    thresholds: Arc<ThresholdTable>,
    taxonomy: Arc<AlertTaxonomy>,
}

impl<R: VitalsRepositoryTrait> VitalsService<R> {
    /// Create a service using the standard threshold table
    pub fn new(repository: R) -> Self {
        Self::with_thresholds(repository, ThresholdTable::standard())
    }

    /// Create a service with a custom threshold table; the taxonomy is derived from it
    pub fn with_thresholds(repository: R, thresholds: ThresholdTable) -> Self {
        let taxonomy = AlertTaxonomy::new(&thresholds);
        Self {
            repository,
            thresholds: Arc::new(thresholds),
            taxonomy: Arc::new(taxonomy),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Map repository errors to service errors
    fn map_repo_error(&self, err: RepositoryError) -> VitalsServiceError {
        match err {
            RepositoryError::NotFound(msg) => VitalsServiceError::NotFound(msg),
            RepositoryError::Configuration(msg) => VitalsServiceError::ValidationError(msg),
            other => {
                error!("{} source failed: {}", self.repository.source_name(), other);
                VitalsServiceError::UpstreamError(other.to_string())
            }
        }
    }

    fn assess_reading(&self, reading: VitalReading) -> AssessedReading {
        let assessment = self.thresholds.assess(&reading, &self.taxonomy);
        AssessedReading { reading, assessment }
    }

    /// Derive reasons from the attached reading when the vendor sent none
    fn fill_reasons(&self, mut record: AlertRecord) -> AlertRecord {
        if record.reasons.is_empty() {
            if let Some(reading) = &record.reading {
                record.reasons = self
                    .thresholds
                    .alert_reasons(reading, &self.taxonomy)
                    .into_iter()
                    .map(String::from)
                    .collect();
            }
        }
        record
    }

    fn to_ranked(&self, record: AlertRecord) -> RankedAlert {
        RankedAlert {
            max_severity: self.taxonomy.max_severity(&record.reasons),
            reason_details: record.reasons.iter().map(|code| self.taxonomy.info(code)).collect(),
            record,
        }
    }
}

fn validate_user_id(user_id: &str) -> Result<(), VitalsServiceError> {
    if user_id.trim().is_empty() {
        return Err(VitalsServiceError::ValidationError("User id must not be empty".to_string()));
    }
    if user_id.len() > MAX_USER_ID_LENGTH {
        return Err(VitalsServiceError::ValidationError(format!(
            "User id must be at most {} characters",
            MAX_USER_ID_LENGTH
        )));
    }
    if !user_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(VitalsServiceError::ValidationError(
            "User id may only contain letters, digits, '-', '_' and '.'".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl<R: VitalsRepositoryTrait> VitalsServiceTrait for VitalsService<R> {
    fn thresholds(&self) -> &ThresholdTable {
        &self.thresholds
    }

    fn taxonomy(&self) -> &AlertTaxonomy {
        &self.taxonomy
    }

    fn assess(&self, reading: &VitalReading) -> VitalAssessment {
        self.thresholds.assess(reading, &self.taxonomy)
    }

    fn rank_alerts(&self, alerts: Vec<AlertRecord>) -> RankedAlerts {
        let resolved: Vec<AlertRecord> = alerts.into_iter().map(|alert| self.fill_reasons(alert)).collect();

        let summary = self.taxonomy.summarize(&resolved);
        let counts = summary.by_reason.clone();
        let alerts = self
            .taxonomy
            .sort_by_severity(resolved)
            .into_iter()
            .map(|record| self.to_ranked(record))
            .collect();

        RankedAlerts { alerts, counts, summary }
    }

    fn calculate_insights(
        &self,
        readings: &[VitalReading],
        period_days: u32,
    ) -> Result<VitalsInsights, VitalsServiceError> {
        self.thresholds.calculate_insights(readings, period_days)
    }

    async fn get_user_readings(
        &self,
        user_id: &str,
        filter: ReadingFilter,
    ) -> Result<(Vec<AssessedReading>, usize), VitalsServiceError> {
        validate_user_id(user_id)?;

        let (vendor_readings, total) = self
            .repository
            .get_readings(user_id, &filter)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        debug!("Fetched {} of {} readings for user {}", vendor_readings.len(), total, user_id);

        let readings = vendor_readings
            .into_iter()
            .map(conversions::convert_to_domain_reading)
            .map(|reading| self.assess_reading(reading))
            .collect();

        Ok((readings, total))
    }

    async fn get_latest_reading(&self, user_id: &str) -> Result<AssessedReading, VitalsServiceError> {
        validate_user_id(user_id)?;

        let vendor_reading = self
            .repository
            .get_latest_reading(user_id)
            .await
            .map_err(|e| self.map_repo_error(e))?
            .ok_or_else(|| VitalsServiceError::NotFound(format!("No readings found for user {}", user_id)))?;

        Ok(self.assess_reading(conversions::convert_to_domain_reading(vendor_reading)))
    }

    async fn get_ranked_alerts(&self, filter: AlertFilter) -> Result<RankedAlerts, VitalsServiceError> {
        if let Some(user_id) = filter.user_id.as_deref() {
            validate_user_id(user_id)?;
        }

        let alerts: Vec<AlertRecord> = self
            .repository
            .get_alerts(&filter)
            .await
            .map_err(|e| self.map_repo_error(e))?
            .into_iter()
            .map(conversions::convert_to_domain_alert)
            .collect();

        debug!("Ranking {} alerts", alerts.len());
        Ok(self.rank_alerts(alerts))
    }

    async fn get_insights(&self, user_id: &str, period_days: u32) -> Result<VitalsInsights, VitalsServiceError> {
        validate_user_id(user_id)?;

        let start = chrono::Utc::now() - chrono::Duration::days(i64::from(period_days));
        let mut filter = ReadingFilter {
            start_date: Some(start.to_rfc3339()),
            limit: Some(INSIGHTS_PAGE_SIZE),
            sort_desc: Some(true),
            ..Default::default()
        };

        // The source may cap pages below the requested size, so walk until its total
        let mut readings: Vec<VitalReading> = Vec::new();
        for page in 0..MAX_INSIGHTS_PAGES {
            filter.offset = Some(readings.len());
            let (vendor_readings, total) = self
                .repository
                .get_readings(user_id, &filter)
                .await
                .map_err(|e| self.map_repo_error(e))?;

            let fetched = vendor_readings.len();
            readings.extend(vendor_readings.into_iter().map(conversions::convert_to_domain_reading));
            debug!("Insights page {} for {}: {} readings ({} of {})", page, user_id, fetched, readings.len(), total);

            if fetched == 0 || readings.len() >= total {
                break;
            }
            if page + 1 == MAX_INSIGHTS_PAGES {
                warn!(
                    "Insights for {} stopped after {} readings of {}",
                    user_id,
                    readings.len(),
                    total
                );
            }
        }

        if readings.is_empty() {
            warn!("No readings for user {} in the last {} days", user_id, period_days);
        }

        self.thresholds.calculate_insights(&readings, period_days)
    }
}
