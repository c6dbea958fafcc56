//! Clinical rules engine.
//!
//! Everything here is a pure function of its inputs. The threshold table and
//! the taxonomy derived from it are built once and only read afterwards.

pub mod assessment;
pub mod classifier;
pub mod health_status;
pub mod ranking;
pub mod taxonomy;
pub mod thresholds;

pub use assessment::{assess_reading, VitalAssessment};
pub use classifier::{
    classify_blood_pressure, classify_heart_rate, classify_sit_duration, classify_spo2,
    BloodPressureClassification, BloodPressureStage, BloodPressureStatus, HeartRateClassification,
    HeartRateStatus, SitDurationClassification, SitDurationStatus, SpO2Classification, SpO2Status,
};
pub use health_status::{get_health_status, get_health_status_from_vitals, HealthStatus};
pub use ranking::{
    count_alerts_by_reason, derive_alert_reasons, get_max_severity, sort_alerts_by_severity,
    summarize_alerts, AlertSummary,
};
pub use taxonomy::{
    get_alert_info, get_severity_info, humanize_code, render_alert_badge, standard_taxonomy, AlertBadge,
    AlertReason, AlertTaxonomy, AlertTaxonomyEntry, Severity, SeverityInfo,
};
pub use thresholds::{
    standard_thresholds, BloodPressureThresholds, HeartRateThresholds, SitDurationThresholds,
    SpO2Thresholds, ThresholdError, ThresholdTable, STANDARD_THRESHOLDS_VERSION,
};
