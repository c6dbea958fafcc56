use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::classifier::{
    BloodPressureClassification, HeartRateClassification, SitDurationClassification, SpO2Classification,
};
use super::health_status::HealthStatus;
use super::taxonomy::{standard_taxonomy, AlertReason, AlertTaxonomy};
use super::thresholds::{standard_thresholds, ThresholdTable};
use crate::entities::VitalReading;

/// Every classification for one reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct VitalAssessment {
    /// Absent when the reading has no blood pressure pair
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<BloodPressureClassification>,
    pub spo2: SpO2Classification,
    pub heart_rate: HeartRateClassification,
    pub sit_duration: SitDurationClassification,
    /// Compact aggregate status
    pub status: HealthStatus,
    /// Aggregate status including heart rate and full staging
    pub detailed_status: HealthStatus,
    /// Reason codes the reading triggers, most severe first
    #[cfg_attr(feature = "with-api", schema(value_type = Vec<String>))]
    pub alert_reasons: Vec<AlertReason>,
    /// Highest reason severity, 0 when none
    pub max_severity: u8,
}

impl ThresholdTable {
    pub fn assess(&self, reading: &VitalReading, taxonomy: &AlertTaxonomy) -> VitalAssessment {
        let alert_reasons = self.alert_reasons(reading, taxonomy);
        let codes: Vec<&str> = alert_reasons.iter().map(AlertReason::code).collect();

        VitalAssessment {
            blood_pressure: reading
                .has_blood_pressure()
                .then(|| self.classify_blood_pressure(reading.systolic(), reading.diastolic())),
            spo2: self.classify_spo2(reading.spo2()),
            heart_rate: self.classify_heart_rate(reading.heart_rate()),
            sit_duration: self.classify_sit_duration(reading.duration_seconds()),
            status: self.health_status(reading),
            detailed_status: self.health_status_from_vitals(reading),
            max_severity: taxonomy.max_severity(&codes),
            alert_reasons,
        }
    }
}

/// Assess a reading against the standard tables
pub fn assess_reading(reading: &VitalReading) -> VitalAssessment {
    standard_thresholds().assess(reading, standard_taxonomy())
}
