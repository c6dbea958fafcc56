//! Aggregate good / warning / alert status for a whole reading.
//!
//! Two rule sets live here and are kept apart on purpose: callers depend on
//! their different precedence. [`get_health_status`] is the compact rule set
//! used on list views; [`get_health_status_from_vitals`] adds heart rate and
//! the full blood pressure staging.

use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::classifier::{BloodPressureStage, HeartRateStatus, SpO2Status};
use super::thresholds::{standard_thresholds, ThresholdTable};
use crate::entities::VitalReading;

/// Overall status of a reading, ordered from least to most urgent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Good,
    Warning,
    Alert,
}

impl HealthStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            HealthStatus::Good => "good",
            HealthStatus::Warning => "warning",
            HealthStatus::Alert => "alert",
        }
    }
}

impl ThresholdTable {
    /// Compact rule set; the first matching rule wins
    pub fn health_status(&self, reading: &VitalReading) -> HealthStatus {
        let bp = &self.blood_pressure;
        let systolic = reading.systolic();
        let diastolic = reading.diastolic();
        let spo2 = reading.spo2();

        if reading.is_hypertensive() {
            HealthStatus::Alert
        } else if systolic >= bp.stage2_systolic || diastolic >= bp.stage2_diastolic {
            HealthStatus::Alert
        } else if systolic >= bp.status_warning_systolic || diastolic >= bp.status_warning_diastolic {
            HealthStatus::Warning
        } else if spo2 < self.spo2.mild_low_min {
            HealthStatus::Alert
        } else if spo2 < self.spo2.normal_min {
            HealthStatus::Warning
        } else {
            HealthStatus::Good
        }
    }

    /// Full rule set over staged blood pressure, SpO2 and heart rate
    pub fn health_status_from_vitals(&self, reading: &VitalReading) -> HealthStatus {
        let stage = self.blood_pressure_stage(reading.systolic(), reading.diastolic());
        let spo2 = self.spo2_status(reading.spo2());
        let heart_rate = self.heart_rate_status(reading.heart_rate());

        if reading.is_hypertensive() {
            return HealthStatus::Alert;
        }

        match stage {
            BloodPressureStage::Crisis | BloodPressureStage::Stage2 => return HealthStatus::Alert,
            _ => {}
        }
        if matches!(spo2, SpO2Status::Critical | SpO2Status::Low) {
            return HealthStatus::Alert;
        }
        if matches!(heart_rate, HeartRateStatus::VeryLow | HeartRateStatus::VeryHigh) {
            return HealthStatus::Alert;
        }

        if matches!(stage, BloodPressureStage::Stage1 | BloodPressureStage::Elevated) {
            return HealthStatus::Warning;
        }
        if spo2 == SpO2Status::MildLow {
            return HealthStatus::Warning;
        }
        if matches!(heart_rate, HeartRateStatus::Low | HeartRateStatus::High) {
            return HealthStatus::Warning;
        }

        HealthStatus::Good
    }
}

/// Compact aggregate status against the standard table
pub fn get_health_status(reading: &VitalReading) -> HealthStatus {
    standard_thresholds().health_status(reading)
}

/// Full aggregate status against the standard table
pub fn get_health_status_from_vitals(reading: &VitalReading) -> HealthStatus {
    standard_thresholds().health_status_from_vitals(reading)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(systolic: i32, diastolic: i32, htn: bool, spo2: f64, heart_rate: i32) -> VitalReading {
        VitalReading {
            systolic: Some(systolic),
            diastolic: Some(diastolic),
            htn: Some(htn),
            spo2: Some(spo2),
            heart_rate: Some(heart_rate),
            ..Default::default()
        }
    }

    #[test]
    fn test_scenario_htn_flag_alerts() {
        let r = reading(145, 92, true, 97.0, 72);
        assert_eq!(get_health_status(&r), HealthStatus::Alert);
        assert_eq!(get_health_status_from_vitals(&r), HealthStatus::Alert);
    }

    #[test]
    fn test_scenario_elevated_is_good_in_compact_rules() {
        let r = reading(125, 78, false, 97.0, 72);
        assert_eq!(get_health_status(&r), HealthStatus::Good);
        // The full rule set treats elevated pressure as a warning
        assert_eq!(get_health_status_from_vitals(&r), HealthStatus::Warning);
    }

    #[test]
    fn test_htn_flag_wins_over_normal_values() {
        let r = reading(110, 70, true, 99.0, 70);
        assert_eq!(get_health_status(&r), HealthStatus::Alert);
        assert_eq!(get_health_status_from_vitals(&r), HealthStatus::Alert);
    }

    #[test]
    fn test_compact_blood_pressure_rules() {
        assert_eq!(get_health_status(&reading(140, 70, false, 98.0, 70)), HealthStatus::Alert);
        assert_eq!(get_health_status(&reading(120, 90, false, 98.0, 70)), HealthStatus::Alert);
        assert_eq!(get_health_status(&reading(130, 70, false, 98.0, 70)), HealthStatus::Warning);
        assert_eq!(get_health_status(&reading(120, 85, false, 98.0, 70)), HealthStatus::Warning);
        // 82 diastolic is stage 1 but below the compact warning cut
        assert_eq!(get_health_status(&reading(118, 82, false, 98.0, 70)), HealthStatus::Good);
    }

    #[test]
    fn test_compact_spo2_rules() {
        assert_eq!(get_health_status(&reading(115, 75, false, 91.5, 70)), HealthStatus::Alert);
        assert_eq!(get_health_status(&reading(115, 75, false, 92.0, 70)), HealthStatus::Warning);
        assert_eq!(get_health_status(&reading(115, 75, false, 94.9, 70)), HealthStatus::Warning);
        assert_eq!(get_health_status(&reading(115, 75, false, 95.0, 70)), HealthStatus::Good);
    }

    #[test]
    fn test_compact_rules_order_bp_warning_before_spo2_alert() {
        let r = reading(132, 70, false, 88.0, 70);
        assert_eq!(get_health_status(&r), HealthStatus::Warning);
        assert_eq!(get_health_status_from_vitals(&r), HealthStatus::Alert);
    }

    #[test]
    fn test_compact_rules_ignore_heart_rate() {
        let r = reading(115, 75, false, 98.0, 150);
        assert_eq!(get_health_status(&r), HealthStatus::Good);
        assert_eq!(get_health_status_from_vitals(&r), HealthStatus::Alert);
    }

    #[test]
    fn test_full_rules_heart_rate_bands() {
        assert_eq!(get_health_status_from_vitals(&reading(115, 75, false, 98.0, 45)), HealthStatus::Alert);
        assert_eq!(get_health_status_from_vitals(&reading(115, 75, false, 98.0, 55)), HealthStatus::Warning);
        assert_eq!(get_health_status_from_vitals(&reading(115, 75, false, 98.0, 110)), HealthStatus::Warning);
        assert_eq!(get_health_status_from_vitals(&reading(115, 75, false, 98.0, 80)), HealthStatus::Good);
    }

    #[test]
    fn test_full_rules_spo2_bands() {
        assert_eq!(get_health_status_from_vitals(&reading(115, 75, false, 91.0, 70)), HealthStatus::Alert);
        assert_eq!(get_health_status_from_vitals(&reading(115, 75, false, 93.0, 70)), HealthStatus::Warning);
    }

    #[test]
    fn test_full_rules_stage1_is_warning() {
        assert_eq!(get_health_status_from_vitals(&reading(118, 82, false, 98.0, 70)), HealthStatus::Warning);
        assert_eq!(get_health_status_from_vitals(&reading(185, 70, false, 98.0, 70)), HealthStatus::Alert);
    }

    #[test]
    fn test_empty_reading_uses_defaults() {
        let r = VitalReading::default();
        assert_eq!(get_health_status(&r), HealthStatus::Good);
        assert_eq!(get_health_status_from_vitals(&r), HealthStatus::Good);
    }

    #[test]
    fn test_status_ordering_and_serialization() {
        assert!(HealthStatus::Alert > HealthStatus::Warning);
        assert!(HealthStatus::Warning > HealthStatus::Good);
        assert_eq!(serde_json::to_value(HealthStatus::Warning).unwrap(), "warning");
    }
}
