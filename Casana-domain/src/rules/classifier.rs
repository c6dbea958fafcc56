//! Per-vital classification against a [`ThresholdTable`].
//!
//! Every classifier is total: zero, negative and out-of-range values are
//! classified by the nearest rule rather than rejected.

use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::thresholds::{standard_thresholds, ThresholdTable};

/// Coarse blood pressure status shown on badges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum BloodPressureStatus {
    Normal,
    Elevated,
    High,
    Critical,
    Low,
}

/// Blood pressure stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum BloodPressureStage {
    /// Systolic below the elevated cut and diastolic below stage 1
    Normal,
    /// Systolic 120-129 with diastolic below 80
    Elevated,
    /// Systolic 130-139 or diastolic 80-89
    Stage1,
    /// Systolic 140+ or diastolic 90+
    Stage2,
    /// Systolic 180+ or diastolic 120+
    Crisis,
    /// Systolic below 90
    Hypotension,
}

impl BloodPressureStage {
    pub fn status(self) -> BloodPressureStatus {
        match self {
            BloodPressureStage::Normal => BloodPressureStatus::Normal,
            BloodPressureStage::Elevated => BloodPressureStatus::Elevated,
            BloodPressureStage::Stage1 | BloodPressureStage::Stage2 => BloodPressureStatus::High,
            BloodPressureStage::Crisis => BloodPressureStatus::Critical,
            BloodPressureStage::Hypotension => BloodPressureStatus::Low,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            BloodPressureStage::Normal => "Normal blood pressure",
            BloodPressureStage::Elevated => "Elevated blood pressure",
            BloodPressureStage::Stage1 => "High blood pressure (stage 1)",
            BloodPressureStage::Stage2 => "High blood pressure (stage 2)",
            BloodPressureStage::Crisis => "Hypertensive crisis",
            BloodPressureStage::Hypotension => "Low blood pressure",
        }
    }

    /// Ordering along the hypertension scale; hypotension ranks with stage 1
    pub fn severity_rank(self) -> u8 {
        match self {
            BloodPressureStage::Normal => 0,
            BloodPressureStage::Elevated => 1,
            BloodPressureStage::Stage1 | BloodPressureStage::Hypotension => 2,
            BloodPressureStage::Stage2 => 3,
            BloodPressureStage::Crisis => 4,
        }
    }
}

/// Result of [`classify_blood_pressure`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct BloodPressureClassification {
    pub status: BloodPressureStatus,
    pub stage: BloodPressureStage,
    pub description: String,
}

impl From<BloodPressureStage> for BloodPressureClassification {
    fn from(stage: BloodPressureStage) -> Self {
        Self {
            status: stage.status(),
            stage,
            description: stage.description().to_string(),
        }
    }
}

/// Oxygen saturation band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum SpO2Status {
    Normal,
    MildLow,
    Low,
    Critical,
}

impl SpO2Status {
    pub fn description(self) -> &'static str {
        match self {
            SpO2Status::Normal => "Normal oxygen saturation",
            SpO2Status::MildLow => "Slightly low oxygen saturation",
            SpO2Status::Low => "Low oxygen saturation",
            SpO2Status::Critical => "Critically low oxygen saturation",
        }
    }
}

/// Result of [`classify_spo2`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct SpO2Classification {
    pub status: SpO2Status,
    pub description: String,
}

/// Heart rate band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum HeartRateStatus {
    VeryLow,
    Low,
    Normal,
    High,
    VeryHigh,
}

impl HeartRateStatus {
    pub fn description(self) -> &'static str {
        match self {
            HeartRateStatus::VeryLow => "Severe bradycardia",
            HeartRateStatus::Low => "Bradycardia",
            HeartRateStatus::Normal => "Normal heart rate",
            HeartRateStatus::High => "Tachycardia",
            HeartRateStatus::VeryHigh => "Severe tachycardia",
        }
    }
}

/// Result of [`classify_heart_rate`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct HeartRateClassification {
    pub status: HeartRateStatus,
    pub description: String,
}

/// Sit duration band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum SitDurationStatus {
    Normal,
    Extended,
    VeryExtended,
}

impl SitDurationStatus {
    pub fn description(self) -> &'static str {
        match self {
            SitDurationStatus::Normal => "Normal sit length",
            SitDurationStatus::Extended => "Extended sit",
            SitDurationStatus::VeryExtended => "Very extended sit",
        }
    }
}

/// Result of [`classify_sit_duration`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct SitDurationClassification {
    pub status: SitDurationStatus,
    pub description: String,
}

impl ThresholdTable {
    /// Stage a blood pressure pair; the first matching rule wins
    pub fn blood_pressure_stage(&self, systolic: i32, diastolic: i32) -> BloodPressureStage {
        let bp = &self.blood_pressure;
        if systolic >= bp.crisis_systolic || diastolic >= bp.crisis_diastolic {
            BloodPressureStage::Crisis
        } else if systolic >= bp.stage2_systolic || diastolic >= bp.stage2_diastolic {
            BloodPressureStage::Stage2
        } else if systolic >= bp.stage1_systolic || diastolic >= bp.stage1_diastolic {
            BloodPressureStage::Stage1
        } else if systolic >= bp.elevated_systolic {
            // diastolic is below stage 1 here
            BloodPressureStage::Elevated
        } else if systolic > 0 && systolic < bp.low_systolic {
            BloodPressureStage::Hypotension
        } else {
            BloodPressureStage::Normal
        }
    }

    pub fn classify_blood_pressure(&self, systolic: i32, diastolic: i32) -> BloodPressureClassification {
        self.blood_pressure_stage(systolic, diastolic).into()
    }

    pub fn spo2_status(&self, value: f64) -> SpO2Status {
        let spo2 = &self.spo2;
        if value < spo2.severe_critical_max + 1.0 {
            SpO2Status::Critical
        } else if value < spo2.mild_low_min {
            SpO2Status::Low
        } else if value < spo2.normal_min {
            SpO2Status::MildLow
        } else {
            SpO2Status::Normal
        }
    }

    pub fn classify_spo2(&self, value: f64) -> SpO2Classification {
        let status = self.spo2_status(value);
        SpO2Classification {
            status,
            description: status.description().to_string(),
        }
    }

    pub fn heart_rate_status(&self, value: i32) -> HeartRateStatus {
        let hr = &self.heart_rate;
        if value < hr.severe_bradycardia {
            HeartRateStatus::VeryLow
        } else if value < hr.normal_min {
            HeartRateStatus::Low
        } else if value > hr.severe_tachycardia {
            HeartRateStatus::VeryHigh
        } else if value > hr.normal_max {
            HeartRateStatus::High
        } else {
            HeartRateStatus::Normal
        }
    }

    pub fn classify_heart_rate(&self, value: i32) -> HeartRateClassification {
        let status = self.heart_rate_status(value);
        HeartRateClassification {
            status,
            description: status.description().to_string(),
        }
    }

    pub fn sit_duration_status(&self, seconds: i64) -> SitDurationStatus {
        let sit = &self.sit_duration;
        if seconds > sit.very_extended_seconds {
            SitDurationStatus::VeryExtended
        } else if seconds > sit.extended_seconds {
            SitDurationStatus::Extended
        } else {
            SitDurationStatus::Normal
        }
    }

    pub fn classify_sit_duration(&self, seconds: i64) -> SitDurationClassification {
        let status = self.sit_duration_status(seconds);
        SitDurationClassification {
            status,
            description: status.description().to_string(),
        }
    }
}

/// Classify blood pressure against the standard table
pub fn classify_blood_pressure(systolic: i32, diastolic: i32) -> BloodPressureClassification {
    standard_thresholds().classify_blood_pressure(systolic, diastolic)
}

/// Classify oxygen saturation against the standard table
pub fn classify_spo2(value: f64) -> SpO2Classification {
    standard_thresholds().classify_spo2(value)
}

/// Classify heart rate against the standard table
pub fn classify_heart_rate(value: i32) -> HeartRateClassification {
    standard_thresholds().classify_heart_rate(value)
}

/// Classify sit duration against the standard table
pub fn classify_sit_duration(seconds: i64) -> SitDurationClassification {
    standard_thresholds().classify_sit_duration(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bp_normal() {
        let result = classify_blood_pressure(110, 75);
        assert_eq!(result.stage, BloodPressureStage::Normal);
        assert_eq!(result.status, BloodPressureStatus::Normal);
    }

    #[test]
    fn test_bp_elevated() {
        let result = classify_blood_pressure(125, 75);
        assert_eq!(result.stage, BloodPressureStage::Elevated);
        assert_eq!(result.status, BloodPressureStatus::Elevated);
    }

    #[test]
    fn test_bp_stage1() {
        // Systolic in range
        assert_eq!(classify_blood_pressure(135, 75).stage, BloodPressureStage::Stage1);
        // Diastolic in range with otherwise elevated systolic
        assert_eq!(classify_blood_pressure(125, 85).stage, BloodPressureStage::Stage1);
        assert_eq!(classify_blood_pressure(135, 75).status, BloodPressureStatus::High);
    }

    #[test]
    fn test_bp_stage2() {
        assert_eq!(classify_blood_pressure(145, 75).stage, BloodPressureStage::Stage2);
        assert_eq!(classify_blood_pressure(120, 95).stage, BloodPressureStage::Stage2);
        assert_eq!(classify_blood_pressure(120, 95).status, BloodPressureStatus::High);
    }

    #[test]
    fn test_bp_crisis_on_either_value() {
        for (systolic, diastolic) in [(180, 70), (250, 0), (100, 120), (0, 130), (181, 121)] {
            let result = classify_blood_pressure(systolic, diastolic);
            assert_eq!(result.status, BloodPressureStatus::Critical, "{}/{}", systolic, diastolic);
            assert_eq!(result.stage, BloodPressureStage::Crisis);
        }
    }

    #[test]
    fn test_bp_hypotension_needs_positive_systolic() {
        assert_eq!(classify_blood_pressure(85, 55).stage, BloodPressureStage::Hypotension);
        assert_eq!(classify_blood_pressure(85, 55).status, BloodPressureStatus::Low);
        assert_eq!(classify_blood_pressure(1, 0).stage, BloodPressureStage::Hypotension);

        // Zero or negative systolic means "not measured"
        assert_eq!(classify_blood_pressure(0, 0).stage, BloodPressureStage::Normal);
        assert_eq!(classify_blood_pressure(-5, 40).stage, BloodPressureStage::Normal);

        // Low diastolic alone does not stage as hypotension
        assert_eq!(classify_blood_pressure(100, 50).stage, BloodPressureStage::Normal);
    }

    #[test]
    fn test_bp_monotonic_in_systolic() {
        let stages: Vec<_> = [119, 120, 130, 140, 180]
            .into_iter()
            .map(|systolic| classify_blood_pressure(systolic, 70).stage)
            .collect();

        assert_eq!(
            stages,
            vec![
                BloodPressureStage::Normal,
                BloodPressureStage::Elevated,
                BloodPressureStage::Stage1,
                BloodPressureStage::Stage2,
                BloodPressureStage::Crisis,
            ]
        );
        assert!(stages.windows(2).all(|w| w[0].severity_rank() <= w[1].severity_rank()));
    }

    #[test]
    fn test_bp_descriptions() {
        assert_eq!(classify_blood_pressure(190, 100).description, "Hypertensive crisis");
        assert_eq!(classify_blood_pressure(110, 70).description, "Normal blood pressure");
    }

    #[test]
    fn test_spo2_bands() {
        assert_eq!(classify_spo2(89.0).status, SpO2Status::Critical);
        assert_eq!(classify_spo2(89.9).status, SpO2Status::Critical);
        assert_eq!(classify_spo2(90.0).status, SpO2Status::Low);
        assert_eq!(classify_spo2(91.0).status, SpO2Status::Low);
        assert_eq!(classify_spo2(92.0).status, SpO2Status::MildLow);
        assert_eq!(classify_spo2(93.0).status, SpO2Status::MildLow);
        assert_eq!(classify_spo2(95.0).status, SpO2Status::Normal);
        assert_eq!(classify_spo2(97.0).status, SpO2Status::Normal);
    }

    #[test]
    fn test_spo2_out_of_range_values() {
        assert_eq!(classify_spo2(-3.0).status, SpO2Status::Critical);
        assert_eq!(classify_spo2(0.0).status, SpO2Status::Critical);
        assert_eq!(classify_spo2(104.0).status, SpO2Status::Normal);
    }

    #[test]
    fn test_heart_rate_bands() {
        assert_eq!(classify_heart_rate(45).status, HeartRateStatus::VeryLow);
        assert_eq!(classify_heart_rate(50).status, HeartRateStatus::Low);
        assert_eq!(classify_heart_rate(59).status, HeartRateStatus::Low);
        assert_eq!(classify_heart_rate(60).status, HeartRateStatus::Normal);
        assert_eq!(classify_heart_rate(100).status, HeartRateStatus::Normal);
        assert_eq!(classify_heart_rate(101).status, HeartRateStatus::High);
        assert_eq!(classify_heart_rate(120).status, HeartRateStatus::High);
        assert_eq!(classify_heart_rate(121).status, HeartRateStatus::VeryHigh);
        assert_eq!(classify_heart_rate(0).status, HeartRateStatus::VeryLow);
        assert_eq!(classify_heart_rate(-10).status, HeartRateStatus::VeryLow);
    }

    #[test]
    fn test_sit_duration_bands() {
        assert_eq!(classify_sit_duration(0).status, SitDurationStatus::Normal);
        assert_eq!(classify_sit_duration(600).status, SitDurationStatus::Normal);
        assert_eq!(classify_sit_duration(601).status, SitDurationStatus::Extended);
        assert_eq!(classify_sit_duration(1200).status, SitDurationStatus::Extended);
        assert_eq!(classify_sit_duration(1201).status, SitDurationStatus::VeryExtended);
        assert_eq!(classify_sit_duration(-30).status, SitDurationStatus::Normal);
    }

    #[test]
    fn test_custom_table_is_honoured() {
        let mut table = ThresholdTable::standard();
        table.heart_rate.normal_max = 90;
        assert_eq!(table.classify_heart_rate(95).status, HeartRateStatus::High);
        assert_eq!(classify_heart_rate(95).status, HeartRateStatus::Normal);
    }

    #[test]
    fn test_labels_serialize_snake_case() {
        let json = serde_json::to_value(classify_spo2(93.0)).unwrap();
        assert_eq!(json["status"], "mild_low");

        let json = serde_json::to_value(classify_heart_rate(130)).unwrap();
        assert_eq!(json["status"], "very_high");

        let json = serde_json::to_value(classify_blood_pressure(135, 70)).unwrap();
        assert_eq!(json["status"], "high");
        assert_eq!(json["stage"], "stage1");
    }
}
