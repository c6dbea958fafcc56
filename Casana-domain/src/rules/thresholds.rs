//! Numeric cut-points for every vital the dashboard classifies.
//!
//! This is the single source of truth for clinical boundaries. Server-side
//! classification reads it directly and the API serves it as JSON so client
//! widgets can mirror the same numbers.

use std::fmt::Display;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Version tag of the built-in table
pub const STANDARD_THRESHOLDS_VERSION: &str = "2024.1";

static STANDARD: Lazy<ThresholdTable> = Lazy::new(ThresholdTable::standard);

/// The built-in table, shared by the free classification functions
pub fn standard_thresholds() -> &'static ThresholdTable {
    &STANDARD
}

/// Errors raised while loading or checking a threshold table
#[derive(Debug, Error)]
pub enum ThresholdError {
    /// Table could not be parsed
    #[error("Invalid threshold table: {0}")]
    Parse(#[from] serde_json::Error),

    /// Boundaries within one vital are not strictly increasing
    #[error("{vital} thresholds out of order: {detail}")]
    OutOfOrder { vital: &'static str, detail: String },
}

/// Blood pressure boundaries in mmHg
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct BloodPressureThresholds {
    /// Systolic at or above this is elevated (normal below)
    pub elevated_systolic: i32,
    /// Systolic at or above this is stage 1 hypertension
    pub stage1_systolic: i32,
    /// Diastolic at or above this is stage 1 hypertension (normal below)
    pub stage1_diastolic: i32,
    /// Systolic at or above this is stage 2 hypertension
    pub stage2_systolic: i32,
    /// Diastolic at or above this is stage 2 hypertension
    pub stage2_diastolic: i32,
    /// Systolic at or above this is a hypertensive crisis
    pub crisis_systolic: i32,
    /// Diastolic at or above this is a hypertensive crisis
    pub crisis_diastolic: i32,
    /// Systolic below this is hypotension
    pub low_systolic: i32,
    /// Diastolic below this is hypotension
    pub low_diastolic: i32,
    /// Systolic at or above this makes the simple aggregate status a warning
    pub status_warning_systolic: i32,
    /// Diastolic at or above this makes the simple aggregate status a warning
    pub status_warning_diastolic: i32,
}

/// Oxygen saturation boundaries in percent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct SpO2Thresholds {
    /// Lowest normal value
    pub normal_min: f64,
    /// Lowest mildly-low value
    pub mild_low_min: f64,
    /// Highest critical value
    pub critical_max: f64,
    /// Highest severely critical value
    pub severe_critical_max: f64,
}

/// Heart rate boundaries in beats per minute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct HeartRateThresholds {
    /// Lowest normal rate
    pub normal_min: i32,
    /// Highest normal rate
    pub normal_max: i32,
    /// Below this is severe bradycardia
    pub severe_bradycardia: i32,
    /// Above this is severe tachycardia
    pub severe_tachycardia: i32,
}

/// Sit duration boundaries in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct SitDurationThresholds {
    /// Above this the sit is extended
    pub extended_seconds: i64,
    /// Above this the sit is very extended
    pub very_extended_seconds: i64,
}

/// Every clinical boundary, grouped by vital
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct ThresholdTable {
    /// Identifies the table revision
    pub version: String,
    pub blood_pressure: BloodPressureThresholds,
    pub spo2: SpO2Thresholds,
    pub heart_rate: HeartRateThresholds,
    pub sit_duration: SitDurationThresholds,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl ThresholdTable {
    /// The built-in clinical table
    pub fn standard() -> Self {
        Self {
            version: STANDARD_THRESHOLDS_VERSION.to_string(),
            blood_pressure: BloodPressureThresholds {
                elevated_systolic: 120,
                stage1_systolic: 130,
                stage1_diastolic: 80,
                stage2_systolic: 140,
                stage2_diastolic: 90,
                crisis_systolic: 180,
                crisis_diastolic: 120,
                low_systolic: 90,
                low_diastolic: 60,
                status_warning_systolic: 130,
                status_warning_diastolic: 85,
            },
            spo2: SpO2Thresholds {
                normal_min: 95.0,
                mild_low_min: 92.0,
                critical_max: 91.0,
                severe_critical_max: 89.0,
            },
            heart_rate: HeartRateThresholds {
                normal_min: 60,
                normal_max: 100,
                severe_bradycardia: 50,
                severe_tachycardia: 120,
            },
            sit_duration: SitDurationThresholds {
                extended_seconds: 600,
                very_extended_seconds: 1200,
            },
        }
    }

    /// Parse a table from JSON and check it
    pub fn from_json(json: &str) -> Result<Self, ThresholdError> {
        let table: ThresholdTable = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    /// Check that boundaries within each vital are strictly increasing
    pub fn validate(&self) -> Result<(), ThresholdError> {
        let bp = &self.blood_pressure;
        ascending(
            "blood pressure",
            &[
                ("0", 0),
                ("low_systolic", bp.low_systolic),
                ("elevated_systolic", bp.elevated_systolic),
                ("stage1_systolic", bp.stage1_systolic),
                ("stage2_systolic", bp.stage2_systolic),
                ("crisis_systolic", bp.crisis_systolic),
            ],
        )?;
        ascending(
            "blood pressure",
            &[
                ("0", 0),
                ("low_diastolic", bp.low_diastolic),
                ("stage1_diastolic", bp.stage1_diastolic),
                ("stage2_diastolic", bp.stage2_diastolic),
                ("crisis_diastolic", bp.crisis_diastolic),
            ],
        )?;
        // The simple aggregate's warning cut sits inside the stage 1 band
        ascending(
            "blood pressure",
            &[
                ("elevated_systolic", bp.elevated_systolic - 1),
                ("status_warning_systolic", bp.status_warning_systolic),
                ("stage2_systolic", bp.stage2_systolic),
            ],
        )?;
        ascending(
            "blood pressure",
            &[
                ("stage1_diastolic", bp.stage1_diastolic - 1),
                ("status_warning_diastolic", bp.status_warning_diastolic),
                ("stage2_diastolic", bp.stage2_diastolic),
            ],
        )?;

        let spo2 = &self.spo2;
        ascending(
            "SpO2",
            &[
                ("severe_critical_max", spo2.severe_critical_max),
                ("critical_max", spo2.critical_max),
                ("mild_low_min", spo2.mild_low_min),
                ("normal_min", spo2.normal_min),
            ],
        )?;
        if spo2.severe_critical_max < 0.0 || spo2.normal_min > 100.0 {
            return Err(ThresholdError::OutOfOrder {
                vital: "SpO2",
                detail: "boundaries must lie within 0-100".to_string(),
            });
        }

        let hr = &self.heart_rate;
        ascending(
            "heart rate",
            &[
                ("0", 0),
                ("severe_bradycardia", hr.severe_bradycardia),
                ("normal_min", hr.normal_min),
                ("normal_max", hr.normal_max),
                ("severe_tachycardia", hr.severe_tachycardia),
            ],
        )?;

        let sit = &self.sit_duration;
        ascending(
            "sit duration",
            &[
                ("0", 0),
                ("extended_seconds", sit.extended_seconds),
                ("very_extended_seconds", sit.very_extended_seconds),
            ],
        )
    }
}

fn ascending<T: PartialOrd + Display + Copy>(
    vital: &'static str,
    points: &[(&str, T)],
) -> Result<(), ThresholdError> {
    for pair in points.windows(2) {
        let (lower_name, lower) = pair[0];
        let (upper_name, upper) = pair[1];
        // `!(a < b)` so NaN boundaries are rejected too
        if !(lower < upper) {
            return Err(ThresholdError::OutOfOrder {
                vital,
                detail: format!(
                    "{} ({}) must be below {} ({})",
                    lower_name, lower, upper_name, upper
                ),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_is_valid() {
        assert!(ThresholdTable::standard().validate().is_ok());
        assert_eq!(standard_thresholds().version, STANDARD_THRESHOLDS_VERSION);
    }

    #[test]
    fn test_json_round_trip_keeps_values() {
        let json = serde_json::to_string(&ThresholdTable::standard()).unwrap();
        let parsed = ThresholdTable::from_json(&json).unwrap();
        assert_eq!(parsed, ThresholdTable::standard());
    }

    #[test]
    fn test_serialized_shape_for_clients() {
        let value = serde_json::to_value(standard_thresholds()).unwrap();
        assert_eq!(value["blood_pressure"]["crisis_systolic"], 180);
        assert_eq!(value["spo2"]["normal_min"], 95.0);
        assert_eq!(value["heart_rate"]["severe_tachycardia"], 120);
        assert_eq!(value["sit_duration"]["very_extended_seconds"], 1200);
    }

    #[test]
    fn test_rejects_overlapping_blood_pressure() {
        let mut table = ThresholdTable::standard();
        table.blood_pressure.stage2_systolic = 125;

        let err = table.validate().unwrap_err();
        assert!(err.to_string().contains("stage1_systolic"));
    }

    #[test]
    fn test_rejects_warning_cut_outside_stage1() {
        let mut table = ThresholdTable::standard();
        table.blood_pressure.status_warning_diastolic = 95;
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_rejects_spo2_out_of_range() {
        let mut table = ThresholdTable::standard();
        table.spo2.normal_min = 101.0;
        assert!(table.validate().is_err());

        let mut table = ThresholdTable::standard();
        table.spo2.critical_max = f64::NAN;
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_heart_rate_and_sit() {
        let mut table = ThresholdTable::standard();
        table.heart_rate.normal_max = 55;
        assert!(table.validate().is_err());

        let mut table = ThresholdTable::standard();
        table.sit_duration.very_extended_seconds = 600;
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_from_json_reports_parse_errors() {
        let result = ThresholdTable::from_json("{ \"version\": 3 }");
        assert!(matches!(result, Err(ThresholdError::Parse(_))));
    }
}
