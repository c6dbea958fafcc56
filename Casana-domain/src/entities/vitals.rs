use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use casana_data::models::parse_vendor_timestamp;

/// Systolic/diastolic used when the reading has no blood pressure
pub const DEFAULT_BLOOD_PRESSURE: i32 = 0;
/// SpO2 used when the reading has no oximetry
pub const DEFAULT_SPO2: f64 = 100.0;
/// Heart rate used when the reading has no pulse
pub const DEFAULT_HEART_RATE: i32 = 75;
/// Sit duration used when the reading has no duration
pub const DEFAULT_DURATION_SECONDS: i64 = 0;

/// One sit's worth of vital signs.
///
/// Fields are optional because upstream results are frequently partial.
/// Classification goes through the accessor methods, which substitute the
/// documented defaults for missing values. Vendor field names are accepted
/// as aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct VitalReading {
    /// Vendor result identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Owner of the reading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Systolic blood pressure in mmHg
    #[serde(default, alias = "bp_systolic")]
    pub systolic: Option<i32>,

    /// Diastolic blood pressure in mmHg
    #[serde(default, alias = "bp_diastolic")]
    pub diastolic: Option<i32>,

    /// Hypertension flag supplied upstream; overrides the numbers when true
    #[serde(default)]
    pub htn: Option<bool>,

    /// Blood oxygen saturation in percent
    #[serde(default, alias = "blood_oxygenation")]
    pub spo2: Option<f64>,

    /// Heart rate in beats per minute
    #[serde(default)]
    pub heart_rate: Option<i32>,

    /// Heart-rate variability in milliseconds (not used for status)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hrv: Option<f64>,

    /// Mobility score 0-100 (not used for status)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agility_score: Option<f64>,

    /// Sit length in seconds
    #[serde(default)]
    pub duration_seconds: Option<i64>,

    /// When the sit was recorded
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl VitalReading {
    pub fn systolic(&self) -> i32 {
        self.systolic.unwrap_or(DEFAULT_BLOOD_PRESSURE)
    }

    pub fn diastolic(&self) -> i32 {
        self.diastolic.unwrap_or(DEFAULT_BLOOD_PRESSURE)
    }

    /// True only when the upstream flag is present and set
    pub fn is_hypertensive(&self) -> bool {
        self.htn == Some(true)
    }

    pub fn spo2(&self) -> f64 {
        self.spo2.unwrap_or(DEFAULT_SPO2)
    }

    pub fn heart_rate(&self) -> i32 {
        self.heart_rate.unwrap_or(DEFAULT_HEART_RATE)
    }

    pub fn duration_seconds(&self) -> i64 {
        self.duration_seconds.unwrap_or(DEFAULT_DURATION_SECONDS)
    }

    /// Whether both blood pressure values were measured
    pub fn has_blood_pressure(&self) -> bool {
        self.systolic.is_some() && self.diastolic.is_some()
    }

    /// Parsed timestamp, `None` when missing or unparseable
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp.as_deref().and_then(parse_vendor_timestamp)
    }
}
