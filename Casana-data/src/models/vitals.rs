use serde::{Deserialize, Serialize};

/// A vital-sign result as returned by the vendor API.
///
/// Every field is optional: partial results are common (a sit can end before
/// the cuff inflates, the oximeter can fail to lock) and the vendor sends
/// `null` or omits the key. Type mismatches are still rejected here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VendorVitalReading {
    /// Vendor result identifier
    pub id: Option<String>,

    /// Owner of the reading
    pub user_id: Option<String>,

    /// Systolic blood pressure in mmHg
    pub bp_systolic: Option<i32>,

    /// Diastolic blood pressure in mmHg
    pub bp_diastolic: Option<i32>,

    /// Upstream hypertension flag
    pub htn: Option<bool>,

    /// Blood oxygen saturation percentage
    #[serde(alias = "spo2")]
    pub blood_oxygenation: Option<f64>,

    /// Heart rate in beats per minute
    pub heart_rate: Option<i32>,

    /// Heart-rate variability in milliseconds
    pub hrv: Option<f64>,

    /// Mobility score, 0-100
    pub agility_score: Option<f64>,

    /// Length of the sit in seconds
    pub duration_seconds: Option<i64>,

    /// When the sit was recorded
    pub timestamp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_result() {
        let json = r#"{
            "id": "r-1",
            "user_id": "u-1",
            "bp_systolic": 128,
            "bp_diastolic": 82,
            "htn": false,
            "blood_oxygenation": 97.5,
            "heart_rate": 64,
            "hrv": 41.2,
            "agility_score": 73.0,
            "duration_seconds": 415,
            "timestamp": "2024-03-01T08:30:00Z"
        }"#;

        let reading: VendorVitalReading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.bp_systolic, Some(128));
        assert_eq!(reading.bp_diastolic, Some(82));
        assert_eq!(reading.htn, Some(false));
        assert_eq!(reading.blood_oxygenation, Some(97.5));
        assert_eq!(reading.duration_seconds, Some(415));
    }

    #[test]
    fn test_deserialize_partial_result() {
        let json = r#"{ "bp_systolic": null, "spo2": 93, "timestamp": "2024-03-01" }"#;

        let reading: VendorVitalReading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.bp_systolic, None);
        assert_eq!(reading.heart_rate, None);
        assert_eq!(reading.blood_oxygenation, Some(93.0));
    }

    #[test]
    fn test_reject_mismatched_types() {
        let json = r#"{ "bp_systolic": "high" }"#;
        assert!(serde_json::from_str::<VendorVitalReading>(json).is_err());

        let json = r#"{ "htn": "yes" }"#;
        assert!(serde_json::from_str::<VendorVitalReading>(json).is_err());
    }
}
