use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use casana_data::models::parse_vendor_timestamp;

use super::vitals::VitalReading;

/// An alert raised for a monitored user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct AlertRecord {
    /// Alert identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Monitored user the alert belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Display name of the monitored user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    /// Reason codes, known or not
    #[serde(default, alias = "alert_reasons")]
    pub reasons: Vec<String>,

    /// When the alert was raised
    #[serde(default, alias = "created_at")]
    pub timestamp: Option<String>,

    /// Reading that triggered the alert
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading: Option<VitalReading>,
}

impl AlertRecord {
    /// Milliseconds since the epoch; missing or unparseable timestamps are 0
    pub fn timestamp_millis(&self) -> i64 {
        self.timestamp
            .as_deref()
            .and_then(parse_vendor_timestamp)
            .map(|dt| dt.timestamp_millis())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_millis() {
        let alert = AlertRecord {
            timestamp: Some("1970-01-01T00:00:01Z".to_string()),
            ..Default::default()
        };
        assert_eq!(alert.timestamp_millis(), 1000);

        let alert = AlertRecord {
            timestamp: Some("soon".to_string()),
            ..Default::default()
        };
        assert_eq!(alert.timestamp_millis(), 0);
        assert_eq!(AlertRecord::default().timestamp_millis(), 0);
    }
}
