use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use casana_domain::entities::AlertRecord;
use casana_domain::rules::{AlertTaxonomyEntry, SeverityInfo};

/// Largest alert list accepted by the ranking endpoint
pub const MAX_RANK_ALERTS: usize = 1000;

/// Query parameters for the alert queue
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams, ToSchema)]
pub struct AlertsQueryParams {
    /// Only alerts for this monitored user
    #[validate(length(min = 1, max = 128, message = "user_id must be 1-128 characters"))]
    pub user_id: Option<String>,

    /// Maximum number of alerts to fetch (max: 1000)
    #[validate(range(min = 1, max = 1000, message = "limit must be between 1 and 1000"))]
    pub limit: Option<usize>,
}

/// Request payload for ranking a client-supplied alert list
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RankAlertsRequest {
    /// Alerts to rank; reason codes may be unknown
    #[validate(length(max = 1000, message = "At most 1000 alerts can be ranked per request"))]
    pub alerts: Vec<AlertRecord>,
}

/// Query parameters for badge rendering
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct BadgeQueryParams {
    /// Include the icon element (default: true)
    pub show_icon: Option<bool>,
    /// Use the short label (default: false)
    pub short: Option<bool>,
}

/// Rendered badge for a reason code
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BadgeResponse {
    pub code: String,
    /// Label text before escaping
    pub label: String,
    pub severity: u8,
    pub color: String,
    /// Escaped HTML fragment ready to embed
    pub html: String,
}

/// Every known reason code plus the severity scale
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TaxonomyResponse {
    /// Version of the threshold table the entries were built from
    pub thresholds_version: String,
    pub entries: Vec<AlertTaxonomyEntry>,
    pub severity_levels: Vec<SeverityInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_request_size_limit() {
        let request = RankAlertsRequest {
            alerts: vec![AlertRecord::default(); MAX_RANK_ALERTS],
        };
        assert!(request.validate().is_ok());

        let request = RankAlertsRequest {
            alerts: vec![AlertRecord::default(); MAX_RANK_ALERTS + 1],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_rank_request_accepts_vendor_field_names() {
        let json = r#"{ "alerts": [ { "alert_reasons": ["low_spo2"], "created_at": "2024-01-01 10:00:00" } ] }"#;
        let request: RankAlertsRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.alerts[0].reasons, vec!["low_spo2".to_string()]);
        assert!(request.alerts[0].timestamp.is_some());
    }

    #[test]
    fn test_alert_query_validation() {
        let params = AlertsQueryParams {
            limit: Some(0),
            ..Default::default()
        };
        assert!(params.validate().is_err());
        assert!(AlertsQueryParams::default().validate().is_ok());
    }
}
