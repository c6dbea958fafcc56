use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Largest page of readings a client may ask for
pub const MAX_PAGE_LIMIT: usize = 1000;
pub const DEFAULT_PAGE_LIMIT: usize = 100;
/// Deepest offset a history query may start at
pub const MAX_PAGE_OFFSET: usize = 1_000_000;
pub const DEFAULT_INSIGHTS_DAYS: u32 = 30;
pub const MAX_INSIGHTS_DAYS: u32 = 365;

pub(crate) fn validate_rfc3339(value: &str) -> Result<(), ValidationError> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|_| ())
        .map_err(|_| {
            let mut error = ValidationError::new("rfc3339");
            error.message = Some("Use RFC 3339, e.g. 2024-03-15T08:30:00Z".into());
            error
        })
}

/// Query parameters for retrieving reading history
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams, ToSchema)]
pub struct HistoryQueryParams {
    /// RFC 3339 start date (inclusive)
    #[validate(custom = "validate_rfc3339")]
    pub start_date: Option<String>,

    /// RFC 3339 end date (inclusive)
    #[validate(custom = "validate_rfc3339")]
    pub end_date: Option<String>,

    /// Maximum number of results (default: 100, max: 1000)
    #[validate(range(min = 1, max = 1000, message = "limit must be between 1 and 1000"))]
    pub limit: Option<usize>,

    /// Pagination offset (default: 0, max: 1000000)
    #[validate(range(max = 1000000, message = "offset must be at most 1000000"))]
    pub offset: Option<usize>,

    /// Sort direction (asc/desc, default: desc)
    pub sort: Option<String>,
}

impl HistoryQueryParams {
    pub fn sort_desc(&self) -> bool {
        !matches!(self.sort.as_deref(), Some(s) if s.eq_ignore_ascii_case("asc"))
    }
}

/// Query parameters for retrieving insights
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct InsightsQueryParams {
    /// Analysis period in days (default: 30, max: 365)
    pub timeframe: Option<u32>,
}

impl InsightsQueryParams {
    /// Requested period clamped to 1..=365 days
    pub fn period_days(&self) -> u32 {
        self.timeframe
            .unwrap_or(DEFAULT_INSIGHTS_DAYS)
            .clamp(1, MAX_INSIGHTS_DAYS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_params_validation() {
        let params = HistoryQueryParams {
            start_date: Some("2024-01-01T00:00:00Z".to_string()),
            limit: Some(50),
            ..Default::default()
        };
        assert!(params.validate().is_ok());

        let params = HistoryQueryParams {
            end_date: Some("01/02/2024".to_string()),
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = HistoryQueryParams {
            limit: Some(5000),
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = HistoryQueryParams {
            offset: Some(MAX_PAGE_OFFSET),
            ..Default::default()
        };
        assert!(params.validate().is_ok());

        let params = HistoryQueryParams {
            offset: Some(usize::MAX),
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_sort_direction() {
        assert!(HistoryQueryParams::default().sort_desc());
        let params = HistoryQueryParams {
            sort: Some("ASC".to_string()),
            ..Default::default()
        };
        assert!(!params.sort_desc());
    }

    #[test]
    fn test_insights_period_is_clamped() {
        assert_eq!(InsightsQueryParams::default().period_days(), 30);
        assert_eq!(InsightsQueryParams { timeframe: Some(900) }.period_days(), 365);
        assert_eq!(InsightsQueryParams { timeframe: Some(0) }.period_days(), 1);
    }
}
