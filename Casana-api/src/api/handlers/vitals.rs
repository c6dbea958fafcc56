use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{info, instrument, warn};
use url::form_urlencoded;
use validator::Validate;

use casana_data::repository::ReadingFilter;
use casana_domain::entities::VitalReading;
use casana_domain::rules::VitalAssessment;
use casana_domain::services::{AssessedReading, VitalsInsights};

use crate::api::state::AppState;
use crate::entities::common::{AssessedReadingPage, ErrorResponse, PaginatedResponse};
use crate::entities::vitals::{HistoryQueryParams, InsightsQueryParams, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};

/// Classify a single reading
#[utoipa::path(
    post,
    path = "/api/v1/vitals/assess",
    request_body = VitalReading,
    responses(
        (status = 200, description = "Reading assessed", body = VitalAssessment),
        (status = 400, description = "Malformed reading", body = ErrorResponse),
    ),
    tag = "vitals"
)]
#[instrument(skip(state, reading))]
pub async fn assess_reading(
    State(state): State<AppState>,
    Json(reading): Json<VitalReading>,
) -> impl IntoResponse {
    let assessment = state.vitals.assess(&reading);
    info!(status = assessment.status.as_str(), "Assessed ad-hoc reading");
    (StatusCode::OK, Json(assessment))
}

/// Generate pagination links from the current request
fn generate_pagination_links(
    total_count: usize,
    limit: usize,
    offset: usize,
    base_url: &str,
    query_params: &HistoryQueryParams,
) -> (Option<String>, Option<String>) {
    let link = |offset: usize| {
        let mut query = form_urlencoded::Serializer::new(String::new());

        if let Some(start) = &query_params.start_date {
            query.append_pair("start_date", start);
        }
        if let Some(end) = &query_params.end_date {
            query.append_pair("end_date", end);
        }
        query.append_pair("limit", &limit.to_string());
        query.append_pair("offset", &offset.to_string());
        if let Some(sort) = &query_params.sort {
            query.append_pair("sort", sort);
        }

        format!("{}?{}", base_url, query.finish())
    };

    let next = offset
        .checked_add(limit)
        .filter(|&next_offset| next_offset < total_count)
        .map(&link);
    let previous = (offset > 0).then(|| link(offset.saturating_sub(limit)));

    (next, previous)
}

/// Get a user's readings, each with its assessment
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/vitals",
    params(
        ("user_id" = String, Path, description = "Monitored user id"),
        HistoryQueryParams
    ),
    responses(
        (status = 200, description = "Reading history retrieved", body = AssessedReadingPage),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 502, description = "Vendor source failed", body = ErrorResponse),
    ),
    tag = "vitals"
)]
#[instrument(skip(state))]
pub async fn get_user_vitals(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<HistoryQueryParams>,
) -> Result<impl IntoResponse, ErrorResponse> {
    params.validate().map_err(|errors| {
        warn!("Rejected history query: {}", errors);
        ErrorResponse::from(errors)
    })?;

    let limit = params.limit.unwrap_or(DEFAULT_PAGE_LIMIT).min(MAX_PAGE_LIMIT);
    let offset = params.offset.unwrap_or(0);

    let filter = ReadingFilter {
        start_date: params.start_date.clone(),
        end_date: params.end_date.clone(),
        limit: Some(limit),
        offset: Some(offset),
        sort_desc: Some(params.sort_desc()),
    };

    let (data, total_count) = state.vitals.get_user_readings(&user_id, filter).await?;

    let base_url = format!("/api/v1/users/{}/vitals", user_id);
    let (next, previous) = generate_pagination_links(total_count, limit, offset, &base_url, &params);

    info!("Returning {} of {} readings for {}", data.len(), total_count, user_id);

    let response: PaginatedResponse<AssessedReading> = PaginatedResponse {
        total_count,
        offset,
        limit,
        next,
        previous,
        data,
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Get a user's newest reading with its assessment
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/vitals/latest",
    params(
        ("user_id" = String, Path, description = "Monitored user id")
    ),
    responses(
        (status = 200, description = "Latest reading", body = AssessedReading),
        (status = 404, description = "User has no readings", body = ErrorResponse),
        (status = 502, description = "Vendor source failed", body = ErrorResponse),
    ),
    tag = "vitals"
)]
#[instrument(skip(state))]
pub async fn get_latest_vitals(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let latest = state.vitals.get_latest_reading(&user_id).await?;
    Ok((StatusCode::OK, Json(latest)))
}

/// Get summary statistics over a user's recent readings
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/insights",
    params(
        ("user_id" = String, Path, description = "Monitored user id"),
        InsightsQueryParams
    ),
    responses(
        (status = 200, description = "Insights generated", body = VitalsInsights),
        (status = 404, description = "Not enough data", body = ErrorResponse),
        (status = 502, description = "Vendor source failed", body = ErrorResponse),
    ),
    tag = "vitals"
)]
#[instrument(skip(state))]
pub async fn get_user_insights(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<InsightsQueryParams>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let period_days = params.period_days();
    info!("Generating insights for {} over {} days", user_id, period_days);

    let insights = state.vitals.get_insights(&user_id, period_days).await?;
    Ok((StatusCode::OK, Json(insights)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_link_generation() {
        let query_params = HistoryQueryParams {
            start_date: Some("2023-01-01T00:00:00Z".to_string()),
            end_date: Some("2023-02-01T00:00:00Z".to_string()),
            limit: Some(10),
            offset: Some(20),
            sort: Some("desc".to_string()),
        };
        let base = "/api/v1/users/u1/vitals";

        let (next, prev) = generate_pagination_links(50, 10, 20, base, &query_params);
        let next_url = next.unwrap();
        let prev_url = prev.unwrap();
        assert!(next_url.starts_with(base));
        assert!(next_url.contains("offset=30"));
        assert!(next_url.contains("sort=desc"));
        assert!(prev_url.contains("offset=10"));

        // First page
        let (next, prev) = generate_pagination_links(50, 10, 0, base, &query_params);
        assert!(next.is_some());
        assert!(prev.is_none());

        // Last page
        let (next, prev) = generate_pagination_links(50, 10, 40, base, &query_params);
        assert!(next.is_none());
        assert!(prev.is_some());
    }

    #[test]
    fn test_pagination_links_encode_offsets() {
        let query_params = HistoryQueryParams {
            start_date: Some("2024-01-01T00:00:00+02:00".to_string()),
            ..Default::default()
        };

        let (next, _) = generate_pagination_links(5, 1, 0, "/api/v1/users/u1/vitals", &query_params);
        let next_url = next.unwrap();
        assert!(next_url.contains("start_date=2024-01-01T00%3A00%3A00%2B02%3A00"));
        assert!(!next_url.contains('+'));
    }

    #[test]
    fn test_pagination_links_near_usize_max() {
        let params = HistoryQueryParams::default();
        let (next, prev) = generate_pagination_links(10, 100, usize::MAX, "/v", &params);
        assert!(next.is_none());
        assert!(prev.unwrap().contains(&format!("offset={}", usize::MAX - 100)));
    }
}
