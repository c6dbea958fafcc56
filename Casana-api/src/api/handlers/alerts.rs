use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use casana_data::repository::AlertFilter;
use casana_domain::rules::{AlertBadge, AlertTaxonomyEntry, Severity, SeverityInfo};
use casana_domain::services::RankedAlerts;

use crate::api::state::AppState;
use crate::entities::alerts::{
    AlertsQueryParams, BadgeQueryParams, BadgeResponse, RankAlertsRequest, TaxonomyResponse,
};
use crate::entities::common::ErrorResponse;

/// Escape text for use in HTML element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Bootstrap badge markup; every interpolated value is escaped
pub fn badge_markup(badge: &AlertBadge) -> String {
    let icon = badge
        .icon
        .as_deref()
        .map(|icon| format!("<i class=\"bi {}\"></i> ", escape_html(icon)))
        .unwrap_or_default();

    format!(
        "<span class=\"badge bg-{}\" title=\"{}\">{}{}</span>",
        escape_html(&badge.color),
        escape_html(&badge.code),
        icon,
        escape_html(&badge.label)
    )
}

/// Vendor alerts ranked by severity, then recency
#[utoipa::path(
    get,
    path = "/api/v1/alerts",
    params(AlertsQueryParams),
    responses(
        (status = 200, description = "Ranked alert queue", body = RankedAlerts),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 502, description = "Vendor source failed", body = ErrorResponse),
    ),
    tag = "alerts"
)]
#[instrument(skip(state))]
pub async fn get_alerts(
    State(state): State<AppState>,
    Query(params): Query<AlertsQueryParams>,
) -> Result<impl IntoResponse, ErrorResponse> {
    params.validate().map_err(|errors| {
        warn!("Rejected alert query: {}", errors);
        ErrorResponse::from(errors)
    })?;

    let filter = AlertFilter {
        user_id: params.user_id,
        limit: params.limit,
    };

    let ranked = state.vitals.get_ranked_alerts(filter).await?;
    info!(
        total = ranked.summary.total,
        critical = ranked.summary.critical,
        "Alert queue ranked"
    );

    Ok((StatusCode::OK, Json(ranked)))
}

/// Rank a client-supplied alert list
#[utoipa::path(
    post,
    path = "/api/v1/alerts/rank",
    request_body = RankAlertsRequest,
    responses(
        (status = 200, description = "Alerts ranked", body = RankedAlerts),
        (status = 400, description = "Invalid request", body = ErrorResponse),
    ),
    tag = "alerts"
)]
#[instrument(skip(state, request))]
pub async fn rank_alerts(
    State(state): State<AppState>,
    Json(request): Json<RankAlertsRequest>,
) -> Result<impl IntoResponse, ErrorResponse> {
    request.validate().map_err(|errors| {
        warn!("Rejected rank request: {}", errors);
        ErrorResponse::from(errors)
    })?;

    debug!("Ranking {} client alerts", request.alerts.len());
    let ranked = state.vitals.rank_alerts(request.alerts);
    Ok((StatusCode::OK, Json(ranked)))
}

/// Every known reason code with its metadata
#[utoipa::path(
    get,
    path = "/api/v1/alerts/taxonomy",
    responses(
        (status = 200, description = "Alert taxonomy", body = TaxonomyResponse),
    ),
    tag = "alerts"
)]
#[instrument(skip(state))]
pub async fn get_taxonomy(State(state): State<AppState>) -> impl IntoResponse {
    let response = TaxonomyResponse {
        thresholds_version: state.vitals.thresholds().version.clone(),
        entries: state.vitals.taxonomy().entries().cloned().collect(),
        severity_levels: Severity::ALL.into_iter().map(SeverityInfo::from).collect(),
    };
    (StatusCode::OK, Json(response))
}

/// Metadata for one reason code; unknown codes get a generated entry
#[utoipa::path(
    get,
    path = "/api/v1/alerts/taxonomy/{code}",
    params(
        ("code" = String, Path, description = "Reason code, known or not")
    ),
    responses(
        (status = 200, description = "Taxonomy entry", body = AlertTaxonomyEntry),
    ),
    tag = "alerts"
)]
#[instrument(skip(state))]
pub async fn get_alert_info(State(state): State<AppState>, Path(code): Path<String>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.vitals.taxonomy().info(&code)))
}

/// Badge for one reason code as an escaped HTML fragment
#[utoipa::path(
    get,
    path = "/api/v1/alerts/taxonomy/{code}/badge",
    params(
        ("code" = String, Path, description = "Reason code, known or not"),
        BadgeQueryParams
    ),
    responses(
        (status = 200, description = "Rendered badge", body = BadgeResponse),
    ),
    tag = "alerts"
)]
#[instrument(skip(state))]
pub async fn get_alert_badge(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(params): Query<BadgeQueryParams>,
) -> impl IntoResponse {
    let badge = state.vitals.taxonomy().badge(
        &code,
        params.show_icon.unwrap_or(true),
        params.short.unwrap_or(false),
    );

    let response = BadgeResponse {
        html: badge_markup(&badge),
        code: badge.code,
        label: badge.label,
        severity: badge.severity.level(),
        color: badge.color,
    };
    (StatusCode::OK, Json(response))
}
