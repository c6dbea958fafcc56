use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::{debug, instrument};

use casana_domain::rules::ThresholdTable;

use crate::api::state::AppState;

/// The active threshold table, so clients mirror the server's boundaries
#[utoipa::path(
    get,
    path = "/api/v1/thresholds",
    responses(
        (status = 200, description = "Active threshold table", body = ThresholdTable),
    ),
    tag = "thresholds"
)]
#[instrument(skip(state))]
pub async fn get_thresholds(State(state): State<AppState>) -> impl IntoResponse {
    let thresholds = state.vitals.thresholds();
    debug!("Serving threshold table {}", thresholds.version);
    (StatusCode::OK, Json(thresholds.clone()))
}
