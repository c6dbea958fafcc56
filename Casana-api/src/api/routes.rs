use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::debug;

use crate::api::handlers::{alerts, health, thresholds, vitals};
use crate::api::state::AppState;
use crate::openapi::configure_swagger_routes;

/// Create the application router
pub fn create_app(state: AppState) -> Router {
    debug!("Creating application router");

    let api_routes = Router::new()
        .route("/thresholds", get(thresholds::get_thresholds))
        .route("/vitals/assess", post(vitals::assess_reading))
        // Define specific routes before parametrized routes to avoid conflicts
        .route("/users/:user_id/vitals/latest", get(vitals::get_latest_vitals))
        .route("/users/:user_id/vitals", get(vitals::get_user_vitals))
        .route("/users/:user_id/insights", get(vitals::get_user_insights))
        .route("/alerts", get(alerts::get_alerts))
        .route("/alerts/rank", post(alerts::rank_alerts))
        .route("/alerts/taxonomy", get(alerts::get_taxonomy))
        .route("/alerts/taxonomy/:code", get(alerts::get_alert_info))
        .route("/alerts/taxonomy/:code/badge", get(alerts::get_alert_badge));

    debug!("API routes configured");

    let app = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_routes)
        .with_state(state);

    let app = add_swagger_ui(app);
    debug!("Swagger UI merged");

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    app.layer(TraceLayer::new_for_http()).layer(cors)
}

/// Add Swagger UI to the router
pub fn add_swagger_ui(app: Router) -> Router {
    app.merge(configure_swagger_routes())
}
