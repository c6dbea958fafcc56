use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Threshold endpoints
        crate::api::handlers::thresholds::get_thresholds,

        // Vitals endpoints
        crate::api::handlers::vitals::assess_reading,
        crate::api::handlers::vitals::get_user_vitals,
        crate::api::handlers::vitals::get_latest_vitals,
        crate::api::handlers::vitals::get_user_insights,

        // Alert endpoints
        crate::api::handlers::alerts::get_alerts,
        crate::api::handlers::alerts::rank_alerts,
        crate::api::handlers::alerts::get_taxonomy,
        crate::api::handlers::alerts::get_alert_info,
        crate::api::handlers::alerts::get_alert_badge
    ),
    components(
        schemas(
            // Entities
            crate::entities::common::ErrorResponse,
            crate::entities::common::AssessedReadingPage,
            crate::entities::vitals::HistoryQueryParams,
            crate::entities::vitals::InsightsQueryParams,
            crate::entities::alerts::AlertsQueryParams,
            crate::entities::alerts::RankAlertsRequest,
            crate::entities::alerts::BadgeQueryParams,
            crate::entities::alerts::BadgeResponse,
            crate::entities::alerts::TaxonomyResponse,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentHealthStatus,

            // Domain entities
            casana_domain::entities::VitalReading,
            casana_domain::entities::AlertRecord,

            // Rules
            casana_domain::rules::ThresholdTable,
            casana_domain::rules::BloodPressureThresholds,
            casana_domain::rules::SpO2Thresholds,
            casana_domain::rules::HeartRateThresholds,
            casana_domain::rules::SitDurationThresholds,
            casana_domain::rules::VitalAssessment,
            casana_domain::rules::BloodPressureClassification,
            casana_domain::rules::BloodPressureStatus,
            casana_domain::rules::BloodPressureStage,
            casana_domain::rules::SpO2Classification,
            casana_domain::rules::SpO2Status,
            casana_domain::rules::HeartRateClassification,
            casana_domain::rules::HeartRateStatus,
            casana_domain::rules::SitDurationClassification,
            casana_domain::rules::SitDurationStatus,
            casana_domain::rules::HealthStatus,
            casana_domain::rules::AlertTaxonomyEntry,
            casana_domain::rules::SeverityInfo,
            casana_domain::rules::AlertSummary,

            // Services
            casana_domain::services::AssessedReading,
            casana_domain::services::RankedAlert,
            casana_domain::services::RankedAlerts,
            casana_domain::services::VitalsInsights,
            casana_domain::services::StatusCounts
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "thresholds", description = "Clinical threshold table"),
        (name = "vitals", description = "Reading classification, history and insights"),
        (name = "alerts", description = "Alert queue, ranking and taxonomy")
    ),
    info(
        title = "Casana Vitals API",
        version = "0.1.0",
        description = "Vitals classification and alert ranking for the Casana dashboard",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;
