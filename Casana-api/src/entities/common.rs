use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::ValidationErrors;

use casana_domain::services::{AssessedReading, VitalsServiceError};

/// Error response format for API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code - machine-readable identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            details: None,
        }
    }

    /// Create a not found error response
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("not_found", message)
    }

    /// Create a validation error response
    pub fn validation_error(message: impl Into<String>, details: Option<serde_json::Value>) -> Self {
        Self {
            details,
            ..Self::new("validation_error", message)
        }
    }

    /// Create a bad request error response
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("bad_request", message)
    }

    /// Not enough readings to compute something
    pub fn insufficient_data(message: impl Into<String>) -> Self {
        Self::new("insufficient_data", message)
    }

    /// Vendor source failed
    pub fn upstream_error() -> Self {
        Self::new("upstream_error", "The vitals data source is unavailable")
    }

    /// Create an internal error response
    pub fn internal_error() -> Self {
        Self::new("internal_error", "An unexpected error occurred")
    }

    pub fn status_code(&self) -> StatusCode {
        match self.error.as_str() {
            "not_found" | "insufficient_data" => StatusCode::NOT_FOUND,
            "validation_error" | "bad_request" => StatusCode::BAD_REQUEST,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

impl From<VitalsServiceError> for ErrorResponse {
    fn from(err: VitalsServiceError) -> Self {
        match err {
            VitalsServiceError::ValidationError(msg) => ErrorResponse::validation_error(msg, None),
            VitalsServiceError::NotFound(msg) => ErrorResponse::not_found(msg),
            VitalsServiceError::InsufficientData(msg) => ErrorResponse::insufficient_data(msg),
            // Upstream details are logged by the service, not returned
            VitalsServiceError::UpstreamError(_) => ErrorResponse::upstream_error(),
        }
    }
}

impl From<ValidationErrors> for ErrorResponse {
    fn from(errors: ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).ok();
        ErrorResponse::validation_error(format!("Invalid request: {}", errors), details)
    }
}

/// Paginated response format
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[aliases(AssessedReadingPage = PaginatedResponse<AssessedReading>)]
pub struct PaginatedResponse<T> {
    /// Total count of items available
    pub total_count: usize,

    /// Current offset
    pub offset: usize,

    /// Current limit
    pub limit: usize,

    /// URL for the next page (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,

    /// URL for the previous page (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,

    /// Actual data items
    pub data: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorResponse::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorResponse::bad_request("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorResponse::validation_error("x", None).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorResponse::upstream_error().status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(ErrorResponse::internal_error().status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_service_errors_map_to_responses() {
        let response: ErrorResponse = VitalsServiceError::UpstreamError("socket closed at 10.0.0.4".into()).into();
        assert_eq!(response.error, "upstream_error");
        assert!(!response.message.contains("10.0.0.4"));

        let response: ErrorResponse = VitalsServiceError::InsufficientData("none".into()).into();
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_details_are_omitted_when_empty() {
        let json = serde_json::to_value(ErrorResponse::bad_request("nope")).unwrap();
        assert!(json.get("details").is_none());
        assert_eq!(json["error"], "bad_request");
    }
}
