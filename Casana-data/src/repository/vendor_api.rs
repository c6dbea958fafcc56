use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use super::errors::RepositoryError;
use super::{AlertFilter, ReadingFilter, VitalsRepositoryTrait};
use crate::models::{VendorAlert, VendorVitalReading};

/// Longest slice of an error body kept in error messages
const MAX_ERROR_BODY: usize = 256;

/// Connection settings for the vendor API
#[derive(Debug, Clone, PartialEq)]
pub struct VendorApiConfig {
    /// API root, e.g. `https://vendor.example.com/v1`
    pub base_url: String,
    /// Bearer token sent with every request
    pub api_key: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl VendorApiConfig {
    /// Settings with no API key and a 10 second timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// List endpoints answer either with a bare array or with `{ data, total }`
#[derive(Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Wrapped {
        data: Vec<T>,
        #[serde(default)]
        total: Option<usize>,
    },
    Bare(Vec<T>),
}

impl<T> Listing<T> {
    fn into_parts(self) -> (Vec<T>, Option<usize>) {
        match self {
            Listing::Wrapped { data, total } => (data, total),
            Listing::Bare(data) => (data, None),
        }
    }
}

/// Repository backed by the vendor's HTTP API
#[derive(Debug, Clone)]
pub struct VendorApiRepository {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl VendorApiRepository {
    /// Build a repository, validating the base URL
    pub fn new(config: VendorApiConfig) -> Result<Self, RepositoryError> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| RepositoryError::Configuration(format!("invalid vendor base URL: {}", e)))?;

        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(RepositoryError::Configuration(format!(
                "vendor base URL must be an http(s) URL, got '{}'",
                config.base_url
            )));
        }

        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
        })
    }

    /// Append path segments to the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Result<Url, RepositoryError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RepositoryError::Configuration("vendor base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, url: Url, query: &[(&str, String)]) -> Result<String, RepositoryError> {
        debug!("GET {}", url);

        let mut request = self.client.get(url.clone()).query(query);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(RepositoryError::NotFound(url.path().to_string()));
        }

        if !status.is_success() {
            warn!("Vendor API {} answered {}", url.path(), status);
            let mut message = body;
            if message.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !message.is_char_boundary(cut) {
                    cut -= 1;
                }
                message.truncate(cut);
            }
            return Err(RepositoryError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, RepositoryError> {
        let url = self.endpoint(segments)?;
        let body = self.send(url, query).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

fn reading_query(filter: &ReadingFilter) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(start) = &filter.start_date {
        query.push(("start_date", start.clone()));
    }
    if let Some(end) = &filter.end_date {
        query.push(("end_date", end.clone()));
    }
    if let Some(limit) = filter.limit {
        query.push(("limit", limit.to_string()));
    }
    if let Some(offset) = filter.offset {
        query.push(("offset", offset.to_string()));
    }
    let sort = if filter.sort_desc.unwrap_or(true) { "desc" } else { "asc" };
    query.push(("sort", sort.to_string()));
    query
}

#[async_trait]
impl VitalsRepositoryTrait for VendorApiRepository {
    fn source_name(&self) -> &'static str {
        "vendor_api"
    }

    async fn get_readings(
        &self,
        user_id: &str,
        filter: &ReadingFilter,
    ) -> Result<(Vec<VendorVitalReading>, usize), RepositoryError> {
        let listing: Listing<VendorVitalReading> = self
            .get_json(&["users", user_id, "results"], &reading_query(filter))
            .await?;

        let (readings, total) = listing.into_parts();
        let total = total.unwrap_or_else(|| filter.offset.unwrap_or(0).saturating_add(readings.len()));
        Ok((readings, total))
    }

    async fn get_latest_reading(
        &self,
        user_id: &str,
    ) -> Result<Option<VendorVitalReading>, RepositoryError> {
        let filter = ReadingFilter {
            limit: Some(1),
            sort_desc: Some(true),
            ..Default::default()
        };
        let (readings, _) = self.get_readings(user_id, &filter).await?;
        Ok(readings.into_iter().next())
    }

    async fn get_alerts(&self, filter: &AlertFilter) -> Result<Vec<VendorAlert>, RepositoryError> {
        let mut query = Vec::new();
        if let Some(user_id) = &filter.user_id {
            query.push(("user_id", user_id.clone()));
        }
        if let Some(limit) = filter.limit {
            query.push(("limit", limit.to_string()));
        }

        let listing: Listing<VendorAlert> = self.get_json(&["alerts"], &query).await?;
        Ok(listing.into_parts().0)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        let url = self.endpoint(&["status"])?;
        self.send(url, &[]).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Path, Query},
        http::{header::AUTHORIZATION, HeaderMap, StatusCode as HttpStatus},
        response::{IntoResponse, Response},
        routing::get,
        Json, Router,
    };
    use serde_json::json;
    use std::collections::HashMap;

    const API_KEY: &str = "secret";

    fn authorized(headers: &HeaderMap) -> bool {
        headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) == Some("Bearer secret")
    }

    async fn results(
        Path(user_id): Path<String>,
        Query(params): Query<HashMap<String, String>>,
        headers: HeaderMap,
    ) -> Response {
        if !authorized(&headers) {
            return HttpStatus::UNAUTHORIZED.into_response();
        }

        match user_id.as_str() {
            "broken" => Json(json!({ "data": [{ "bp_systolic": "high" }] })).into_response(),
            "failing" => (HttpStatus::BAD_GATEWAY, "x".repeat(1000)).into_response(),
            "bare" => Json(json!([{ "bp_systolic": 120, "bp_diastolic": 80 }])).into_response(),
            _ => {
                let sort = params.get("sort").cloned().unwrap_or_default();
                let limit = params.get("limit").cloned().unwrap_or_default();
                Json(json!({
                    "data": [{
                        "id": format!("{}|{}|{}", user_id, sort, limit),
                        "bp_systolic": 132,
                        "bp_diastolic": 84,
                        "spo2": 96,
                        "timestamp": "2024-03-01T08:30:00Z"
                    }],
                    "total": 42
                }))
                .into_response()
            }
        }
    }

    async fn alerts(Query(params): Query<HashMap<String, String>>) -> Json<serde_json::Value> {
        let user = params.get("user_id").cloned().unwrap_or_else(|| "all".to_string());
        Json(json!([
            { "id": "a-1", "user_id": user, "alert_reasons": ["hypertension"], "created_at": "2024-03-01T08:30:00Z" },
            { "id": "a-2", "user_id": user, "reasons": [] }
        ]))
    }

    async fn spawn_vendor() -> String {
        let app = Router::new()
            .route("/v1/users/:user_id/results", get(results))
            .route("/v1/alerts", get(alerts))
            .route("/v1/status", get(|| async { "ok" }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}/v1/", addr)
    }

    async fn repository() -> VendorApiRepository {
        let base = spawn_vendor().await;
        VendorApiRepository::new(VendorApiConfig::new(base).with_api_key(API_KEY)).unwrap()
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let result = VendorApiRepository::new(VendorApiConfig::new("not a url"));
        assert!(matches!(result, Err(RepositoryError::Configuration(_))));

        let result = VendorApiRepository::new(VendorApiConfig::new("ftp://vendor.example.com"));
        assert!(matches!(result, Err(RepositoryError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_get_readings_wrapped_listing() {
        let repo = repository().await;
        let (readings, total) = repo.get_readings("u-1", &ReadingFilter::default()).await.unwrap();

        assert_eq!(total, 42);
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].id.as_deref(), Some("u-1|desc|"));
        assert_eq!(readings[0].blood_oxygenation, Some(96.0));
    }

    #[tokio::test]
    async fn test_bare_listing_total_saturates() {
        let repo = repository().await;

        let filter = ReadingFilter {
            offset: Some(5),
            ..Default::default()
        };
        let (readings, total) = repo.get_readings("bare", &filter).await.unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(total, 6);

        let filter = ReadingFilter {
            offset: Some(usize::MAX),
            ..Default::default()
        };
        let (_, total) = repo.get_readings("bare", &filter).await.unwrap();
        assert_eq!(total, usize::MAX);
    }

    #[tokio::test]
    async fn test_user_id_is_path_encoded() {
        let repo = repository().await;
        let (readings, _) = repo.get_readings("jane doe", &ReadingFilter::default()).await.unwrap();
        assert_eq!(readings[0].id.as_deref(), Some("jane doe|desc|"));
    }

    #[tokio::test]
    async fn test_latest_reading_requests_one_newest() {
        let repo = repository().await;
        let latest = repo.get_latest_reading("u-1").await.unwrap().unwrap();
        assert_eq!(latest.id.as_deref(), Some("u-1|desc|1"));
    }

    #[tokio::test]
    async fn test_missing_key_is_rejected_upstream() {
        let base = spawn_vendor().await;
        let repo = VendorApiRepository::new(VendorApiConfig::new(base)).unwrap();

        match repo.get_readings("u-1", &ReadingFilter::default()).await {
            Err(RepositoryError::Status { status, .. }) => assert_eq!(status, 401),
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_body_is_truncated() {
        let repo = repository().await;
        match repo.get_readings("failing", &ReadingFilter::default()).await {
            Err(RepositoryError::Status { status, message }) => {
                assert_eq!(status, 502);
                assert_eq!(message.len(), MAX_ERROR_BODY);
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_payload_is_decode_error() {
        let repo = repository().await;
        let result = repo.get_readings("broken", &ReadingFilter::default()).await;
        assert!(matches!(result, Err(RepositoryError::Decode(_))));
    }

    #[tokio::test]
    async fn test_get_alerts_bare_listing() {
        let repo = repository().await;
        let filter = AlertFilter {
            user_id: Some("u-7".to_string()),
            limit: None,
        };
        let alerts = repo.get_alerts(&filter).await.unwrap();

        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].reasons, vec!["hypertension"]);
        assert_eq!(alerts[0].user_id.as_deref(), Some("u-7"));
        assert!(alerts[1].timestamp.is_none());
    }

    #[tokio::test]
    async fn test_ping_and_not_found() {
        let repo = repository().await;
        assert!(repo.ping().await.is_ok());

        let url = repo.endpoint(&["missing"]).unwrap();
        let result = repo.send(url, &[]).await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }
}
