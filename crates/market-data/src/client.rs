//! Transport collaborator - trait and implementations
//!
//! A batch is always sent as a JSON array, even when it holds a single
//! record.

use crate::error::MarketDataError;
use crate::Result;
use async_trait::async_trait;
use common::MarketDataRecord;
use config::EndpointConfig;
use parking_lot::Mutex;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

/// Delivers a batch of records to the remote system
#[async_trait]
pub trait MarketDataClient: Send + Sync {
    /// POST the whole batch in one request.
    ///
    /// Resolves with the decoded response body on any 2xx status.
    async fn post_batch(&self, batch: &[MarketDataRecord], access_token: &str) -> Result<Value>;
}

// ==================== HTTP Implementation ====================

/// reqwest-backed client posting to a fixed endpoint
pub struct HttpMarketDataClient {
    client: Client,
    url: String,
}

impl HttpMarketDataClient {
    /// Create a client posting to `url`
    pub fn new(url: &str) -> Self {
        Self {
            client: Client::new(),
            url: url.to_string(),
        }
    }

    /// Create a client from endpoint configuration
    pub fn from_config(endpoint: &EndpointConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = endpoint.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| MarketDataError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            url: endpoint.url(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl MarketDataClient for HttpMarketDataClient {
    async fn post_batch(&self, batch: &[MarketDataRecord], access_token: &str) -> Result<Value> {
        debug!(url = %self.url, records = batch.len(), "Posting market data batch");

        let body = serde_json::to_vec(batch)
            .map_err(|e| MarketDataError::Transport(e.to_string()))?;

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", access_token))
            .body(body)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to reach market data endpoint: {}", e);
                MarketDataError::Transport(e.to_string())
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| MarketDataError::Transport(e.to_string()))?;

        if !status.is_success() {
            error!("Market data endpoint returned error: {} - {}", status, text);
            return Err(MarketDataError::Transport(format!(
                "server responded with status {}: {}",
                status, text
            )));
        }

        Ok(decode_body(&text))
    }
}

/// Empty bodies decode to `null`, non-JSON bodies to a JSON string
fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

// ==================== Mock Implementation ====================

/// One recorded call to [`MockMarketDataClient`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedBatch {
    pub records: Vec<MarketDataRecord>,
    pub access_token: String,
}

/// In-memory client for tests and dry runs
pub struct MockMarketDataClient {
    response: Value,
    failure: Option<String>,
    calls: Mutex<Vec<RecordedBatch>>,
}

impl MockMarketDataClient {
    /// Create a mock that accepts every batch
    pub fn new() -> Self {
        Self {
            response: serde_json::json!({ "status": "accepted" }),
            failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Configure the body returned on success
    pub fn with_response(mut self, response: Value) -> Self {
        self.response = response;
        self
    }

    /// Configure every call to fail with `reason`
    pub fn with_failure(mut self, reason: impl Into<String>) -> Self {
        self.failure = Some(reason.into());
        self
    }

    /// Every batch received so far, in call order
    pub fn calls(&self) -> Vec<RecordedBatch> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl Default for MockMarketDataClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataClient for MockMarketDataClient {
    async fn post_batch(&self, batch: &[MarketDataRecord], access_token: &str) -> Result<Value> {
        self.calls.lock().push(RecordedBatch {
            records: batch.to_vec(),
            access_token: access_token.to_string(),
        });

        match &self.failure {
            Some(reason) => Err(MarketDataError::Transport(reason.clone())),
            None => Ok(self.response.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::extract::State;
    use axum::http::{HeaderMap, HeaderName, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use std::sync::Arc;

    #[derive(Debug, Clone)]
    struct Captured {
        content_type: Option<String>,
        authorization: Option<String>,
        body: Value,
    }

    type Captures = Arc<Mutex<Vec<Captured>>>;

    async fn capture(
        State((captures, status)): State<(Captures, StatusCode)>,
        headers: HeaderMap,
        body: String,
    ) -> (StatusCode, String) {
        let header = |name: HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        captures.lock().push(Captured {
            content_type: header(CONTENT_TYPE),
            authorization: header(AUTHORIZATION),
            body: serde_json::from_str(&body).unwrap_or(Value::Null),
        });
        (status, r#"{"received":true}"#.to_string())
    }

    /// Spawn a local endpoint answering with `status`; returns its URL
    async fn spawn_endpoint(status: StatusCode) -> (String, Captures) {
        let captures: Captures = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/instrumentCode", post(capture))
            .with_state((captures.clone(), status));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/instrumentCode", addr), captures)
    }

    fn record(code: &str) -> MarketDataRecord {
        MarketDataRecord {
            provider_code: "SAPTHR".to_string(),
            instrument_code: code.to_string(),
            market_data_property: "CLOSE".to_string(),
            market_data_category: "01".to_string(),
            market_data_source: "ST".to_string(),
            key1: "INR".to_string(),
            key2: "PJK".to_string(),
            ..MarketDataRecord::default()
        }
    }

    #[tokio::test]
    async fn test_http_post_batch() {
        let (url, captures) = spawn_endpoint(StatusCode::OK).await;
        let client = HttpMarketDataClient::new(&url);

        let batch = vec![record("AAAAAA"), record("BBBBBB")];
        let response = client.post_batch(&batch, "secret-token").await.unwrap();
        assert_eq!(response, serde_json::json!({"received": true}));

        let captures = captures.lock().clone();
        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0].content_type.as_deref(), Some("application/json"));
        assert_eq!(captures[0].authorization.as_deref(), Some("Bearer secret-token"));

        let sent: Vec<MarketDataRecord> = serde_json::from_value(captures[0].body.clone()).unwrap();
        assert_eq!(sent, batch);
        assert_eq!(captures[0].body[0]["instrumentCode"], "AAAAAA");
    }

    #[tokio::test]
    async fn test_http_single_record_is_sent_as_array() {
        let (url, captures) = spawn_endpoint(StatusCode::CREATED).await;
        let client = HttpMarketDataClient::new(&url);

        client.post_batch(&[record("CCCCCC")], "t").await.unwrap();

        let body = captures.lock()[0].body.clone();
        assert!(body.is_array());
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_http_error_status_is_transport_error() {
        let (url, _captures) = spawn_endpoint(StatusCode::UNAUTHORIZED).await;
        let client = HttpMarketDataClient::new(&url);

        let result = client.post_batch(&[record("AAAAAA")], "bad").await;
        assert_matches!(result, Err(MarketDataError::Transport(msg)) if msg.contains("401"));
    }

    #[tokio::test]
    async fn test_http_unreachable_is_transport_error() {
        let client = HttpMarketDataClient::new("http://127.0.0.1:1/instrumentCode");
        let result = client.post_batch(&[record("AAAAAA")], "t").await;
        assert_matches!(result, Err(MarketDataError::Transport(_)));
    }

    #[test]
    fn test_from_config_builds_url() {
        let endpoint = EndpointConfig {
            base_url: "http://md.local:9000/".to_string(),
            path: "/instrumentCode".to_string(),
            timeout_secs: Some(5),
        };
        let client = HttpMarketDataClient::from_config(&endpoint).unwrap();
        assert_eq!(client.url(), "http://md.local:9000/instrumentCode");
    }

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body(""), Value::Null);
        assert_eq!(decode_body("[1,2]"), serde_json::json!([1, 2]));
        assert_eq!(decode_body("OK"), Value::String("OK".to_string()));
    }

    #[tokio::test]
    async fn test_mock_records_calls() {
        let client = MockMarketDataClient::new();
        client.post_batch(&[record("AAAAAA")], "tok").await.unwrap();

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].access_token, "tok");
        assert_eq!(calls[0].records[0].instrument_code, "AAAAAA");
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let client = MockMarketDataClient::new().with_failure("connection refused");
        let result = client.post_batch(&[record("AAAAAA")], "tok").await;

        assert_matches!(result, Err(MarketDataError::Transport(msg)) if msg == "connection refused");
        assert_eq!(client.call_count(), 1);
    }
}
