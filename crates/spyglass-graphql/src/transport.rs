//! Transport contract and the GraphQL-over-HTTP implementation.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ClientError, GraphqlError};
use crate::retry::{RetryDecision, RetryPolicy};

/// Raw GraphQL reply envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Envelope {
    /// Response data payload.
    #[serde(default)]
    pub data: Option<Value>,
    /// GraphQL errors.
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
    /// Extensions payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

/// The collaborator that sends one GraphQL document and returns the raw reply.
///
/// Implementations own connection state and credentials; the framework only
/// ever invokes `execute` and never mutates transport configuration. Tests
/// substitute in-process implementations of this same contract.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute one document with serialized variables.
    async fn execute(
        &self,
        document: &str,
        variables: Map<String, Value>,
    ) -> Result<Envelope, ClientError>;
}

/// Request counters for one transport instance.
#[derive(Debug, Default)]
struct TransportMetrics {
    requests_total: AtomicU64,
    requests_ok: AtomicU64,
    requests_failed: AtomicU64,
    requests_retried: AtomicU64,
}

/// Metrics snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportMetricsSnapshot {
    /// Total requests sent.
    pub requests_total: u64,
    /// Requests whose reply carried no GraphQL errors.
    pub requests_ok: u64,
    /// Requests that failed or carried GraphQL errors.
    pub requests_failed: u64,
    /// Retries performed.
    pub requests_retried: u64,
}

impl TransportMetrics {
    fn snapshot(&self) -> TransportMetricsSnapshot {
        TransportMetricsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            requests_ok: self.requests_ok.load(Ordering::Relaxed),
            requests_failed: self.requests_failed.load(Ordering::Relaxed),
            requests_retried: self.requests_retried.load(Ordering::Relaxed),
        }
    }
}

/// Builder for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct HttpTransportBuilder {
    endpoint: String,
    headers: HeaderMap,
    timeout: Duration,
    retry: RetryPolicy,
}

impl HttpTransportBuilder {
    /// Create a new builder for the given endpoint.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self {
            endpoint: endpoint.into(),
            headers,
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }

    /// Add a default header applied to every request.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Add a bearer token header.
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl AsRef<str>) -> Self {
        let value = format!("Bearer {}", token.as_ref());
        if let Ok(header) = HeaderValue::from_str(&value) {
            self.headers.insert(reqwest::header::AUTHORIZATION, header);
        }
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Build the transport.
    pub fn build(self) -> Result<HttpTransport, ClientError> {
        let http = reqwest::Client::builder()
            .default_headers(self.headers)
            .timeout(self.timeout)
            .build()?;
        Ok(HttpTransport {
            endpoint: self.endpoint,
            http,
            retry: self.retry,
            metrics: Arc::new(TransportMetrics::default()),
        })
    }
}

/// GraphQL-over-HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    endpoint: String,
    http: reqwest::Client,
    retry: RetryPolicy,
    metrics: Arc<TransportMetrics>,
}

impl HttpTransport {
    /// Create a builder for the given endpoint.
    #[must_use]
    pub fn builder(endpoint: impl Into<String>) -> HttpTransportBuilder {
        HttpTransportBuilder::new(endpoint)
    }

    /// Return a metrics snapshot.
    #[must_use]
    pub fn metrics(&self) -> TransportMetricsSnapshot {
        self.metrics.snapshot()
    }

    async fn send_with_retry(
        &self,
        body_bytes: &[u8],
        idempotent: bool,
    ) -> Result<Vec<u8>, ClientError> {
        let mut attempt = 1;
        loop {
            match self.send_once(body_bytes).await {
                Ok(bytes) => return Ok(bytes),
                Err(err) => match self.retry.decide(&err, attempt, idempotent) {
                    RetryDecision::RetryAfter(delay) => {
                        self.metrics
                            .requests_retried
                            .fetch_add(1, Ordering::Relaxed);
                        debug!("retrying GraphQL request after {:?}", delay);
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    RetryDecision::DoNotRetry => return Err(err),
                },
            }
        }
    }

    async fn send_once(&self, body_bytes: &[u8]) -> Result<Vec<u8>, ClientError> {
        let response = self
            .http
            .post(&self.endpoint)
            .body(body_bytes.to_vec())
            .send()
            .await?;

        let status = response.status();
        let retry_after = parse_retry_after(response.headers());
        let bytes = response.bytes().await?;

        if !status.is_success() {
            self.metrics.requests_failed.fetch_add(1, Ordering::Relaxed);
            return Err(ClientError::HttpStatus {
                status,
                body: truncate_body(&bytes),
                retry_after,
            });
        }

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        document: &str,
        variables: Map<String, Value>,
    ) -> Result<Envelope, ClientError> {
        let mut body = Map::new();
        body.insert(
            "query".to_string(),
            Value::String(document.to_string()),
        );
        body.insert("variables".to_string(), Value::Object(variables));
        let body_bytes = serde_json::to_vec(&Value::Object(body))?;

        self.metrics.requests_total.fetch_add(1, Ordering::Relaxed);
        let bytes = self
            .send_with_retry(&body_bytes, is_idempotent_document(document))
            .await?;
        let envelope: Envelope = serde_json::from_slice(&bytes)?;

        if envelope.errors.is_empty() {
            self.metrics.requests_ok.fetch_add(1, Ordering::Relaxed);
        } else {
            self.metrics.requests_failed.fetch_add(1, Ordering::Relaxed);
        }

        Ok(envelope)
    }
}

/// Mutations are not safe to replay; everything else is.
fn is_idempotent_document(document: &str) -> bool {
    !document.trim_start().starts_with("mutation")
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(RETRY_AFTER)?.to_str().ok()?;
    value.parse::<u64>().ok().map(Duration::from_secs)
}

fn truncate_body(bytes: &[u8]) -> String {
    const MAX_LEN: usize = 4096;
    let mut body = String::from_utf8_lossy(bytes).to_string();
    if body.len() > MAX_LEN {
        body.truncate(MAX_LEN);
        body.push('…');
    }
    body
}
