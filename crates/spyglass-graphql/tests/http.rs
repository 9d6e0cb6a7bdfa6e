//! HTTP transport tests against a mock server.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use spyglass_graphql::{
    ClientError, FieldError, HttpTransport, Operation, OperationVariables, ResponseRecord,
    RetryPolicy, RetryStrategy, Transport, execute, fetch_one,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Model {
    id: String,
    name: String,
}

impl ResponseRecord for Model {}

#[derive(Debug, Serialize)]
struct GetModelVariables {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    cursor: Option<String>,
}

impl OperationVariables for GetModelVariables {
    fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    fn set_cursor(&mut self, cursor: Option<String>) {
        self.cursor = cursor;
    }

    fn validate(&self) -> Vec<FieldError> {
        Vec::new()
    }
}

struct GetModel;

impl Operation for GetModel {
    type Variables = GetModelVariables;
    type Record = Model;

    const DOCUMENT: &'static str = "query GetModel($id: ID!) { model(id: $id) { id name } }";
    const NAME: &'static str = "GetModel";
    const DESCRIPTION: &'static str = "Fetch one model by id";
    const ERROR_MESSAGE: &'static str = "failed to fetch model";
}

struct RenameModel;

impl Operation for RenameModel {
    type Variables = GetModelVariables;
    type Record = Model;

    const DOCUMENT: &'static str =
        "mutation RenameModel($id: ID!) { renameModel(id: $id) { id name } }";
    const NAME: &'static str = "RenameModel";
    const DESCRIPTION: &'static str = "Rename a model";
    const ERROR_MESSAGE: &'static str = "failed to rename model";
}

/// Fails the first request with a 500, then succeeds.
struct FlakyResponder {
    counter: Arc<AtomicUsize>,
    body: serde_json::Value,
}

impl Respond for FlakyResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        if self.counter.fetch_add(1, Ordering::SeqCst) == 0 {
            ResponseTemplate::new(500).set_body_json(json!({"error": "boom"}))
        } else {
            ResponseTemplate::new(200).set_body_json(self.body.clone())
        }
    }
}

fn fast_retry(strategy: RetryStrategy) -> RetryPolicy {
    RetryPolicy {
        max_attempts: 2,
        base_delay: Duration::from_millis(5),
        max_delay: Duration::from_millis(10),
        max_jitter: Duration::ZERO,
        strategy,
    }
}

fn vars(id: &str) -> GetModelVariables {
    GetModelVariables {
        id: id.to_string(),
        cursor: None,
    }
}

#[tokio::test]
async fn posts_the_exact_graphql_envelope() {
    let server = MockServer::start().await;

    let expected_body = json!({
        "query": GetModel::DOCUMENT,
        "variables": {"id": "model-7"},
    });
    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_json(&expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"model": {"id": "model-7", "name": "churn"}}
        })))
        .mount(&server)
        .await;

    let transport = HttpTransport::builder(server.uri())
        .with_bearer_token("test-key")
        .build()
        .expect("transport");

    let model = fetch_one::<GetModel>(&transport, &vars("model-7"))
        .await
        .expect("model");
    assert_eq!(model.name, "churn");

    let metrics = transport.metrics();
    assert_eq!(metrics.requests_total, 1);
    assert_eq!(metrics.requests_ok, 1);
}

#[tokio::test]
async fn retries_server_errors_for_queries() {
    let server = MockServer::start().await;
    let counter = Arc::new(AtomicUsize::new(0));

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(FlakyResponder {
            counter: counter.clone(),
            body: json!({"data": {"model": {"id": "model-1", "name": "after-retry"}}}),
        })
        .mount(&server)
        .await;

    let transport = HttpTransport::builder(server.uri())
        .with_retry_policy(fast_retry(RetryStrategy::IdempotentOnly))
        .build()
        .expect("transport");

    let model = fetch_one::<GetModel>(&transport, &vars("model-1"))
        .await
        .expect("succeeds after retry");
    assert_eq!(model.name, "after-retry");
    assert_eq!(counter.load(Ordering::SeqCst), 2);
    assert_eq!(transport.metrics().requests_retried, 1);
}

#[tokio::test]
async fn mutations_are_not_retried() {
    let server = MockServer::start().await;
    let counter = Arc::new(AtomicUsize::new(0));

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(FlakyResponder {
            counter: counter.clone(),
            body: json!({"data": {"renameModel": {"id": "model-1", "name": "renamed"}}}),
        })
        .mount(&server)
        .await;

    let transport = HttpTransport::builder(server.uri())
        .with_retry_policy(fast_retry(RetryStrategy::IdempotentOnly))
        .build()
        .expect("transport");

    let err = fetch_one::<RenameModel>(&transport, &vars("model-1"))
        .await
        .expect_err("mutation must not retry");
    assert!(matches!(err, ClientError::Api { .. }));
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn http_429_normalizes_to_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "3")
                .set_body_json(json!({"error": "slow down"})),
        )
        .mount(&server)
        .await;

    let transport = HttpTransport::builder(server.uri())
        .with_retry_policy(RetryPolicy {
            max_attempts: 1,
            ..fast_retry(RetryStrategy::IdempotentOnly)
        })
        .build()
        .expect("transport");

    let err = execute::<GetModel>(&transport, &vars("model-1"))
        .await
        .expect_err("throttled");
    assert!(matches!(err, ClientError::RateLimited { .. }));
}

#[tokio::test]
async fn http_404_keeps_the_operations_default_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such endpoint"))
        .mount(&server)
        .await;

    let transport = HttpTransport::builder(server.uri())
        .build()
        .expect("transport");

    let err = execute::<GetModel>(&transport, &vars("model-1"))
        .await
        .expect_err("not found");
    match err {
        ClientError::Api { message, details, .. } => {
            assert_eq!(message, "failed to fetch model");
            assert!(details.contains("404"));
            assert!(details.contains("no such endpoint"));
        }
        other => panic!("unexpected variant: {other:?}"),
    }
}

#[tokio::test]
async fn raw_transport_surfaces_typed_status_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(503)
                .insert_header("Retry-After", "2")
                .set_body_string("maintenance"),
        )
        .mount(&server)
        .await;

    let transport = HttpTransport::builder(server.uri())
        .with_retry_policy(RetryPolicy {
            max_attempts: 1,
            ..fast_retry(RetryStrategy::IdempotentOnly)
        })
        .build()
        .expect("transport");

    let err = transport
        .execute(GetModel::DOCUMENT, serde_json::Map::new())
        .await
        .expect_err("service unavailable");
    match err {
        ClientError::HttpStatus {
            status,
            body,
            retry_after,
        } => {
            assert_eq!(status.as_u16(), 503);
            assert_eq!(body, "maintenance");
            assert_eq!(retry_after, Some(Duration::from_secs(2)));
        }
        other => panic!("unexpected variant: {other:?}"),
    }
}
