//! Traced span resource.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use spyglass_graphql::{FieldError, Operation, OperationVariables, ResponseRecord, execute, paginate};

use crate::client::SpyglassClient;
use crate::error::SdkError;

/// One traced span, with arbitrary nested attributes.
///
/// Attributes stay untyped; flattening turns them into dotted columns such
/// as `attributes.llm.model_name` for tables and CSV export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    /// Span id.
    pub id: String,
    /// Trace the span belongs to.
    pub trace_id: String,
    /// Span name.
    pub name: String,
    /// Start timestamp, RFC 3339.
    #[serde(default)]
    pub start_time: Option<String>,
    /// Latency in milliseconds.
    #[serde(default)]
    pub latency_ms: Option<f64>,
    /// Nested span attributes.
    #[serde(default)]
    pub attributes: Value,
}

impl ResponseRecord for Span {}

/// Variables for [`ListSpans`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSpansVariables {
    /// Restrict to spans of one trace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    /// Inclusive start of the time window, RFC 3339.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    /// Exclusive end of the time window, RFC 3339.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    /// Page size requested from the API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<u32>,
    /// Pagination cursor; owned by the driver.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

impl OperationVariables for ListSpansVariables {
    fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    fn set_cursor(&mut self, cursor: Option<String>) {
        self.cursor = cursor;
    }

    fn validate(&self) -> Vec<FieldError> {
        let mut failures = Vec::new();
        if self.first == Some(0) {
            failures.push(FieldError::new("first", "must be positive"));
        }
        if let (Some(start), Some(end)) = (&self.start, &self.end) {
            if start >= end {
                failures.push(FieldError::new("start", "must be before end"));
            }
        }
        failures
    }
}

/// List spans as a Relay connection.
pub struct ListSpans;

impl Operation for ListSpans {
    type Variables = ListSpansVariables;
    type Record = Span;

    const DOCUMENT: &'static str = "\
query ListSpans($traceId: ID, $start: String, $end: String, $first: Int, $cursor: String) {
  spans(traceId: $traceId, start: $start, end: $end, first: $first, after: $cursor) {
    pageInfo { hasNextPage endCursor }
    edges { node { id traceId name startTime latencyMs attributes } }
  }
}";
    const NAME: &'static str = "ListSpans";
    const DESCRIPTION: &'static str = "List traced spans in a time window";
    const ERROR_MESSAGE: &'static str = "failed to list spans";
}

/// Span accessor.
pub struct SpansResource<'a> {
    client: &'a SpyglassClient,
}

impl<'a> SpansResource<'a> {
    pub(crate) fn new(client: &'a SpyglassClient) -> Self {
        Self { client }
    }

    /// Fetch one page of spans.
    pub async fn list_page(&self, variables: ListSpansVariables) -> Result<Vec<Span>, SdkError> {
        Ok(execute::<ListSpans>(self.client.transport(), &variables)
            .await?
            .records)
    }

    /// Fetch all spans across pages.
    pub async fn list(&self, variables: ListSpansVariables) -> Result<Vec<Span>, SdkError> {
        Ok(paginate::<ListSpans>(
            self.client.transport(),
            variables,
            &self.client.paginate_config(),
        )
        .await?)
    }
}
