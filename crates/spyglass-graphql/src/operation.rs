//! Operation definitions and the one-shot executor.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{self, ClientError};
use crate::response::ResponseRecord;
use crate::transport::Transport;
use crate::variables::OperationVariables;

/// Result-shape strategies understood by the default resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultShape {
    /// Detect single-node vs connection from the payload.
    #[default]
    Auto,
    /// A lone root field wrapping exactly one node.
    SingleNode,
    /// A Relay-style connection (`pageInfo` plus `edges`).
    Connection,
}

/// One page of resolved records plus pagination metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPage<R> {
    /// Records in API order.
    pub records: Vec<R>,
    /// Whether the API reports more pages.
    pub has_next_page: bool,
    /// Cursor for the next page.
    pub end_cursor: Option<String>,
}

/// A declared GraphQL operation: fixed document text bound to its variables
/// and record types at definition time.
pub trait Operation {
    /// Validated input for one invocation.
    type Variables: OperationVariables;
    /// Record type parsed from each result node.
    type Record: ResponseRecord;

    /// Fixed GraphQL document text.
    const DOCUMENT: &'static str;
    /// Operation name, used in logs and shape-mismatch errors.
    const NAME: &'static str;
    /// What the operation fetches or mutates.
    const DESCRIPTION: &'static str;
    /// Default failure message when the API rejects the call.
    const ERROR_MESSAGE: &'static str = "GraphQL operation failed";
    /// Shape strategy for the default resolver.
    const SHAPE: ResultShape = ResultShape::Auto;

    /// Extract records and pagination metadata from the raw `data` payload.
    ///
    /// Override for irregular payloads (mutation envelopes, unioned
    /// fragments). The override receives the same raw payload and returns
    /// the same page structure; the default handles single nodes and Relay
    /// connections per [`Self::SHAPE`].
    fn resolve(data: &Value) -> Result<ResolvedPage<Self::Record>, ClientError>
    where
        Self: Sized,
    {
        match Self::SHAPE {
            ResultShape::Auto => resolve_auto::<Self>(data),
            ResultShape::SingleNode => resolve_single::<Self>(data),
            ResultShape::Connection => resolve_connection::<Self>(data),
        }
    }
}

/// Run one operation round trip and resolve the result shape.
pub async fn execute<O: Operation>(
    transport: &dyn Transport,
    variables: &O::Variables,
) -> Result<ResolvedPage<O::Record>, ClientError> {
    let wire = variables.to_wire()?;
    debug!(operation = O::NAME, "executing GraphQL operation");

    let envelope = match transport.execute(O::DOCUMENT, wire).await {
        Ok(envelope) => envelope,
        Err(err) => return Err(error::classify(O::ERROR_MESSAGE, err.to_string(), Vec::new())),
    };

    if !envelope.errors.is_empty() {
        return Err(error::from_graphql_errors(O::ERROR_MESSAGE, envelope.errors));
    }
    let data = envelope
        .data
        .ok_or_else(|| shape_error::<O>("reply carried neither data nor errors"))?;
    O::resolve(&data)
}

/// Run one operation and return its first record, failing if there is none.
pub async fn fetch_one<O: Operation>(
    transport: &dyn Transport,
    variables: &O::Variables,
) -> Result<O::Record, ClientError> {
    let mut page = execute::<O>(transport, variables).await?;
    if page.records.is_empty() {
        return Err(shape_error::<O>("expected one record, got none"));
    }
    Ok(page.records.remove(0))
}

fn shape_error<O: Operation>(message: impl Into<String>) -> ClientError {
    ClientError::UnexpectedShape {
        operation: O::NAME.to_string(),
        message: message.into(),
    }
}

fn is_connection(map: &Map<String, Value>) -> bool {
    map.contains_key("edges") && map.contains_key("pageInfo")
}

fn single_entry(map: &Map<String, Value>) -> Option<(&String, &Value)> {
    if map.len() == 1 { map.iter().next() } else { None }
}

fn resolve_auto<O: Operation>(data: &Value) -> Result<ResolvedPage<O::Record>, ClientError> {
    let root = data
        .as_object()
        .ok_or_else(|| shape_error::<O>("data payload is not an object"))?;

    if is_connection(root) {
        return connection_page::<O>(root);
    }

    if let Some((field, inner)) = single_entry(root) {
        if let Some(unwrapped) = inner.as_object() {
            if is_connection(unwrapped) {
                return connection_page::<O>(unwrapped);
            }
            return Ok(ResolvedPage {
                records: vec![O::Record::from_node(inner)?],
                has_next_page: false,
                end_cursor: None,
            });
        }
        return Err(shape_error::<O>(format!(
            "root field {field} is not an object"
        )));
    }

    Err(shape_error::<O>(
        "payload matches neither a single node nor a connection",
    ))
}

fn resolve_single<O: Operation>(data: &Value) -> Result<ResolvedPage<O::Record>, ClientError> {
    let root = data
        .as_object()
        .ok_or_else(|| shape_error::<O>("data payload is not an object"))?;
    let (field, inner) =
        single_entry(root).ok_or_else(|| shape_error::<O>("expected exactly one root field"))?;
    if !inner.is_object() {
        return Err(shape_error::<O>(format!(
            "root field {field} is not an object"
        )));
    }
    Ok(ResolvedPage {
        records: vec![O::Record::from_node(inner)?],
        has_next_page: false,
        end_cursor: None,
    })
}

fn resolve_connection<O: Operation>(data: &Value) -> Result<ResolvedPage<O::Record>, ClientError> {
    let root = data
        .as_object()
        .ok_or_else(|| shape_error::<O>("data payload is not an object"))?;
    if is_connection(root) {
        return connection_page::<O>(root);
    }
    if let Some((_, inner)) = single_entry(root) {
        if let Some(unwrapped) = inner.as_object() {
            if is_connection(unwrapped) {
                return connection_page::<O>(unwrapped);
            }
        }
    }
    Err(shape_error::<O>("expected a connection payload"))
}

fn connection_page<O: Operation>(
    connection: &Map<String, Value>,
) -> Result<ResolvedPage<O::Record>, ClientError> {
    let edges = connection
        .get("edges")
        .and_then(Value::as_array)
        .ok_or_else(|| shape_error::<O>("connection edges is not a list"))?;

    let mut records = Vec::with_capacity(edges.len());
    for (index, edge) in edges.iter().enumerate() {
        let node = edge
            .get("node")
            .ok_or_else(|| shape_error::<O>(format!("edge {index} has no node")))?;
        records.push(O::Record::from_node(node)?);
    }

    let info = connection.get("pageInfo").and_then(Value::as_object);
    let has_next_page = info
        .and_then(|info| info.get("hasNextPage"))
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let end_cursor = info
        .and_then(|info| info.get("endCursor"))
        .and_then(Value::as_str)
        .map(ToString::to_string);

    Ok(ResolvedPage {
        records,
        has_next_page,
        end_cursor,
    })
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use super::*;
    use crate::error::FieldError;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: String,
        name: String,
    }

    impl ResponseRecord for Item {}

    #[derive(Debug, Default, Serialize)]
    struct ItemVariables {
        #[serde(skip_serializing_if = "Option::is_none")]
        cursor: Option<String>,
    }

    impl OperationVariables for ItemVariables {
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

    struct ListItems;

    impl Operation for ListItems {
        type Variables = ItemVariables;
        type Record = Item;

        const DOCUMENT: &'static str = "query ListItems($cursor: String) { items(after: $cursor) { pageInfo { hasNextPage endCursor } edges { node { id name } } } }";
        const NAME: &'static str = "ListItems";
        const DESCRIPTION: &'static str = "List items";
    }

    #[test]
    fn auto_resolves_a_single_node() {
        let page = ListItems::resolve(&json!({
            "node": {"id": "m-1", "name": "churn"}
        }))
        .expect("single node");
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].id, "m-1");
        assert!(!page.has_next_page);
        assert!(page.end_cursor.is_none());
    }

    #[test]
    fn auto_resolves_a_wrapped_connection_in_edge_order() {
        let page = ListItems::resolve(&json!({
            "items": {
                "pageInfo": {"hasNextPage": true, "endCursor": "abc"},
                "edges": [
                    {"node": {"id": "m-1", "name": "first"}},
                    {"node": {"id": "m-2", "name": "second"}}
                ]
            }
        }))
        .expect("connection");
        assert_eq!(
            page.records.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
            vec!["m-1", "m-2"]
        );
        assert!(page.has_next_page);
        assert_eq!(page.end_cursor.as_deref(), Some("abc"));
    }

    #[test]
    fn null_end_cursor_resolves_to_none() {
        let page = ListItems::resolve(&json!({
            "items": {
                "pageInfo": {"hasNextPage": false, "endCursor": null},
                "edges": []
            }
        }))
        .expect("empty connection");
        assert!(page.records.is_empty());
        assert!(!page.has_next_page);
        assert!(page.end_cursor.is_none());
    }

    #[test]
    fn unrecognized_shape_is_fatal() {
        let err = ListItems::resolve(&json!({"a": 1, "b": 2})).expect_err("shape mismatch");
        match err {
            ClientError::UnexpectedShape { operation, .. } => {
                assert_eq!(operation, "ListItems");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn edge_without_node_is_fatal() {
        let err = ListItems::resolve(&json!({
            "items": {
                "pageInfo": {"hasNextPage": false, "endCursor": null},
                "edges": [{"notNode": {}}]
            }
        }))
        .expect_err("missing node");
        assert!(matches!(err, ClientError::UnexpectedShape { .. }));
    }
}
