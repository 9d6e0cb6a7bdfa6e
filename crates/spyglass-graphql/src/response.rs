//! Response contract: typed records parsed from raw result nodes.

use std::collections::BTreeMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ClientError, FieldError};

/// One validated result record.
///
/// Decoding is lenient toward unknown keys so the API can add fields without
/// breaking older clients. A missing required field fails with the field
/// named and the node's id attached when present.
pub trait ResponseRecord: DeserializeOwned + Serialize + Send + Sync + Sized {
    /// Construct a record from one raw result node.
    fn from_node(node: &Value) -> Result<Self, ClientError> {
        serde_json::from_value(node.clone()).map_err(|err| decode_error(node, &err))
    }

    /// Flatten into a single-level mapping keyed by dotted paths, suitable
    /// for tabular display and CSV export.
    fn flatten(&self) -> Result<BTreeMap<String, Value>, ClientError> {
        Ok(flatten_value(&serde_json::to_value(self)?))
    }
}

fn decode_error(node: &Value, err: &serde_json::Error) -> ClientError {
    let context = node
        .get("id")
        .and_then(Value::as_str)
        .map_or_else(|| "result node".to_string(), |id| format!("result node {id}"));
    let reason = err.to_string();
    // serde names the offender as `missing field `name``; lift it out when present.
    let field = reason
        .split('`')
        .nth(1)
        .filter(|name| !name.is_empty())
        .unwrap_or("node")
        .to_string();
    ClientError::validation(
        &format!("failed to decode {context}"),
        vec![FieldError::new(field, reason)],
    )
}

/// Flatten a JSON tree into leaf values keyed by dotted paths.
///
/// Nested objects contribute `parent.child` keys, lists contribute
/// `parent.0`, `parent.1`, and scalars pass through under their own name.
#[must_use]
pub fn flatten_value(value: &Value) -> BTreeMap<String, Value> {
    let mut out = BTreeMap::new();
    flatten_into(None, value, &mut out);
    out
}

fn flatten_into(prefix: Option<&str>, value: &Value, out: &mut BTreeMap<String, Value>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = prefix.map_or_else(|| key.clone(), |p| format!("{p}.{key}"));
                flatten_into(Some(&path), child, out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                let path = prefix.map_or_else(|| index.to_string(), |p| format!("{p}.{index}"));
                flatten_into(Some(&path), child, out);
            }
        }
        leaf => {
            out.insert(prefix.unwrap_or_default().to_string(), leaf.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct SampleRecord {
        id: String,
        name: String,
        #[serde(default)]
        latency_ms: Option<f64>,
    }

    impl ResponseRecord for SampleRecord {}

    #[test]
    fn tolerates_unknown_keys() {
        let node = json!({
            "id": "span-1",
            "name": "embedding",
            "addedInVNext": {"nested": true}
        });
        let record = SampleRecord::from_node(&node).expect("lenient decode");
        assert_eq!(record.id, "span-1");
        assert_eq!(record.latency_ms, None);
    }

    #[test]
    fn missing_required_field_is_named() {
        let node = json!({"id": "span-2"});
        let err = SampleRecord::from_node(&node).expect_err("strict decode");
        match err {
            ClientError::Validation { message, fields } => {
                assert!(message.contains("span-2"));
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].field, "name");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn flatten_uses_dotted_paths() {
        let flattened = flatten_value(&json!({
            "id": "span-3",
            "attributes": {
                "llm": {"model_name": "gpt-x", "temperature": 0.2}
            },
            "events": [{"name": "start"}, {"name": "end"}]
        }));
        assert_eq!(
            flattened.get("attributes.llm.model_name"),
            Some(&json!("gpt-x"))
        );
        assert_eq!(flattened.get("events.0.name"), Some(&json!("start")));
        assert_eq!(flattened.get("events.1.name"), Some(&json!("end")));
        assert_eq!(flattened.get("id"), Some(&json!("span-3")));
    }

    #[test]
    fn flatten_keeps_scalars_and_nulls() {
        let flattened = flatten_value(&json!({"count": 3, "note": null}));
        assert_eq!(flattened.get("count"), Some(&json!(3)));
        assert_eq!(flattened.get("note"), Some(&Value::Null));
    }
}
