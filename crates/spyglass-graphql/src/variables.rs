//! Variables contract: validated, cursor-aware operation inputs.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ClientError, FieldError};

/// Validated parameter bag for one operation invocation.
///
/// Implementations are plain serde structs: required fields are plain struct
/// fields, optional fields are `Option` with `skip_serializing_if` so an
/// unset field is omitted from the wire entirely while an explicitly set
/// falsy value (`Some(false)`, `0`, `""`) is always emitted. The server
/// applies its own defaults only for omitted keys, which preserves
/// three-valued boolean semantics.
///
/// Every variables type carries a pagination cursor field defaulting to
/// unset; the pagination driver owns it between pages.
pub trait OperationVariables: Serialize + Send + Sync {
    /// Current pagination cursor, if set.
    fn cursor(&self) -> Option<&str>;

    /// Replace the pagination cursor.
    fn set_cursor(&mut self, cursor: Option<String>);

    /// Collect every failing field. An empty vector means the input is valid.
    fn validate(&self) -> Vec<FieldError> {
        Vec::new()
    }

    /// Serialize to the wire mapping the transport expects.
    ///
    /// Fails with a single validation error naming all failing fields so
    /// callers can fix every problem in one pass.
    fn to_wire(&self) -> Result<Map<String, Value>, ClientError> {
        let failures = self.validate();
        if !failures.is_empty() {
            return Err(ClientError::validation("invalid variables", failures));
        }
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(ClientError::validation(
                "invalid variables",
                vec![FieldError::new(
                    "variables",
                    format!("expected an object, got {other}"),
                )],
            )),
        }
    }
}
