//! Error types for the Spyglass GraphQL client.

use std::fmt;
use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HTTP error information captured from reqwest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpErrorInfo {
    /// Error message.
    pub message: String,
    /// HTTP status code (if available).
    pub status_code: Option<u16>,
    /// Whether the error was a timeout.
    pub is_timeout: bool,
    /// Whether the error was a connection failure.
    pub is_connect: bool,
}

impl From<reqwest::Error> for HttpErrorInfo {
    fn from(err: reqwest::Error) -> Self {
        Self {
            message: err.to_string(),
            status_code: err.status().map(|status| status.as_u16()),
            is_timeout: err.is_timeout(),
            is_connect: err.is_connect(),
        }
    }
}

/// GraphQL error location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphqlErrorLocation {
    /// Line number in the query (1-based).
    pub line: u32,
    /// Column number in the query (1-based).
    pub column: u32,
}

/// GraphQL path segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GraphqlPathSegment {
    /// Field name.
    Key(String),
    /// Array index.
    Index(i64),
}

/// GraphQL error object (per the GraphQL spec).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlError {
    /// Human-readable error message.
    pub message: String,
    /// Location(s) within the query.
    #[serde(default)]
    pub locations: Vec<GraphqlErrorLocation>,
    /// Path within the response where the error occurred.
    #[serde(default)]
    pub path: Vec<GraphqlPathSegment>,
    /// Extensions metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
}

/// One failing field inside a validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name.
    pub field: String,
    /// Why the field failed.
    pub reason: String,
}

impl FieldError {
    /// Create a field error.
    #[must_use]
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Error type for Spyglass GraphQL operations.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// HTTP/network failure below the GraphQL envelope.
    #[error("HTTP error: {0:?}")]
    Http(HttpErrorInfo),

    /// Non-2xx HTTP response.
    #[error("HTTP status {status} with body: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: StatusCode,
        /// Response body (truncated if needed).
        body: String,
        /// Retry-After duration when supplied.
        retry_after: Option<Duration>,
    },

    /// JSON encode/decode failure.
    #[error("JSON error: {0}")]
    Json(String),

    /// The API rejected the operation.
    #[error("{message}")]
    Api {
        /// The operation's declared failure message.
        message: String,
        /// Raw error text from the API.
        details: String,
        /// GraphQL error list, when the failure came from the envelope.
        errors: Vec<GraphqlError>,
    },

    /// The API reported rate limiting.
    #[error("rate limited by the API; reduce request rate or configure an inter-page delay")]
    RateLimited {
        /// Raw error text from the API.
        details: String,
    },

    /// A known-transient server-side condition.
    #[error("transient API failure; retrying the call is safe")]
    Transient {
        /// Raw error text from the API.
        details: String,
    },

    /// Caller input or a result node failed validation.
    #[error("{message}")]
    Validation {
        /// Summary naming every failing field.
        message: String,
        /// Individual field failures.
        fields: Vec<FieldError>,
    },

    /// The result matched no known shape and the operation supplied no override.
    #[error("unexpected response shape for {operation}: {message}")]
    UnexpectedShape {
        /// Operation name.
        operation: String,
        /// What made the shape unrecognizable.
        message: String,
    },
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(HttpErrorInfo::from(err))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl ClientError {
    /// Build a validation error whose message names every failing field.
    #[must_use]
    pub fn validation(context: &str, fields: Vec<FieldError>) -> Self {
        let listing = fields
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Self::Validation {
            message: format!("{context}: {listing}"),
            fields,
        }
    }

    /// Raw error text carried alongside the human-readable message.
    #[must_use]
    pub fn details(&self) -> Option<&str> {
        match self {
            Self::Api { details, .. }
            | Self::RateLimited { details }
            | Self::Transient { details } => Some(details),
            Self::HttpStatus { body, .. } => Some(body),
            Self::Http(info) => Some(&info.message),
            Self::Json(message) => Some(message),
            Self::Validation { .. } | Self::UnexpectedShape { .. } => None,
        }
    }

    /// Returns `true` if the error is retryable at the transport level.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(info) => info.is_timeout || info.is_connect,
            Self::HttpStatus { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            Self::Transient { .. } => true,
            _ => false,
        }
    }
}

/// Substrings of raw API error text that indicate rate limiting.
const RATE_LIMIT_PATTERNS: &[&str] = &["rate limit", "too many requests", "429"];

/// Substrings that indicate a known-transient server condition.
const TRANSIENT_PATTERNS: &[&str] = &[
    "timeout",
    "timed out",
    "temporarily unavailable",
    "connection reset",
    "502",
    "503",
];

/// Normalize a raw failure into the taxonomy, substituting the rate-limit or
/// transient variant when the text matches a known pattern.
///
/// The pattern tables live here and nowhere else; matching is substring-based
/// because the API exposes no structured codes for these conditions.
pub(crate) fn classify(
    default_message: &str,
    details: String,
    errors: Vec<GraphqlError>,
) -> ClientError {
    let lowered = details.to_lowercase();
    if RATE_LIMIT_PATTERNS
        .iter()
        .any(|pattern| lowered.contains(pattern))
    {
        return ClientError::RateLimited { details };
    }
    if TRANSIENT_PATTERNS
        .iter()
        .any(|pattern| lowered.contains(pattern))
    {
        return ClientError::Transient { details };
    }
    ClientError::Api {
        message: default_message.to_string(),
        details,
        errors,
    }
}

/// Normalize a GraphQL error list returned inside the envelope.
pub(crate) fn from_graphql_errors(
    default_message: &str,
    errors: Vec<GraphqlError>,
) -> ClientError {
    let details = errors
        .iter()
        .map(|err| err.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");
    classify(default_message, details, errors)
}
