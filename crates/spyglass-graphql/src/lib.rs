//! Spyglass GraphQL - typed query/response framework for the Spyglass SDK.
//!
//! This crate provides:
//! - Typed GraphQL operations with validated, cursor-aware variables.
//! - Result-shape resolution (single node, Relay connections, custom overrides).
//! - Cursor pagination with a cooperative inter-page throttle.
//! - Error normalization into the Spyglass taxonomy, including keyword
//!   classification of rate-limit and transient conditions.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]

mod error;
mod operation;
mod pagination;
mod response;
mod retry;
mod transport;
mod variables;

pub use error::{
    ClientError, FieldError, GraphqlError, GraphqlErrorLocation, GraphqlPathSegment, HttpErrorInfo,
};
pub use operation::{Operation, ResolvedPage, ResultShape, execute, fetch_one};
pub use pagination::{PageLimit, PaginateConfig, PaginationError, paginate};
pub use response::{ResponseRecord, flatten_value};
pub use retry::{RetryDecision, RetryPolicy, RetryStrategy};
pub use transport::{
    Envelope, HttpTransport, HttpTransportBuilder, Transport, TransportMetricsSnapshot,
};
pub use variables::OperationVariables;
