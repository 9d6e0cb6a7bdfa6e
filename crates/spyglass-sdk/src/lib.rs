//! Spyglass SDK - resource-level client for the Spyglass observability
//! platform's GraphQL API.
//!
//! The SDK wraps the `spyglass-graphql` framework with one module per API
//! resource (models, monitors, prompts, spans) and a client that owns the
//! transport, credentials, and pagination throttle.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]

mod client;
mod config;
mod error;
pub mod resources;

pub use client::SpyglassClient;
pub use config::SdkConfig;
pub use error::{ConfigError, SdkError};
