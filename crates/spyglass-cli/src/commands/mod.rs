//! CLI subcommand implementations.

pub mod models;
pub mod monitors;
pub mod prompts;
pub mod spans;
