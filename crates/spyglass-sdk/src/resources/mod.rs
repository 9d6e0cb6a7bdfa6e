//! One module per API resource.

pub mod models;
pub mod monitors;
pub mod prompts;
pub mod spans;

pub use models::{ListModelsVariables, Model, ModelsResource};
pub use monitors::{CreateMonitorVariables, ListMonitorsVariables, Monitor, MonitorsResource};
pub use prompts::{ListPromptsVariables, Prompt, PromptsResource};
pub use spans::{ListSpansVariables, Span, SpansResource};
