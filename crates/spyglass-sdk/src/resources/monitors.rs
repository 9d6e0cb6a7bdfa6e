//! Drift and performance monitor resource.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use spyglass_graphql::{
    ClientError, FieldError, Operation, OperationVariables, ResolvedPage, ResponseRecord, execute,
    fetch_one, paginate,
};

use crate::client::SpyglassClient;
use crate::error::SdkError;

/// One monitor attached to a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Monitor {
    /// Monitor id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Metric the monitor watches.
    #[serde(default)]
    pub metric: Option<String>,
    /// Alert threshold.
    #[serde(default)]
    pub threshold: Option<f64>,
    /// Current status (`healthy`, `firing`, ...).
    #[serde(default)]
    pub status: Option<String>,
}

impl ResponseRecord for Monitor {}

/// Variables for [`ListMonitors`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMonitorsVariables {
    /// Restrict to monitors on one model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    /// Page size requested from the API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<u32>,
    /// Pagination cursor; owned by the driver.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

impl OperationVariables for ListMonitorsVariables {
    fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    fn set_cursor(&mut self, cursor: Option<String>) {
        self.cursor = cursor;
    }
}

/// List monitors as a Relay connection.
pub struct ListMonitors;

impl Operation for ListMonitors {
    type Variables = ListMonitorsVariables;
    type Record = Monitor;

    const DOCUMENT: &'static str = "\
query ListMonitors($modelId: ID, $first: Int, $cursor: String) {
  monitors(modelId: $modelId, first: $first, after: $cursor) {
    pageInfo { hasNextPage endCursor }
    edges { node { id name metric threshold status } }
  }
}";
    const NAME: &'static str = "ListMonitors";
    const DESCRIPTION: &'static str = "List monitors, optionally for one model";
    const ERROR_MESSAGE: &'static str = "failed to list monitors";
}

/// Variables for [`CreateMonitor`].
///
/// `enabled` is three-valued: leaving it unset lets the server pick its
/// default, while an explicit `Some(false)` creates the monitor disabled.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMonitorVariables {
    /// Display name.
    pub name: String,
    /// Metric to watch.
    pub metric: String,
    /// Alert threshold.
    pub threshold: f64,
    /// Whether the monitor starts enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Pagination cursor; unused for mutations but owned by the driver.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

impl OperationVariables for CreateMonitorVariables {
    fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    fn set_cursor(&mut self, cursor: Option<String>) {
        self.cursor = cursor;
    }

    fn validate(&self) -> Vec<FieldError> {
        let mut failures = Vec::new();
        if self.name.is_empty() {
            failures.push(FieldError::new("name", "must not be empty"));
        }
        if self.metric.is_empty() {
            failures.push(FieldError::new("metric", "must not be empty"));
        }
        if !self.threshold.is_finite() {
            failures.push(FieldError::new("threshold", "must be finite"));
        }
        failures
    }
}

/// Create a monitor.
///
/// The mutation payload wraps the created monitor in a `success` envelope,
/// so the resolver is overridden rather than auto-detected.
pub struct CreateMonitor;

impl Operation for CreateMonitor {
    type Variables = CreateMonitorVariables;
    type Record = Monitor;

    const DOCUMENT: &'static str = "\
mutation CreateMonitor($name: String!, $metric: String!, $threshold: Float!, $enabled: Boolean) {
  createMonitor(name: $name, metric: $metric, threshold: $threshold, enabled: $enabled) {
    success
    message
    monitor { id name metric threshold status }
  }
}";
    const NAME: &'static str = "CreateMonitor";
    const DESCRIPTION: &'static str = "Create a monitor on a metric";
    const ERROR_MESSAGE: &'static str = "failed to create monitor";

    fn resolve(data: &Value) -> Result<ResolvedPage<Monitor>, ClientError> {
        let payload = data
            .get("createMonitor")
            .and_then(Value::as_object)
            .ok_or_else(|| ClientError::UnexpectedShape {
                operation: Self::NAME.to_string(),
                message: "missing createMonitor payload".to_string(),
            })?;

        let success = payload
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if !success {
            let details = payload
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("createMonitor reported success=false")
                .to_string();
            return Err(ClientError::Api {
                message: Self::ERROR_MESSAGE.to_string(),
                details,
                errors: Vec::new(),
            });
        }

        let node = payload
            .get("monitor")
            .filter(|node| !node.is_null())
            .ok_or_else(|| ClientError::UnexpectedShape {
                operation: Self::NAME.to_string(),
                message: "successful payload has no monitor".to_string(),
            })?;
        Ok(ResolvedPage {
            records: vec![Monitor::from_node(node)?],
            has_next_page: false,
            end_cursor: None,
        })
    }
}

/// Monitor accessor.
pub struct MonitorsResource<'a> {
    client: &'a SpyglassClient,
}

impl<'a> MonitorsResource<'a> {
    pub(crate) fn new(client: &'a SpyglassClient) -> Self {
        Self { client }
    }

    /// Fetch one page of monitors.
    pub async fn list_page(
        &self,
        variables: ListMonitorsVariables,
    ) -> Result<Vec<Monitor>, SdkError> {
        Ok(execute::<ListMonitors>(self.client.transport(), &variables)
            .await?
            .records)
    }

    /// Fetch all monitors across pages.
    pub async fn list(&self, variables: ListMonitorsVariables) -> Result<Vec<Monitor>, SdkError> {
        Ok(paginate::<ListMonitors>(
            self.client.transport(),
            variables,
            &self.client.paginate_config(),
        )
        .await?)
    }

    /// Create a monitor and return the created record.
    pub async fn create(&self, variables: CreateMonitorVariables) -> Result<Monitor, SdkError> {
        Ok(fetch_one::<CreateMonitor>(self.client.transport(), &variables).await?)
    }
}
