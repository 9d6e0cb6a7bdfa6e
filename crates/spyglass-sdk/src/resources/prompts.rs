//! Prompt template resource.

use serde::{Deserialize, Serialize};

use spyglass_graphql::{Operation, OperationVariables, ResponseRecord, execute, paginate};

use crate::client::SpyglassClient;
use crate::error::SdkError;

/// One versioned prompt template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    /// Prompt id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Latest version number.
    #[serde(default)]
    pub version: Option<u32>,
    /// Template text.
    #[serde(default)]
    pub template: Option<String>,
}

impl ResponseRecord for Prompt {}

/// Variables for [`ListPrompts`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPromptsVariables {
    /// Filter by name substring.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Page size requested from the API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<u32>,
    /// Pagination cursor; owned by the driver.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

impl OperationVariables for ListPromptsVariables {
    fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    fn set_cursor(&mut self, cursor: Option<String>) {
        self.cursor = cursor;
    }
}

/// List prompts as a Relay connection.
pub struct ListPrompts;

impl Operation for ListPrompts {
    type Variables = ListPromptsVariables;
    type Record = Prompt;

    const DOCUMENT: &'static str = "\
query ListPrompts($search: String, $first: Int, $cursor: String) {
  prompts(search: $search, first: $first, after: $cursor) {
    pageInfo { hasNextPage endCursor }
    edges { node { id name version template } }
  }
}";
    const NAME: &'static str = "ListPrompts";
    const DESCRIPTION: &'static str = "List prompt templates";
    const ERROR_MESSAGE: &'static str = "failed to list prompts";
}

/// Prompt accessor.
pub struct PromptsResource<'a> {
    client: &'a SpyglassClient,
}

impl<'a> PromptsResource<'a> {
    pub(crate) fn new(client: &'a SpyglassClient) -> Self {
        Self { client }
    }

    /// Fetch one page of prompts.
    pub async fn list_page(
        &self,
        variables: ListPromptsVariables,
    ) -> Result<Vec<Prompt>, SdkError> {
        Ok(execute::<ListPrompts>(self.client.transport(), &variables)
            .await?
            .records)
    }

    /// Fetch all prompts across pages.
    pub async fn list(&self, variables: ListPromptsVariables) -> Result<Vec<Prompt>, SdkError> {
        Ok(paginate::<ListPrompts>(
            self.client.transport(),
            variables,
            &self.client.paginate_config(),
        )
        .await?)
    }
}
