//! Model catalog resource.

use serde::{Deserialize, Serialize};

use spyglass_graphql::{
    FieldError, Operation, OperationVariables, ResponseRecord, execute, fetch_one, paginate,
};

use crate::client::SpyglassClient;
use crate::error::SdkError;

/// One model tracked by the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Model id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Model type (classification, regression, generative, ...).
    #[serde(default)]
    pub model_type: Option<String>,
    /// Creation timestamp, RFC 3339.
    #[serde(default)]
    pub created_at: Option<String>,
}

impl ResponseRecord for Model {}

/// Variables for [`ListModels`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListModelsVariables {
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

impl OperationVariables for ListModelsVariables {
    fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    fn set_cursor(&mut self, cursor: Option<String>) {
        self.cursor = cursor;
    }

    fn validate(&self) -> Vec<FieldError> {
        if self.first == Some(0) {
            vec![FieldError::new("first", "must be positive")]
        } else {
            Vec::new()
        }
    }
}

/// List models as a Relay connection.
pub struct ListModels;

impl Operation for ListModels {
    type Variables = ListModelsVariables;
    type Record = Model;

    const DOCUMENT: &'static str = "\
query ListModels($search: String, $first: Int, $cursor: String) {
  models(search: $search, first: $first, after: $cursor) {
    pageInfo { hasNextPage endCursor }
    edges { node { id name modelType createdAt } }
  }
}";
    const NAME: &'static str = "ListModels";
    const DESCRIPTION: &'static str = "List models tracked by the platform";
    const ERROR_MESSAGE: &'static str = "failed to list models";
}

/// Variables for [`GetModel`].
#[derive(Debug, Clone, Serialize)]
pub struct GetModelVariables {
    /// Model id.
    pub id: String,
    /// Pagination cursor; unused for a single fetch but owned by the driver.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

impl OperationVariables for GetModelVariables {
    fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    fn set_cursor(&mut self, cursor: Option<String>) {
        self.cursor = cursor;
    }

    fn validate(&self) -> Vec<FieldError> {
        if self.id.is_empty() {
            vec![FieldError::new("id", "must not be empty")]
        } else {
            Vec::new()
        }
    }
}

/// Fetch one model by id.
pub struct GetModel;

impl Operation for GetModel {
    type Variables = GetModelVariables;
    type Record = Model;

    const DOCUMENT: &'static str = "\
query GetModel($id: ID!) {
  model(id: $id) { id name modelType createdAt }
}";
    const NAME: &'static str = "GetModel";
    const DESCRIPTION: &'static str = "Fetch one model by id";
    const ERROR_MESSAGE: &'static str = "failed to fetch model";
}

/// Model catalog accessor.
pub struct ModelsResource<'a> {
    client: &'a SpyglassClient,
}

impl<'a> ModelsResource<'a> {
    pub(crate) fn new(client: &'a SpyglassClient) -> Self {
        Self { client }
    }

    /// Fetch one model by id.
    pub async fn get(&self, id: impl Into<String>) -> Result<Model, SdkError> {
        let variables = GetModelVariables {
            id: id.into(),
            cursor: None,
        };
        Ok(fetch_one::<GetModel>(self.client.transport(), &variables).await?)
    }

    /// Fetch one page of models.
    pub async fn list_page(&self, variables: ListModelsVariables) -> Result<Vec<Model>, SdkError> {
        Ok(execute::<ListModels>(self.client.transport(), &variables)
            .await?
            .records)
    }

    /// Fetch all models across pages.
    pub async fn list(&self, variables: ListModelsVariables) -> Result<Vec<Model>, SdkError> {
        Ok(paginate::<ListModels>(
            self.client.transport(),
            variables,
            &self.client.paginate_config(),
        )
        .await?)
    }
}
