//! The Spyglass client.

use std::time::Duration;

use spyglass_graphql::{HttpTransport, PaginateConfig, Transport};

use crate::config::SdkConfig;
use crate::error::SdkError;
use crate::resources::{
    models::ModelsResource, monitors::MonitorsResource, prompts::PromptsResource,
    spans::SpansResource,
};

/// Client for the Spyglass GraphQL API.
///
/// Owns the transport (connection state and credentials) and the pagination
/// throttle; resource accessors borrow it per call. The transport is an
/// explicit dependency so tests can substitute an in-process one.
pub struct SpyglassClient {
    transport: Box<dyn Transport>,
    page_delay: Option<Duration>,
}

impl SpyglassClient {
    /// Build a client with an HTTP transport from the given configuration.
    pub fn new(config: SdkConfig) -> Result<Self, SdkError> {
        config.validate()?;
        let mut builder = HttpTransport::builder(&config.endpoint)
            .with_timeout(config.timeout)
            .with_retry_policy(config.retry.clone());
        if let Some(api_key) = &config.api_key {
            builder = builder.with_bearer_token(api_key);
        }
        let transport = builder.build()?;
        Ok(Self {
            transport: Box::new(transport),
            page_delay: config.page_delay,
        })
    }

    /// Build a client from `SPYGLASS_*` environment variables.
    pub fn from_env() -> Result<Self, SdkError> {
        Self::new(SdkConfig::from_env()?)
    }

    /// Build a client over an arbitrary transport.
    #[must_use]
    pub fn with_transport(
        transport: impl Transport + 'static,
        page_delay: Option<Duration>,
    ) -> Self {
        Self {
            transport: Box::new(transport),
            page_delay,
        }
    }

    /// The transport used for every operation.
    #[must_use]
    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Pagination configuration derived from the client settings.
    #[must_use]
    pub fn paginate_config(&self) -> PaginateConfig {
        PaginateConfig {
            page_delay: self.page_delay,
            limit: None,
        }
    }

    /// Access the model catalog.
    #[must_use]
    pub fn models(&self) -> ModelsResource<'_> {
        ModelsResource::new(self)
    }

    /// Access drift and performance monitors.
    #[must_use]
    pub fn monitors(&self) -> MonitorsResource<'_> {
        MonitorsResource::new(self)
    }

    /// Access prompt templates.
    #[must_use]
    pub fn prompts(&self) -> PromptsResource<'_> {
        PromptsResource::new(self)
    }

    /// Access traced spans.
    #[must_use]
    pub fn spans(&self) -> SpansResource<'_> {
        SpansResource::new(self)
    }
}
