//! Cursor pagination driver.

use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::error::ClientError;
use crate::operation::{Operation, execute};
use crate::transport::Transport;
use crate::variables::OperationVariables;

/// Ceiling on the number of records accumulated across pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimit {
    /// Maximum number of records to fetch.
    pub max_records: usize,
}

impl PageLimit {
    /// Create a new limit.
    #[must_use]
    pub const fn new(max_records: usize) -> Self {
        Self { max_records }
    }
}

/// Pagination behavior knobs.
///
/// The default is faithful to the API contract: no record ceiling and no
/// inter-page delay. The delay is a cooperative self-throttle for staying
/// under the API's rate limits; the ceiling bounds worst-case memory and
/// request count for callers that want it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginateConfig {
    /// Optional pause between page requests.
    pub page_delay: Option<Duration>,
    /// Optional ceiling on accumulated records.
    pub limit: Option<PageLimit>,
}

/// Pagination error type.
#[derive(Debug, Error)]
pub enum PaginationError {
    /// Underlying operation error, propagated unchanged.
    #[error("pagination fetch failed: {0}")]
    Client(#[from] ClientError),

    /// The configured record ceiling was exceeded.
    #[error("pagination limit exceeded: {0}")]
    LimitExceeded(String),
}

/// Fetch the complete result set of a page-shaped operation.
///
/// Loops until the API reports no further pages: execute with the current
/// cursor, append records in API order, advance the cursor, and sleep for
/// the configured delay before the next request. Executor errors propagate
/// unchanged; there is no internal retry.
pub async fn paginate<O: Operation>(
    transport: &dyn Transport,
    mut variables: O::Variables,
    config: &PaginateConfig,
) -> Result<Vec<O::Record>, PaginationError> {
    let mut out = Vec::new();
    loop {
        let page = execute::<O>(transport, &variables).await?;

        let remaining = config
            .limit
            .map(|limit| limit.max_records.saturating_sub(out.len()));
        if let Some(remaining) = remaining {
            if remaining == 0 {
                return Err(PaginationError::LimitExceeded(format!(
                    "{} records fetched with pages remaining",
                    out.len()
                )));
            }
            out.extend(page.records.into_iter().take(remaining));
        } else {
            out.extend(page.records);
        }

        if !page.has_next_page {
            break;
        }
        let Some(cursor) = page.end_cursor else {
            break;
        };
        variables.set_cursor(Some(cursor));

        if let Some(delay) = config.page_delay {
            debug!(operation = O::NAME, ?delay, "pausing between pages");
            tokio::time::sleep(delay).await;
        }
    }
    Ok(out)
}
