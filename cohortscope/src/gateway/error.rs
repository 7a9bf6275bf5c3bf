//! Error types for the remote data gateway.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while fetching cohort data.
///
/// Every variant is a FetchFailure from the orchestrator's point of view:
/// any one of them fails the whole fetch cycle.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GatewayError {
    /// HTTP request failed or returned a non-success status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response body was not the expected JSON shape.
    #[error("Failed to parse response: {0}")]
    Json(String),

    /// The configured base URL cannot be used to build endpoint URLs.
    #[error("Invalid gateway URL: {0}")]
    InvalidUrl(String),

    /// The request (or the whole fetch cycle) exceeded its time budget.
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}
