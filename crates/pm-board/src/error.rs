//! Errors surfaced by the board services.

use pm_core::errors::CoreError;
use pm_core::ports::PortError;
use pm_core::position::PositionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoardError {
    /// The request body failed validation. Nothing was written.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// No signed-in caller.
    #[error("unauthenticated request")]
    Unauthenticated,

    /// The caller exceeded the write rate. Nothing was written.
    #[error("too many requests; retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// The requested assignee is unknown to the directory. Nothing was written.
    #[error("assignee not found: {0}")]
    AssigneeNotFound(String),

    /// No position could be allocated even after rebalancing.
    #[error("cannot place issue: {0}")]
    Position(#[from] PositionError),

    #[error("issue store: {0}")]
    Store(#[source] PortError),

    #[error("sprint source: {0}")]
    Sprints(#[source] PortError),

    #[error("identity directory: {0}")]
    Directory(#[source] PortError),

    #[error("member source: {0}")]
    Members(#[source] PortError),

    #[error("rate limiter: {0}")]
    Limiter(#[source] PortError),
}

impl From<CoreError> for BoardError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Position(e) => Self::Position(e),
            other => Self::InvalidBody(other.to_string()),
        }
    }
}
