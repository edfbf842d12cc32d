//! Cross-cutting error types.
//!
//! Errors from the capability traits live in [`crate::ports::PortError`];
//! orchestration and transport errors are defined in their own crates.

use thiserror::Error;

/// Errors raised by pure domain logic.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// Data failed validation (schema, format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Position arithmetic failed.
    #[error(transparent)]
    Position(#[from] crate::position::PositionError),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
