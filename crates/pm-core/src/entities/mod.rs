//! Entity structs for the project manager domain.
//!
//! Issues and sprints map to tables in the relational store; user projections
//! come from the external identity directory and are never persisted. All
//! structs derive `Serialize`, `Deserialize`, and `JsonSchema` and use
//! camelCase field names on the wire.

mod issue;
mod sprint;
mod user;

pub use issue::{Issue, NewIssue};
pub use sprint::Sprint;
pub use user::UserProjection;
