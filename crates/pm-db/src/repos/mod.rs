//! Repository implementations, one module per table group.
//!
//! Each module adds inherent methods to [`PmDb`](crate::PmDb) returning
//! `DatabaseError`, plus the matching `pm_core::ports` trait impl.

pub mod issue;
pub mod project;
pub mod rate_limit;
pub mod sprint;
