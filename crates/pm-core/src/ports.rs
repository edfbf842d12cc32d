//! Capability traits for the collaborators the issue service depends on.
//!
//! The tree builder and the patch processor only see these traits. Network
//! and database adapters (`pm-db`, `pm-auth`) implement them at the boundary;
//! tests substitute in-memory versions.

use async_trait::async_trait;
use thiserror::Error;

use crate::entities::{Issue, NewIssue, Sprint, UserProjection};
use crate::enums::SprintStatus;
use crate::updates::IssueUpdate;

/// Errors surfaced by a collaborator.
#[derive(Debug, Error)]
pub enum PortError {
    /// The targeted row does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The backing service failed or was unreachable.
    #[error("{service} failed: {message}")]
    Backend {
        service: &'static str,
        message: String,
    },

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PortError {
    pub fn backend(service: &'static str, message: impl Into<String>) -> Self {
        Self::Backend {
            service,
            message: message.into(),
        }
    }
}

/// Row filter for [`IssueStore::find_many`]. `None` fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueFilter {
    /// Restrict to these ids.
    pub ids: Option<Vec<String>>,
    pub creator_id: Option<String>,
    pub project_id: Option<String>,
    /// `Some(None)` selects the backlog (issues without a sprint).
    pub sprint_id: Option<Option<String>>,
    pub is_deleted: Option<bool>,
}

impl IssueFilter {
    #[must_use]
    pub fn by_ids(ids: &[String]) -> Self {
        Self {
            ids: Some(ids.to_vec()),
            ..Self::default()
        }
    }

    /// Live issues created by `creator_id`.
    #[must_use]
    pub fn live_for_creator(creator_id: &str) -> Self {
        Self {
            creator_id: Some(creator_id.to_string()),
            is_deleted: Some(false),
            ..Self::default()
        }
    }

    /// Live issues in a sprint, or in the backlog when `sprint_id` is `None`.
    #[must_use]
    pub fn live_in_sprint(sprint_id: Option<&str>) -> Self {
        Self {
            sprint_id: Some(sprint_id.map(String::from)),
            is_deleted: Some(false),
            ..Self::default()
        }
    }

    /// Whether `issue` satisfies every set field.
    #[must_use]
    pub fn matches(&self, issue: &Issue) -> bool {
        self.ids
            .as_ref()
            .is_none_or(|ids| ids.iter().any(|id| *id == issue.id))
            && self
                .creator_id
                .as_ref()
                .is_none_or(|c| *c == issue.creator_id)
            && self
                .project_id
                .as_ref()
                .is_none_or(|p| issue.project_id.as_ref() == Some(p))
            && self
                .sprint_id
                .as_ref()
                .is_none_or(|s| *s == issue.sprint_id)
            && self.is_deleted.is_none_or(|d| d == issue.is_deleted)
    }
}

/// Row filter for [`SprintSource::find_many`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SprintFilter {
    pub status: Option<SprintStatus>,
    pub project_id: Option<String>,
}

impl SprintFilter {
    #[must_use]
    pub fn active() -> Self {
        Self {
            status: Some(SprintStatus::Active),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn matches(&self, sprint: &Sprint) -> bool {
        self.status.is_none_or(|s| s == sprint.status)
            && self
                .project_id
                .as_ref()
                .is_none_or(|p| sprint.project_id.as_ref() == Some(p))
    }
}

/// Relational store of issue rows.
#[async_trait]
pub trait IssueStore: Send + Sync {
    /// All issues matching `filter`, ordered by position.
    async fn find_many(&self, filter: &IssueFilter) -> Result<Vec<Issue>, PortError>;

    /// Apply `update` to one issue and return the stored result.
    async fn update(&self, id: &str, update: &IssueUpdate) -> Result<Issue, PortError>;

    /// Insert a new issue, assigning its id, key, status and timestamps.
    async fn insert(&self, issue: &NewIssue) -> Result<Issue, PortError>;
}

/// Source of sprint rows.
#[async_trait]
pub trait SprintSource: Send + Sync {
    async fn find_many(&self, filter: &SprintFilter) -> Result<Vec<Sprint>, PortError>;
}

/// External system of record for users.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    /// Projections for the given ids. Unknown ids are omitted.
    async fn get_by_ids(&self, ids: &[String]) -> Result<Vec<UserProjection>, PortError>;

    /// Up to `limit` users from the global listing.
    async fn list(&self, limit: u32) -> Result<Vec<UserProjection>, PortError>;
}

/// Project membership lookup.
#[async_trait]
pub trait MemberSource: Send + Sync {
    async fn member_ids(&self, project_id: &str) -> Result<Vec<String>, PortError>;
}

/// Outcome of a rate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    /// Requests left in the current window after this one.
    pub remaining: u32,
    /// Seconds until the oldest counted request leaves the window.
    pub retry_after_secs: u64,
}

/// Sliding-window limiter keyed by caller identity.
///
/// Implementations backed by a shared store give a consistent view across
/// server instances.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Count one request for `key` and report whether it is allowed.
    async fn check(&self, key: &str) -> Result<RateDecision, PortError>;
}
