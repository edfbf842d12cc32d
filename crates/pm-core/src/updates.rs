//! Partial issue update and its builder.
//!
//! Only `Some` fields are applied; `None` leaves the stored value unchanged.
//! Nullable columns use `Option<Option<T>>` so that `Some(None)` clears the
//! column. Stores turn `Some` fields into `SET` clauses; in-memory stores call
//! [`IssueUpdate::apply_to`].

use crate::entities::Issue;
use crate::enums::{IssueStatus, IssueType};
use crate::position::Position;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueUpdate {
    pub issue_type: Option<IssueType>,
    pub status: Option<IssueStatus>,
    pub assignee_id: Option<Option<String>>,
    pub reporter_id: Option<String>,
    pub parent_id: Option<Option<String>>,
    pub sprint_id: Option<Option<String>>,
    pub is_deleted: Option<bool>,
    pub position: Option<Position>,
}

impl IssueUpdate {
    /// True when no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.issue_type.is_none()
            && self.status.is_none()
            && self.assignee_id.is_none()
            && self.reporter_id.is_none()
            && self.parent_id.is_none()
            && self.sprint_id.is_none()
            && self.is_deleted.is_none()
            && self.position.is_none()
    }

    /// Merge the supplied fields into `issue`. Does not touch `updated_at`.
    pub fn apply_to(&self, issue: &mut Issue) {
        if let Some(issue_type) = self.issue_type {
            issue.issue_type = issue_type;
        }
        if let Some(status) = self.status {
            issue.status = status;
        }
        if let Some(assignee_id) = &self.assignee_id {
            issue.assignee_id.clone_from(assignee_id);
        }
        if let Some(reporter_id) = &self.reporter_id {
            issue.reporter_id = Some(reporter_id.clone());
        }
        if let Some(parent_id) = &self.parent_id {
            issue.parent_id.clone_from(parent_id);
        }
        if let Some(sprint_id) = &self.sprint_id {
            issue.sprint_id.clone_from(sprint_id);
        }
        if let Some(is_deleted) = self.is_deleted {
            issue.is_deleted = is_deleted;
        }
        if let Some(position) = &self.position {
            issue.position = position.clone();
        }
    }
}

pub struct IssueUpdateBuilder(IssueUpdate);

impl Default for IssueUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IssueUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(IssueUpdate::default())
    }

    #[must_use]
    pub fn issue_type(mut self, issue_type: IssueType) -> Self {
        self.0.issue_type = Some(issue_type);
        self
    }

    #[must_use]
    pub fn status(mut self, status: IssueStatus) -> Self {
        self.0.status = Some(status);
        self
    }

    #[must_use]
    pub fn assignee_id(mut self, assignee_id: Option<String>) -> Self {
        self.0.assignee_id = Some(assignee_id);
        self
    }

    #[must_use]
    pub fn reporter_id(mut self, reporter_id: impl Into<String>) -> Self {
        self.0.reporter_id = Some(reporter_id.into());
        self
    }

    #[must_use]
    pub fn parent_id(mut self, parent_id: Option<String>) -> Self {
        self.0.parent_id = Some(parent_id);
        self
    }

    #[must_use]
    pub fn sprint_id(mut self, sprint_id: Option<String>) -> Self {
        self.0.sprint_id = Some(sprint_id);
        self
    }

    #[must_use]
    pub fn is_deleted(mut self, is_deleted: bool) -> Self {
        self.0.is_deleted = Some(is_deleted);
        self
    }

    #[must_use]
    pub fn position(mut self, position: Position) -> Self {
        self.0.position = Some(position);
        self
    }

    #[must_use]
    pub fn build(self) -> IssueUpdate {
        self.0
    }
}
