use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{IssueStatus, IssueType};
use crate::position::Position;

/// A unit of work owned by a creator, optionally placed in a sprint and
/// nested under a parent issue.
///
/// Issues are never physically removed; deletion sets `is_deleted`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    /// Human-facing key, e.g. `ISSUE-42`.
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub status: IssueStatus,
    /// Ordering key within the issue's sprint (or the backlog).
    pub position: Position,
    pub creator_id: String,
    pub assignee_id: Option<String>,
    pub reporter_id: Option<String>,
    pub parent_id: Option<String>,
    pub sprint_id: Option<String>,
    pub project_id: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when inserting an issue. The store assigns `id`, `key`,
/// status and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    pub name: String,
    pub issue_type: IssueType,
    pub creator_id: String,
    pub reporter_id: Option<String>,
    pub parent_id: Option<String>,
    pub sprint_id: Option<String>,
    pub project_id: Option<String>,
    pub position: Position,
}
