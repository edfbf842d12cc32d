//! Response bodies returned by the HTTP surface.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Issue, UserProjection};
use crate::tree::IssueView;

/// Response from `GET /issues`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GetIssuesResponse {
    pub issues: Vec<IssueView>,
}

/// An issue whose update failed after the batch passed validation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PatchFailure {
    pub id: String,
    pub reason: String,
}

/// Response from `PATCH /issues`.
///
/// `issues` follows the order in which the store returned the matched set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PatchIssuesResponse {
    pub issues: Vec<Issue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<PatchFailure>,
}

/// Response from `POST /issues`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CreateIssueResponse {
    pub issue: Issue,
}

/// Response from `GET /projects/{project_id}/members`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ProjectMembersResponse {
    pub members: Vec<UserProjection>,
}
