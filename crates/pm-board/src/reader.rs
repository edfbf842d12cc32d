//! Read path: a creator's live issues assembled into the nested view.

use std::collections::HashSet;

use pm_core::entities::{Issue, UserProjection};
use pm_core::ports::{IssueFilter, SprintFilter};
use pm_core::responses::GetIssuesResponse;
use pm_core::sprint_index::SprintActivityIndex;
use pm_core::tree::build_issue_tree;
use tracing::{debug, warn};

use crate::error::BoardError;
use crate::ports::Ports;

pub struct IssueReader {
    ports: Ports,
}

impl IssueReader {
    #[must_use]
    pub const fn new(ports: Ports) -> Self {
        Self { ports }
    }

    /// Live issues created by `creator_id`, as issue views.
    ///
    /// Issues and active sprints are read concurrently; users are looked up
    /// once the issues are known. A directory failure degrades to unresolved
    /// users rather than failing the read.
    ///
    /// # Errors
    ///
    /// `Store` or `Sprints` when either read fails.
    pub async fn list_for_creator(&self, creator_id: &str) -> Result<GetIssuesResponse, BoardError> {
        let issue_filter = IssueFilter::live_for_creator(creator_id);
        let sprint_filter = SprintFilter::active();
        let (issues, sprints) = tokio::join!(
            self.ports.issues.find_many(&issue_filter),
            self.ports.sprints.find_many(&sprint_filter),
        );
        let issues = issues.map_err(BoardError::Store)?;
        if issues.is_empty() {
            return Ok(GetIssuesResponse::default());
        }
        let active = SprintActivityIndex::from_sprints(&sprints.map_err(BoardError::Sprints)?);

        let users = self.resolve_users(&issues).await;
        debug!(
            creator_id,
            issues = issues.len(),
            active_sprints = active.len(),
            users = users.len(),
            "assembling issue tree"
        );

        Ok(GetIssuesResponse {
            issues: build_issue_tree(&issues, &active, &users),
        })
    }

    async fn resolve_users(&self, issues: &[Issue]) -> Vec<UserProjection> {
        let ids = referenced_user_ids(issues);
        if ids.is_empty() {
            return Vec::new();
        }
        match self.ports.directory.get_by_ids(&ids).await {
            Ok(users) => users,
            Err(e) => {
                warn!(error = %e, "directory lookup failed; users left unresolved");
                Vec::new()
            }
        }
    }
}

/// Distinct assignee and reporter ids, in first-seen order.
fn referenced_user_ids(issues: &[Issue]) -> Vec<String> {
    let mut seen = HashSet::new();
    issues
        .iter()
        .flat_map(|issue| [issue.assignee_id.as_deref(), issue.reporter_id.as_deref()])
        .flatten()
        .filter(|id| seen.insert(*id))
        .map(String::from)
        .collect()
}
