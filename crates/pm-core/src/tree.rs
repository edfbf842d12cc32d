//! Issue tree assembly.
//!
//! Turns a flat list of issues, the active-sprint index, and the user
//! projections fetched for those issues into the nested [`IssueView`] shape
//! returned to clients.
//!
//! Embedding is bounded rather than graph-walked:
//!
//! ```text
//! root view      children: leaf views    parent: parent view
//! parent view    children: leaf views    parent: null
//! leaf view      children: []            parent: null
//! ```
//!
//! No view is built more than two levels below a root, so a corrupted forest
//! (a cycle, or an issue that is its own parent) still terminates.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Issue, UserProjection};
use crate::sprint_index::SprintActivityIndex;

/// An issue enriched for client consumption. Top-level issue fields are
/// copied verbatim from the source row.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IssueView {
    #[serde(flatten)]
    pub issue: Issue,
    pub sprint_is_active: bool,
    pub assignee: Option<UserProjection>,
    pub reporter: Option<UserProjection>,
    /// Non-deleted issues whose `parent_id` is this issue, in input order.
    pub children: Vec<IssueView>,
    /// One level up, absent when the parent is missing or deleted. Its own
    /// `parent` is always `None`.
    pub parent: Option<Box<IssueView>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Root,
    Parent,
    Leaf,
}

/// Build one view per input issue, preserving input order.
#[must_use]
pub fn build_issue_tree(
    issues: &[Issue],
    active_sprints: &SprintActivityIndex,
    users: &[UserProjection],
) -> Vec<IssueView> {
    if issues.is_empty() {
        return Vec::new();
    }
    let tree = IssueTree::new(issues, active_sprints, users);
    issues
        .iter()
        .map(|issue| tree.view(issue, Level::Root))
        .collect()
}

struct IssueTree<'a> {
    by_id: HashMap<&'a str, &'a Issue>,
    children: HashMap<&'a str, Vec<&'a Issue>>,
    users: HashMap<&'a str, &'a UserProjection>,
    active_sprints: &'a SprintActivityIndex,
}

impl<'a> IssueTree<'a> {
    fn new(
        issues: &'a [Issue],
        active_sprints: &'a SprintActivityIndex,
        users: &'a [UserProjection],
    ) -> Self {
        let mut by_id = HashMap::with_capacity(issues.len());
        let mut children: HashMap<&str, Vec<&Issue>> = HashMap::new();
        for issue in issues {
            by_id.entry(issue.id.as_str()).or_insert(issue);
            if issue.is_deleted {
                continue;
            }
            if let Some(parent_id) = issue.parent_id.as_deref() {
                children.entry(parent_id).or_default().push(issue);
            }
        }

        let mut user_map = HashMap::with_capacity(users.len());
        for user in users {
            user_map.entry(user.id.as_str()).or_insert(user);
        }

        Self {
            by_id,
            children,
            users: user_map,
            active_sprints,
        }
    }

    fn view(&self, issue: &Issue, level: Level) -> IssueView {
        let children = if level == Level::Leaf {
            Vec::new()
        } else {
            self.children
                .get(issue.id.as_str())
                .map(|kids| kids.iter().map(|kid| self.view(kid, Level::Leaf)).collect())
                .unwrap_or_default()
        };

        let parent = if level == Level::Root {
            issue
                .parent_id
                .as_deref()
                .and_then(|id| self.by_id.get(id))
                .filter(|parent| !parent.is_deleted)
                .map(|parent| Box::new(self.view(parent, Level::Parent)))
        } else {
            None
        };

        IssueView {
            issue: issue.clone(),
            sprint_is_active: self.active_sprints.is_active(issue.sprint_id.as_deref()),
            assignee: self.user(issue.assignee_id.as_deref()),
            reporter: self.user(issue.reporter_id.as_deref()),
            children,
            parent,
        }
    }

    fn user(&self, id: Option<&str>) -> Option<UserProjection> {
        id.and_then(|id| self.users.get(id)).map(|u| (*u).clone())
    }
}
