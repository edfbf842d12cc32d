//! Set of currently active sprint ids.

use std::collections::HashSet;

use crate::entities::Sprint;
use crate::enums::SprintStatus;

/// Ids of the sprints whose status is `ACTIVE` at read time.
///
/// Activity is never stored on the issue; it is derived from this index when
/// the issue tree is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SprintActivityIndex {
    active: HashSet<String>,
}

impl SprintActivityIndex {
    /// Build the index from the current sprint collection.
    #[must_use]
    pub fn from_sprints(sprints: &[Sprint]) -> Self {
        sprints
            .iter()
            .filter(|sprint| sprint.status == SprintStatus::Active)
            .map(|sprint| sprint.id.clone())
            .collect()
    }

    /// Whether an issue in `sprint_id` belongs to an active sprint.
    /// `None` (backlog) is never active.
    #[must_use]
    pub fn is_active(&self, sprint_id: Option<&str>) -> bool {
        sprint_id.is_some_and(|id| self.active.contains(id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

impl FromIterator<String> for SprintActivityIndex {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            active: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn sprint(id: &str, status: SprintStatus) -> Sprint {
        Sprint {
            id: id.into(),
            name: format!("Sprint {id}"),
            status,
            project_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn only_active_sprints_are_indexed() {
        let index = SprintActivityIndex::from_sprints(&[
            sprint("spr-1", SprintStatus::Active),
            sprint("spr-2", SprintStatus::Pending),
            sprint("spr-3", SprintStatus::Closed),
            sprint("spr-4", SprintStatus::Active),
        ]);
        assert_eq!(index.len(), 2);
        assert!(index.is_active(Some("spr-1")));
        assert!(index.is_active(Some("spr-4")));
        assert!(!index.is_active(Some("spr-2")));
        assert!(!index.is_active(Some("spr-3")));
    }

    #[test]
    fn empty_store_yields_empty_index() {
        let index = SprintActivityIndex::from_sprints(&[]);
        assert!(index.is_empty());
        assert!(!index.is_active(Some("spr-1")));
    }

    #[test]
    fn backlog_is_never_active() {
        let index: SprintActivityIndex = ["spr-1".to_string()].into_iter().collect();
        assert!(!index.is_active(None));
    }
}
