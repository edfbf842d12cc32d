//! In-process adapters for the capability traits.
//!
//! [`SlidingWindowLimiter`] backs the `memory` rate limit setting. The other
//! adapters hold their rows in memory and serve tests and local demos.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tokio::time::Instant;

use pm_core::entities::{Issue, NewIssue, Sprint, UserProjection};
use pm_core::enums::IssueStatus;
use pm_core::ids::{PREFIX_ISSUE, issue_key};
use pm_core::ports::{
    IdentityDirectory, IssueFilter, IssueStore, MemberSource, PortError, RateDecision,
    RateLimiter, SprintFilter, SprintSource,
};
use pm_core::updates::IssueUpdate;

/// Issue rows kept in insertion order.
#[derive(Default)]
pub struct InMemoryIssueStore {
    rows: Mutex<Vec<Issue>>,
    next_number: AtomicU64,
}

impl InMemoryIssueStore {
    #[must_use]
    pub fn new(rows: Vec<Issue>) -> Self {
        let next_number = rows.len() as u64;
        Self {
            rows: Mutex::new(rows),
            next_number: AtomicU64::new(next_number),
        }
    }

    /// Copy of every stored row, deleted ones included.
    pub async fn snapshot(&self) -> Vec<Issue> {
        self.rows.lock().await.clone()
    }
}

#[async_trait]
impl IssueStore for InMemoryIssueStore {
    async fn find_many(&self, filter: &IssueFilter) -> Result<Vec<Issue>, PortError> {
        let rows = self.rows.lock().await;
        let mut matched: Vec<Issue> = rows.iter().filter(|i| filter.matches(i)).cloned().collect();
        matched.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.id.cmp(&b.id)));
        Ok(matched)
    }

    async fn update(&self, id: &str, update: &IssueUpdate) -> Result<Issue, PortError> {
        let mut rows = self.rows.lock().await;
        let issue = rows
            .iter_mut()
            .find(|issue| issue.id == id)
            .ok_or_else(|| PortError::NotFound(format!("issue {id}")))?;
        if !update.is_empty() {
            update.apply_to(issue);
            issue.updated_at = Utc::now();
        }
        Ok(issue.clone())
    }

    async fn insert(&self, new: &NewIssue) -> Result<Issue, PortError> {
        let number = self.next_number.fetch_add(1, Ordering::Relaxed) + 1;
        let now = Utc::now();
        let issue = Issue {
            id: format!("{PREFIX_ISSUE}-{number:08x}"),
            key: issue_key(number),
            name: new.name.clone(),
            description: None,
            issue_type: new.issue_type,
            status: IssueStatus::Open,
            position: new.position.clone(),
            creator_id: new.creator_id.clone(),
            assignee_id: None,
            reporter_id: new.reporter_id.clone(),
            parent_id: new.parent_id.clone(),
            sprint_id: new.sprint_id.clone(),
            project_id: new.project_id.clone(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().await.push(issue.clone());
        Ok(issue)
    }
}

#[derive(Default)]
pub struct InMemorySprintSource {
    sprints: Vec<Sprint>,
}

impl InMemorySprintSource {
    #[must_use]
    pub const fn new(sprints: Vec<Sprint>) -> Self {
        Self { sprints }
    }
}

#[async_trait]
impl SprintSource for InMemorySprintSource {
    async fn find_many(&self, filter: &SprintFilter) -> Result<Vec<Sprint>, PortError> {
        Ok(self
            .sprints
            .iter()
            .filter(|sprint| filter.matches(sprint))
            .cloned()
            .collect())
    }
}

/// A fixed user directory.
#[derive(Default)]
pub struct StaticDirectory {
    users: Vec<UserProjection>,
}

impl StaticDirectory {
    #[must_use]
    pub const fn new(users: Vec<UserProjection>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl IdentityDirectory for StaticDirectory {
    async fn get_by_ids(&self, ids: &[String]) -> Result<Vec<UserProjection>, PortError> {
        Ok(self
            .users
            .iter()
            .filter(|user| ids.contains(&user.id))
            .cloned()
            .collect())
    }

    async fn list(&self, limit: u32) -> Result<Vec<UserProjection>, PortError> {
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(self.users.iter().take(limit).cloned().collect())
    }
}

/// Project membership keyed by project id.
#[derive(Default)]
pub struct StaticMembers {
    members: HashMap<String, Vec<String>>,
}

impl StaticMembers {
    #[must_use]
    pub const fn new(members: HashMap<String, Vec<String>>) -> Self {
        Self { members }
    }
}

#[async_trait]
impl MemberSource for StaticMembers {
    async fn member_ids(&self, project_id: &str) -> Result<Vec<String>, PortError> {
        Ok(self.members.get(project_id).cloned().unwrap_or_default())
    }
}

/// Process-local sliding window limiter. Each server instance counts
/// separately.
pub struct SlidingWindowLimiter {
    max_requests: u32,
    window: Duration,
    hits: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl SlidingWindowLimiter {
    #[must_use]
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            hits: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl RateLimiter for SlidingWindowLimiter {
    async fn check(&self, key: &str) -> Result<RateDecision, PortError> {
        let now = Instant::now();
        let mut guard = self.hits.lock().await;
        let hits = guard.entry(key.to_string()).or_default();
        while hits
            .front()
            .is_some_and(|hit| now.duration_since(*hit) >= self.window)
        {
            hits.pop_front();
        }

        let used = u32::try_from(hits.len()).unwrap_or(u32::MAX);
        if used >= self.max_requests {
            let retry_after = hits
                .front()
                .map_or(self.window, |oldest| self.window.saturating_sub(now.duration_since(*oldest)));
            return Ok(RateDecision {
                allowed: false,
                remaining: 0,
                retry_after_secs: ceil_secs(retry_after).max(1),
            });
        }

        hits.push_back(now);
        Ok(RateDecision {
            allowed: true,
            remaining: self.max_requests - used - 1,
            retry_after_secs: 0,
        })
    }
}

fn ceil_secs(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}

#[cfg(test)]
mod tests {
    use pm_core::enums::IssueType;
    use pm_core::position::Position;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn limiter_slides() {
        let limiter = SlidingWindowLimiter::new(2, Duration::from_secs(10));
        assert_eq!(limiter.check("u").await.unwrap().remaining, 1);
        assert_eq!(limiter.check("u").await.unwrap().remaining, 0);

        let denied = limiter.check("u").await.unwrap();
        assert!(!denied.allowed);
        assert_eq!(denied.retry_after_secs, 10);

        tokio::time::advance(Duration::from_secs(4)).await;
        assert_eq!(limiter.check("u").await.unwrap().retry_after_secs, 6);
        assert!(limiter.check("other").await.unwrap().allowed);

        tokio::time::advance(Duration::from_secs(6)).await;
        assert!(limiter.check("u").await.unwrap().allowed);
    }

    #[tokio::test]
    async fn store_insert_numbers_sequentially() {
        let store = InMemoryIssueStore::default();
        let new = NewIssue {
            name: "A".into(),
            issue_type: IssueType::Bug,
            creator_id: "user_1".into(),
            reporter_id: None,
            parent_id: None,
            sprint_id: None,
            project_id: None,
            position: Position::origin(),
        };
        let first = store.insert(&new).await.unwrap();
        let second = store.insert(&new).await.unwrap();
        assert_eq!(first.key, "ISSUE-1");
        assert_eq!(second.key, "ISSUE-2");
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn store_update_unknown_is_not_found() {
        let store = InMemoryIssueStore::default();
        let err = store.update("nope", &IssueUpdate::default()).await.unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));
    }
}
