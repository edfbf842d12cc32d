//! Fixtures and fakes shared by the board integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use pm_board::Ports;
use pm_board::memory::{
    InMemoryIssueStore, InMemorySprintSource, SlidingWindowLimiter, StaticDirectory,
    StaticMembers,
};
use pm_core::entities::{Issue, NewIssue, Sprint, UserProjection};
use pm_core::enums::{IssueStatus, IssueType, SprintStatus};
use pm_core::identity::AuthIdentity;
use pm_core::ports::{
    IdentityDirectory, IssueFilter, IssueStore, PortError, RateDecision, RateLimiter,
};
use pm_core::position::Position;
use pm_core::updates::IssueUpdate;

pub fn caller(user_id: &str) -> AuthIdentity {
    AuthIdentity {
        user_id: user_id.into(),
        session_id: Some("sess_test".into()),
    }
}

pub fn issue(id: &str, creator: &str) -> Issue {
    let now = Utc::now();
    Issue {
        id: id.into(),
        key: format!("ISSUE-{id}"),
        name: format!("Issue {id}"),
        description: None,
        issue_type: IssueType::Task,
        status: IssueStatus::Open,
        position: Position::origin(),
        creator_id: creator.into(),
        assignee_id: None,
        reporter_id: None,
        parent_id: None,
        sprint_id: None,
        project_id: None,
        is_deleted: false,
        created_at: now,
        updated_at: now,
    }
}

pub fn sprint(id: &str, status: SprintStatus) -> Sprint {
    Sprint {
        id: id.into(),
        name: format!("Sprint {id}"),
        status,
        project_id: None,
        created_at: Utc::now(),
    }
}

pub fn user(id: &str) -> UserProjection {
    UserProjection {
        id: id.into(),
        name: format!("User {id}"),
        email: Some(format!("{id}@example.com")),
        avatar: None,
    }
}

/// Directory that counts calls and can be switched to fail.
pub struct CountingDirectory {
    inner: StaticDirectory,
    pub calls: AtomicUsize,
    fail: bool,
}

impl CountingDirectory {
    pub fn new(users: Vec<UserProjection>) -> Self {
        Self {
            inner: StaticDirectory::new(users),
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityDirectory for CountingDirectory {
    async fn get_by_ids(&self, ids: &[String]) -> Result<Vec<UserProjection>, PortError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(PortError::backend("identity directory", "connection refused"));
        }
        self.inner.get_by_ids(ids).await
    }

    async fn list(&self, limit: u32) -> Result<Vec<UserProjection>, PortError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(PortError::backend("identity directory", "connection refused"));
        }
        self.inner.list(limit).await
    }
}

/// Issue store whose updates fail for chosen ids and which counts writes.
pub struct FlakyStore {
    pub inner: InMemoryIssueStore,
    fail_ids: Vec<String>,
    pub writes: AtomicUsize,
}

impl FlakyStore {
    pub fn new(rows: Vec<Issue>, fail_ids: &[&str]) -> Self {
        Self {
            inner: InMemoryIssueStore::new(rows),
            fail_ids: fail_ids.iter().map(|s| (*s).to_string()).collect(),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IssueStore for FlakyStore {
    async fn find_many(&self, filter: &IssueFilter) -> Result<Vec<Issue>, PortError> {
        self.inner.find_many(filter).await
    }

    async fn update(&self, id: &str, update: &IssueUpdate) -> Result<Issue, PortError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_ids.iter().any(|f| f == id) {
            return Err(PortError::backend("database", "disk I/O error"));
        }
        self.inner.update(id, update).await
    }

    async fn insert(&self, issue: &NewIssue) -> Result<Issue, PortError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(issue).await
    }
}

/// Limiter that always refuses.
pub struct DenyAll;

#[async_trait]
impl RateLimiter for DenyAll {
    async fn check(&self, _key: &str) -> Result<RateDecision, PortError> {
        Ok(RateDecision {
            allowed: false,
            remaining: 0,
            retry_after_secs: 7,
        })
    }
}

pub struct Fixture {
    pub store: Arc<FlakyStore>,
    pub directory: Arc<CountingDirectory>,
    pub ports: Ports,
}

pub struct FixtureBuilder {
    issues: Vec<Issue>,
    sprints: Vec<Sprint>,
    directory: CountingDirectory,
    members: HashMap<String, Vec<String>>,
    limiter: Arc<dyn RateLimiter>,
    fail_ids: Vec<&'static str>,
}

impl Default for FixtureBuilder {
    fn default() -> Self {
        Self {
            issues: Vec::new(),
            sprints: Vec::new(),
            directory: CountingDirectory::new(Vec::new()),
            members: HashMap::new(),
            limiter: Arc::new(SlidingWindowLimiter::new(100, Duration::from_secs(10))),
            fail_ids: Vec::new(),
        }
    }
}

impl FixtureBuilder {
    pub fn issues(mut self, issues: Vec<Issue>) -> Self {
        self.issues = issues;
        self
    }

    pub fn sprints(mut self, sprints: Vec<Sprint>) -> Self {
        self.sprints = sprints;
        self
    }

    pub fn users(mut self, users: Vec<UserProjection>) -> Self {
        self.directory = CountingDirectory::new(users);
        self
    }

    pub fn directory(mut self, directory: CountingDirectory) -> Self {
        self.directory = directory;
        self
    }

    pub fn members(mut self, project_id: &str, user_ids: &[&str]) -> Self {
        self.members.insert(
            project_id.to_string(),
            user_ids.iter().map(|s| (*s).to_string()).collect(),
        );
        self
    }

    pub fn limiter(mut self, limiter: Arc<dyn RateLimiter>) -> Self {
        self.limiter = limiter;
        self
    }

    pub fn failing_updates(mut self, ids: &[&'static str]) -> Self {
        self.fail_ids = ids.to_vec();
        self
    }

    pub fn build(self) -> Fixture {
        let store = Arc::new(FlakyStore::new(self.issues, &self.fail_ids));
        let directory = Arc::new(self.directory);
        let ports = Ports {
            issues: store.clone(),
            sprints: Arc::new(InMemorySprintSource::new(self.sprints)),
            directory: directory.clone(),
            members: Arc::new(StaticMembers::new(self.members)),
            limiter: self.limiter,
        };
        Fixture {
            store,
            directory,
            ports,
        }
    }
}
