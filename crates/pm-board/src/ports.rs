//! The collaborator set shared by every board service.

use std::sync::Arc;

use pm_core::ports::{IdentityDirectory, IssueStore, MemberSource, RateLimiter, SprintSource};

/// Injected collaborators. Cloning shares the underlying adapters.
#[derive(Clone)]
pub struct Ports {
    pub issues: Arc<dyn IssueStore>,
    pub sprints: Arc<dyn SprintSource>,
    pub directory: Arc<dyn IdentityDirectory>,
    pub members: Arc<dyn MemberSource>,
    pub limiter: Arc<dyn RateLimiter>,
}
