//! Batch patching: one partial change applied to a set of issues.
//!
//! Preconditions run in a fixed order and each stops the request before any
//! write: caller, rate check, body, assignee. After that every matched issue
//! is updated independently; a failed update is reported against its id and
//! does not undo the others.

use futures::future::join_all;
use pm_core::identity::AuthIdentity;
use pm_core::ports::IssueFilter;
use pm_core::requests::PatchIssuesBody;
use pm_core::responses::{PatchFailure, PatchIssuesResponse};
use tracing::{debug, warn};

use crate::error::BoardError;
use crate::gate::admit;
use crate::ports::Ports;

pub struct BatchPatchProcessor {
    ports: Ports,
}

impl BatchPatchProcessor {
    #[must_use]
    pub const fn new(ports: Ports) -> Self {
        Self { ports }
    }

    /// Validate and apply a raw `PATCH /issues` body on behalf of `caller`.
    ///
    /// Unknown ids are dropped. The response lists updated issues in the
    /// order the store returned the matched set.
    ///
    /// # Errors
    ///
    /// `Unauthenticated`, `RateLimited`, `InvalidBody`, `AssigneeNotFound`,
    /// or a collaborator failure before the fan-out starts.
    pub async fn patch(
        &self,
        caller: Option<&AuthIdentity>,
        body: &[u8],
    ) -> Result<PatchIssuesResponse, BoardError> {
        let caller = admit(self.ports.limiter.as_ref(), caller).await?;
        let body = PatchIssuesBody::parse(body)?;

        if let Some(assignee_id) = body.assignee_to_resolve() {
            self.ensure_assignee_exists(assignee_id).await?;
        }

        let matched = self
            .ports
            .issues
            .find_many(&IssueFilter::by_ids(&body.ids))
            .await
            .map_err(BoardError::Store)?;
        debug!(
            user_id = %caller.user_id,
            requested = body.ids.len(),
            matched = matched.len(),
            "applying batch patch"
        );

        let update = body.to_update();
        if update.is_empty() {
            return Ok(PatchIssuesResponse {
                issues: matched,
                failed: Vec::new(),
            });
        }

        let store = &self.ports.issues;
        let update = &update;
        let outcomes = join_all(matched.iter().map(|issue| async move {
            (issue.id.as_str(), store.update(&issue.id, update).await)
        }))
        .await;

        let mut response = PatchIssuesResponse::default();
        for (id, outcome) in outcomes {
            match outcome {
                Ok(updated) => response.issues.push(updated),
                Err(e) => {
                    warn!(issue_id = id, error = %e, "issue update failed");
                    response.failed.push(PatchFailure {
                        id: id.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        Ok(response)
    }

    async fn ensure_assignee_exists(&self, assignee_id: &str) -> Result<(), BoardError> {
        let found = self
            .ports
            .directory
            .get_by_ids(&[assignee_id.to_string()])
            .await
            .map_err(BoardError::Directory)?;
        if found.iter().any(|user| user.id == assignee_id) {
            Ok(())
        } else {
            Err(BoardError::AssigneeNotFound(assignee_id.to_string()))
        }
    }
}
