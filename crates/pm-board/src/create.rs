//! Issue creation: append a new issue to the end of its sprint or the backlog.

use futures::future::try_join_all;
use pm_core::entities::{Issue, NewIssue};
use pm_core::identity::AuthIdentity;
use pm_core::ports::IssueFilter;
use pm_core::position::{Position, PositionError, between, rebalance};
use pm_core::requests::CreateIssueBody;
use pm_core::responses::CreateIssueResponse;
use pm_core::updates::IssueUpdateBuilder;
use tracing::{debug, info};

use crate::error::BoardError;
use crate::gate::admit;
use crate::ports::Ports;

pub struct IssueCreator {
    ports: Ports,
}

impl IssueCreator {
    #[must_use]
    pub const fn new(ports: Ports) -> Self {
        Self { ports }
    }

    /// Validate a raw `POST /issues` body and insert the issue for `caller`.
    ///
    /// # Errors
    ///
    /// `Unauthenticated`, `RateLimited`, `InvalidBody`, `Position` when the
    /// list cannot be re-spaced, or a store failure.
    pub async fn create(
        &self,
        caller: Option<&AuthIdentity>,
        body: &[u8],
    ) -> Result<CreateIssueResponse, BoardError> {
        let caller = admit(self.ports.limiter.as_ref(), caller).await?;
        let body = CreateIssueBody::parse(body)?;

        let position = self.append_position(body.sprint_id.as_deref()).await?;
        let new_issue = NewIssue {
            name: body.name.trim().to_string(),
            issue_type: body.issue_type,
            creator_id: caller.user_id.clone(),
            reporter_id: body.reporter_id,
            parent_id: body.parent_id,
            sprint_id: body.sprint_id,
            project_id: None,
            position,
        };

        let issue = self
            .ports
            .issues
            .insert(&new_issue)
            .await
            .map_err(BoardError::Store)?;
        debug!(issue_id = %issue.id, key = %issue.key, "issue created");
        Ok(CreateIssueResponse { issue })
    }

    /// A key after every live issue in the list, re-spacing the list once if
    /// its keys have run out of room.
    async fn append_position(&self, sprint_id: Option<&str>) -> Result<Position, BoardError> {
        let siblings = self
            .ports
            .issues
            .find_many(&IssueFilter::live_in_sprint(sprint_id))
            .await
            .map_err(BoardError::Store)?;

        match between(siblings.last().map(|issue| &issue.position), None) {
            Ok(position) => Ok(position),
            Err(PositionError::Exhausted { .. }) => {
                let last = self.rebalance(&siblings).await?;
                Ok(between(last.as_ref(), None)?)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Rewrite every sibling's position with evenly spaced keys, keeping order.
    /// Returns the new last key.
    async fn rebalance(&self, siblings: &[Issue]) -> Result<Option<Position>, BoardError> {
        info!(count = siblings.len(), "rebalancing issue positions");
        let positions = rebalance(siblings.len());
        let store = &self.ports.issues;
        try_join_all(siblings.iter().zip(&positions).map(|(issue, position)| {
            let update = IssueUpdateBuilder::new().position(position.clone()).build();
            async move { store.update(&issue.id, &update).await }
        }))
        .await
        .map_err(BoardError::Store)?;
        Ok(positions.last().cloned())
    }
}
