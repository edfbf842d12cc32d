//! Project member listing.

use std::collections::HashSet;

use pm_core::responses::ProjectMembersResponse;
use tracing::debug;

use crate::error::BoardError;
use crate::ports::Ports;

pub struct MemberLister {
    ports: Ports,
    listing_limit: u32,
}

impl MemberLister {
    #[must_use]
    pub const fn new(ports: Ports, listing_limit: u32) -> Self {
        Self {
            ports,
            listing_limit,
        }
    }

    /// Directory users who are members of `project_id`, in directory order.
    ///
    /// Only the first `listing_limit` directory users are considered.
    ///
    /// # Errors
    ///
    /// `Members` or `Directory` when either lookup fails.
    pub async fn list(&self, project_id: &str) -> Result<ProjectMembersResponse, BoardError> {
        let member_ids = self
            .ports
            .members
            .member_ids(project_id)
            .await
            .map_err(BoardError::Members)?;
        if member_ids.is_empty() {
            return Ok(ProjectMembersResponse::default());
        }
        let member_ids: HashSet<String> = member_ids.into_iter().collect();

        let users = self
            .ports
            .directory
            .list(self.listing_limit)
            .await
            .map_err(BoardError::Directory)?;
        let members: Vec<_> = users
            .into_iter()
            .filter(|user| member_ids.contains(&user.id))
            .collect();
        debug!(project_id, members = members.len(), "listed project members");
        Ok(ProjectMembersResponse { members })
    }
}
