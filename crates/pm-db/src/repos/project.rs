//! Projects and project membership.

use async_trait::async_trait;

use pm_core::ids::PREFIX_PROJECT;
use pm_core::ports::{MemberSource, PortError};

use crate::PmDb;
use crate::error::DatabaseError;

impl PmDb {
    /// Create a project and return its id.
    pub async fn create_project(&self, name: &str) -> Result<String, DatabaseError> {
        let id = self.generate_id(PREFIX_PROJECT).await?;
        self.conn()
            .execute(
                "INSERT INTO projects (id, name) VALUES (?1, ?2)",
                [id.as_str(), name],
            )
            .await?;
        Ok(id)
    }

    /// Add `user_id` to a project. Adding an existing member is a no-op.
    ///
    /// Fails on the foreign key when the project does not exist.
    pub async fn add_member(&self, project_id: &str, user_id: &str) -> Result<(), DatabaseError> {
        self.conn()
            .execute(
                "INSERT OR IGNORE INTO project_members (project_id, user_id) VALUES (?1, ?2)",
                [project_id, user_id],
            )
            .await?;
        Ok(())
    }

    /// Member user ids of a project, in the order they were added.
    pub async fn list_member_ids(&self, project_id: &str) -> Result<Vec<String>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT user_id FROM project_members WHERE project_id = ?1 ORDER BY created_at, rowid",
                [project_id],
            )
            .await?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next().await? {
            ids.push(row.get::<String>(0)?);
        }
        Ok(ids)
    }
}

#[async_trait]
impl MemberSource for PmDb {
    async fn member_ids(&self, project_id: &str) -> Result<Vec<String>, PortError> {
        Ok(self.list_member_ids(project_id).await?)
    }
}
