//! Sprint repository.

use async_trait::async_trait;
use chrono::Utc;

use pm_core::entities::Sprint;
use pm_core::enums::SprintStatus;
use pm_core::ids::PREFIX_SPRINT;
use pm_core::ports::{PortError, SprintFilter, SprintSource};

use crate::PmDb;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, opt_value, parse_datetime, parse_enum};

const SELECT_COLS: &str = "id, name, status, project_id, created_at";

fn row_to_sprint(row: &libsql::Row) -> Result<Sprint, DatabaseError> {
    Ok(Sprint {
        id: row.get(0)?,
        name: row.get(1)?,
        status: parse_enum(&row.get::<String>(2)?)?,
        project_id: get_opt_string(row, 3)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

impl PmDb {
    pub async fn create_sprint(
        &self,
        name: &str,
        status: SprintStatus,
        project_id: Option<&str>,
    ) -> Result<Sprint, DatabaseError> {
        let id = self.generate_id(PREFIX_SPRINT).await?;
        let now = Utc::now();
        self.conn()
            .execute(
                "INSERT INTO sprints (id, name, status, project_id, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params_from_iter(vec![
                    libsql::Value::Text(id.clone()),
                    name.into(),
                    status.as_str().into(),
                    opt_value(project_id),
                    now.to_rfc3339().into(),
                ]),
            )
            .await?;

        Ok(Sprint {
            id,
            name: name.to_string(),
            status,
            project_id: project_id.map(String::from),
            created_at: now,
        })
    }

    pub async fn set_sprint_status(
        &self,
        sprint_id: &str,
        status: SprintStatus,
    ) -> Result<(), DatabaseError> {
        let changed = self
            .conn()
            .execute(
                "UPDATE sprints SET status = ?1 WHERE id = ?2",
                [status.as_str(), sprint_id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NotFound {
                entity: "sprint",
                id: sprint_id.to_string(),
            });
        }
        Ok(())
    }

    pub async fn list_sprints(&self, filter: &SprintFilter) -> Result<Vec<Sprint>, DatabaseError> {
        let mut clauses = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        if let Some(status) = filter.status {
            params.push(status.as_str().into());
            clauses.push(format!("status = ?{}", params.len()));
        }
        if let Some(project_id) = &filter.project_id {
            params.push(project_id.clone().into());
            clauses.push(format!("project_id = ?{}", params.len()));
        }
        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM sprints {where_sql} ORDER BY created_at, id"),
                libsql::params_from_iter(params),
            )
            .await?;
        let mut sprints = Vec::new();
        while let Some(row) = rows.next().await? {
            sprints.push(row_to_sprint(&row)?);
        }
        Ok(sprints)
    }
}

#[async_trait]
impl SprintSource for PmDb {
    async fn find_many(&self, filter: &SprintFilter) -> Result<Vec<Sprint>, PortError> {
        Ok(self.list_sprints(filter).await?)
    }
}
