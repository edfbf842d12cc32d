//! Issue repository: filtered reads, partial updates, inserts.

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use pm_core::entities::{Issue, NewIssue};
use pm_core::enums::IssueStatus;
use pm_core::ids::{PREFIX_ISSUE, issue_key};
use pm_core::ports::{IssueFilter, IssueStore, PortError};
use pm_core::updates::IssueUpdate;

use crate::PmDb;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, opt_value, parse_datetime, parse_enum, parse_position};

/// Ids bound per `IN (...)` list. `SQLite` limits bind parameters per statement.
pub const MAX_IDS_PER_QUERY: usize = 500;

const SELECT_COLS: &str = "id, number, name, description, type, status, position, creator_id, \
     assignee_id, reporter_id, parent_id, sprint_id, project_id, is_deleted, created_at, updated_at";

fn row_to_issue(row: &libsql::Row) -> Result<Issue, DatabaseError> {
    let number = u64::try_from(row.get::<i64>(1)?)
        .map_err(|e| DatabaseError::InvalidState(format!("negative issue number: {e}")))?;
    Ok(Issue {
        id: row.get(0)?,
        key: issue_key(number),
        name: row.get(2)?,
        description: get_opt_string(row, 3)?,
        issue_type: parse_enum(&row.get::<String>(4)?)?,
        status: parse_enum(&row.get::<String>(5)?)?,
        position: parse_position(row.get::<String>(6)?)?,
        creator_id: row.get(7)?,
        assignee_id: get_opt_string(row, 8)?,
        reporter_id: get_opt_string(row, 9)?,
        parent_id: get_opt_string(row, 10)?,
        sprint_id: get_opt_string(row, 11)?,
        project_id: get_opt_string(row, 12)?,
        is_deleted: row.get::<i64>(13)? != 0,
        created_at: parse_datetime(&row.get::<String>(14)?)?,
        updated_at: parse_datetime(&row.get::<String>(15)?)?,
    })
}

/// `WHERE` clause and parameters for `filter`, numbered from `?1`.
fn where_clause(filter: &IssueFilter) -> (String, Vec<libsql::Value>) {
    let mut clauses = Vec::new();
    let mut params: Vec<libsql::Value> = Vec::new();

    if let Some(ids) = &filter.ids {
        let start = params.len() + 1;
        let placeholders = (start..start + ids.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        clauses.push(format!("id IN ({placeholders})"));
        params.extend(ids.iter().map(|id| libsql::Value::Text(id.clone())));
    }
    if let Some(creator_id) = &filter.creator_id {
        params.push(creator_id.clone().into());
        clauses.push(format!("creator_id = ?{}", params.len()));
    }
    if let Some(project_id) = &filter.project_id {
        params.push(project_id.clone().into());
        clauses.push(format!("project_id = ?{}", params.len()));
    }
    match &filter.sprint_id {
        Some(Some(sprint_id)) => {
            params.push(sprint_id.clone().into());
            clauses.push(format!("sprint_id = ?{}", params.len()));
        }
        Some(None) => clauses.push("sprint_id IS NULL".to_string()),
        None => {}
    }
    if let Some(is_deleted) = filter.is_deleted {
        params.push(libsql::Value::Integer(i64::from(is_deleted)));
        clauses.push(format!("is_deleted = ?{}", params.len()));
    }

    if clauses.is_empty() {
        (String::new(), params)
    } else {
        (format!("WHERE {}", clauses.join(" AND ")), params)
    }
}

impl PmDb {
    pub async fn get_issue(&self, id: &str) -> Result<Issue, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM issues WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or_else(|| DatabaseError::NotFound {
            entity: "issue",
            id: id.to_string(),
        })?;
        row_to_issue(&row)
    }

    /// Issues matching `filter`, ordered by position then id.
    ///
    /// Long id lists are read in chunks of [`MAX_IDS_PER_QUERY`] and merged.
    pub async fn list_issues(&self, filter: &IssueFilter) -> Result<Vec<Issue>, DatabaseError> {
        match filter.ids.as_deref() {
            Some([]) => Ok(Vec::new()),
            Some(ids) if ids.len() > MAX_IDS_PER_QUERY => {
                let mut unique = ids.to_vec();
                unique.sort_unstable();
                unique.dedup();

                let mut issues = Vec::new();
                for chunk in unique.chunks(MAX_IDS_PER_QUERY) {
                    let chunk_filter = IssueFilter {
                        ids: Some(chunk.to_vec()),
                        ..filter.clone()
                    };
                    issues.extend(self.query_issues(&chunk_filter).await?);
                }
                issues.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.id.cmp(&b.id)));
                debug!(requested = ids.len(), found = issues.len(), "chunked issue read");
                Ok(issues)
            }
            _ => self.query_issues(filter).await,
        }
    }

    async fn query_issues(&self, filter: &IssueFilter) -> Result<Vec<Issue>, DatabaseError> {
        let (where_sql, params) = where_clause(filter);
        let sql = format!("SELECT {SELECT_COLS} FROM issues {where_sql} ORDER BY position, id");
        let mut rows = self
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;

        let mut issues = Vec::new();
        while let Some(row) = rows.next().await? {
            issues.push(row_to_issue(&row)?);
        }
        Ok(issues)
    }

    /// Apply the supplied fields of `update` and bump `updated_at`.
    ///
    /// An empty update returns the stored issue untouched.
    pub async fn update_issue(
        &self,
        issue_id: &str,
        update: &IssueUpdate,
    ) -> Result<Issue, DatabaseError> {
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(issue_type) = update.issue_type {
            sets.push(format!("type = ?{idx}"));
            params.push(issue_type.as_str().into());
            idx += 1;
        }
        if let Some(status) = update.status {
            sets.push(format!("status = ?{idx}"));
            params.push(status.as_str().into());
            idx += 1;
        }
        if let Some(assignee_id) = &update.assignee_id {
            sets.push(format!("assignee_id = ?{idx}"));
            params.push(opt_value(assignee_id.as_deref()));
            idx += 1;
        }
        if let Some(reporter_id) = &update.reporter_id {
            sets.push(format!("reporter_id = ?{idx}"));
            params.push(reporter_id.clone().into());
            idx += 1;
        }
        if let Some(parent_id) = &update.parent_id {
            sets.push(format!("parent_id = ?{idx}"));
            params.push(opt_value(parent_id.as_deref()));
            idx += 1;
        }
        if let Some(sprint_id) = &update.sprint_id {
            sets.push(format!("sprint_id = ?{idx}"));
            params.push(opt_value(sprint_id.as_deref()));
            idx += 1;
        }
        if let Some(is_deleted) = update.is_deleted {
            sets.push(format!("is_deleted = ?{idx}"));
            params.push(libsql::Value::Integer(i64::from(is_deleted)));
            idx += 1;
        }
        if let Some(position) = &update.position {
            sets.push(format!("position = ?{idx}"));
            params.push(position.as_str().into());
            idx += 1;
        }

        if sets.is_empty() {
            return self.get_issue(issue_id).await;
        }

        sets.push(format!("updated_at = ?{idx}"));
        params.push(Utc::now().to_rfc3339().into());
        idx += 1;

        params.push(issue_id.into());
        let sql = format!("UPDATE issues SET {} WHERE id = ?{idx}", sets.join(", "));
        let changed = self
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NotFound {
                entity: "issue",
                id: issue_id.to_string(),
            });
        }
        debug!(issue_id, "issue updated");

        self.get_issue(issue_id).await
    }

    /// Insert an `OPEN` issue with the next free number.
    pub async fn create_issue(&self, new: &NewIssue) -> Result<Issue, DatabaseError> {
        let id = self.generate_id(PREFIX_ISSUE).await?;
        let now = Utc::now().to_rfc3339();

        self.conn()
            .execute(
                "INSERT INTO issues (id, number, name, type, status, position, creator_id, \
                 reporter_id, parent_id, sprint_id, project_id, created_at, updated_at)
                 VALUES (?1, (SELECT COALESCE(MAX(number), 0) + 1 FROM issues), ?2, ?3, ?4, ?5, \
                 ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
                libsql::params_from_iter(vec![
                    libsql::Value::Text(id.clone()),
                    new.name.clone().into(),
                    new.issue_type.as_str().into(),
                    IssueStatus::Open.as_str().into(),
                    new.position.as_str().into(),
                    new.creator_id.clone().into(),
                    opt_value(new.reporter_id.as_deref()),
                    opt_value(new.parent_id.as_deref()),
                    opt_value(new.sprint_id.as_deref()),
                    opt_value(new.project_id.as_deref()),
                    now.into(),
                ]),
            )
            .await?;
        debug!(issue_id = %id, "issue created");

        self.get_issue(&id).await
    }
}

#[async_trait]
impl IssueStore for PmDb {
    async fn find_many(&self, filter: &IssueFilter) -> Result<Vec<Issue>, PortError> {
        Ok(self.list_issues(filter).await?)
    }

    async fn update(&self, id: &str, update: &IssueUpdate) -> Result<Issue, PortError> {
        Ok(self.update_issue(id, update).await?)
    }

    async fn insert(&self, issue: &NewIssue) -> Result<Issue, PortError> {
        Ok(self.create_issue(issue).await?)
    }
}
