use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::SprintStatus;

/// A time-boxed iteration. Read-only from the issue service's perspective.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Sprint {
    pub id: String,
    pub name: String,
    pub status: SprintStatus,
    pub project_id: Option<String>,
    pub created_at: DateTime<Utc>,
}
