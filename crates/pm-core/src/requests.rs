//! Request bodies accepted by the issue endpoints.
//!
//! Bodies are parsed from raw bytes so that schema violations surface as
//! [`CoreError::Validation`] at the point the caller chooses, after
//! authentication and rate limiting have run.
//!
//! Key presence matters:
//!
//! | JSON            | `Option<T>` (non-null) | `Option<Option<T>>` (nullable) |
//! |-----------------|------------------------|--------------------------------|
//! | key absent      | `None`                 | `None` (leave unchanged)       |
//! | `null`          | rejected               | `Some(None)` (clear)           |
//! | value           | `Some(v)`              | `Some(Some(v))`                |

use serde::{Deserialize, Deserializer, Serialize};

use crate::enums::{IssueStatus, IssueType};
use crate::errors::CoreError;
use crate::updates::IssueUpdate;

/// Body of `PATCH /issues`: the same partial change applied to every issue
/// in `ids`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchIssuesBody {
    pub ids: Vec<String>,
    #[serde(
        default,
        rename = "type",
        deserialize_with = "non_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub issue_type: Option<IssueType>,
    #[serde(
        default,
        deserialize_with = "non_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<IssueStatus>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub assignee_id: Option<Option<String>>,
    /// Can be replaced but not cleared.
    #[serde(
        default,
        deserialize_with = "non_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub reporter_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_id: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub sprint_id: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "non_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_deleted: Option<bool>,
}

impl PatchIssuesBody {
    /// Parse and validate a raw request body.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the body is not JSON or does not
    /// match the patch schema.
    pub fn parse(bytes: &[u8]) -> Result<Self, CoreError> {
        serde_json::from_slice(bytes)
            .map_err(|e| CoreError::Validation(format!("invalid patch body: {e}")))
    }

    /// The field changes requested by this body, with `assignee_id` exactly
    /// as supplied.
    #[must_use]
    pub fn to_update(&self) -> IssueUpdate {
        IssueUpdate {
            issue_type: self.issue_type,
            status: self.status,
            assignee_id: self.assignee_id.clone(),
            reporter_id: self.reporter_id.clone(),
            parent_id: self.parent_id.clone(),
            sprint_id: self.sprint_id.clone(),
            is_deleted: self.is_deleted,
            position: None,
        }
    }

    /// The assignee that must exist in the directory before any write.
    #[must_use]
    pub fn assignee_to_resolve(&self) -> Option<&str> {
        self.assignee_id.as_ref().and_then(Option::as_deref)
    }
}

/// Body of `POST /issues`. Every key must be present; the nullable ones may
/// be `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIssueBody {
    pub name: String,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    #[serde(deserialize_with = "required_nullable")]
    pub sprint_id: Option<String>,
    #[serde(deserialize_with = "required_nullable")]
    pub reporter_id: Option<String>,
    #[serde(deserialize_with = "required_nullable")]
    pub parent_id: Option<String>,
}

impl CreateIssueBody {
    /// Parse and validate a raw request body.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the body does not match the schema
    /// or `name` is blank.
    pub fn parse(bytes: &[u8]) -> Result<Self, CoreError> {
        let body: Self = serde_json::from_slice(bytes)
            .map_err(|e| CoreError::Validation(format!("invalid create body: {e}")))?;
        if body.name.trim().is_empty() {
            return Err(CoreError::Validation("issue name cannot be blank".into()));
        }
        Ok(body)
    }
}

/// Present key: `null` becomes `Some(None)`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Present key: `null` is an error.
fn non_null<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Key must be present (no `default`), value may be `null`.
fn required_nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}
