use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Client-safe view of a directory user.
///
/// Produced by reducing the identity provider's full user record to display
/// fields only; never persisted locally.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UserProjection {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub avatar: Option<String>,
}
