use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Authenticated caller identity for cross-crate passing.
///
/// Produced by `pm-auth` from a verified session token, consumed by the HTTP
/// layer and the board services. Contains only data fields.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuthIdentity {
    /// Directory user ID (from the JWT `sub` claim).
    pub user_id: String,
    /// Session ID (from the JWT `sid` claim), if the token carried one.
    pub session_id: Option<String>,
}
