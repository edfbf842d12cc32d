use chrono::{DateTime, Utc};
use pm_core::identity::AuthIdentity;

/// Validated Clerk session claims.
///
/// Wraps the relevant fields from `clerk-rs::ClerkJwt`. Produced by a
/// [`TokenVerifier`](crate::TokenVerifier), consumed by the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    /// Clerk user ID (`sub` claim).
    pub user_id: String,
    /// Session ID (`sid` claim).
    pub session_id: Option<String>,
    /// Token expiration time (from `exp` claim).
    pub expires_at: DateTime<Utc>,
}

impl SessionClaims {
    /// Convert to a lightweight `AuthIdentity` for cross-crate passing.
    #[must_use]
    pub fn to_identity(&self) -> AuthIdentity {
        AuthIdentity {
            user_id: self.user_id.clone(),
            session_id: self.session_id.clone(),
        }
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}
