use std::sync::Arc;

use async_trait::async_trait;
use clerk_rs::ClerkConfiguration;
use clerk_rs::clerk::Clerk;
use clerk_rs::validators::authorizer::validate_jwt;
use clerk_rs::validators::jwks::MemoryCacheJwksProvider;

use crate::claims::SessionClaims;
use crate::error::AuthError;

/// Turns a raw session token into validated claims.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// # Errors
    ///
    /// Returns `AuthError` if the token is malformed, expired, or cannot be
    /// verified.
    async fn verify(&self, token: &str) -> Result<SessionClaims, AuthError>;
}

/// Verifies Clerk session JWTs against the instance's JWKS.
///
/// The `MemoryCacheJwksProvider` caches public keys for one hour, so one
/// verifier should be shared for the life of the process.
#[derive(Clone)]
pub struct ClerkVerifier {
    provider: Arc<MemoryCacheJwksProvider>,
}

impl ClerkVerifier {
    #[must_use]
    pub fn new(secret_key: &str) -> Self {
        let config = ClerkConfiguration::new(None, None, Some(secret_key.to_string()), None);
        let clerk = Clerk::new(config);
        Self {
            provider: Arc::new(MemoryCacheJwksProvider::new(clerk)),
        }
    }
}

#[async_trait]
impl TokenVerifier for ClerkVerifier {
    async fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let clerk_jwt = validate_jwt(token, Arc::clone(&self.provider))
            .await
            .map_err(|e| AuthError::JwksValidation(e.to_string()))?;

        let expires_at = chrono::DateTime::from_timestamp(i64::from(clerk_jwt.exp), 0)
            .ok_or_else(|| AuthError::JwksValidation("invalid exp timestamp".into()))?;

        let claims = SessionClaims {
            user_id: clerk_jwt.sub,
            session_id: clerk_jwt.sid,
            expires_at,
        };
        if claims.is_expired() {
            return Err(AuthError::TokenExpired);
        }
        Ok(claims)
    }
}
