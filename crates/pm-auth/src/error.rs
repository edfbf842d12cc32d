use pm_core::ports::PortError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not authenticated")]
    NotAuthenticated,

    #[error("session token expired")]
    TokenExpired,

    #[error("JWKS validation failed: {0}")]
    JwksValidation(String),

    #[error("clerk API error: {0}")]
    ClerkApiError(String),

    #[error("{0}")]
    Other(String),
}

impl From<AuthError> for PortError {
    fn from(err: AuthError) -> Self {
        Self::backend("identity directory", err.to_string())
    }
}
