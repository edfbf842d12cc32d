//! Resolving the signed-in caller from request headers.
//!
//! A request without a usable session token, or with one that fails
//! verification, has no caller. Handlers decide what that means.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::HeaderName;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use pm_auth::session_token;
use pm_core::identity::AuthIdentity;
use tracing::debug;

use crate::state::AppState;

/// The verified caller, if any.
#[derive(Debug, Clone, Default)]
pub struct Caller(pub Option<AuthIdentity>);

impl Caller {
    #[must_use]
    pub const fn identity(&self) -> Option<&AuthIdentity> {
        self.0.as_ref()
    }
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(
            header_str(parts, &AUTHORIZATION),
            header_str(parts, &COOKIE),
        );
        let Some(token) = token else {
            return Ok(Self(None));
        };

        match state.verifier.verify(token).await {
            Ok(claims) => Ok(Self(Some(claims.to_identity()))),
            Err(e) => {
                debug!(error = %e, "session token rejected");
                Ok(Self(None))
            }
        }
    }
}

fn header_str<'a>(parts: &'a Parts, name: &HeaderName) -> Option<&'a str> {
    parts.headers.get(name).and_then(|value| value.to_str().ok())
}
