//! # pm-auth
//!
//! Clerk-based authentication and user lookup for the project manager service.
//!
//! Provides JWKS session validation (`clerk-rs`), request token extraction
//! from the `Authorization` header or `__session` cookie, and an
//! [`IdentityDirectory`](pm_core::ports::IdentityDirectory) backed by the
//! Clerk Backend API (`reqwest`).

pub mod claims;
pub mod directory;
pub mod error;
pub mod jwks;
pub mod session;

pub use claims::SessionClaims;
pub use directory::ClerkDirectory;
pub use error::AuthError;
pub use jwks::{ClerkVerifier, TokenVerifier};
pub use session::session_token;
