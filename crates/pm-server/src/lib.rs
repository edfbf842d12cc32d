//! # pm-server
//!
//! axum HTTP surface for the project manager issue service.
//!
//! | route | handler |
//! |---|---|
//! | `GET /issues` | the caller's issues as nested views |
//! | `PATCH /issues` | one partial change across many issues |
//! | `POST /issues` | create an issue at the end of its list |
//! | `GET /projects/{project_id}/members` | project members |
//! | `GET /health` | liveness |

pub mod caller;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::router;
pub use state::AppState;
