//! Shared handler state.

use std::sync::Arc;

use pm_auth::TokenVerifier;
use pm_board::Board;

#[derive(Clone)]
pub struct AppState {
    pub board: Arc<Board>,
    /// Session token verifier used to identify the caller.
    pub verifier: Arc<dyn TokenVerifier>,
    /// Creator whose issues an anonymous `GET /issues` reads.
    pub anonymous_creator_id: Arc<str>,
}

impl AppState {
    #[must_use]
    pub fn new(
        board: Board,
        verifier: Arc<dyn TokenVerifier>,
        anonymous_creator_id: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            board: Arc::new(board),
            verifier,
            anonymous_creator_id: anonymous_creator_id.into(),
        }
    }
}
