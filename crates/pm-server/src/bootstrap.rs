//! Wiring configuration into concrete adapters.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use pm_auth::{ClerkDirectory, ClerkVerifier};
use pm_board::memory::SlidingWindowLimiter;
use pm_board::{Board, Ports};
use pm_config::{PmConfig, RateLimitBackend};
use pm_core::ports::RateLimiter;
use pm_db::{PmDb, SqlRateLimiter};
use pm_server::AppState;
use tracing::info;

pub async fn app_state(config: &PmConfig) -> anyhow::Result<AppState> {
    let clerk = config
        .require_clerk()
        .context("Clerk must be configured to verify sessions")?;

    let db = Arc::new(
        PmDb::open(&config.database)
            .await
            .context("failed to open database")?,
    );
    info!(remote = config.database.is_remote(), "database ready");

    let limiter: Arc<dyn RateLimiter> = match config.rate_limit.backend {
        RateLimitBackend::Sql => Arc::new(SqlRateLimiter::from_config(
            Arc::clone(&db),
            &config.rate_limit,
        )),
        RateLimitBackend::Memory => Arc::new(SlidingWindowLimiter::new(
            config.rate_limit.max_requests,
            Duration::from_secs(config.rate_limit.window_secs),
        )),
    };

    let ports = Ports {
        issues: db.clone(),
        sprints: db.clone(),
        directory: Arc::new(ClerkDirectory::new(&clerk.api_url, &clerk.secret_key)),
        members: db,
        limiter,
    };
    let board = Board::new(&ports, &config.general);
    let verifier = Arc::new(ClerkVerifier::new(&clerk.secret_key));

    Ok(AppState::new(
        board,
        verifier,
        config.server.anonymous_creator_id.as_str(),
    ))
}
