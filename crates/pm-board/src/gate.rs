//! Write preconditions shared by every mutating operation: a signed-in caller,
//! then a passing rate check keyed by that caller.

use pm_core::identity::AuthIdentity;
use pm_core::ports::RateLimiter;
use tracing::debug;

use crate::error::BoardError;

/// Check the caller and charge one request against their budget.
///
/// # Errors
///
/// `Unauthenticated` without a caller, `RateLimited` when the budget is
/// spent, `Limiter` when the limiter itself fails.
pub async fn admit<'a>(
    limiter: &dyn RateLimiter,
    caller: Option<&'a AuthIdentity>,
) -> Result<&'a AuthIdentity, BoardError> {
    let caller = caller.ok_or(BoardError::Unauthenticated)?;
    let decision = limiter
        .check(&caller.user_id)
        .await
        .map_err(BoardError::Limiter)?;
    if !decision.allowed {
        debug!(user_id = %caller.user_id, "rate limited");
        return Err(BoardError::RateLimited {
            retry_after_secs: decision.retry_after_secs,
        });
    }
    Ok(caller)
}
