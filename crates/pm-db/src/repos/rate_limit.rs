//! Sliding-window rate limiting over the shared `rate_limit_hits` table.
//!
//! Every server instance writes to the same table, so a caller's budget is
//! enforced across instances. A hit is recorded only when it is allowed.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use pm_config::RateLimitConfig;
use pm_core::ports::{PortError, RateDecision, RateLimiter};

use crate::PmDb;
use crate::error::DatabaseError;

#[derive(Clone)]
pub struct SqlRateLimiter {
    db: Arc<PmDb>,
    max_requests: u32,
    window: Duration,
}

impl SqlRateLimiter {
    #[must_use]
    pub const fn new(db: Arc<PmDb>, max_requests: u32, window: Duration) -> Self {
        Self {
            db,
            max_requests,
            window,
        }
    }

    #[must_use]
    pub const fn from_config(db: Arc<PmDb>, config: &RateLimitConfig) -> Self {
        Self::new(db, config.max_requests, Duration::from_secs(config.window_secs))
    }

    fn window_ms(&self) -> i64 {
        i64::try_from(self.window.as_millis()).unwrap_or(i64::MAX)
    }

    /// Rate check as of `now_ms` (Unix milliseconds). Also clears expired
    /// hits of every caller.
    pub async fn check_at(&self, key: &str, now_ms: i64) -> Result<RateDecision, DatabaseError> {
        let window_start = now_ms.saturating_sub(self.window_ms());
        let conn = self.db.conn();

        // Expired hits of every caller, not only this one.
        conn.execute(
            "DELETE FROM rate_limit_hits WHERE hit_at_ms <= ?1",
            libsql::params![window_start],
        )
        .await?;

        // Count-and-insert in one statement so concurrent checks cannot both
        // take the last slot.
        let inserted = conn
            .execute(
                "INSERT INTO rate_limit_hits (caller_key, hit_at_ms)
                 SELECT ?1, ?2
                 WHERE (SELECT COUNT(*) FROM rate_limit_hits
                        WHERE caller_key = ?1 AND hit_at_ms > ?3) < ?4",
                libsql::params![key, now_ms, window_start, i64::from(self.max_requests)],
            )
            .await?;

        let mut rows = conn
            .query(
                "SELECT COUNT(*), MIN(hit_at_ms) FROM rate_limit_hits
                 WHERE caller_key = ?1 AND hit_at_ms > ?2",
                libsql::params![key, window_start],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let count = u32::try_from(row.get::<i64>(0)?).unwrap_or(u32::MAX);
        let oldest = row.get::<Option<i64>>(1)?.unwrap_or(now_ms);

        let allowed = inserted > 0;
        let retry_after_ms = (oldest + self.window_ms() - now_ms).max(0);
        let decision = RateDecision {
            allowed,
            remaining: self.max_requests.saturating_sub(count),
            retry_after_secs: if allowed {
                0
            } else {
                u64::try_from((retry_after_ms + 999) / 1000).unwrap_or(1).max(1)
            },
        };
        debug!(key, allowed, remaining = decision.remaining, "rate check");
        Ok(decision)
    }
}

#[async_trait]
impl RateLimiter for SqlRateLimiter {
    async fn check(&self, key: &str) -> Result<RateDecision, PortError> {
        Ok(self.check_at(key, Utc::now().timestamp_millis()).await?)
    }
}
