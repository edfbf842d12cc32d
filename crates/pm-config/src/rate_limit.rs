//! Per-caller write rate limit.

use serde::{Deserialize, Serialize};

const fn default_max_requests() -> u32 {
    10
}

const fn default_window_secs() -> u64 {
    10
}

/// Where request timestamps are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RateLimitBackend {
    /// Shared table in the database; consistent across server instances.
    #[default]
    Sql,
    /// Process-local; each instance counts separately.
    Memory,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Requests allowed per caller within one window.
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Sliding window length, in seconds.
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    #[serde(default)]
    pub backend: RateLimitBackend,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
            backend: RateLimitBackend::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_ten_per_ten_seconds() {
        let config = RateLimitConfig::default();
        assert_eq!(config.max_requests, 10);
        assert_eq!(config.window_secs, 10);
        assert_eq!(config.backend, RateLimitBackend::Sql);
    }
}
