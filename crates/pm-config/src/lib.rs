//! # pm-config
//!
//! Layered configuration loading for the project manager service using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`PM_*` prefix, `__` as separator)
//! 2. Project-level `.pm/config.toml`
//! 3. User-level `~/.config/pm/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `PM_CLERK__SECRET_KEY` -> `clerk.secret_key`,
//! `PM_RATE_LIMIT__MAX_REQUESTS` -> `rate_limit.max_requests`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use pm_config::PmConfig;
//!
//! let config = PmConfig::load_with_dotenv().expect("config");
//!
//! if config.database.is_remote() {
//!     println!("Remote database: {}", config.database.url);
//! }
//! ```

mod clerk;
mod database;
mod error;
mod general;
mod rate_limit;
mod server;

pub use clerk::ClerkConfig;
pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use rate_limit::{RateLimitBackend, RateLimitConfig};
pub use server::ServerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Largest listing the Clerk Backend API serves in one call.
pub const MAX_MEMBER_LIST_LIMIT: u32 = 500;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PmConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub clerk: ClerkConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl PmConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Extract and validate from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is invalid.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".pm/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("PM_").split("__"))
    }

    /// Reject values the service cannot run with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rate_limit.window_secs == 0 {
            return Err(ConfigError::invalid(
                "rate_limit.window_secs",
                "must be greater than zero",
            ));
        }
        if self.rate_limit.max_requests == 0 {
            return Err(ConfigError::invalid(
                "rate_limit.max_requests",
                "must be greater than zero",
            ));
        }
        if self.general.member_list_limit == 0
            || self.general.member_list_limit > MAX_MEMBER_LIST_LIMIT
        {
            return Err(ConfigError::invalid(
                "general.member_list_limit",
                format!("must be between 1 and {MAX_MEMBER_LIST_LIMIT}"),
            ));
        }
        if self.server.anonymous_creator_id.trim().is_empty() {
            return Err(ConfigError::invalid(
                "server.anonymous_creator_id",
                "cannot be blank",
            ));
        }
        Ok(())
    }

    /// Fail with `NotConfigured` unless Clerk credentials are present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` for the `clerk` section.
    pub fn require_clerk(&self) -> Result<&ClerkConfig, ConfigError> {
        if self.clerk.is_configured() {
            Ok(&self.clerk)
        } else {
            Err(ConfigError::NotConfigured {
                section: "clerk".into(),
            })
        }
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("pm").join("config.toml"))
    }

    /// Load `.env` from the workspace root, walking up from
    /// `CARGO_MANIFEST_DIR` when set. Silently does nothing if none is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}
