//! libSQL database configuration.

use serde::{Deserialize, Serialize};

fn default_local_path() -> String {
    "pm.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path of the local database file. `:memory:` opens an in-memory database.
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Remote database URL (e.g., `libsql://pm-prod-org.turso.io`).
    #[serde(default)]
    pub url: String,

    /// Remote database auth token.
    #[serde(default)]
    pub auth_token: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            local_path: default_local_path(),
            url: String::new(),
            auth_token: String::new(),
        }
    }
}

impl DatabaseConfig {
    /// Whether a remote database should be used instead of the local file.
    pub fn is_remote(&self) -> bool {
        !self.url.is_empty() && !self.auth_token.is_empty()
    }
}
