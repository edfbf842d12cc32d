//! HTTP server configuration.

use serde::{Deserialize, Serialize};

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_anonymous_creator_id() -> String {
    "init".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Socket address to listen on.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Creator whose issues `GET /issues` returns when no caller is signed in.
    #[serde(default = "default_anonymous_creator_id")]
    pub anonymous_creator_id: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            anonymous_creator_id: default_anonymous_creator_id(),
        }
    }
}
