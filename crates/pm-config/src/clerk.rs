//! Clerk authentication configuration.

use serde::{Deserialize, Serialize};

fn default_api_url() -> String {
    "https://api.clerk.com/v1".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClerkConfig {
    /// Clerk publishable key.
    #[serde(default)]
    pub publishable_key: String,

    /// Clerk secret key. Used for JWKS fetches and Backend API calls.
    #[serde(default)]
    pub secret_key: String,

    /// Backend API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl Default for ClerkConfig {
    fn default() -> Self {
        Self {
            publishable_key: String::new(),
            secret_key: String::new(),
            api_url: default_api_url(),
        }
    }
}

impl ClerkConfig {
    /// Check if the Clerk config has the minimum required fields.
    pub fn is_configured(&self) -> bool {
        !self.secret_key.is_empty()
    }
}
