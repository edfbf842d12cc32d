//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default number of directory users scanned when listing project members.
const fn default_member_list_limit() -> u32 {
    100
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Size of the directory listing intersected with project membership.
    #[serde(default = "default_member_list_limit")]
    pub member_list_limit: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            member_list_limit: default_member_list_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        assert_eq!(GeneralConfig::default().member_list_limit, 100);
    }
}
