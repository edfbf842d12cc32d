//! ID prefixes and issue key formatting.
//!
//! Stored IDs are `{prefix}-{8 hex chars}`, e.g. `iss-a3f8b2c1`.

pub const PREFIX_ISSUE: &str = "iss";
pub const PREFIX_SPRINT: &str = "spr";
pub const PREFIX_PROJECT: &str = "prj";

pub const ALL_PREFIXES: &[&str] = &[PREFIX_ISSUE, PREFIX_SPRINT, PREFIX_PROJECT];

/// Prefix of human-facing issue keys.
pub const ISSUE_KEY_PREFIX: &str = "ISSUE";

/// Format the human-facing key for the `number`th issue, e.g. `ISSUE-42`.
#[must_use]
pub fn issue_key(number: u64) -> String {
    format!("{ISSUE_KEY_PREFIX}-{number}")
}
