//! Engine configuration.

use casetrack_error::{CaseTrackError, Result};
use serde::Deserialize;

/// Tunables the embedding shell may override. All fields have defaults, so
/// an empty TOML document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Hard ceiling for evidence preview fetches, in bytes. Files above the
    /// ceiling report "too large" instead of being decoded.
    pub preview_max_bytes: u64,
    /// Length of the dashboard pass-rate window, in days.
    pub pass_rate_window_days: i64,
    /// Assignee stamped on attached case entries when the caller supplies
    /// none.
    pub default_assignee: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            preview_max_bytes: 10 * 1024 * 1024,
            pass_rate_window_days: 7,
            default_assignee: None,
        }
    }
}

impl EngineConfig {
    /// Parse a TOML configuration document.
    pub fn from_toml_str(doc: &str) -> Result<Self> {
        toml::from_str(doc)
            .map_err(|e| CaseTrackError::validation(format!("invalid engine config: {e}")))
    }
}
