//! Process-wide defaults for the chat core.
//!
//! Everything that would otherwise be an implicit global lives here and is
//! passed through explicitly: the default persona, the default search type,
//! the generated-name cap, and the session snapshot file name.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::search::SearchType;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatDefaults {
    /// Persona used when a request does not name one.
    #[serde(default = "d_persona_id")]
    pub default_persona_id: i64,
    /// Search type used when a persona does not set one.
    #[serde(default = "d_search_type")]
    pub default_search_type: SearchType,
    /// Character cap applied to regenerated session names.
    #[serde(default = "d_name_cap")]
    pub generated_name_max_chars: usize,
    /// File name for the session store snapshot.
    #[serde(default = "d_snapshot_file")]
    pub snapshot_file: String,
}

impl Default for ChatDefaults {
    fn default() -> Self {
        Self {
            default_persona_id: d_persona_id(),
            default_search_type: d_search_type(),
            generated_name_max_chars: d_name_cap(),
            snapshot_file: d_snapshot_file(),
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_persona_id() -> i64 {
    0
}
fn d_search_type() -> SearchType {
    SearchType::Hybrid
}
fn d_name_cap() -> usize {
    60
}
fn d_snapshot_file() -> String {
    "sessions.json".into()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl ChatDefaults {
    /// Validate the defaults and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.generated_name_max_chars == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "generated_name_max_chars".into(),
                message: "name cap must be greater than 0".into(),
            });
        }

        if self.snapshot_file.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "snapshot_file".into(),
                message: "snapshot file name must not be empty".into(),
            });
        }

        if self.default_persona_id < 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "default_persona_id".into(),
                message: "negative persona ids are reserved".into(),
            });
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let defaults = ChatDefaults::default();
        assert!(defaults.validate().is_empty());
        assert_eq!(defaults.default_persona_id, 0);
        assert_eq!(defaults.default_search_type, SearchType::Hybrid);
    }

    #[test]
    fn zero_name_cap_is_an_error() {
        let defaults = ChatDefaults {
            generated_name_max_chars: 0,
            ..Default::default()
        };
        let issues = defaults.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, ConfigSeverity::Error);
    }
}
