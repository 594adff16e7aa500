//! Runtime configuration of the dispute engine.

use crate::events::DEFAULT_EVENT_CAPACITY;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One week, in seconds.
const DEFAULT_CHALLENGE_WINDOW_SECS: u64 = 7 * 24 * 60 * 60;

/// The [DisputeConfig] struct holds the tunables of a [crate::DisputeEngine]. Every field has a default, so a
/// partial TOML document is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisputeConfig {
    /// Seconds after submission during which a batch may be challenged and may not be finalized.
    pub challenge_window_secs: u64,
    /// When set, a challenger may only select one of the two halves produced by the defender's last bisection,
    /// carrying the commitments proposed for it. When unset, any in-bounds segment is accepted as is.
    pub strict_segments: bool,
    /// When set, a batch cannot be finalized through the engine while an unresolved challenge targets it.
    pub gate_finalization: bool,
    /// Capacity of the event broadcast channel.
    pub event_capacity: usize,
}

impl Default for DisputeConfig {
    fn default() -> Self {
        Self {
            challenge_window_secs: DEFAULT_CHALLENGE_WINDOW_SECS,
            strict_segments: true,
            gate_finalization: true,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl DisputeConfig {
    /// Parses a configuration from a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("invalid dispute configuration")
    }

    /// Reads and parses a configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&raw)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(DisputeConfig::from_toml_str("").unwrap(), DisputeConfig::default());
    }

    #[test]
    fn partial_document() {
        let config = DisputeConfig::from_toml_str(
            r#"
            challenge_window_secs = 600
            strict_segments = false
            "#,
        )
        .unwrap();

        assert_eq!(config.challenge_window_secs, 600);
        assert!(!config.strict_segments);
        assert!(config.gate_finalization);
        assert_eq!(config.event_capacity, DEFAULT_EVENT_CAPACITY);
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(DisputeConfig::from_toml_str("challenge_window_secs = \"soon\"").is_err());
    }

    #[test]
    fn missing_file() {
        let err = DisputeConfig::from_toml_file("/nonexistent/thrain.toml").unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
