//! Engine configuration.
//!
//! Every field has a default taken from [`crate::constants`], so a partial
//! JSON document only overrides what it names.

use crate::constants::*;
use crate::error::LoadError;
use serde::{Deserialize, Serialize};

/// Tunable engine parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of undo steps retained; the oldest is dropped on overflow.
    pub history_depth: usize,
    /// Pointer travel below which a gesture is a click rather than a drag.
    pub click_threshold: f32,
    /// Artworks revealed per "show more" step.
    pub reveal_page_size: usize,
    /// Delay between requesting and completing a reveal.
    pub reveal_delay_ms: u64,
    /// Border thickness as a fraction of frame width.
    pub border_ratio: f32,
    /// Thinnest border, in wall percent.
    pub min_border: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_depth: MAX_UNDO_HISTORY,
            click_threshold: CLICK_THRESHOLD,
            reveal_page_size: REVEAL_PAGE_SIZE,
            reveal_delay_ms: REVEAL_DELAY_MS,
            border_ratio: BORDER_RATIO,
            min_border: MIN_BORDER,
        }
    }
}

impl EngineConfig {
    /// Parses a configuration document, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the configuration to pretty JSON.
    pub fn to_json(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = EngineConfig::from_json(r#"{"history_depth": 5}"#).unwrap();
        assert_eq!(config.history_depth, 5);
        assert_eq!(config.click_threshold, CLICK_THRESHOLD);
        assert_eq!(config.reveal_delay_ms, REVEAL_DELAY_MS);
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_malformed_config_is_error() {
        assert!(EngineConfig::from_json("{ history_depth: ").is_err());
    }

    #[test]
    fn test_config_serialization_contains_fields() {
        let json = EngineConfig::default().to_json().unwrap();
        assert!(json.contains("history_depth"));
        assert!(json.contains("reveal_page_size"));
    }
}
