//! Engine configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```json
//! { "similar_to_threshold": 0.08, "group_weights": { "genre": 0.5, "director": 0.3, "decade": 0.2 } }
//! ```

use anyhow::{Context, Result};
use pipeline::DEFAULT_SIMILAR_TO_THRESHOLD;
use refinement::DEFAULT_FUZZY_TITLE_THRESHOLD;
use serde::{Deserialize, Serialize};
use sources::{GroupWeights, ListKind};
use std::path::Path;

use crate::session::DEFAULT_MAX_SESSIONS;

/// Tunables for the recommendation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Share of a film's mass per attribute group
    pub group_weights: GroupWeights,
    /// Anchor similarity a candidate must exceed for `similar_to`
    pub similar_to_threshold: f64,
    /// Minimum Jaro-Winkler score for a fuzzy title match
    pub fuzzy_title_threshold: f64,
    /// Contributions returned per recommended film
    pub contribution_top_n: usize,
    /// Live sessions kept before the oldest is evicted
    pub max_sessions: usize,
    /// List the profile is built from when a call doesn't say
    pub default_list_kind: ListKind,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            group_weights: GroupWeights::default(),
            similar_to_threshold: DEFAULT_SIMILAR_TO_THRESHOLD,
            fuzzy_title_threshold: DEFAULT_FUZZY_TITLE_THRESHOLD,
            contribution_top_n: 3,
            max_sessions: DEFAULT_MAX_SESSIONS,
            default_list_kind: ListKind::Watched,
        }
    }
}

impl EngineConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn with_group_weights(mut self, weights: GroupWeights) -> Self {
        self.group_weights = weights;
        self
    }

    pub fn with_similar_to_threshold(mut self, threshold: f64) -> Self {
        self.similar_to_threshold = threshold;
        self
    }

    pub fn with_fuzzy_title_threshold(mut self, threshold: f64) -> Self {
        self.fuzzy_title_threshold = threshold;
        self
    }

    pub fn with_contribution_top_n(mut self, top_n: usize) -> Self {
        self.contribution_top_n = top_n;
        self
    }

    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions;
        self
    }

    pub fn with_default_list_kind(mut self, list_kind: ListKind) -> Self {
        self.default_list_kind = list_kind;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.similar_to_threshold, 0.05);
        assert_eq!(config.fuzzy_title_threshold, 0.88);
        assert_eq!(config.contribution_top_n, 3);
        assert_eq!(config.max_sessions, DEFAULT_MAX_SESSIONS);
        assert_eq!(config.default_list_kind, ListKind::Watched);
        assert_eq!(config.group_weights, GroupWeights::default());
    }

    #[test]
    fn test_partial_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"similar_to_threshold": 0.1, "default_list_kind": "all", "group_weights": {{"genre": 0.5}}}}"#
        )
        .unwrap();

        let config = EngineConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.similar_to_threshold, 0.1);
        assert_eq!(config.default_list_kind, ListKind::All);
        assert_eq!(config.group_weights.genre, 0.5);
        assert!((config.group_weights.director - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(config.contribution_top_n, 3);
    }

    #[test]
    fn test_bad_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(EngineConfig::from_json_file(file.path()).is_err());
        assert!(EngineConfig::from_json_file(Path::new("/definitely/missing.json")).is_err());
    }
}
