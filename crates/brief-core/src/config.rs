//! Engine configuration: JSON file, `BRIEF_*` environment overrides, defaults.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

pub const DEFAULT_MAX_MESSAGES_PER_UNIT: usize = 40;
pub const DEFAULT_SUMMARIZE_TOP_UNITS: usize = 5;
pub const DEFAULT_CLUSTER_THRESHOLD: f64 = 0.2;
pub const DEFAULT_SUMMARY_CACHE_TTL_SECS: u64 = 3600;
pub const DEFAULT_SUMMARY_CACHE_CAPACITY: usize = 512;
pub const DEFAULT_TAXONOMY_TTL_SECS: u64 = 300;
/// Longest accepted cache TTL (30 days).
pub const MAX_TTL_SECS: u64 = 30 * 24 * 3600;

/// Weight of each emoji when summing reactions. Unlisted emoji weigh 1.
pub const DEFAULT_REACTION_WEIGHTS: &[(&str, f64)] = &[
    ("👍", 1.0),
    ("👎", 0.5),
    ("❤️", 1.5),
    ("🔥", 2.0),
    ("🎉", 1.5),
    ("🚀", 2.0),
    ("✅", 2.0),
    ("👀", 1.2),
    ("💯", 1.5),
    ("❗", 1.5),
];

/// Tunables for one digest engine instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Messages kept per discussion unit for summarization.
    pub max_messages_per_unit: usize,
    /// How many of the top-ranked units get a summary.
    pub summarize_top_units: usize,
    /// Cosine similarity needed to join a theme cluster.
    pub cluster_similarity_threshold: f64,
    pub reaction_weights: BTreeMap<String, f64>,
    pub summary_cache_ttl_secs: u64,
    pub summary_cache_capacity: usize,
    pub taxonomy_ttl_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_messages_per_unit: DEFAULT_MAX_MESSAGES_PER_UNIT,
            summarize_top_units: DEFAULT_SUMMARIZE_TOP_UNITS,
            cluster_similarity_threshold: DEFAULT_CLUSTER_THRESHOLD,
            reaction_weights: DEFAULT_REACTION_WEIGHTS
                .iter()
                .map(|(emoji, weight)| (emoji.to_string(), *weight))
                .collect(),
            summary_cache_ttl_secs: DEFAULT_SUMMARY_CACHE_TTL_SECS,
            summary_cache_capacity: DEFAULT_SUMMARY_CACHE_CAPACITY,
            taxonomy_ttl_secs: DEFAULT_TAXONOMY_TTL_SECS,
        }
    }
}

impl EngineConfig {
    /// Load from a JSON file (defaults if absent), then apply `BRIEF_*` env vars.
    pub fn load(config_path: &Path) -> Result<Self> {
        let mut config = if config_path.exists() {
            let raw = std::fs::read_to_string(config_path)?;
            let parsed: EngineConfig = serde_json::from_str(&raw)?;
            info!("Loaded engine config from {}", config_path.display());
            parsed
        } else {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            EngineConfig::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in `load`).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("BRIEF_MAX_MESSAGES_PER_UNIT") {
            self.max_messages_per_unit = parse_override("BRIEF_MAX_MESSAGES_PER_UNIT", &v)?;
        }
        if let Some(v) = lookup("BRIEF_SUMMARIZE_TOP_UNITS") {
            self.summarize_top_units = parse_override("BRIEF_SUMMARIZE_TOP_UNITS", &v)?;
        }
        if let Some(v) = lookup("BRIEF_CLUSTER_THRESHOLD") {
            self.cluster_similarity_threshold = parse_override("BRIEF_CLUSTER_THRESHOLD", &v)?;
        }
        if let Some(v) = lookup("BRIEF_SUMMARY_CACHE_TTL_SECS") {
            self.summary_cache_ttl_secs = parse_override("BRIEF_SUMMARY_CACHE_TTL_SECS", &v)?;
        }
        Ok(())
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.max_messages_per_unit == 0 {
            return Err(Error::Config(
                "maxMessagesPerUnit must be greater than zero".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.cluster_similarity_threshold) {
            return Err(Error::Config(format!(
                "clusterSimilarityThreshold must be within [0, 1], got {}",
                self.cluster_similarity_threshold
            )));
        }
        if let Some((emoji, weight)) = self
            .reaction_weights
            .iter()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(Error::Config(format!(
                "reaction weight for {} must be a non-negative number, got {}",
                emoji, weight
            )));
        }
        for (name, secs) in [
            ("summaryCacheTtlSecs", self.summary_cache_ttl_secs),
            ("taxonomyTtlSecs", self.taxonomy_ttl_secs),
        ] {
            if secs > MAX_TTL_SECS {
                return Err(Error::Config(format!(
                    "{} must be at most {}, got {}",
                    name, MAX_TTL_SECS, secs
                )));
            }
        }
        Ok(())
    }

    /// Summary cache TTL, capped at `MAX_TTL_SECS`.
    pub fn summary_cache_ttl(&self) -> Duration {
        ttl_duration(self.summary_cache_ttl_secs)
    }

    /// Taxonomy snapshot TTL, capped at `MAX_TTL_SECS`.
    pub fn taxonomy_ttl(&self) -> Duration {
        ttl_duration(self.taxonomy_ttl_secs)
    }

    /// Weight of one reaction emoji.
    pub fn reaction_weight(&self, emoji: &str) -> f64 {
        self.reaction_weights.get(emoji).copied().unwrap_or(1.0)
    }
}

fn ttl_duration(secs: u64) -> Duration {
    // Capped, so neither the cast nor `Duration::seconds` can overflow.
    Duration::seconds(secs.min(MAX_TTL_SECS) as i64)
}

fn parse_override<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("invalid value for {}: {:?}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.reaction_weight("🔥"), 2.0);
        assert_eq!(config.reaction_weight("🦀"), 1.0);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config.max_messages_per_unit, DEFAULT_MAX_MESSAGES_PER_UNIT);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brief.json");
        std::fs::write(&path, r#"{"summarizeTopUnits": 2, "reactionWeights": {"🦀": 3.0}}"#)
            .unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.summarize_top_units, 2);
        assert_eq!(config.reaction_weight("🦀"), 3.0);
        // Replaced table, so previous entries fall back to 1.
        assert_eq!(config.reaction_weight("🔥"), 1.0);
        assert_eq!(config.cluster_similarity_threshold, DEFAULT_CLUSTER_THRESHOLD);
    }

    #[test]
    fn test_load_malformed_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brief.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(EngineConfig::load(&path), Err(Error::Json(_))));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("BRIEF_SUMMARIZE_TOP_UNITS", "7"),
            ("BRIEF_CLUSTER_THRESHOLD", "0.35"),
        ]
        .into_iter()
        .collect();

        let mut config = EngineConfig::default();
        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.summarize_top_units, 7);
        assert_eq!(config.cluster_similarity_threshold, 0.35);
    }

    #[test]
    fn test_bad_override_rejected() {
        let mut config = EngineConfig::default();
        let err = config
            .apply_overrides(|k| (k == "BRIEF_MAX_MESSAGES_PER_UNIT").then(|| "lots".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("BRIEF_MAX_MESSAGES_PER_UNIT"));
    }

    #[test]
    fn test_validate_rejects_oversized_ttl() {
        let config = EngineConfig {
            summary_cache_ttl_secs: 100_000_000_000_000_000,
            ..EngineConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("summaryCacheTtlSecs"));
        // Unvalidated configs still yield a bounded duration.
        assert_eq!(config.summary_cache_ttl(), Duration::seconds(MAX_TTL_SECS as i64));

        let config = EngineConfig {
            taxonomy_ttl_secs: u64::MAX,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
        assert_eq!(config.taxonomy_ttl(), Duration::seconds(MAX_TTL_SECS as i64));

        let config = EngineConfig {
            summary_cache_ttl_secs: MAX_TTL_SECS,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_oversized_ttl_override_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brief.json");
        std::fs::write(&path, r#"{"taxonomyTtlSecs": 99999999999999}"#).unwrap();
        assert!(matches!(EngineConfig::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_threshold() {
        let config = EngineConfig {
            cluster_similarity_threshold: 1.5,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
