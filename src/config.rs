use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Where system-assigned intents are read from when comparing against the labeler.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PredictionSource {
    /// `parse_data.intent.name` inside the serialized event.
    ParseData,
    /// The `intent_name` column of the events table.
    IntentColumn,
}

/// Which fallback definition drives per-user conversion and NPS grouping.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FallbackBasis {
    /// The system labelled the turn with the fallback intent.
    SystemReported,
    /// The keyword labeler found no matching rule.
    RuleDerived,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    pub input_csv: PathBuf,
    pub database: PathBuf,
    pub intent_distribution_csv: PathBuf,
    pub user_intent_csv: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            input_csv: "rasa_logs.csv".into(),
            database: "rasa.db".into(),
            intent_distribution_csv: "intent_distribution.csv".into(),
            user_intent_csv: "user_intent_frequency.csv".into(),
        }
    }
}

/// Tunable thresholds and label names for the aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Fallback ratio strictly below this is a Promoter
    pub promoter_threshold: f64,
    /// Fallback ratio strictly below this (and not a Promoter) is Passive
    pub passive_threshold: f64,

    pub fallback_intent: String,
    pub fallback_action: String,

    pub histogram_bins: usize,
    pub top_actions: usize,

    pub prediction_source: PredictionSource,
    pub user_fallback_basis: FallbackBasis,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            promoter_threshold: 0.2,
            passive_threshold: 0.5,
            fallback_intent: "nlu_fallback".into(),
            fallback_action: "action_default_fallback".into(),
            histogram_bins: 10,
            top_actions: 10,
            prediction_source: PredictionSource::IntentColumn,
            user_fallback_basis: FallbackBasis::SystemReported,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub paths: PathSettings,
    pub metrics: MetricsConfig,
}

impl AnalyticsConfig {
    /// Load settings from a JSON file, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;

        info!("Loaded analytics config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self)?;
        fs::write(path, serialized)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalyticsConfig::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config.metrics.promoter_threshold, 0.2);
        assert_eq!(config.metrics.passive_threshold, 0.5);
        assert_eq!(config.metrics.fallback_intent, "nlu_fallback");
        assert_eq!(config.paths.input_csv, PathBuf::from("rasa_logs.csv"));
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chatstats.json");
        fs::write(
            &path,
            r#"{ "metrics": { "histogram_bins": 4, "prediction_source": "parse_data" } }"#,
        )
        .unwrap();

        let config = AnalyticsConfig::load(&path).unwrap();
        assert_eq!(config.metrics.histogram_bins, 4);
        assert_eq!(config.metrics.prediction_source, PredictionSource::ParseData);
        assert_eq!(config.metrics.user_fallback_basis, FallbackBasis::SystemReported);
        assert_eq!(config.metrics.fallback_action, "action_default_fallback");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chatstats.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(AnalyticsConfig::load(&path).is_err());
    }

    #[test]
    fn save_then_load_preserves_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chatstats.json");
        let mut config = AnalyticsConfig::default();
        config.metrics.user_fallback_basis = FallbackBasis::RuleDerived;
        config.save(&path).unwrap();

        let loaded = AnalyticsConfig::load(&path).unwrap();
        assert_eq!(loaded.metrics.user_fallback_basis, FallbackBasis::RuleDerived);
    }
}
