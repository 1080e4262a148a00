//! Configuration management.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// How the finalizer treats the requested year range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum YearFilterMode {
    /// Drop every paper outside the range, even when that empties the result.
    #[default]
    Strict,
    /// When the strict range matches nothing, keep papers from the start year
    /// onward plus the two most recent calendar years.
    Relaxed,
}

/// Tunables for the relevance scorer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RelevanceConfig {
    /// Minimum score a paper needs to survive the relevance gate.
    #[serde(default = "default_relevance_threshold")]
    pub threshold: f64,

    /// Estimated occurrence ceiling per query word used to normalize raw
    /// scores. A heuristic upper bound, not a true maximum.
    #[serde(default = "default_per_word_ceiling")]
    pub per_word_ceiling: f64,

    /// Scores within this distance rank as tied; ties order by year.
    #[serde(default = "default_tie_epsilon")]
    pub tie_epsilon: f64,

    /// Bonus added when every query word matched in title or summary.
    #[serde(default = "default_full_match_bonus")]
    pub full_match_bonus: f64,
}

impl Default for RelevanceConfig {
    fn default() -> Self {
        Self {
            threshold: default_relevance_threshold(),
            per_word_ceiling: default_per_word_ceiling(),
            tie_epsilon: default_tie_epsilon(),
            full_match_bonus: default_full_match_bonus(),
        }
    }
}

/// Pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Results requested from each provider during the primary fan-out.
    #[serde(default = "default_results_per_source")]
    pub results_per_source: usize,

    /// Collected-paper count below which the arXiv backfill query fires.
    #[serde(default = "default_backfill_threshold")]
    pub backfill_threshold: usize,

    /// Result limit for the backfill query.
    #[serde(default = "default_backfill_limit")]
    pub backfill_limit: usize,

    /// Per-adapter call timeout in seconds.
    #[serde(default = "default_source_timeout_secs")]
    pub source_timeout_secs: u64,

    /// Result cap applied when the request does not specify one.
    #[serde(default = "default_max_results")]
    pub default_max_results: usize,

    /// Title word-overlap ratio above which two papers count as duplicates.
    #[serde(default = "default_dedup_similarity")]
    pub dedup_similarity: f64,

    /// Relevance scorer tunables.
    #[serde(default)]
    pub relevance: RelevanceConfig,

    /// Year-range filtering behavior.
    #[serde(default)]
    pub year_filter: YearFilterMode,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            results_per_source: default_results_per_source(),
            backfill_threshold: default_backfill_threshold(),
            backfill_limit: default_backfill_limit(),
            source_timeout_secs: default_source_timeout_secs(),
            default_max_results: default_max_results(),
            dedup_similarity: default_dedup_similarity(),
            relevance: RelevanceConfig::default(),
            year_filter: YearFilterMode::default(),
        }
    }
}

impl SearchConfig {
    /// The per-adapter call timeout.
    pub fn source_timeout(&self) -> Duration {
        Duration::from_secs(self.source_timeout_secs)
    }
}

fn default_results_per_source() -> usize {
    5
}

fn default_backfill_threshold() -> usize {
    3
}

fn default_backfill_limit() -> usize {
    20
}

fn default_source_timeout_secs() -> u64 {
    15
}

fn default_max_results() -> usize {
    20
}

fn default_dedup_similarity() -> f64 {
    0.8
}

fn default_relevance_threshold() -> f64 {
    0.3
}

fn default_per_word_ceiling() -> f64 {
    5.0
}

fn default_tie_epsilon() -> f64 {
    0.1
}

fn default_full_match_bonus() -> f64 {
    0.2
}

/// Load configuration from a file, with `LITSCOUT_`-prefixed environment
/// variables taking precedence.
pub fn load_config(path: &Path) -> Result<SearchConfig, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(config::Environment::with_prefix("LITSCOUT"))
        .build()?;

    settings.try_deserialize()
}

/// Configuration from environment variables alone, falling back to defaults.
pub fn get_config() -> SearchConfig {
    config::Config::builder()
        .add_source(config::Environment::with_prefix("LITSCOUT"))
        .build()
        .and_then(|settings| settings.try_deserialize())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.results_per_source, 5);
        assert_eq!(config.backfill_threshold, 3);
        assert_eq!(config.backfill_limit, 20);
        assert_eq!(config.default_max_results, 20);
        assert_eq!(config.dedup_similarity, 0.8);
        assert_eq!(config.relevance.threshold, 0.3);
        assert_eq!(config.relevance.per_word_ceiling, 5.0);
        assert_eq!(config.year_filter, YearFilterMode::Strict);
        assert_eq!(config.source_timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let parsed: SearchConfig =
            serde_json::from_str(r#"{ "results_per_source": 8 }"#).unwrap();
        assert_eq!(parsed.results_per_source, 8);
        assert_eq!(parsed.backfill_limit, 20);
        assert_eq!(parsed.relevance.tie_epsilon, 0.1);
    }
}
