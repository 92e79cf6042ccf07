use crate::tokenizer::split_words;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_RESULTS: usize = 5;
pub const DEFAULT_RELEVANCE_EPSILON: f64 = 1e-6;
pub const DEFAULT_ACCUMULATOR_BUCKETS: usize = 20_000;

/// Engine settings fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Upper bound on the number of documents returned by a top-K query.
    pub max_results: usize,
    /// Relevances closer than this are ranked by rating instead.
    pub relevance_epsilon: f64,
    /// Shard count of the accumulator used by parallel scoring.
    pub accumulator_buckets: usize,
    /// Terms ignored both when indexing and when querying.
    pub stop_words: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            relevance_epsilon: DEFAULT_RELEVANCE_EPSILON,
            accumulator_buckets: DEFAULT_ACCUMULATOR_BUCKETS,
            stop_words: Vec::new(),
        }
    }
}

impl SearchConfig {
    /// Default settings with stop words taken from whitespace-separated `text`.
    pub fn with_stop_words(text: &str) -> Self {
        Self {
            stop_words: split_words(text).map(str::to_owned).collect(),
            ..Self::default()
        }
    }
}
