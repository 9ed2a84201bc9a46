//! Engine configuration.
//!
//! Every tunable of the pipeline lives here; the detectors and the aggregator
//! take a borrowed `EngineConfig` instead of reading scattered constants.

use serde::{Deserialize, Serialize};

use crate::types::LanguageCode;

/// Acceptance threshold for fuzzy similarity; a near cognate must score
/// strictly above this.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.7;

/// Words shorter than this (in grapheme clusters) are excluded from fuzzy
/// comparison. Short words produce spurious high-similarity matches.
pub const DEFAULT_MIN_FUZZY_LEN: usize = 4;

/// Configuration for one discovery run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Language whose list supplies the concept gloss for every rank.
    pub reference_language: LanguageCode,
    /// Lower bound (exclusive) for near-cognate similarity.
    pub similarity_threshold: f64,
    /// Minimum word length admitted to fuzzy comparison.
    pub min_fuzzy_len: usize,
    /// How many clusters / language pairs the aggregator reports.
    pub top_k: usize,
    /// Bilateral pair tracked as a named word list in cluster reports.
    pub anchor_pair: (LanguageCode, LanguageCode),
    /// Language whose per-partner link counts are reported.
    pub hub_language: LanguageCode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reference_language: LanguageCode::En,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            min_fuzzy_len: DEFAULT_MIN_FUZZY_LEN,
            top_k: 5,
            anchor_pair: (LanguageCode::Es, LanguageCode::It),
            hub_language: LanguageCode::Ro,
        }
    }
}
