//! Perfect-match detection: identical spellings at the same rank.

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;
use tracing::info;

use crate::config::EngineConfig;
use crate::lexicon::LexiconTable;
use crate::types::{LanguageCode, PerfectCognateRecord};

/// Scan every rank covered by the reference list and group words shared
/// by two or more languages.
///
/// Output is rank-ascending, then lexicographic by word within a rank.
pub fn find_perfect_cognates(
    lexicon: &LexiconTable,
    config: &EngineConfig,
) -> Vec<PerfectCognateRecord> {
    let reference = config.reference_language;
    let max_rank = lexicon.max_rank_of(reference).unwrap_or(0);

    let records: Vec<PerfectCognateRecord> = (1..=max_rank)
        .into_par_iter()
        .flat_map_iter(|rank| detect_at_rank(lexicon, reference, rank))
        .collect();

    info!(records = records.len(), "perfect-match detection complete");
    records
}

/// Group one rank's words by identical spelling and emit records for
/// every word contributed by at least two languages.
fn detect_at_rank(
    lexicon: &LexiconTable,
    reference: LanguageCode,
    rank: u32,
) -> Vec<PerfectCognateRecord> {
    // Ranks with no reference word carry no concept gloss and are skipped.
    let Some(english_reference) = lexicon.word_at(reference, rank) else {
        return Vec::new();
    };

    let mut by_word: BTreeMap<&str, BTreeSet<LanguageCode>> = BTreeMap::new();
    for &language in lexicon.languages() {
        if let Some(word) = lexicon.word_at(language, rank) {
            by_word.entry(word).or_default().insert(language);
        }
    }

    by_word
        .into_iter()
        .filter(|(_, languages)| languages.len() >= 2)
        .map(|(word, languages)| {
            PerfectCognateRecord::new(
                rank,
                english_reference.to_string(),
                word.to_string(),
                languages,
            )
        })
        .collect()
}
