//! Fuzzy-match detection: similar-but-not-identical spellings at the
//! same rank.

use ordered_float::OrderedFloat;
use rayon::prelude::*;
use tracing::info;

use crate::config::EngineConfig;
use crate::lexicon::LexiconTable;
use crate::similarity::{gestalt_ratio, grapheme_len, pattern_delta};
use crate::types::NearCognateRecord;

/// Compare every unordered language pair at every rank and keep pairs
/// whose similarity lies strictly inside (threshold, 1.0).
///
/// Words below the minimum-length guard never enter fuzzy comparison;
/// they produce too many spurious high-similarity matches. Pairs are
/// enumerated in language-code order, so output is independent of input
/// iteration order.
pub fn find_near_cognates(
    lexicon: &LexiconTable,
    config: &EngineConfig,
) -> Vec<NearCognateRecord> {
    let reference = config.reference_language;
    let reference_max = lexicon.max_rank_of(reference).unwrap_or(0);
    let max_rank = reference_max.min(lexicon.max_rank());

    let records: Vec<NearCognateRecord> = (1..=max_rank)
        .into_par_iter()
        .flat_map_iter(|rank| detect_at_rank(lexicon, config, rank))
        .collect();

    info!(records = records.len(), "fuzzy-match detection complete");
    records
}

fn detect_at_rank(
    lexicon: &LexiconTable,
    config: &EngineConfig,
    rank: u32,
) -> Vec<NearCognateRecord> {
    let Some(english_reference) = lexicon.word_at(config.reference_language, rank) else {
        return Vec::new();
    };

    // entries_at yields language-code order, which fixes pair enumeration.
    let entries: Vec<_> = lexicon
        .entries_at(rank)
        .into_iter()
        .filter(|entry| grapheme_len(&entry.word) >= config.min_fuzzy_len)
        .collect();

    let mut records = Vec::new();
    for (idx, a) in entries.iter().enumerate() {
        for b in &entries[idx + 1..] {
            // Identical spellings belong to the perfect detector.
            if a.word == b.word {
                continue;
            }

            let similarity = gestalt_ratio(&a.word, &b.word);
            if similarity <= config.similarity_threshold || similarity >= 1.0 {
                continue;
            }

            records.push(NearCognateRecord {
                rank,
                english_reference: english_reference.to_string(),
                lang_a: a.language,
                word_a: a.word.clone(),
                lang_b: b.language,
                word_b: b.word.clone(),
                similarity: OrderedFloat(similarity),
                pattern: pattern_delta(&a.word, &b.word),
            });
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LanguageCode;
    use std::collections::BTreeMap;

    fn table(rows: &[(LanguageCode, &[&str])]) -> LexiconTable {
        let mut sources = BTreeMap::new();
        for (language, words) in rows {
            sources.insert(
                *language,
                words.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
            );
        }
        LexiconTable::load(sources).unwrap()
    }

    #[test]
    fn similar_words_are_detected() {
        let lexicon = table(&[
            (LanguageCode::En, &["nation"]),
            (LanguageCode::Es, &["nacion"]),
        ]);
        let records = find_near_cognates(&lexicon, &EngineConfig::default());

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.lang_a, LanguageCode::En);
        assert_eq!(record.lang_b, LanguageCode::Es);
        assert!(record.similarity.0 > 0.7 && record.similarity.0 < 1.0);
        assert_eq!(record.pattern, "delta: 't' vs 'c'");
    }

    #[test]
    fn identical_words_are_never_near() {
        let lexicon = table(&[
            (LanguageCode::En, &["hotel"]),
            (LanguageCode::Es, &["hotel"]),
        ]);
        let records = find_near_cognates(&lexicon, &EngineConfig::default());
        assert!(records.is_empty());
    }

    #[test]
    fn short_words_skip_fuzzy_comparison() {
        // "eau"/"agua" style short entries would otherwise score high.
        let lexicon = table(&[
            (LanguageCode::Es, &["dia"]),
            (LanguageCode::Pt, &["dia"]),
            (LanguageCode::It, &["die"]),
        ]);
        let records = find_near_cognates(&lexicon, &EngineConfig::default());
        assert!(records.is_empty());
    }

    #[test]
    fn weak_similarity_is_rejected() {
        let lexicon = table(&[
            (LanguageCode::En, &["water"]),
            (LanguageCode::Fr, &["verre"]),
        ]);
        let records = find_near_cognates(&lexicon, &EngineConfig::default());
        assert!(records.is_empty());
    }

    #[test]
    fn iteration_stops_at_shortest_list() {
        let lexicon = table(&[
            (LanguageCode::En, &["nation", "water"]),
            (LanguageCode::Es, &["nacion"]),
        ]);
        let records = find_near_cognates(&lexicon, &EngineConfig::default());
        assert!(records.iter().all(|r| r.rank == 1));
    }

    #[test]
    fn every_qualifying_pair_is_emitted() {
        let lexicon = table(&[
            (LanguageCode::Es, &["nacion"]),
            (LanguageCode::It, &["nazione"]),
            (LanguageCode::Pt, &["nacao"]),
            (LanguageCode::En, &["nation"]),
        ]);
        let records = find_near_cognates(&lexicon, &EngineConfig::default());

        // All pairs scored; only those above threshold survive.
        assert!(!records.is_empty());
        for record in &records {
            assert!(record.lang_a < record.lang_b);
            assert_ne!(record.word_a, record.word_b);
            assert!(record.similarity.0 > 0.7 && record.similarity.0 < 1.0);
        }
    }
}
