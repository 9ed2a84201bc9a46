//! Rank-aligned lexicon shared by both detectors.
//!
//! Rank alignment is a structural heuristic: a word at rank r in one
//! language is compared against rank r in every other language purely
//! because the frequency lists were built independently per language.
//! Nothing here validates semantic alignment, and callers must not assume
//! it.

use std::collections::BTreeMap;

use ahash::AHashMap;
use tracing::debug;

use crate::error::CognateError;
use crate::types::{LanguageCode, LexicalEntry};

/// Immutable (language, rank) -> word mapping.
#[derive(Debug, Clone)]
pub struct LexiconTable {
    entries: AHashMap<(LanguageCode, u32), String>,
    languages: Vec<LanguageCode>,
    per_language_max: AHashMap<LanguageCode, u32>,
    /// Minimum over the per-language maximum ranks.
    max_rank: u32,
}

impl LexiconTable {
    /// Build the table from per-language ordered word lists, assigning
    /// 1-based ranks in list order. Words are trimmed; a language whose
    /// list contains no usable words fails with `MalformedSource`.
    pub fn load(
        sources: BTreeMap<LanguageCode, Vec<String>>,
    ) -> Result<Self, CognateError> {
        let mut entries = AHashMap::new();
        let mut languages = Vec::with_capacity(sources.len());
        let mut per_language_max = AHashMap::new();
        let mut max_rank = u32::MAX;

        for (language, words) in sources {
            let mut last_rank = 0u32;
            for (idx, word) in words.iter().enumerate() {
                let word = word.trim();
                if word.is_empty() {
                    continue;
                }
                let rank = idx as u32 + 1;
                entries.insert((language, rank), word.to_string());
                last_rank = rank;
            }

            if last_rank == 0 {
                return Err(CognateError::MalformedSource {
                    language: language.to_string(),
                });
            }

            debug!(language = %language, words = last_rank, "loaded language list");
            languages.push(language);
            per_language_max.insert(language, last_rank);
            max_rank = max_rank.min(last_rank);
        }

        if languages.is_empty() {
            max_rank = 0;
        }

        Ok(Self {
            entries,
            languages,
            per_language_max,
            max_rank,
        })
    }

    /// Word at (language, rank), if that cell was populated.
    pub fn word_at(&self, language: LanguageCode, rank: u32) -> Option<&str> {
        self.entries.get(&(language, rank)).map(String::as_str)
    }

    /// Minimum of all per-language maximum ranks.
    pub fn max_rank(&self) -> u32 {
        self.max_rank
    }

    /// Highest populated rank for one language.
    pub fn max_rank_of(&self, language: LanguageCode) -> Option<u32> {
        self.per_language_max.get(&language).copied()
    }

    /// Languages present, in canonical code order.
    pub fn languages(&self) -> &[LanguageCode] {
        &self.languages
    }

    /// All populated entries at one rank, in language-code order.
    pub fn entries_at(&self, rank: u32) -> Vec<LexicalEntry> {
        self.languages
            .iter()
            .filter_map(|&language| {
                self.word_at(language, rank).map(|word| LexicalEntry {
                    language,
                    rank,
                    word: word.to_string(),
                })
            })
            .collect()
    }
}
