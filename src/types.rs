//! Shared data structures for the cognate discovery engine.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::error::CognateError;

/// Closed set of language codes the engine accepts.
///
/// Unknown codes are rejected at load time instead of flowing through the
/// pipeline as opaque strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageCode {
    En,
    Es,
    Fr,
    It,
    Pt,
    Ro,
    Ca,
    Gl,
}

impl LanguageCode {
    /// All codes in their canonical sort order.
    pub const ALL: [LanguageCode; 8] = [
        LanguageCode::En,
        LanguageCode::Es,
        LanguageCode::Fr,
        LanguageCode::It,
        LanguageCode::Pt,
        LanguageCode::Ro,
        LanguageCode::Ca,
        LanguageCode::Gl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageCode::En => "en",
            LanguageCode::Es => "es",
            LanguageCode::Fr => "fr",
            LanguageCode::It => "it",
            LanguageCode::Pt => "pt",
            LanguageCode::Ro => "ro",
            LanguageCode::Ca => "ca",
            LanguageCode::Gl => "gl",
        }
    }

    /// English display name, used in cluster reports.
    pub fn name(&self) -> &'static str {
        match self {
            LanguageCode::En => "English",
            LanguageCode::Es => "Spanish",
            LanguageCode::Fr => "French",
            LanguageCode::It => "Italian",
            LanguageCode::Pt => "Portuguese",
            LanguageCode::Ro => "Romanian",
            LanguageCode::Ca => "Catalan",
            LanguageCode::Gl => "Galician",
        }
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageCode {
    type Err = CognateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "en" => Ok(LanguageCode::En),
            "es" => Ok(LanguageCode::Es),
            "fr" => Ok(LanguageCode::Fr),
            "it" => Ok(LanguageCode::It),
            "pt" => Ok(LanguageCode::Pt),
            "ro" => Ok(LanguageCode::Ro),
            "ca" => Ok(LanguageCode::Ca),
            "gl" => Ok(LanguageCode::Gl),
            other => Err(CognateError::UnknownLanguage {
                code: other.to_string(),
            }),
        }
    }
}

/// A single (language, rank) cell of the lexicon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexicalEntry {
    pub language: LanguageCode,
    /// 1-based frequency rank within the language's list.
    pub rank: u32,
    pub word: String,
}

/// Identical spelling shared by two or more languages at one rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerfectCognateRecord {
    pub rank: u32,
    pub english_reference: String,
    pub word: String,
    /// Contributing languages; cardinality is always >= 2.
    pub languages: BTreeSet<LanguageCode>,
    pub count: usize,
}

impl PerfectCognateRecord {
    pub fn new(
        rank: u32,
        english_reference: String,
        word: String,
        languages: BTreeSet<LanguageCode>,
    ) -> Self {
        let count = languages.len();
        Self {
            rank,
            english_reference,
            word,
            languages,
            count,
        }
    }
}

/// Similar-but-not-identical spelling between two languages at one rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NearCognateRecord {
    pub rank: u32,
    pub english_reference: String,
    pub lang_a: LanguageCode,
    pub word_a: String,
    pub lang_b: LanguageCode,
    pub word_b: String,
    /// Strictly inside (threshold, 1.0).
    pub similarity: OrderedFloat<f64>,
    /// Human-readable description of the spelling delta.
    pub pattern: String,
}

/// How a master row was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MatchType {
    Perfect,
    Near,
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchType::Perfect => f.write_str("Perfect"),
            MatchType::Near => f.write_str("Near"),
        }
    }
}

/// Coarse quality flag attached by the audit policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditStatus {
    Ok,
    ManualReviewNeeded,
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditStatus::Ok => f.write_str("OK"),
            AuditStatus::ManualReviewNeeded => f.write_str("Manual Review Needed"),
        }
    }
}

/// One row of the merged master table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterCognateRecord {
    pub rank: u32,
    pub english_reference: String,
    pub word_a: String,
    pub word_b: String,
    pub lang_a: LanguageCode,
    pub lang_b: LanguageCode,
    pub match_type: MatchType,
    pub similarity_score: OrderedFloat<f64>,
    pub audit_status: AuditStatus,
}

impl MasterCognateRecord {
    /// Deduplication identity: sorted language pair plus concept gloss.
    pub fn pair_key(&self) -> (LanguageCode, LanguageCode, &str) {
        let (lo, hi) = if self.lang_a <= self.lang_b {
            (self.lang_a, self.lang_b)
        } else {
            (self.lang_b, self.lang_a)
        };
        (lo, hi, self.english_reference.as_str())
    }
}
