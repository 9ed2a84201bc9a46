//! Merge, audit, and deduplicate the two record sets into the master table.

use ahash::{AHashMap, AHashSet};
use ordered_float::OrderedFloat;
use tracing::info;

use crate::config::{EngineConfig, DEFAULT_SIMILARITY_THRESHOLD};
use crate::similarity::grapheme_len;
use crate::types::{
    AuditStatus, LanguageCode, MasterCognateRecord, MatchType, NearCognateRecord,
    PerfectCognateRecord,
};

/// Near rows with a word at or below this length are flagged for review.
const REVIEW_MAX_WORD_LEN: usize = 2;

/// Quality classification applied to every master row.
///
/// Swappable: the default policy carries a known-false-friend table, but
/// any `Fn(&MasterCognateRecord) -> AuditStatus` can stand in.
pub trait AuditPolicy {
    fn classify(&self, row: &MasterCognateRecord) -> AuditStatus;
}

impl<F> AuditPolicy for F
where
    F: Fn(&MasterCognateRecord) -> AuditStatus,
{
    fn classify(&self, row: &MasterCognateRecord) -> AuditStatus {
        self(row)
    }
}

/// Default heuristic: perfect rows pass; near rows are flagged when a word
/// is very short, the score re-check fails, or the pair is a known false
/// friend.
pub struct DefaultAuditPolicy {
    /// Near rows scoring below this are flagged; a re-check of the
    /// detector's acceptance threshold.
    review_min_similarity: f64,
    /// english_reference -> foreign spellings known to be false friends.
    false_friends: AHashMap<&'static str, AHashSet<&'static str>>,
}

impl DefaultAuditPolicy {
    /// Policy whose score re-check tracks the run's configured threshold.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            review_min_similarity: config.similarity_threshold,
            ..Self::default()
        }
    }
}

impl Default for DefaultAuditPolicy {
    fn default() -> Self {
        let known: &[(&str, &[&str])] = &[
            ("home", &["maison"]),
            ("man", &["homme"]),
            ("book", &["libro"]),
            ("library", &["librería"]),
            ("actually", &["actualmente"]),
            ("embarrassed", &["embarazada"]),
            ("attend", &["attendre"]),
            ("demand", &["demander"]),
        ];

        let false_friends = known
            .iter()
            .map(|(gloss, words)| (*gloss, words.iter().copied().collect()))
            .collect();
        Self {
            review_min_similarity: DEFAULT_SIMILARITY_THRESHOLD,
            false_friends,
        }
    }
}

impl AuditPolicy for DefaultAuditPolicy {
    fn classify(&self, row: &MasterCognateRecord) -> AuditStatus {
        if row.match_type == MatchType::Perfect {
            return AuditStatus::Ok;
        }

        if grapheme_len(&row.word_a) <= REVIEW_MAX_WORD_LEN
            || grapheme_len(&row.word_b) <= REVIEW_MAX_WORD_LEN
            || row.similarity_score.0 < self.review_min_similarity
        {
            return AuditStatus::ManualReviewNeeded;
        }

        if let Some(words) = self.false_friends.get(row.english_reference.as_str()) {
            if words.contains(row.word_a.as_str()) || words.contains(row.word_b.as_str()) {
                return AuditStatus::ManualReviewNeeded;
            }
        }

        AuditStatus::Ok
    }
}

/// Outcome counters for one merge run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub perfect_rows: usize,
    pub near_rows: usize,
    pub removed_by_dedup: usize,
}

/// Unify both record sets into the deduplicated, rank-sorted master table.
///
/// A perfect record expands into one row per unordered language pair it
/// implies. When a (language pair, concept) key occurs in both sets, the
/// perfect row wins and the near row is dropped. Re-running on the same
/// inputs yields a byte-identical table.
pub fn merge_records(
    perfect: &[PerfectCognateRecord],
    near: &[NearCognateRecord],
    policy: &dyn AuditPolicy,
) -> (Vec<MasterCognateRecord>, MergeStats) {
    let mut rows = Vec::with_capacity(perfect.len() * 2 + near.len());

    for record in perfect {
        let members: Vec<LanguageCode> = record.languages.iter().copied().collect();
        for (idx, &lang_a) in members.iter().enumerate() {
            for &lang_b in &members[idx + 1..] {
                rows.push(MasterCognateRecord {
                    rank: record.rank,
                    english_reference: record.english_reference.clone(),
                    word_a: record.word.clone(),
                    word_b: record.word.clone(),
                    lang_a,
                    lang_b,
                    match_type: MatchType::Perfect,
                    similarity_score: OrderedFloat(1.0),
                    audit_status: AuditStatus::Ok,
                });
            }
        }
    }

    for record in near {
        rows.push(MasterCognateRecord {
            rank: record.rank,
            english_reference: record.english_reference.clone(),
            word_a: record.word_a.clone(),
            word_b: record.word_b.clone(),
            lang_a: record.lang_a,
            lang_b: record.lang_b,
            match_type: MatchType::Near,
            similarity_score: record.similarity,
            audit_status: AuditStatus::Ok,
        });
    }

    for row in &mut rows {
        row.audit_status = policy.classify(row);
    }

    // Perfect sorts before Near for equal keys, so the first row per key
    // is the one to keep.
    rows.sort_by(|a, b| {
        let key_a = a.pair_key();
        let key_b = b.pair_key();
        key_a
            .cmp(&key_b)
            .then_with(|| a.match_type.cmp(&b.match_type))
            .then_with(|| a.rank.cmp(&b.rank))
    });

    let before = rows.len();
    let mut seen: AHashSet<(LanguageCode, LanguageCode, String)> = AHashSet::new();
    rows.retain(|row| {
        let (lo, hi, gloss) = row.pair_key();
        seen.insert((lo, hi, gloss.to_string()))
    });
    let removed_by_dedup = before - rows.len();

    rows.sort_by(|a, b| {
        a.rank
            .cmp(&b.rank)
            .then_with(|| a.pair_key().cmp(&b.pair_key()))
    });

    let stats = MergeStats {
        perfect_rows: rows
            .iter()
            .filter(|r| r.match_type == MatchType::Perfect)
            .count(),
        near_rows: rows
            .iter()
            .filter(|r| r.match_type == MatchType::Near)
            .count(),
        removed_by_dedup,
    };

    info!(
        rows = rows.len(),
        removed = stats.removed_by_dedup,
        "merge and audit complete"
    );

    (rows, stats)
}
