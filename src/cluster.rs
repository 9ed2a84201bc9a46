//! Cluster and language-pair aggregation over perfect-cognate records.
//!
//! Pure reporting: everything here is re-derivable from the record set and
//! mutates nothing upstream.

use std::collections::BTreeSet;

use ahash::AHashMap;
use serde::Serialize;

use crate::config::EngineConfig;
use crate::types::{LanguageCode, PerfectCognateRecord};

/// Exact language-membership set a word was found in.
pub type ClusterKey = BTreeSet<LanguageCode>;

/// Aggregated view of the perfect-cognate record set.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterReport {
    /// Words grouped under the exact set of languages sharing them.
    pub clusters: Vec<(ClusterKey, Vec<String>)>,
    /// Co-occurrence count per unordered language pair.
    pub pair_counts: Vec<((LanguageCode, LanguageCode), usize)>,
    /// Words shared by the configured anchor pair (possibly among others).
    pub anchor_words: Vec<String>,
    pub anchor_pair: (LanguageCode, LanguageCode),
    /// Per-partner link counts for the configured hub language.
    pub hub_links: Vec<(LanguageCode, usize)>,
    pub hub_language: LanguageCode,
}

impl ClusterReport {
    /// Number of distinct language combinations.
    pub fn total_clusters(&self) -> usize {
        self.clusters.len()
    }

    /// Total words covered; each record lands in exactly one cluster.
    pub fn total_words(&self) -> usize {
        self.clusters.iter().map(|(_, words)| words.len()).sum()
    }

    /// Largest clusters by member count.
    pub fn top_clusters(&self, k: usize) -> &[(ClusterKey, Vec<String>)] {
        &self.clusters[..k.min(self.clusters.len())]
    }

    /// Most frequently co-occurring language pairs.
    pub fn top_pairs(&self, k: usize) -> &[((LanguageCode, LanguageCode), usize)] {
        &self.pair_counts[..k.min(self.pair_counts.len())]
    }

    /// Total hub links, with multiplicity across partners.
    pub fn hub_total(&self) -> usize {
        self.hub_links.iter().map(|(_, count)| count).sum()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Aggregate clusters, pair counts, and the anchor/hub views from the
/// perfect record set.
///
/// Clusters are ordered largest-first (ties by key), pair counts
/// highest-first (ties by pair), so reports are reproducible.
pub fn aggregate_clusters(
    records: &[PerfectCognateRecord],
    config: &EngineConfig,
) -> ClusterReport {
    let (anchor_a, anchor_b) = config.anchor_pair;
    let hub = config.hub_language;

    let mut clusters: AHashMap<ClusterKey, Vec<String>> = AHashMap::new();
    let mut pair_counts: AHashMap<(LanguageCode, LanguageCode), usize> = AHashMap::new();
    let mut anchor_words = Vec::new();
    let mut hub_counts: AHashMap<LanguageCode, usize> = AHashMap::new();

    for record in records {
        clusters
            .entry(record.languages.clone())
            .or_default()
            .push(record.word.clone());

        let members: Vec<LanguageCode> = record.languages.iter().copied().collect();
        for (idx, &a) in members.iter().enumerate() {
            for &b in &members[idx + 1..] {
                *pair_counts.entry((a, b)).or_insert(0) += 1;
            }
        }

        if record.languages.contains(&anchor_a) && record.languages.contains(&anchor_b) {
            anchor_words.push(record.word.clone());
        }

        if record.languages.contains(&hub) {
            for &other in &record.languages {
                if other != hub {
                    *hub_counts.entry(other).or_insert(0) += 1;
                }
            }
        }
    }

    let mut clusters: Vec<_> = clusters.into_iter().collect();
    clusters.sort_by(|(key_a, words_a), (key_b, words_b)| {
        words_b
            .len()
            .cmp(&words_a.len())
            .then_with(|| key_a.cmp(key_b))
    });

    let mut pair_counts: Vec<_> = pair_counts.into_iter().collect();
    pair_counts.sort_by(|(pair_a, count_a), (pair_b, count_b)| {
        count_b.cmp(count_a).then_with(|| pair_a.cmp(pair_b))
    });

    let mut hub_links: Vec<_> = hub_counts.into_iter().collect();
    hub_links.sort_by(|(lang_a, count_a), (lang_b, count_b)| {
        count_b.cmp(count_a).then_with(|| lang_a.cmp(lang_b))
    });

    ClusterReport {
        clusters,
        pair_counts,
        anchor_words,
        anchor_pair: (anchor_a, anchor_b),
        hub_links,
        hub_language: hub,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(rank: u32, word: &str, languages: &[LanguageCode]) -> PerfectCognateRecord {
        PerfectCognateRecord::new(
            rank,
            word.to_string(),
            word.to_string(),
            languages.iter().copied().collect(),
        )
    }

    fn sample() -> Vec<PerfectCognateRecord> {
        vec![
            record(1, "hotel", &[LanguageCode::En, LanguageCode::Es, LanguageCode::It]),
            record(2, "taxi", &[LanguageCode::Es, LanguageCode::It]),
            record(3, "metro", &[LanguageCode::Es, LanguageCode::It]),
            record(4, "lege", &[LanguageCode::Ro, LanguageCode::It]),
        ]
    }

    #[test]
    fn cluster_sizes_sum_to_record_count() {
        let records = sample();
        let report = aggregate_clusters(&records, &EngineConfig::default());
        assert_eq!(report.total_words(), records.len());
    }

    #[test]
    fn clusters_key_on_exact_language_set() {
        let report = aggregate_clusters(&sample(), &EngineConfig::default());
        // {es,it} and {en,es,it} are distinct clusters.
        assert_eq!(report.total_clusters(), 3);

        let biggest = &report.top_clusters(1)[0];
        assert_eq!(biggest.1, vec!["taxi".to_string(), "metro".to_string()]);
    }

    #[test]
    fn pair_counts_cover_all_unordered_pairs() {
        let report = aggregate_clusters(&sample(), &EngineConfig::default());
        let count_of = |a: LanguageCode, b: LanguageCode| {
            report
                .pair_counts
                .iter()
                .find(|((x, y), _)| (*x, *y) == (a, b))
                .map(|(_, c)| *c)
                .unwrap_or(0)
        };

        // es-it appears in hotel, taxi, metro.
        assert_eq!(count_of(LanguageCode::Es, LanguageCode::It), 3);
        assert_eq!(count_of(LanguageCode::En, LanguageCode::Es), 1);
        assert_eq!(count_of(LanguageCode::It, LanguageCode::Ro), 1);
        assert_eq!(report.top_pairs(1)[0].0, (LanguageCode::Es, LanguageCode::It));
    }

    #[test]
    fn anchor_words_include_supersets() {
        let report = aggregate_clusters(&sample(), &EngineConfig::default());
        assert_eq!(report.anchor_words, vec!["hotel", "taxi", "metro"]);
    }

    #[test]
    fn hub_links_count_each_partner() {
        let report = aggregate_clusters(&sample(), &EngineConfig::default());
        assert_eq!(report.hub_links, vec![(LanguageCode::It, 1)]);
        assert_eq!(report.hub_total(), 1);
    }

    #[test]
    fn report_serializes_to_json() {
        let report = aggregate_clusters(&sample(), &EngineConfig::default());
        let json = report.to_json().unwrap();
        assert!(json.contains("\"clusters\""));
        assert!(json.contains("\"pair_counts\""));
    }

    #[test]
    fn empty_input_is_an_empty_report() {
        let report = aggregate_clusters(&[], &EngineConfig::default());
        assert_eq!(report.total_clusters(), 0);
        assert_eq!(report.total_words(), 0);
        assert!(report.anchor_words.is_empty());
    }
}
