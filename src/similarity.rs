//! Orthographic similarity scoring and spelling-delta extraction.
//!
//! The ratio is a gestalt sequence match: recursively find the longest
//! common block of the two words, recurse on the unmatched halves, and
//! score `2 * M / (|A| + |B|)` where `M` is the total matched length.
//! All indexing is over grapheme clusters, not bytes.

use ahash::AHashMap;
use unicode_segmentation::UnicodeSegmentation;

/// Word length in grapheme clusters.
pub fn grapheme_len(s: &str) -> usize {
    s.graphemes(true).count()
}

/// Gestalt similarity ratio in [0.0, 1.0]; 1.0 iff the words are identical.
pub fn gestalt_ratio(a: &str, b: &str) -> f64 {
    let segs_a: Vec<&str> = a.graphemes(true).collect();
    let segs_b: Vec<&str> = b.graphemes(true).collect();

    let total = segs_a.len() + segs_b.len();
    if total == 0 {
        return 1.0; // Both empty = identical
    }

    let matched = matched_len(&segs_a, &segs_b, 0, segs_a.len(), 0, segs_b.len());
    2.0 * matched as f64 / total as f64
}

/// Total matched-character length over all matching blocks.
fn matched_len(
    a: &[&str],
    b: &[&str],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> usize {
    let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
    if k == 0 {
        return 0;
    }
    k + matched_len(a, b, alo, i, blo, j) + matched_len(a, b, i + k, ahi, j + k, bhi)
}

/// Longest contiguous matching block within `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Returns `(i, j, size)`; ties resolve to the earliest block so the
/// recursion is deterministic.
fn longest_match(
    a: &[&str],
    b: &[&str],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let mut best = (alo, blo, 0usize);
    // run_lens[j] = length of the match ending at (i, j)
    let mut run_lens: AHashMap<usize, usize> = AHashMap::new();

    for i in alo..ahi {
        let mut new_runs: AHashMap<usize, usize> = AHashMap::new();
        for j in blo..bhi {
            if a[i] == b[j] {
                let k = if j == blo {
                    1
                } else {
                    run_lens.get(&(j - 1)).copied().unwrap_or(0) + 1
                };
                new_runs.insert(j, k);
                if k > best.2 {
                    best = (i + 1 - k, j + 1 - k, k);
                }
            }
        }
        run_lens = new_runs;
    }

    best
}

/// Length of the longest common prefix, in grapheme clusters.
pub fn common_prefix_len(a: &str, b: &str) -> usize {
    a.graphemes(true)
        .zip(b.graphemes(true))
        .take_while(|(ga, gb)| ga == gb)
        .count()
}

/// Length of the longest common suffix, in grapheme clusters.
pub fn common_suffix_len(a: &str, b: &str) -> usize {
    a.graphemes(true)
        .rev()
        .zip(b.graphemes(true).rev())
        .take_while(|(ga, gb)| ga == gb)
        .count()
}

/// Describe the spelling delta between two words by factoring out the
/// longest common prefix and suffix.
///
/// Prefix and suffix are clamped so they never overlap; when they would,
/// the suffix shrinks first. Yields `delta: '<mid_a>' vs '<mid_b>'` for a
/// localized difference, `delta_whole: ...` when no localized middle is
/// extractable, and an empty string for identical or empty inputs.
pub fn pattern_delta(a: &str, b: &str) -> String {
    if a.is_empty() || b.is_empty() {
        return String::new();
    }

    let segs_a: Vec<&str> = a.graphemes(true).collect();
    let segs_b: Vec<&str> = b.graphemes(true).collect();

    let prefix_len = common_prefix_len(a, b);
    let mut suffix_len = common_suffix_len(a, b);

    let max_common = segs_a.len().min(segs_b.len());
    if prefix_len + suffix_len > max_common {
        suffix_len = max_common - prefix_len;
    }

    let mid_a: String = segs_a[prefix_len..segs_a.len() - suffix_len].concat();
    let mid_b: String = segs_b[prefix_len..segs_b.len() - suffix_len].concat();

    if !mid_a.is_empty() || !mid_b.is_empty() {
        return format!("delta: '{mid_a}' vs '{mid_b}'");
    }

    if a != b {
        return format!("delta_whole: '{a}' vs '{b}'");
    }

    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_words_score_one() {
        assert_eq!(gestalt_ratio("hotel", "hotel"), 1.0);
        assert_eq!(gestalt_ratio("", ""), 1.0);
    }

    #[test]
    fn disjoint_words_score_zero() {
        assert_eq!(gestalt_ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn ratio_matches_gestalt_definition() {
        // "nacion" vs "nacao": blocks "nac" (3) + "o" (1), 2*4/11.
        let ratio = gestalt_ratio("nacion", "nacao");
        assert!((ratio - 8.0 / 11.0).abs() < 1e-9);
    }

    #[test]
    fn non_identical_strictly_below_one() {
        let ratio = gestalt_ratio("nation", "nations");
        assert!(ratio > 0.7 && ratio < 1.0);
    }

    #[test]
    fn diacritics_are_distinct_graphemes() {
        let ratio = gestalt_ratio("hotel", "hôtel");
        assert!(ratio < 1.0);
    }

    #[test]
    fn prefix_and_suffix_lengths() {
        assert_eq!(common_prefix_len("nacion", "nacao"), 3);
        assert_eq!(common_suffix_len("nacion", "nacao"), 0);
        assert_eq!(common_suffix_len("importante", "important"), 0);
        assert_eq!(common_suffix_len("attention", "atencion"), 3);
    }

    #[test]
    fn delta_reconstructs_both_words() {
        let (a, b) = ("nacion", "nacao");
        let prefix_len = common_prefix_len(a, b);
        let mut suffix_len = common_suffix_len(a, b);
        let max_common = grapheme_len(a).min(grapheme_len(b));
        if prefix_len + suffix_len > max_common {
            suffix_len = max_common - prefix_len;
        }

        let delta = pattern_delta(a, b);
        assert_eq!(delta, "delta: 'ion' vs 'ao'");

        let prefix: String = a.chars().take(prefix_len).collect();
        let suffix: String = a.chars().skip(a.chars().count() - suffix_len).collect();
        assert_eq!(format!("{prefix}ion{suffix}"), a);
        assert_eq!(format!("{prefix}ao{suffix}"), b);
    }

    #[test]
    fn delta_clamps_overlapping_affixes() {
        // Prefix "ab", suffix "b": overlap on the shorter word forces the
        // suffix to shrink rather than double-count.
        let delta = pattern_delta("ab", "abb");
        assert_eq!(delta, "delta: '' vs 'b'");
    }

    #[test]
    fn delta_empty_for_identical_or_empty() {
        assert_eq!(pattern_delta("hotel", "hotel"), "");
        assert_eq!(pattern_delta("", "hotel"), "");
    }
}
