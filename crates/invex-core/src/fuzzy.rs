//! Tolerant string matching against known vocabularies.
//!
//! General-purpose primitive kept alongside the extractors for catalog
//! reconciliation: given a query and a candidate set, pick the candidate
//! with the highest normalized edit-distance similarity.

use crate::text::normalize;

/// Find the best-matching candidate for `query`.
///
/// Both sides are normalized and lowercased before comparison. The score is
/// in `[0, 1]`: equal strings score 1.0, disjoint strings near 0.0. Ties are
/// broken by candidate order (the first maximal score wins), so callers may
/// rely on preferring earlier-listed canonical names. An empty candidate
/// slice yields `(None, 0.0)`.
pub fn best_match<'a>(query: &str, candidates: &'a [String]) -> (Option<&'a str>, f64) {
    let query_norm = normalize(query).to_lowercase();

    let mut best: Option<&str> = None;
    let mut score = 0.0;
    for candidate in candidates {
        let r = similarity(&query_norm, &normalize(candidate).to_lowercase());
        if r > score {
            best = Some(candidate.as_str());
            score = r;
        }
    }
    (best, score)
}

/// Similarity ratio derived from Levenshtein distance: `1 - d / max_len`.
fn similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    let a_len = a.chars().count();
    let b_len = b.chars().count();
    let max_len = a_len.max(b_len);
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / max_len as f64
}

/// Character-level Levenshtein distance, single-row dynamic programming.
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut prev_diag = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            let next = (row[j] + 1).min(row[j + 1] + 1).min(prev_diag + cost);
            prev_diag = row[j + 1];
            row[j + 1] = next;
        }
    }
    row[b.len()]
}
