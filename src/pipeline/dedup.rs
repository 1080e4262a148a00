//! Near-duplicate collapsing by fuzzy title match.

use crate::models::Paper;

/// Remove near-duplicate papers, keeping the first occurrence of each title.
///
/// Titles are normalized (lowercased, trimmed) and compared by word overlap:
/// two titles are duplicates when they are identical or when
/// `|common words| / max(|words a|, |words b|)` exceeds `similarity_threshold`.
/// Every incoming title is compared against all previously kept titles, so
/// this is O(n²) in the number of candidates — acceptable at this pipeline's
/// scale of tens of papers.
pub fn dedupe(papers: Vec<Paper>, similarity_threshold: f64) -> Vec<Paper> {
    let mut seen: Vec<String> = Vec::new();
    let mut unique = Vec::new();

    for paper in papers {
        let normalized = paper.title.to_lowercase().trim().to_string();

        let is_duplicate = seen
            .iter()
            .any(|kept| titles_similar(&normalized, kept, similarity_threshold));

        if !is_duplicate {
            seen.push(normalized);
            unique.push(paper);
        }
    }

    unique
}

/// Whether two normalized titles refer to the same paper.
fn titles_similar(a: &str, b: &str, threshold: f64) -> bool {
    if a == b {
        return true;
    }

    word_overlap(a, b) > threshold
}

/// Word-overlap similarity between two normalized titles.
///
/// `|common words| / max(|words a|, |words b|)`; 0.0 when either side has no
/// words (identical empties are handled by the equality check above).
fn word_overlap(a: &str, b: &str) -> f64 {
    let words_a: Vec<&str> = a.split_whitespace().collect();
    let words_b: Vec<&str> = b.split_whitespace().collect();

    let longest = words_a.len().max(words_b.len());
    if longest == 0 {
        return 0.0;
    }

    let common = words_a.iter().filter(|w| words_b.contains(w)).count();

    common as f64 / longest as f64
}
