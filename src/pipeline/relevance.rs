//! Relevance scoring and ranking against the search query.

use crate::config::RelevanceConfig;
use crate::models::Paper;

/// Split a query into scoring words: lowercased, longer than two characters.
pub fn query_words(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .filter(|w| w.len() > 2)
        .map(|w| w.to_string())
        .collect()
}

/// Score a paper against a query, returning a value in [0, 1].
///
/// Occurrences of each query word are counted in the title (×3), the
/// abstract (×1), and the authors string (×0.5), summed, then normalized by
/// `|words| * per_word_ceiling`. When every query word appears at least once
/// in title or abstract, `full_match_bonus` is added. Both the normalized
/// score and the bonus result are clamped to 1.0. A query with no scoring
/// words (all tokens of length <= 2) scores 0.0.
pub fn score(paper: &Paper, query: &str, config: &RelevanceConfig) -> f64 {
    let words = query_words(query);
    if words.is_empty() {
        return 0.0;
    }

    let title = paper.title.to_lowercase();
    let summary = paper.summary.to_lowercase();
    let authors = paper.authors.to_lowercase();

    let mut raw = 0.0;
    let mut matched = 0usize;

    for word in &words {
        let in_title = title.matches(word.as_str()).count();
        let in_summary = summary.matches(word.as_str()).count();
        let in_authors = authors.matches(word.as_str()).count();

        raw += in_title as f64 * 3.0 + in_summary as f64 + in_authors as f64 * 0.5;

        if in_title > 0 || in_summary > 0 {
            matched += 1;
        }
    }

    let normalized = (raw / (words.len() as f64 * config.per_word_ceiling)).min(1.0);

    if matched == words.len() {
        (normalized + config.full_match_bonus).min(1.0)
    } else {
        normalized
    }
}

/// Score, gate, and rank a deduplicated paper set.
///
/// Every paper gets its `relevance_score` set. Papers below the threshold are
/// dropped, unless that would drop all of them, in which case the unfiltered
/// scored set is kept: the relevance gate alone never empties a non-empty
/// result. Ranking is two-tier: scores are quantized into `tie_epsilon`-wide
/// bands and papers in the same band rank by year descending, so near-equal
/// relevance defers to recency. Quantizing keeps the comparator a total
/// order, which a raw pairwise epsilon comparison is not.
pub fn apply_relevance(papers: Vec<Paper>, query: &str, config: &RelevanceConfig) -> Vec<Paper> {
    let scored: Vec<Paper> = papers
        .into_iter()
        .map(|mut paper| {
            paper.relevance_score = Some(score(&paper, query, config));
            paper
        })
        .collect();

    let relevant: Vec<Paper> = scored
        .iter()
        .filter(|p| p.relevance() >= config.threshold)
        .cloned()
        .collect();

    tracing::debug!(
        relevant = relevant.len(),
        total = scored.len(),
        "relevance gate"
    );

    let mut ranked = if relevant.is_empty() { scored } else { relevant };

    let epsilon = config.tie_epsilon.max(f64::EPSILON);
    let band = |p: &Paper| (p.relevance() / epsilon).floor() as i64;

    ranked.sort_by(|a, b| {
        band(b)
            .cmp(&band(a))
            .then_with(|| b.year.cmp(&a.year))
            .then_with(|| {
                b.relevance()
                    .partial_cmp(&a.relevance())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    });

    ranked
}
