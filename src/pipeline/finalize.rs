//! Year-range filtering and result capping.

use chrono::{Datelike, Utc};

use crate::config::YearFilterMode;
use crate::models::{Paper, YearRange};

/// Apply the year-range post-filter and the result cap, preserving rank order.
///
/// The strict mode drops every paper outside the range even when that leaves
/// nothing. The relaxed mode reproduces the older behavior of showing recent
/// work when the strict range matches nothing: papers from the start year
/// onward, plus the two most recent calendar years.
pub fn finalize(
    papers: Vec<Paper>,
    years: Option<YearRange>,
    max_results: usize,
    mode: YearFilterMode,
) -> Vec<Paper> {
    let mut papers = match years {
        Some(range) => filter_years(papers, range, mode),
        None => papers,
    };

    if papers.len() > max_results {
        tracing::debug!(
            kept = max_results,
            dropped = papers.len() - max_results,
            "capping results"
        );
        papers.truncate(max_results);
    }

    papers
}

fn filter_years(papers: Vec<Paper>, range: YearRange, mode: YearFilterMode) -> Vec<Paper> {
    let strict: Vec<Paper> = papers
        .iter()
        .filter(|p| range.contains(p.year))
        .cloned()
        .collect();

    match mode {
        YearFilterMode::Strict => strict,
        YearFilterMode::Relaxed => {
            if !strict.is_empty() {
                return strict;
            }

            let current = Utc::now().year();
            papers
                .into_iter()
                .filter(|p| p.year >= range.start || p.year == current || p.year == current - 1)
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceType;
    use crate::sources::mock::make_paper;

    fn papers_for_years(years: &[i32]) -> Vec<Paper> {
        years
            .iter()
            .enumerate()
            .map(|(i, &year)| {
                make_paper(&format!("p{}", i), &format!("Paper {}", i), year, SourceType::ArXiv)
            })
            .collect()
    }

    #[test]
    fn test_strict_filter_is_exact() {
        let papers = papers_for_years(&[2022, 2023, 2024, 2025]);
        let kept = finalize(
            papers,
            Some(YearRange::new(2023, 2024)),
            20,
            YearFilterMode::Strict,
        );

        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|p| (2023..=2024).contains(&p.year)));
    }

    #[test]
    fn test_strict_filter_may_empty_the_result() {
        let papers = papers_for_years(&[2018, 2019]);
        let kept = finalize(
            papers,
            Some(YearRange::new(2023, 2024)),
            20,
            YearFilterMode::Strict,
        );

        assert!(kept.is_empty());
    }

    #[test]
    fn test_relaxed_filter_prefers_strict_matches() {
        let papers = papers_for_years(&[2022, 2023]);
        let kept = finalize(
            papers,
            Some(YearRange::new(2023, 2023)),
            20,
            YearFilterMode::Relaxed,
        );

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].year, 2023);
    }

    #[test]
    fn test_relaxed_filter_falls_back_to_recent() {
        let current = Utc::now().year();
        let papers = papers_for_years(&[2010, current]);

        // The range matches nothing; the current-year paper survives.
        let kept = finalize(
            papers,
            Some(YearRange::new(2015, 2016)),
            20,
            YearFilterMode::Relaxed,
        );

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].year, current);
    }

    #[test]
    fn test_cap_preserves_rank_order() {
        let papers = papers_for_years(&[2024, 2023, 2022, 2021, 2020, 2019, 2018]);
        let kept = finalize(papers, None, 5, YearFilterMode::Strict);

        assert_eq!(kept.len(), 5);
        let ids: Vec<&str> = kept.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p0", "p1", "p2", "p3", "p4"]);
    }

    #[test]
    fn test_no_range_no_filter() {
        let papers = papers_for_years(&[1999, 2024]);
        assert_eq!(finalize(papers, None, 20, YearFilterMode::Strict).len(), 2);
    }
}
