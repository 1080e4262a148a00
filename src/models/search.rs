//! Search request, per-source query, and response models.

use serde::{Deserialize, Serialize};

use crate::models::Paper;

/// Inclusive publication-year range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Whether the range pins a single year.
    pub fn is_single_year(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }
}

/// A search request as supplied by the caller.
///
/// Preconditions (re-checked by the pipeline, documented for upstream
/// validators): `query` non-empty after trimming, `start_year <= end_year`
/// when both are given, `max_results >= 1` when given. A single-sided year
/// bound is ignored; a range takes effect only when both ends are present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free-text topic query.
    pub query: String,

    /// First year of the requested range (inclusive).
    pub start_year: Option<i32>,

    /// Last year of the requested range (inclusive).
    pub end_year: Option<i32>,

    /// Cap on the number of papers returned; defaults to the configured cap.
    pub max_results: Option<usize>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            start_year: None,
            end_year: None,
            max_results: None,
        }
    }

    /// Set both ends of the year range.
    pub fn years(mut self, start: i32, end: i32) -> Self {
        self.start_year = Some(start);
        self.end_year = Some(end);
        self
    }

    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = Some(max);
        self
    }

    /// The effective year range, present only when both ends were supplied.
    pub fn year_range(&self) -> Option<YearRange> {
        match (self.start_year, self.end_year) {
            (Some(start), Some(end)) => Some(YearRange::new(start, end)),
            _ => None,
        }
    }
}

/// Query handed to a single source adapter.
#[derive(Debug, Clone)]
pub struct SourceQuery {
    /// Free-text topic query.
    pub query: String,

    /// Maximum results the adapter should request from its provider.
    pub limit: usize,

    /// Publication-year restriction, when the caller supplied one.
    pub years: Option<YearRange>,
}

impl SourceQuery {
    pub fn new(query: impl Into<String>, limit: usize) -> Self {
        Self {
            query: query.into(),
            limit,
            years: None,
        }
    }

    pub fn years(mut self, years: Option<YearRange>) -> Self {
        self.years = years;
        self
    }
}

/// What a single adapter returns from a successful provider call.
#[derive(Debug, Clone)]
pub struct SourceResults {
    /// Normalized papers, in provider order.
    pub papers: Vec<Paper>,

    /// Provider-reported total hit count (may exceed `papers.len()`).
    pub total_results: usize,
}

impl SourceResults {
    pub fn new(papers: Vec<Paper>, total_results: usize) -> Self {
        Self {
            papers,
            total_results,
        }
    }
}

/// The consolidated, ranked, capped result of a unified search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Papers in final rank order.
    pub results: Vec<Paper>,

    /// Count of `results`.
    pub total_results: usize,

    /// Providers that contributed at least one paper during aggregation.
    pub sources: Vec<String>,

    /// The query string that was searched.
    pub query: String,
}

impl SearchResponse {
    pub fn new(results: Vec<Paper>, sources: Vec<String>, query: impl Into<String>) -> Self {
        let total_results = results.len();
        Self {
            results,
            total_results,
            sources,
            query: query.into(),
        }
    }
}
