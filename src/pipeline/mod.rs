//! The unified search pipeline.
//!
//! A search runs through fixed stages: domain classification gates which
//! providers participate, the active adapters are queried concurrently with
//! per-call timeouts and fault isolation, sparse aggregations trigger one
//! broader arXiv backfill query, and the merged papers then flow through
//! dedup, relevance scoring, ranking, year filtering, and the result cap.
//!
//! Individual provider failures never fail a search; only the case where
//! every provider and the backfill are unreachable surfaces as an error.

mod dedup;
mod domain;
mod finalize;
mod relevance;

pub use dedup::dedupe;
pub use domain::{detect_domain, Domain};
pub use finalize::finalize;
pub use relevance::{apply_relevance, query_words, score};

use std::sync::Arc;

use futures_util::future::join_all;
use tokio::time::timeout;

use crate::config::SearchConfig;
use crate::models::{Paper, SearchRequest, SearchResponse, SourceQuery};
use crate::sources::{ArxivSource, OpenAlexSource, SemanticScholarSource, Source};

/// Errors the pipeline can surface to its caller.
///
/// Per-provider failures are absorbed during aggregation; these are the only
/// two conditions a caller ever sees.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The request violated a documented precondition.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Every provider failed and the backfill query also failed.
    #[error("Search failed: {0}")]
    AllSourcesFailed(String),
}

/// What aggregation produced: the merged pre-dedup papers and the providers
/// that contributed at least one of them.
#[derive(Debug)]
struct Aggregation {
    papers: Vec<Paper>,
    sources: Vec<String>,
}

/// Multi-provider search pipeline.
///
/// Owns one adapter per provider; adapters are injectable for testing.
#[derive(Debug, Clone)]
pub struct UnifiedSearch {
    arxiv: Arc<dyn Source>,
    openalex: Arc<dyn Source>,
    semantic: Arc<dyn Source>,
    config: SearchConfig,
}

impl UnifiedSearch {
    /// Create a pipeline over the real provider adapters.
    pub fn new(config: SearchConfig) -> Self {
        Self {
            arxiv: Arc::new(ArxivSource::new()),
            openalex: Arc::new(OpenAlexSource::new()),
            semantic: Arc::new(SemanticScholarSource::new()),
            config,
        }
    }

    /// Create a pipeline over caller-supplied adapters.
    pub fn with_sources(
        arxiv: Arc<dyn Source>,
        openalex: Arc<dyn Source>,
        semantic: Arc<dyn Source>,
        config: SearchConfig,
    ) -> Self {
        Self {
            arxiv,
            openalex,
            semantic,
            config,
        }
    }

    /// Run a full search: aggregate, dedupe, score, rank, filter, cap.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        self.validate(request)?;

        let max_results = request
            .max_results
            .unwrap_or(self.config.default_max_results);

        let aggregation = self.aggregate(request).await?;
        tracing::info!(
            collected = aggregation.papers.len(),
            sources = aggregation.sources.len(),
            query = %request.query,
            "aggregation complete"
        );

        let unique = dedupe(aggregation.papers, self.config.dedup_similarity);
        tracing::debug!(unique = unique.len(), "after dedup");

        let ranked = apply_relevance(unique, &request.query, &self.config.relevance);

        let results = finalize(
            ranked,
            request.year_range(),
            max_results,
            self.config.year_filter,
        );

        tracing::info!(results = results.len(), query = %request.query, "search complete");

        Ok(SearchResponse::new(
            results,
            aggregation.sources,
            request.query.as_str(),
        ))
    }

    /// Check the documented request preconditions.
    fn validate(&self, request: &SearchRequest) -> Result<(), SearchError> {
        if request.query.trim().is_empty() {
            return Err(SearchError::InvalidRequest(
                "query must not be empty".to_string(),
            ));
        }

        if let (Some(start), Some(end)) = (request.start_year, request.end_year) {
            if start > end {
                return Err(SearchError::InvalidRequest(format!(
                    "start year {} is after end year {}",
                    start, end
                )));
            }
        }

        if request.max_results == Some(0) {
            return Err(SearchError::InvalidRequest(
                "max results must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Fan out to the active providers, merge their results, and backfill
    /// from arXiv when the merged set is sparse.
    async fn aggregate(&self, request: &SearchRequest) -> Result<Aggregation, SearchError> {
        let domain = detect_domain(&request.query);

        // arXiv has weak biomedical coverage; skip it for medical queries.
        let active: Vec<Arc<dyn Source>> = match domain {
            Domain::Medical => vec![Arc::clone(&self.openalex), Arc::clone(&self.semantic)],
            Domain::General => vec![
                Arc::clone(&self.arxiv),
                Arc::clone(&self.openalex),
                Arc::clone(&self.semantic),
            ],
        };

        tracing::info!(
            domain = ?domain,
            providers = active.len(),
            per_source = self.config.results_per_source,
            "starting fan-out"
        );

        let query = SourceQuery::new(request.query.as_str(), self.config.results_per_source)
            .years(request.year_range());
        let per_call_timeout = self.config.source_timeout();

        let calls = active.iter().map(|source| {
            let source = Arc::clone(source);
            let query = query.clone();
            async move {
                let name = source.name().to_string();
                match timeout(per_call_timeout, source.search(&query)).await {
                    Ok(Ok(results)) => (name, Some(results.papers)),
                    Ok(Err(error)) => {
                        tracing::warn!(source = source.id(), %error, "provider search failed");
                        (name, None)
                    }
                    Err(_) => {
                        tracing::warn!(source = source.id(), "provider search timed out");
                        (name, None)
                    }
                }
            }
        });

        let outcomes = join_all(calls).await;

        let mut papers: Vec<Paper> = Vec::new();
        let mut sources: Vec<String> = Vec::new();
        let mut failed = 0usize;

        for (name, outcome) in outcomes {
            match outcome {
                Some(provider_papers) => {
                    if !provider_papers.is_empty() {
                        sources.push(name);
                    }
                    papers.extend(provider_papers);
                }
                None => failed += 1,
            }
        }

        let attempted = active.len();

        if papers.len() < self.config.backfill_threshold {
            tracing::info!(
                collected = papers.len(),
                threshold = self.config.backfill_threshold,
                "sparse aggregation, querying arXiv backfill"
            );

            let backfill_query =
                SourceQuery::new(request.query.as_str(), self.config.backfill_limit);

            match timeout(per_call_timeout, self.arxiv.search(&backfill_query)).await {
                Ok(Ok(results)) => {
                    if !results.papers.is_empty() {
                        let arxiv_name = self.arxiv.name().to_string();
                        if !sources.contains(&arxiv_name) {
                            sources.push(arxiv_name);
                        }
                        papers.extend(results.papers);
                    }
                }
                Ok(Err(error)) => {
                    tracing::warn!(%error, "arXiv backfill failed");
                    if failed == attempted {
                        return Err(SearchError::AllSourcesFailed(format!(
                            "all {} providers failed and the arXiv backfill also failed",
                            attempted
                        )));
                    }
                }
                Err(_) => {
                    tracing::warn!("arXiv backfill timed out");
                    if failed == attempted {
                        return Err(SearchError::AllSourcesFailed(format!(
                            "all {} providers failed and the arXiv backfill timed out",
                            attempted
                        )));
                    }
                }
            }
        }

        Ok(Aggregation { papers, sources })
    }
}

impl Default for UnifiedSearch {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceType;
    use crate::sources::mock::{make_paper, MockSource};

    fn pipeline_with(
        arxiv: Arc<MockSource>,
        openalex: Arc<MockSource>,
        semantic: Arc<MockSource>,
    ) -> UnifiedSearch {
        UnifiedSearch::with_sources(arxiv, openalex, semantic, SearchConfig::default())
    }

    fn mock_sources() -> (Arc<MockSource>, Arc<MockSource>, Arc<MockSource>) {
        (
            Arc::new(MockSource::new("arxiv", "ArXiv")),
            Arc::new(MockSource::new("openalex", "OpenAlex")),
            Arc::new(MockSource::new("semantic", "Semantic Scholar")),
        )
    }

    #[tokio::test]
    async fn test_empty_query_rejected() {
        let (arxiv, openalex, semantic) = mock_sources();
        let pipeline = pipeline_with(arxiv, openalex, semantic);

        let result = pipeline.search(&SearchRequest::new("   ")).await;
        assert!(matches!(result, Err(SearchError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_inverted_year_range_rejected() {
        let (arxiv, openalex, semantic) = mock_sources();
        let pipeline = pipeline_with(arxiv, openalex, semantic);

        let request = SearchRequest::new("valid query").years(2024, 2020);
        let result = pipeline.search(&request).await;
        assert!(matches!(result, Err(SearchError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_zero_cap_rejected() {
        let (arxiv, openalex, semantic) = mock_sources();
        let pipeline = pipeline_with(arxiv, openalex, semantic);

        let request = SearchRequest::new("valid query").max_results(0);
        let result = pipeline.search(&request).await;
        assert!(matches!(result, Err(SearchError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_all_sources_down_surfaces_aggregate_error() {
        let (arxiv, openalex, semantic) = mock_sources();
        arxiv.enqueue_error("down");
        openalex.enqueue_error("down");
        semantic.enqueue_error("down");
        arxiv.enqueue_error("backfill down too");

        let pipeline = pipeline_with(arxiv, openalex, semantic);
        let result = pipeline.search(&SearchRequest::new("anything at all")).await;

        assert!(matches!(result, Err(SearchError::AllSourcesFailed(_))));
    }

    #[tokio::test]
    async fn test_partial_failure_still_succeeds() {
        let (arxiv, openalex, semantic) = mock_sources();
        arxiv.enqueue_error("down");
        openalex.enqueue_papers(vec![
            make_paper("o1", "topic paper one", 2023, SourceType::OpenAlex),
            make_paper("o2", "topic paper two", 2022, SourceType::OpenAlex),
            make_paper("o3", "topic paper three", 2021, SourceType::OpenAlex),
        ]);
        semantic.enqueue_papers(vec![make_paper(
            "s1",
            "topic paper four",
            2024,
            SourceType::SemanticScholar,
        )]);

        let pipeline = pipeline_with(arxiv, openalex, semantic);
        let response = pipeline.search(&SearchRequest::new("topic paper")).await.unwrap();

        assert_eq!(response.results.len(), 4);
        assert!(response.sources.contains(&"OpenAlex".to_string()));
        assert!(response.sources.contains(&"Semantic Scholar".to_string()));
        assert!(!response.sources.contains(&"ArXiv".to_string()));
    }
}
