//! Semantic Scholar source adapter.

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use serde::Deserialize;

use crate::models::{Paper, PaperBuilder, SourceQuery, SourceResults, SourceType};
use crate::sources::{squash_whitespace, Source, SourceError};
use crate::utils::{api_retry_config, with_retry, HttpClient};

/// Base URL for the Semantic Scholar paper-search API.
const SEMANTIC_API_URL: &str = "https://api.semanticscholar.org/graph/v1/paper/search";

/// Fields requested from the API for every paper.
const SEMANTIC_FIELDS: &str = "title,authors,year,abstract,url,citationCount,venue,openAccessPdf";

/// Semantic Scholar source adapter.
///
/// Sends a plain free-text query with a fixed field projection. The API has
/// no publication-year filter, so when the caller pins a single year the
/// adapter filters client-side after the fetch.
#[derive(Debug, Clone)]
pub struct SemanticScholarSource {
    client: HttpClient,
    base_url: String,
}

impl SemanticScholarSource {
    /// Create a new Semantic Scholar adapter with its own HTTP client.
    pub fn new() -> Self {
        Self {
            client: HttpClient::new(),
            base_url: SEMANTIC_API_URL.to_string(),
        }
    }

    /// Create with a custom HTTP client.
    pub fn with_client(client: HttpClient) -> Self {
        Self {
            client,
            base_url: SEMANTIC_API_URL.to_string(),
        }
    }

    /// Point the adapter at a different endpoint (for tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build the request URL for a query.
    fn build_url(&self, query: &SourceQuery) -> String {
        format!(
            "{}?query={}&limit={}&fields={}",
            self.base_url,
            urlencoding::encode(&query.query),
            query.limit,
            SEMANTIC_FIELDS
        )
    }

    /// Map one raw paper into the common Paper schema.
    ///
    /// Fallback priority per field:
    /// - `id`: `paperId`, then empty
    /// - `year`: `year`, then current year
    /// - `url`: `url`, then `https://www.semanticscholar.org/paper/<id>`
    /// - `category`: `venue`, then "Semantic Scholar"
    /// - `pdf`: `openAccessPdf.url`, then empty
    fn parse_paper(data: &S2Paper) -> Paper {
        let id = data.paper_id.clone().unwrap_or_default();

        let title = data
            .title
            .as_deref()
            .map(squash_whitespace)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Untitled".to_string());

        let authors: Vec<String> = data
            .authors
            .iter()
            .filter_map(|a| a.name.clone())
            .collect();

        let year = data.year.unwrap_or_else(|| Utc::now().year());

        let url = data
            .url
            .clone()
            .unwrap_or_else(|| format!("https://www.semanticscholar.org/paper/{}", id));

        PaperBuilder::new(id, title, year, SourceType::SemanticScholar)
            .authors(authors)
            .summary(data.r#abstract.clone().unwrap_or_default())
            .category(
                data.venue
                    .clone()
                    .filter(|v| !v.is_empty())
                    .unwrap_or_else(|| "Semantic Scholar".to_string()),
            )
            .pdf(
                data.open_access_pdf
                    .as_ref()
                    .and_then(|p| p.url.clone())
                    .unwrap_or_default(),
            )
            .url(url)
            .doi(data.doi.clone().unwrap_or_default())
            .citation_count(data.citation_count.unwrap_or(0))
            .build()
    }
}

impl Default for SemanticScholarSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Source for SemanticScholarSource {
    fn id(&self) -> &str {
        "semantic"
    }

    fn name(&self) -> &str {
        SourceType::SemanticScholar.name()
    }

    async fn search(&self, query: &SourceQuery) -> Result<SourceResults, SourceError> {
        let url = self.build_url(query);

        let data = with_retry(api_retry_config(), || {
            let client = self.client.clone();
            let url = url.clone();
            async move {
                let response = client
                    .get(&url)
                    .header("Accept", "application/json")
                    .send()
                    .await
                    .map_err(|e| {
                        SourceError::Network(format!("Semantic Scholar fetch failed: {}", e))
                    })?;

                if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    return Err(SourceError::RateLimit);
                }

                if !response.status().is_success() {
                    return Err(SourceError::Api(format!(
                        "Semantic Scholar API returned status: {}",
                        response.status()
                    )));
                }

                response
                    .json::<S2SearchResponse>()
                    .await
                    .map_err(|e| SourceError::Parse(format!("Semantic Scholar JSON: {}", e)))
            }
        })
        .await?;

        let mut papers: Vec<Paper> = data.data.iter().map(Self::parse_paper).collect();
        let total_results = data.total.unwrap_or(papers.len());

        // The API cannot pin an exact year server-side.
        if let Some(years) = query.years {
            if years.is_single_year() {
                papers.retain(|p| p.year == years.start);
            }
        }

        tracing::debug!(count = papers.len(), query = %query.query, "Semantic Scholar results");

        Ok(SourceResults::new(papers, total_results))
    }
}

// ===== Semantic Scholar API types =====

#[derive(Debug, Deserialize)]
struct S2SearchResponse {
    #[serde(default)]
    data: Vec<S2Paper>,
    total: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct S2Paper {
    #[serde(rename = "paperId")]
    paper_id: Option<String>,
    title: Option<String>,
    r#abstract: Option<String>,
    year: Option<i32>,
    #[serde(rename = "citationCount")]
    citation_count: Option<u32>,
    #[serde(default)]
    authors: Vec<S2Author>,
    url: Option<String>,
    venue: Option<String>,
    doi: Option<String>,
    #[serde(rename = "openAccessPdf")]
    open_access_pdf: Option<S2OpenAccessPdf>,
}

#[derive(Debug, Deserialize)]
struct S2Author {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct S2OpenAccessPdf {
    url: Option<String>,
}
