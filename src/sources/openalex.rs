//! OpenAlex source adapter.

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use serde::Deserialize;

use crate::models::{Paper, PaperBuilder, SourceQuery, SourceResults, SourceType};
use crate::sources::{squash_whitespace, Source, SourceError};
use crate::utils::{api_retry_config, with_retry, HttpClient};

/// Base URL for the OpenAlex works-search API.
const OPENALEX_API_URL: &str = "https://api.openalex.org/works";

/// OpenAlex source adapter.
///
/// Issues a quoted-phrase search against the works endpoint. Year ranges map
/// onto the `publication_year` filter, collapsing to an equality filter when
/// both ends coincide.
#[derive(Debug, Clone)]
pub struct OpenAlexSource {
    client: HttpClient,
    base_url: String,
}

impl OpenAlexSource {
    /// Create a new OpenAlex adapter with its own HTTP client.
    pub fn new() -> Self {
        Self {
            client: HttpClient::new(),
            base_url: OPENALEX_API_URL.to_string(),
        }
    }

    /// Create with a custom HTTP client.
    pub fn with_client(client: HttpClient) -> Self {
        Self {
            client,
            base_url: OPENALEX_API_URL.to_string(),
        }
    }

    /// Point the adapter at a different endpoint (for tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build the request URL for a query.
    fn build_url(&self, query: &SourceQuery) -> String {
        let phrase = format!("\"{}\"", query.query);
        let mut url = format!(
            "{}?search={}&per-page={}&page=1",
            self.base_url,
            urlencoding::encode(&phrase),
            query.limit
        );

        if let Some(years) = query.years {
            if years.is_single_year() {
                url.push_str(&format!("&filter=publication_year:{}", years.start));
            } else {
                url.push_str(&format!(
                    "&filter=publication_year:%3E%3D{},publication_year:%3C%3D{}",
                    years.start, years.end
                ));
            }
        }

        url
    }

    /// Map one raw work into the common Paper schema.
    ///
    /// Fallback priority per field:
    /// - `year`: `publication_date` year part, then `publication_year`, then current year
    /// - `month`/`day`: `publication_date` parts, then 1
    /// - `published`: `publication_date`, then reconstructed from the parts
    /// - `id`: last path segment of the OpenAlex work URL, then empty
    /// - `category`: `primary_location.source.display_name`, then `type`, then "OpenAlex"
    /// - `pdf`: `open_access.oa_url`, then empty
    /// - `url`: `primary_location.landing_page_url`, then the work URL, then empty
    fn parse_work(work: &OAWork) -> Paper {
        let date_parts: Vec<i32> = work
            .publication_date
            .as_deref()
            .map(|d| d.split('-').filter_map(|p| p.parse().ok()).collect())
            .unwrap_or_default();

        let year = date_parts
            .first()
            .copied()
            .or(work.publication_year)
            .unwrap_or_else(|| Utc::now().year());
        let month = date_parts.get(1).copied().unwrap_or(1).max(1) as u32;
        let day = date_parts.get(2).copied().unwrap_or(1).max(1) as u32;

        let id = work
            .id
            .as_deref()
            .and_then(|full| full.rsplit('/').next())
            .unwrap_or_default()
            .to_string();

        let title = work
            .title
            .as_deref()
            .map(squash_whitespace)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Untitled".to_string());

        let authors: Vec<String> = work
            .authorships
            .iter()
            .map(|a| {
                a.author
                    .as_ref()
                    .and_then(|author| author.display_name.clone())
                    .unwrap_or_else(|| "Unknown".to_string())
            })
            .collect();

        let venue = work
            .primary_location
            .as_ref()
            .and_then(|loc| loc.source.as_ref())
            .and_then(|source| source.display_name.clone());

        let category = venue
            .or_else(|| work.work_type.clone())
            .unwrap_or_else(|| "OpenAlex".to_string());

        let url = work
            .primary_location
            .as_ref()
            .and_then(|loc| loc.landing_page_url.clone())
            .or_else(|| work.id.clone())
            .unwrap_or_default();

        let mut builder = PaperBuilder::new(id, title, year, SourceType::OpenAlex)
            .authors(authors)
            .summary(work.r#abstract.clone().unwrap_or_default())
            .month_day(month, day)
            .category(category)
            .pdf(
                work.open_access
                    .as_ref()
                    .and_then(|oa| oa.oa_url.clone())
                    .unwrap_or_default(),
            )
            .url(url)
            .doi(work.doi.clone().unwrap_or_default())
            .citation_count(work.cited_by_count.unwrap_or(0));

        if let Some(date) = &work.publication_date {
            builder = builder.published(date.clone());
        }

        builder.build()
    }
}

impl Default for OpenAlexSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Source for OpenAlexSource {
    fn id(&self) -> &str {
        "openalex"
    }

    fn name(&self) -> &str {
        SourceType::OpenAlex.name()
    }

    async fn search(&self, query: &SourceQuery) -> Result<SourceResults, SourceError> {
        let url = self.build_url(query);

        let data = with_retry(api_retry_config(), || {
            let client = self.client.clone();
            let url = url.clone();
            async move {
                let response = client
                    .get(&url)
                    .send()
                    .await
                    .map_err(|e| SourceError::Network(format!("OpenAlex fetch failed: {}", e)))?;

                if !response.status().is_success() {
                    return Err(SourceError::Api(format!(
                        "OpenAlex API returned status: {}",
                        response.status()
                    )));
                }

                response
                    .json::<WorksResponse>()
                    .await
                    .map_err(|e| SourceError::Parse(format!("OpenAlex JSON: {}", e)))
            }
        })
        .await?;

        let papers: Vec<Paper> = data.results.iter().map(Self::parse_work).collect();
        let total_results = data
            .meta
            .and_then(|m| m.count)
            .unwrap_or(papers.len());

        tracing::debug!(count = papers.len(), query = %query.query, "OpenAlex results");

        Ok(SourceResults::new(papers, total_results))
    }
}

// ===== OpenAlex API types =====

#[derive(Debug, Deserialize)]
struct WorksResponse {
    #[serde(default)]
    results: Vec<OAWork>,
    meta: Option<OAMeta>,
}

#[derive(Debug, Deserialize)]
struct OAMeta {
    count: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct OAWork {
    id: Option<String>,
    title: Option<String>,
    publication_year: Option<i32>,
    publication_date: Option<String>,
    doi: Option<String>,
    r#abstract: Option<String>,
    cited_by_count: Option<u32>,
    #[serde(default)]
    authorships: Vec<OAAuthorship>,
    primary_location: Option<OALocation>,
    open_access: Option<OAOpenAccess>,
    #[serde(rename = "type")]
    work_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OAAuthorship {
    author: Option<OAAuthor>,
}

#[derive(Debug, Deserialize)]
struct OAAuthor {
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OALocation {
    source: Option<OALocationSource>,
    landing_page_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OALocationSource {
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OAOpenAccess {
    oa_url: Option<String>,
}
