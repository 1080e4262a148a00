//! arXiv source adapter.

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use feed_rs::parser;

use crate::models::{Paper, PaperBuilder, SourceQuery, SourceResults, SourceType};
use crate::sources::{squash_whitespace, Source, SourceError};
use crate::utils::{api_retry_config, with_retry, HttpClient};

/// Base URL for the arXiv query API.
const ARXIV_API_URL: &str = "https://export.arxiv.org/api/query";

/// arXiv source adapter.
///
/// Queries the public Atom/XML API with an `all:<query>` field search sorted
/// by submission date descending. The API has no year-range parameter, so the
/// adapter filters by year client-side after the fetch.
#[derive(Debug, Clone)]
pub struct ArxivSource {
    client: HttpClient,
    base_url: String,
}

impl ArxivSource {
    /// Create a new arXiv adapter with its own HTTP client.
    pub fn new() -> Self {
        Self {
            client: HttpClient::new(),
            base_url: ARXIV_API_URL.to_string(),
        }
    }

    /// Create with a custom HTTP client.
    pub fn with_client(client: HttpClient) -> Self {
        Self {
            client,
            base_url: ARXIV_API_URL.to_string(),
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
            "{}?search_query=all:{}&start=0&max_results={}&sortBy=submittedDate&sortOrder=descending",
            self.base_url,
            urlencoding::encode(&query.query),
            query.limit
        )
    }

    /// Map one Atom entry into the common Paper schema.
    ///
    /// Field mapping, in priority order:
    /// - `id`: last path segment of the entry id, version suffix stripped
    /// - `year`/`month`/`day`: from `published`; current year and 1/1 when absent
    /// - `category`: first category term
    /// - `pdf`: first link typed `application/pdf`
    /// - `url`: first link typed `text/html`, else `https://arxiv.org/abs/<id>`
    /// - `doi`: synthetic `arXiv:<id>` (the feed's DOI extension is not exposed)
    fn parse_entry(entry: &feed_rs::model::Entry) -> Result<Paper, SourceError> {
        let paper_id = entry
            .id
            .rsplit('/')
            .next()
            .map(|tail| tail.split('v').next().unwrap_or(tail))
            .filter(|id| !id.is_empty())
            .ok_or_else(|| SourceError::Parse("entry without an arXiv ID".to_string()))?
            .to_string();

        let title = entry
            .title
            .as_ref()
            .map(|t| squash_whitespace(&t.content))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Untitled".to_string());

        let authors: Vec<String> = entry
            .authors
            .iter()
            .map(|a| a.name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();

        let summary = entry
            .summary
            .as_ref()
            .map(|s| squash_whitespace(&s.content))
            .unwrap_or_default();

        let (year, month, day) = match entry.published {
            Some(date) => (date.year(), date.month(), date.day()),
            None => (Utc::now().year(), 1, 1),
        };

        let category = entry
            .categories
            .first()
            .map(|c| c.term.clone())
            .unwrap_or_default();

        let pdf = entry
            .links
            .iter()
            .find(|l| l.media_type.as_deref() == Some("application/pdf"))
            .map(|l| l.href.clone())
            .unwrap_or_default();

        let url = entry
            .links
            .iter()
            .find(|l| l.media_type.as_deref() == Some("text/html"))
            .map(|l| l.href.clone())
            .unwrap_or_else(|| format!("https://arxiv.org/abs/{}", paper_id));

        Ok(
            PaperBuilder::new(paper_id.clone(), title, year, SourceType::ArXiv)
                .authors(authors)
                .summary(summary)
                .month_day(month, day)
                .category(category)
                .pdf(pdf)
                .url(url)
                .doi(format!("arXiv:{}", paper_id))
                .build(),
        )
    }
}

impl Default for ArxivSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Source for ArxivSource {
    fn id(&self) -> &str {
        "arxiv"
    }

    fn name(&self) -> &str {
        SourceType::ArXiv.name()
    }

    async fn search(&self, query: &SourceQuery) -> Result<SourceResults, SourceError> {
        let url = self.build_url(query);

        let body = with_retry(api_retry_config(), || {
            let client = self.client.clone();
            let url = url.clone();
            async move {
                let response = client
                    .get(&url)
                    .header("Accept", "application/atom+xml")
                    .send()
                    .await
                    .map_err(|e| SourceError::Network(format!("arXiv fetch failed: {}", e)))?;

                if !response.status().is_success() {
                    return Err(SourceError::Api(format!(
                        "arXiv API returned status: {}",
                        response.status()
                    )));
                }

                response
                    .bytes()
                    .await
                    .map_err(|e| SourceError::Network(format!("arXiv body read failed: {}", e)))
            }
        })
        .await?;

        let feed = parser::parse(body.as_ref())
            .map_err(|e| SourceError::Parse(format!("Atom feed: {}", e)))?;

        let mut papers = feed
            .entries
            .iter()
            .map(Self::parse_entry)
            .collect::<Result<Vec<Paper>, SourceError>>()?;

        let total_results = papers.len();

        // The API cannot restrict by year server-side.
        if let Some(years) = query.years {
            papers.retain(|p| years.contains(p.year));
        }

        tracing::debug!(count = papers.len(), query = %query.query, "arXiv results");

        Ok(SourceResults::new(papers, total_results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::YearRange;

    const FEED_FIXTURE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>ArXiv Query: search_query=all:transformers</title>
  <entry>
    <id>http://arxiv.org/abs/2301.12345v2</id>
    <title>Attention Is Not Quite
      All You Need</title>
    <summary>We revisit attention
      mechanisms.</summary>
    <published>2023-01-15T10:00:00Z</published>
    <author><name>Ada Lovelace</name></author>
    <author><name>Alan Turing</name></author>
    <category term="cs.LG"/>
    <link rel="alternate" type="text/html" href="http://arxiv.org/abs/2301.12345v2"/>
    <link rel="related" type="application/pdf" href="http://arxiv.org/pdf/2301.12345v2"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2105.00001v1</id>
    <title>Older Transformer Paper</title>
    <summary>An older result.</summary>
    <published>2021-05-01T00:00:00Z</published>
    <author><name>Grace Hopper</name></author>
    <category term="cs.CL"/>
  </entry>
</feed>
"#;

    #[test]
    fn test_build_url_encodes_query() {
        let source = ArxivSource::new();
        let query = SourceQuery::new("large language models", 5);
        let url = source.build_url(&query);

        assert!(url.starts_with(ARXIV_API_URL));
        assert!(url.contains("search_query=all:large%20language%20models"));
        assert!(url.contains("max_results=5"));
        assert!(url.contains("sortBy=submittedDate"));
        assert!(url.contains("sortOrder=descending"));
    }

    #[test]
    fn test_parse_entry_mapping() {
        let feed = parser::parse(FEED_FIXTURE.as_bytes()).unwrap();
        let paper = ArxivSource::parse_entry(&feed.entries[0]).unwrap();

        assert_eq!(paper.id, "2301.12345");
        assert_eq!(paper.title, "Attention Is Not Quite All You Need");
        assert_eq!(paper.summary, "We revisit attention mechanisms.");
        assert_eq!(paper.authors, "Ada Lovelace, Alan Turing");
        assert_eq!(paper.authors_list.len(), 2);
        assert_eq!(paper.year, 2023);
        assert_eq!(paper.month, 1);
        assert_eq!(paper.day, 15);
        assert_eq!(paper.published, "2023-01-15");
        assert_eq!(paper.category, "cs.LG");
        assert_eq!(paper.pdf, "http://arxiv.org/pdf/2301.12345v2");
        assert_eq!(paper.url, "http://arxiv.org/abs/2301.12345v2");
        assert_eq!(paper.doi, "arXiv:2301.12345");
        assert_eq!(paper.source, SourceType::ArXiv);
        assert_eq!(paper.citation_count, 0);
    }

    #[test]
    fn test_parse_entry_missing_links_falls_back_to_abs_url() {
        let feed = parser::parse(FEED_FIXTURE.as_bytes()).unwrap();
        let paper = ArxivSource::parse_entry(&feed.entries[1]).unwrap();

        assert_eq!(paper.id, "2105.00001");
        assert_eq!(paper.url, "https://arxiv.org/abs/2105.00001");
        assert_eq!(paper.pdf, "");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let feed = parser::parse(FEED_FIXTURE.as_bytes()).unwrap();
        let first: Vec<Paper> = feed
            .entries
            .iter()
            .map(|e| ArxivSource::parse_entry(e).unwrap())
            .collect();
        let second: Vec<Paper> = feed
            .entries
            .iter()
            .map(|e| ArxivSource::parse_entry(e).unwrap())
            .collect();

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn test_search_filters_years_client_side() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/query")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/atom+xml")
            .with_body(FEED_FIXTURE)
            .create_async()
            .await;

        let source = ArxivSource::new().with_base_url(format!("{}/api/query", server.url()));
        let query = SourceQuery::new("transformers", 10).years(Some(YearRange::new(2023, 2024)));

        let results = source.search(&query).await.unwrap();

        mock.assert_async().await;
        assert_eq!(results.papers.len(), 1);
        assert_eq!(results.papers[0].year, 2023);
        assert_eq!(results.total_results, 2);
    }

    #[tokio::test]
    async fn test_search_http_error_is_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/query")
            .match_query(mockito::Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let source = ArxivSource::new().with_base_url(format!("{}/api/query", server.url()));
        let query = SourceQuery::new("transformers", 10);

        let result = source.search(&query).await;
        assert!(matches!(result, Err(SourceError::Api(_))));
    }
}
