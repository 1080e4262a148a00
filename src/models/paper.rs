//! Paper model representing a normalized search result from any provider.

use serde::{Deserialize, Serialize};

/// The provider a paper was retrieved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceType {
    ArXiv,
    OpenAlex,
    SemanticScholar,
}

impl SourceType {
    /// Returns the display name of the provider.
    pub fn name(&self) -> &'static str {
        match self {
            SourceType::ArXiv => "ArXiv",
            SourceType::OpenAlex => "OpenAlex",
            SourceType::SemanticScholar => "Semantic Scholar",
        }
    }

    /// Returns the provider identifier (for config and logging).
    pub fn id(&self) -> &'static str {
        match self {
            SourceType::ArXiv => "arxiv",
            SourceType::OpenAlex => "openalex",
            SourceType::SemanticScholar => "semantic",
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A paper normalized into the common schema shared by all providers.
///
/// Adapters are responsible for filling every field; missing provider data is
/// substituted with the documented defaults (`title` and `year` are never
/// empty/zero, `month`/`day` default to 1, string links default to empty).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    /// Provider-scoped identifier.
    pub id: String,

    /// Title with newlines stripped and whitespace squashed.
    pub title: String,

    /// Display string, comma-joined author names.
    pub authors: String,

    /// Ordered author names.
    pub authors_list: Vec<String>,

    /// Abstract text, possibly empty.
    pub summary: String,

    /// Publication year; defaults to the current year when the provider has none.
    pub year: i32,

    /// Publication month, 1 when unknown.
    pub month: u32,

    /// Publication day, 1 when unknown.
    pub day: u32,

    /// ISO-like date string, reconstructed from year/month/day when absent.
    pub published: String,

    /// Provider-specific subject or venue label.
    pub category: String,

    /// Direct PDF link, possibly empty.
    pub pdf: String,

    /// Landing page link, possibly empty.
    pub url: String,

    /// DOI, or a synthetic provider-qualified fallback, or empty.
    pub doi: String,

    /// Provider the paper came from.
    pub source: SourceType,

    /// Citation count, 0 when the provider does not report one.
    pub citation_count: u32,

    /// Relevance in [0,1]; absent until the scorer has run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
}

impl Paper {
    /// Create a paper with required fields; everything else takes its default.
    pub fn new(id: impl Into<String>, title: impl Into<String>, year: i32, source: SourceType) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            authors: String::new(),
            authors_list: Vec::new(),
            summary: String::new(),
            year,
            month: 1,
            day: 1,
            published: String::new(),
            category: String::new(),
            pdf: String::new(),
            url: String::new(),
            doi: String::new(),
            source,
            citation_count: 0,
            relevance_score: None,
        }
    }

    /// Whether a direct PDF link is known.
    pub fn has_pdf(&self) -> bool {
        !self.pdf.is_empty()
    }

    /// The relevance score, or 0.0 when the paper has not been scored yet.
    pub fn relevance(&self) -> f64 {
        self.relevance_score.unwrap_or(0.0)
    }
}

/// Builder for constructing Paper objects field by field.
#[derive(Debug, Clone)]
pub struct PaperBuilder {
    paper: Paper,
}

impl PaperBuilder {
    /// Create a new builder with the required fields.
    pub fn new(id: impl Into<String>, title: impl Into<String>, year: i32, source: SourceType) -> Self {
        Self {
            paper: Paper::new(id, title, year, source),
        }
    }

    /// Set the author names; the display string is derived by comma-joining.
    pub fn authors(mut self, authors: Vec<String>) -> Self {
        self.paper.authors = authors.join(", ");
        self.paper.authors_list = authors;
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.paper.summary = summary.into();
        self
    }

    /// Set month and day of publication.
    pub fn month_day(mut self, month: u32, day: u32) -> Self {
        self.paper.month = month;
        self.paper.day = day;
        self
    }

    /// Set the published date string; when not called, `build` reconstructs
    /// one from year/month/day.
    pub fn published(mut self, published: impl Into<String>) -> Self {
        self.paper.published = published.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.paper.category = category.into();
        self
    }

    pub fn pdf(mut self, pdf: impl Into<String>) -> Self {
        self.paper.pdf = pdf.into();
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.paper.url = url.into();
        self
    }

    pub fn doi(mut self, doi: impl Into<String>) -> Self {
        self.paper.doi = doi.into();
        self
    }

    pub fn citation_count(mut self, count: u32) -> Self {
        self.paper.citation_count = count;
        self
    }

    /// Build the Paper, reconstructing `published` from the date parts when no
    /// explicit date string was supplied.
    pub fn build(mut self) -> Paper {
        if self.paper.published.is_empty() {
            self.paper.published = format!(
                "{}-{:02}-{:02}",
                self.paper.year, self.paper.month, self.paper.day
            );
        }
        self.paper
    }
}
