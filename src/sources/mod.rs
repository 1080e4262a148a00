//! Provider adapters.
//!
//! Each adapter converts a [`SourceQuery`] into a provider-specific request,
//! parses the provider's native response (Atom/XML for arXiv, JSON for
//! OpenAlex and Semantic Scholar), and maps it into the common [`Paper`]
//! schema. Adapters report failures as [`SourceError`] values; they never
//! panic on provider data, and the orchestrator absorbs their errors so a
//! single bad provider cannot fail an aggregation.

mod arxiv;
mod openalex;
mod semantic;

pub mod mock;

pub use arxiv::ArxivSource;
pub use mock::MockSource;
pub use openalex::OpenAlexSource;
pub use semantic::SemanticScholarSource;

use async_trait::async_trait;

use crate::models::{SourceQuery, SourceResults};

/// The interface all provider adapters implement.
#[async_trait]
pub trait Source: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source (e.g. "arxiv").
    fn id(&self) -> &str;

    /// Human-readable provider name, as surfaced in `SearchResponse::sources`.
    fn name(&self) -> &str;

    /// Search for papers matching the query.
    async fn search(&self, query: &SourceQuery) -> Result<SourceResults, SourceError>;
}

/// Errors that can occur when talking to a provider.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or timeout error reaching the provider.
    #[error("Network error: {0}")]
    Network(String),

    /// Malformed or unexpected provider response shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimit,

    /// Non-success HTTP status or provider-reported error.
    #[error("API error: {0}")]
    Api(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            SourceError::Network(err.to_string())
        } else if err.is_decode() {
            SourceError::Parse(err.to_string())
        } else {
            SourceError::Api(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}

/// Strip newlines and squash runs of whitespace in provider text fields.
///
/// The arXiv Atom feed wraps titles and abstracts across lines; other
/// providers occasionally embed stray newlines too.
pub(crate) fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
