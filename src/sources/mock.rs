//! Mock source for testing purposes.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::models::{Paper, SourceQuery, SourceResults, SourceType};
use crate::sources::{Source, SourceError};

/// A scripted reply the mock plays back on the next `search` call.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// Succeed with these papers.
    Papers(Vec<Paper>),
    /// Fail with a transport error.
    TransportError(String),
}

/// A mock source that plays back scripted replies in order.
///
/// When the script runs out, further searches succeed with no papers.
#[derive(Debug)]
pub struct MockSource {
    id: String,
    name: String,
    script: Mutex<VecDeque<ScriptedReply>>,
    calls: AtomicUsize,
}

impl MockSource {
    /// Create a mock with the given identifier and display name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            script: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Queue a successful reply.
    pub fn enqueue_papers(&self, papers: Vec<Paper>) {
        self.script
            .lock()
            .unwrap()
            .push_back(ScriptedReply::Papers(papers));
    }

    /// Queue a transport failure.
    pub fn enqueue_error(&self, message: impl Into<String>) {
        self.script
            .lock()
            .unwrap()
            .push_back(ScriptedReply::TransportError(message.into()));
    }

    /// How many times `search` has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Source for MockSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, _query: &SourceQuery) -> Result<SourceResults, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.script.lock().unwrap().pop_front() {
            Some(ScriptedReply::Papers(papers)) => {
                let total = papers.len();
                Ok(SourceResults::new(papers, total))
            }
            Some(ScriptedReply::TransportError(message)) => Err(SourceError::Network(message)),
            None => Ok(SourceResults::new(Vec::new(), 0)),
        }
    }
}

/// Helper to create a paper for tests.
pub fn make_paper(id: &str, title: &str, year: i32, source: SourceType) -> Paper {
    let mut paper = Paper::new(id, title, year, source);
    paper.url = format!("http://example.com/{}", id);
    paper.published = format!("{}-01-01", year);
    paper
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_plays_back_in_order() {
        let mock = MockSource::new("mock", "Mock Source");
        mock.enqueue_papers(vec![make_paper("1", "First", 2024, SourceType::ArXiv)]);
        mock.enqueue_error("connection refused");

        let query = SourceQuery::new("anything", 5);

        let first = mock.search(&query).await.unwrap();
        assert_eq!(first.papers.len(), 1);

        let second = mock.search(&query).await;
        assert!(matches!(second, Err(SourceError::Network(_))));

        let third = mock.search(&query).await.unwrap();
        assert!(third.papers.is_empty());

        assert_eq!(mock.calls(), 3);
    }
}
