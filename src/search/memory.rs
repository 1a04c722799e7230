//! In-memory search provider.
//!
//! Useful for testing and offline runs.

use super::SearchCapability;
use crate::error::{IdeacrewError, Result};
use crate::pipeline::ResearchItem;
use async_trait::async_trait;
use std::sync::Mutex;

/// Searches a fixed catalogue by shared words between query and title.
pub struct StaticSearch {
    catalogue: Vec<ResearchItem>,
    failure: Option<String>,
    queries: Mutex<Vec<String>>,
}

impl StaticSearch {
    /// Create a provider over the given catalogue.
    pub fn new(catalogue: Vec<ResearchItem>) -> Self {
        Self {
            catalogue,
            failure: None,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// A provider that fails every call with the given message.
    pub fn failing(message: &str) -> Self {
        Self {
            catalogue: Vec::new(),
            failure: Some(message.to_string()),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Queries received so far, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() >= 3)
        .map(str::to_lowercase)
        .collect()
}

#[async_trait]
impl SearchCapability for StaticSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<ResearchItem>> {
        self.queries.lock().unwrap().push(query.to_string());

        if let Some(message) = &self.failure {
            return Err(IdeacrewError::Search(message.clone()));
        }

        let query_words = words(query);
        Ok(self
            .catalogue
            .iter()
            .filter(|item| words(&item.title).iter().any(|w| query_words.contains(w)))
            .take(max_results)
            .cloned()
            .collect())
    }

    fn name(&self) -> &str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, views: u64) -> ResearchItem {
        ResearchItem {
            title: title.to_string(),
            url: format!("https://example.com/{}", views),
            view_count: views,
        }
    }

    #[tokio::test]
    async fn test_static_search_matches_words_and_caps() {
        let search = StaticSearch::new(vec![
            item("Rust lifetimes explained", 10),
            item("Cooking pasta", 20),
            item("Rust async in depth", 30),
        ]);

        let hits = search.search("rust tutorial", 5).await.unwrap();
        assert_eq!(hits.len(), 2);

        let capped = search.search("rust tutorial", 1).await.unwrap();
        assert_eq!(capped.len(), 1);
        assert_eq!(capped[0].view_count, 10);

        assert!(search.search("gardening", 5).await.unwrap().is_empty());
        assert_eq!(search.queries().len(), 3);
    }

    #[tokio::test]
    async fn test_failing_search() {
        let search = StaticSearch::failing("quota exceeded");
        let err = search.search("anything", 3).await.unwrap_err();
        assert!(err.is_capability_failure());
    }
}
