//! YouTube Data API search provider.

use super::SearchCapability;
use crate::error::Result;
use crate::pipeline::ResearchItem;
use crate::youtube::YoutubeClient;
use async_trait::async_trait;
use tracing::instrument;

/// Searches YouTube and reports title, URL and view count per video.
pub struct YoutubeSearch {
    client: YoutubeClient,
}

impl YoutubeSearch {
    pub fn new(client: YoutubeClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SearchCapability for YoutubeSearch {
    #[instrument(skip(self))]
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<ResearchItem>> {
        let videos = self.client.search_videos(query, max_results).await?;
        Ok(videos
            .into_iter()
            .take(max_results)
            .map(|video| ResearchItem {
                url: video.url(),
                title: video.title,
                view_count: video.view_count,
            })
            .collect())
    }

    fn name(&self) -> &str {
        "youtube"
    }
}
