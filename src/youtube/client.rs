//! HTTP client for the YouTube Data API v3.

use super::models::{
    ApiErrorBody, CommentThreadItem, ListResponse, SearchItem, VideoItem, VideoSummary,
};
use crate::comments::Comment;
use crate::config::YoutubeSettings;
use crate::error::{IdeacrewError, Result};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// The API caps `maxResults` at 50 for search and 100 for comment threads.
const MAX_SEARCH_PAGE: usize = 50;
const MAX_COMMENT_PAGE: usize = 100;

/// Thin client over the Data API endpoints Ideacrew needs.
#[derive(Clone)]
pub struct YoutubeClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl YoutubeClient {
    /// Create a client for the given API base URL and key.
    pub fn new(api_base: &str, api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Create a client from settings. Fails when no API key is configured.
    pub fn from_settings(settings: &YoutubeSettings) -> Result<Self> {
        let api_key = settings
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                IdeacrewError::Config(
                    "YouTube API key not set. Set YOUTUBE_API_KEY or youtube.api_key.".to_string(),
                )
            })?;
        Ok(Self::new(&settings.api_base, api_key))
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, String)]) -> Result<T> {
        let url = format!("{}/{}", self.api_base, endpoint);
        let response = self
            .http
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(IdeacrewError::YouTube(format!(
                "{} returned {}: {}",
                endpoint, status, message
            )));
        }

        response.json::<T>().await.map_err(|e| {
            IdeacrewError::YouTube(format!("Failed to parse {} response: {}", endpoint, e))
        })
    }

    /// Search for videos and attach their view counts.
    ///
    /// Results keep the search ranking. Videos without statistics get a view count of 0.
    #[instrument(skip(self))]
    pub async fn search_videos(&self, query: &str, max_results: usize) -> Result<Vec<VideoSummary>> {
        if max_results == 0 {
            return Ok(Vec::new());
        }

        let search: ListResponse<SearchItem> = self
            .get(
                "search",
                &[
                    ("part", "snippet".to_string()),
                    ("type", "video".to_string()),
                    ("q", query.to_string()),
                    ("maxResults", max_results.min(MAX_SEARCH_PAGE).to_string()),
                ],
            )
            .await?;

        let hits: Vec<(String, String, Option<String>)> = search
            .items
            .into_iter()
            .filter_map(|item| {
                item.id
                    .video_id
                    .map(|id| (id, item.snippet.title, item.snippet.channel_title))
            })
            .take(max_results)
            .collect();

        if hits.is_empty() {
            debug!("No videos found for '{}'", query);
            return Ok(Vec::new());
        }

        let ids = hits
            .iter()
            .map(|(id, _, _)| id.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let videos: ListResponse<VideoItem> = self
            .get("videos", &[("part", "statistics".to_string()), ("id", ids)])
            .await?;

        let views: HashMap<String, u64> = videos
            .items
            .into_iter()
            .map(|v| {
                let count = v.statistics.and_then(|s| s.view_count).unwrap_or(0);
                (v.id, count)
            })
            .collect();

        let results: Vec<VideoSummary> = hits
            .into_iter()
            .map(|(video_id, title, channel_title)| VideoSummary {
                view_count: views.get(&video_id).copied().unwrap_or(0),
                video_id,
                title,
                channel_title,
            })
            .collect();

        debug!("Found {} videos for '{}'", results.len(), query);
        Ok(results)
    }

    /// Fetch up to `limit` top-level comments for a video, most relevant first.
    #[instrument(skip(self))]
    pub async fn fetch_comments(&self, video_id: &str, limit: usize) -> Result<Vec<Comment>> {
        let mut comments = Vec::new();
        let mut page_token: Option<String> = None;

        while comments.len() < limit {
            let remaining = limit - comments.len();
            let mut params = vec![
                ("part", "snippet".to_string()),
                ("videoId", video_id.to_string()),
                ("order", "relevance".to_string()),
                ("textFormat", "plainText".to_string()),
                ("maxResults", remaining.min(MAX_COMMENT_PAGE).to_string()),
            ];
            if let Some(token) = &page_token {
                params.push(("pageToken", token.clone()));
            }

            let page: ListResponse<CommentThreadItem> = self.get("commentThreads", &params).await?;

            for item in page.items.into_iter().take(remaining) {
                let snippet = item.snippet.top_level_comment.snippet;
                let text = snippet
                    .text_original
                    .or(snippet.text_display)
                    .unwrap_or_default();
                comments.push(Comment {
                    comment_id: item.id,
                    video_id: item.snippet.video_id,
                    text,
                    author: snippet.author_display_name,
                    like_count: snippet.like_count,
                    published_at: snippet.published_at,
                });
            }

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!("Fetched {} comments for {}", comments.len(), video_id);
        Ok(comments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_search_videos_merges_view_counts() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "rust async"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {"id": {"videoId": "aaaaaaaaaaa"}, "snippet": {"title": "Async Rust", "channelTitle": "Chan"}},
                    {"id": {"channelId": "UC123"}, "snippet": {"title": "A channel"}},
                    {"id": {"videoId": "bbbbbbbbbbb"}, "snippet": {"title": "Tokio deep dive"}}
                ]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/videos"))
            .and(query_param("id", "aaaaaaaaaaa,bbbbbbbbbbb"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {"id": "aaaaaaaaaaa", "statistics": {"viewCount": "1500"}},
                    {"id": "bbbbbbbbbbb", "statistics": {}}
                ]
            })))
            .mount(&server)
            .await;

        let client = YoutubeClient::new(&server.uri(), "test-key");
        let results = client.search_videos("rust async", 5).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Async Rust");
        assert_eq!(results[0].view_count, 1500);
        assert_eq!(results[0].url(), "https://www.youtube.com/watch?v=aaaaaaaaaaa");
        assert_eq!(results[1].view_count, 0);
    }

    #[tokio::test]
    async fn test_search_with_no_hits_skips_statistics_call() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/videos"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let client = YoutubeClient::new(&server.uri(), "k");
        assert!(client.search_videos("nothing", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_api_error_is_surfaced() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": {"code": 403, "message": "quotaExceeded"}
            })))
            .mount(&server)
            .await;

        let client = YoutubeClient::new(&server.uri(), "k");
        let err = client.search_videos("anything", 5).await.unwrap_err();
        assert!(err.is_capability_failure());
        assert!(err.to_string().contains("quotaExceeded"));
    }

    #[tokio::test]
    async fn test_fetch_comments_follows_pages_up_to_limit() {
        let server = MockServer::start().await;

        let thread = |id: &str, text: &str| {
            json!({
                "id": id,
                "snippet": {
                    "videoId": "dQw4w9WgXcQ",
                    "topLevelComment": {"snippet": {
                        "textOriginal": text,
                        "authorDisplayName": "viewer",
                        "likeCount": 3,
                        "publishedAt": "2024-05-01T12:00:00Z"
                    }}
                }
            })
        };

        Mock::given(method("GET"))
            .and(path("/commentThreads"))
            .and(query_param("pageToken", "p2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [thread("c3", "third"), thread("c4", "fourth")]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/commentThreads"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [thread("c1", "first"), thread("c2", "second")],
                "nextPageToken": "p2"
            })))
            .mount(&server)
            .await;

        let client = YoutubeClient::new(&server.uri(), "k");
        let comments = client.fetch_comments("dQw4w9WgXcQ", 3).await.unwrap();

        let ids: Vec<_> = comments.iter().map(|c| c.comment_id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c2", "c3"]);
        assert_eq!(comments[0].video_id, "dQw4w9WgXcQ");
        assert_eq!(comments[0].like_count, 3);
        assert!(comments[0].published_at.is_some());
    }
}
