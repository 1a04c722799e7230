//! Wire types for the YouTube Data API v3 responses we read.
//!
//! Only the fields Ideacrew uses are modelled; everything else is ignored.

use serde::{Deserialize, Deserializer, Serialize};

/// A video as returned by a search, with statistics merged in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSummary {
    pub video_id: String,
    pub title: String,
    pub channel_title: Option<String>,
    pub view_count: u64,
}

impl VideoSummary {
    /// Watch URL for this video.
    pub fn url(&self) -> String {
        super::watch_url(&self.video_id)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchItem {
    pub id: SearchItemId,
    pub snippet: SearchSnippet,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchItemId {
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchSnippet {
    pub title: String,
    #[serde(rename = "channelTitle")]
    pub channel_title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VideoItem {
    pub id: String,
    pub statistics: Option<VideoStatistics>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VideoStatistics {
    /// The API encodes counts as decimal strings.
    #[serde(rename = "viewCount", default, deserialize_with = "count_from_string")]
    pub view_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentThreadItem {
    pub id: String,
    pub snippet: CommentThreadSnippet,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentThreadSnippet {
    #[serde(rename = "videoId")]
    pub video_id: String,
    #[serde(rename = "topLevelComment")]
    pub top_level_comment: TopLevelComment,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TopLevelComment {
    pub snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentSnippet {
    #[serde(rename = "textOriginal")]
    pub text_original: Option<String>,
    #[serde(rename = "textDisplay")]
    pub text_display: Option<String>,
    #[serde(rename = "authorDisplayName")]
    pub author_display_name: Option<String>,
    #[serde(rename = "likeCount", default)]
    pub like_count: u64,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    pub message: String,
}

fn count_from_string<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Text(String),
        Number(u64),
    }

    match Option::<Count>::deserialize(deserializer)? {
        Some(Count::Text(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
        Some(Count::Number(n)) => Ok(Some(n)),
        None => Ok(None),
    }
}
