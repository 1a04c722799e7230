//! Viewer comments: the pipeline's raw input.
//!
//! Comments can be read from a JSON file, a plain-text file (one comment per
//! line), or fetched from YouTube for a given video.

use crate::error::{IdeacrewError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Video id used for plain-text comments when none is given.
pub const UNKNOWN_VIDEO_ID: &str = "unknown";

/// A single viewer comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub comment_id: String,
    pub video_id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl Comment {
    /// Create a comment with only the required fields.
    pub fn new(comment_id: impl Into<String>, video_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            comment_id: comment_id.into(),
            video_id: video_id.into(),
            text: text.into(),
            author: None,
            like_count: 0,
            published_at: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CommentFile {
    List(Vec<Comment>),
    Wrapped { comments: Vec<Comment> },
}

/// Parse comments from JSON: either an array or `{"comments": [...]}`.
pub fn parse_json(content: &str) -> Result<Vec<Comment>> {
    let parsed: CommentFile = serde_json::from_str(content)?;
    let comments = match parsed {
        CommentFile::List(comments) => comments,
        CommentFile::Wrapped { comments } => comments,
    };
    ensure_unique_ids(&comments)?;
    Ok(comments)
}

/// Parse plain text, one comment per non-blank line. Ids are `c1`, `c2`, ...
pub fn parse_lines(content: &str, video_id: &str) -> Vec<Comment> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(i, line)| Comment::new(format!("c{}", i + 1), video_id, line))
        .collect()
}

/// Load comments from a file. `.json` files are parsed as JSON, anything else as lines.
pub fn load_from_file(path: &Path, video_id: Option<&str>) -> Result<Vec<Comment>> {
    if !path.exists() {
        return Err(IdeacrewError::InvalidInput(format!(
            "Comments file not found: {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let comments = if is_json {
        parse_json(&content)?
    } else {
        parse_lines(&content, video_id.unwrap_or(UNKNOWN_VIDEO_ID))
    };

    info!("Loaded {} comments from {}", comments.len(), path.display());
    Ok(comments)
}

fn ensure_unique_ids(comments: &[Comment]) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for comment in comments {
        if !seen.insert(comment.comment_id.as_str()) {
            return Err(IdeacrewError::InvalidInput(format!(
                "Duplicate comment id: {}",
                comment.comment_id
            )));
        }
    }
    Ok(())
}
