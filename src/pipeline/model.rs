//! Data handed between pipeline stages.

use crate::comments::Comment;
use serde::{Deserialize, Serialize};

/// One piece of supporting evidence found during research.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchItem {
    pub title: String,
    pub url: String,
    pub view_count: u64,
}

/// A video idea proposed by the generator, before research.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateIdea {
    pub video_title: String,
    pub description: String,
    pub comment_id: String,
    /// Taken from the originating comment, never from model text.
    pub video_id: String,
    /// Text of the originating comment, kept for later stages' context.
    pub comment_text: String,
}

impl CandidateIdea {
    /// Build an idea anchored to the comment that inspired it.
    pub fn from_comment(comment: &Comment, video_title: &str, description: &str) -> Self {
        Self {
            video_title: video_title.trim().to_string(),
            description: description.trim().to_string(),
            comment_id: comment.comment_id.clone(),
            video_id: comment.video_id.clone(),
            comment_text: comment.text.clone(),
        }
    }

    /// Query used to look for comparable videos.
    pub fn search_query(&self) -> String {
        let title = self.video_title.trim();
        if title.is_empty() {
            self.description.trim().to_string()
        } else {
            title.to_string()
        }
    }
}

/// A candidate idea with the evidence gathered for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchedIdea {
    #[serde(flatten)]
    pub idea: CandidateIdea,
    pub research: Vec<ResearchItem>,
    /// The research agent's summary.
    pub notes: String,
}

/// A scored video idea: one entry of the pipeline's final output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoIdea {
    pub score: i64,
    pub video_title: String,
    pub description: String,
    pub video_id: String,
    pub comment_id: String,
    pub research: Vec<ResearchItem>,
}

/// The pipeline's terminal artifact.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VideoIdeasList {
    pub video_ideas: Vec<VideoIdea>,
}

impl VideoIdeasList {
    pub fn is_empty(&self) -> bool {
        self.video_ideas.is_empty()
    }

    pub fn len(&self) -> usize {
        self.video_ideas.len()
    }

    /// Ideas ordered from highest to lowest score. Ties keep their original order.
    pub fn ranked(&self) -> Vec<&VideoIdea> {
        let mut ideas: Vec<&VideoIdea> = self.video_ideas.iter().collect();
        ideas.sort_by(|a, b| b.score.cmp(&a.score));
        ideas
    }
}
