//! Comment filter stage: keep the comments worth building videos around.

use super::stage::{StageDefinition, StageName, StageOutput};
use crate::agent::Agent;
use crate::comments::Comment;
use crate::config::TaskPrompt;
use crate::error::{IdeacrewError, Result};
use crate::llm::{parse_json_response, LanguageModel};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Deserialize)]
#[serde(untagged)]
enum FilterReply {
    Wrapped { comment_ids: Vec<String> },
    Bare(Vec<String>),
}

/// What the filter agent sees of each comment.
#[derive(Serialize)]
struct CommentContext<'a> {
    comment_id: &'a str,
    video_id: &'a str,
    text: &'a str,
    like_count: u64,
}

/// Stage 1.
pub struct CommentFilter {
    agent: Agent,
    task: TaskPrompt,
}

impl CommentFilter {
    pub fn new(definition: &StageDefinition, model: Arc<dyn LanguageModel>, max_iterations: usize) -> Self {
        Self {
            agent: Agent::new(&StageName::FilterComments.to_string(), definition.agent.clone(), model)
                .with_max_iterations(max_iterations),
            task: definition.task.clone(),
        }
    }

    /// Select relevant comments, preserving input order.
    #[instrument(skip_all, fields(comments = comments.len()))]
    pub async fn run(&self, comments: &[Comment]) -> Result<StageOutput<Vec<Comment>>> {
        if comments.is_empty() {
            return Ok(StageOutput {
                value: Vec::new(),
                raw: String::new(),
            });
        }

        let context = comments_context(comments)?;
        let response = self.agent.run(&self.task, Some(&context)).await?;
        let keep = parse_selection(&response.content, comments)?;

        let kept: Vec<Comment> = comments
            .iter()
            .filter(|c| keep.contains(c.comment_id.as_str()))
            .cloned()
            .collect();

        info!("Kept {} of {} comments", kept.len(), comments.len());

        Ok(StageOutput {
            value: kept,
            raw: response.content,
        })
    }
}

fn comments_context(comments: &[Comment]) -> Result<String> {
    let view: Vec<CommentContext> = comments
        .iter()
        .map(|c| CommentContext {
            comment_id: &c.comment_id,
            video_id: &c.video_id,
            text: &c.text,
            like_count: c.like_count,
        })
        .collect();
    Ok(format!(
        "Viewer comments ({}):\n{}",
        comments.len(),
        serde_json::to_string_pretty(&view)?
    ))
}

/// Parse the agent's selection and check every id against the input.
fn parse_selection<'a>(content: &str, comments: &'a [Comment]) -> Result<HashSet<&'a str>> {
    let stage = StageName::FilterComments.to_string();
    let ids = match parse_json_response::<FilterReply>(&stage, content)? {
        FilterReply::Wrapped { comment_ids } => comment_ids,
        FilterReply::Bare(ids) => ids,
    };

    let known: HashSet<&str> = comments.iter().map(|c| c.comment_id.as_str()).collect();
    let mut keep = HashSet::new();
    for id in &ids {
        match known.get(id.as_str()) {
            Some(&known_id) => {
                keep.insert(known_id);
            }
            None => {
                return Err(IdeacrewError::malformed(
                    &stage,
                    format!("selected unknown comment id '{}'", id),
                ))
            }
        }
    }
    Ok(keep)
}
