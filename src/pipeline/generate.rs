//! Idea generator stage: turn filtered comments into candidate video ideas.

use super::model::CandidateIdea;
use super::stage::{StageDefinition, StageName, StageOutput};
use crate::agent::Agent;
use crate::comments::Comment;
use crate::config::TaskPrompt;
use crate::error::{IdeacrewError, Result};
use crate::llm::{parse_json_response, LanguageModel};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Deserialize)]
struct RawIdea {
    comment_id: String,
    video_title: String,
    description: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GeneratorReply {
    Wrapped { ideas: Vec<RawIdea> },
    Bare(Vec<RawIdea>),
}

/// Stage 2.
pub struct IdeaGenerator {
    agent: Agent,
    task: TaskPrompt,
}

impl IdeaGenerator {
    pub fn new(definition: &StageDefinition, model: Arc<dyn LanguageModel>, max_iterations: usize) -> Self {
        Self {
            agent: Agent::new(&StageName::GenerateIdeas.to_string(), definition.agent.clone(), model)
                .with_max_iterations(max_iterations),
            task: definition.task.clone(),
        }
    }

    /// Propose ideas; every idea names a comment from `comments`.
    #[instrument(skip_all, fields(comments = comments.len()))]
    pub async fn run(&self, comments: &[Comment]) -> Result<StageOutput<Vec<CandidateIdea>>> {
        if comments.is_empty() {
            info!("No comments survived filtering, no ideas to generate");
            return Ok(StageOutput {
                value: Vec::new(),
                raw: String::new(),
            });
        }

        let context = format!(
            "Filtered comments ({}):\n{}",
            comments.len(),
            serde_json::to_string_pretty(comments)?
        );
        let response = self.agent.run(&self.task, Some(&context)).await?;
        let ideas = parse_ideas(&response.content, comments)?;

        info!("Generated {} ideas from {} comments", ideas.len(), comments.len());

        Ok(StageOutput {
            value: ideas,
            raw: response.content,
        })
    }
}

fn parse_ideas(content: &str, comments: &[Comment]) -> Result<Vec<CandidateIdea>> {
    let stage = StageName::GenerateIdeas.to_string();
    let raw = match parse_json_response::<GeneratorReply>(&stage, content)? {
        GeneratorReply::Wrapped { ideas } => ideas,
        GeneratorReply::Bare(ideas) => ideas,
    };

    let by_id: HashMap<&str, &Comment> = comments.iter().map(|c| (c.comment_id.as_str(), c)).collect();

    raw.into_iter()
        .map(|idea| {
            let comment = by_id.get(idea.comment_id.as_str()).ok_or_else(|| {
                IdeacrewError::malformed(
                    &stage,
                    format!(
                        "idea '{}' references unknown comment id '{}'",
                        idea.video_title, idea.comment_id
                    ),
                )
            })?;
            Ok(CandidateIdea::from_comment(
                comment,
                &idea.video_title,
                &idea.description,
            ))
        })
        .collect()
}
