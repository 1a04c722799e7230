//! Scoring stage: rate researched ideas and emit the final list.

use super::model::{ResearchedIdea, VideoIdeasList};
use super::stage::{StageDefinition, StageName, StageOutput};
use super::validate::{validate_scored, ScoreRules};
use crate::agent::Agent;
use crate::config::{PipelineSettings, TaskPrompt};
use crate::error::Result;
use crate::llm::LanguageModel;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Stage 4.
pub struct Scorer {
    agent: Agent,
    task: TaskPrompt,
    rules: ScoreRules,
}

impl Scorer {
    pub fn new(
        definition: &StageDefinition,
        model: Arc<dyn LanguageModel>,
        pipeline: &PipelineSettings,
        max_iterations: usize,
    ) -> Self {
        Self {
            agent: Agent::new(&StageName::ScoreIdeas.to_string(), definition.agent.clone(), model)
                .with_max_iterations(max_iterations),
            task: definition.task.clone(),
            rules: ScoreRules {
                min_score: pipeline.min_score,
                max_score: pipeline.max_score,
                max_research_results: pipeline.max_research_results,
            },
        }
    }

    /// Score every idea. The reply must validate against [`VideoIdeasList`].
    #[instrument(skip_all, fields(ideas = ideas.len()))]
    pub async fn run(&self, ideas: &[ResearchedIdea]) -> Result<StageOutput<VideoIdeasList>> {
        if ideas.is_empty() {
            info!("Nothing to score");
            return Ok(StageOutput {
                value: VideoIdeasList::default(),
                raw: String::new(),
            });
        }

        let context = format!(
            "Researched video ideas ({}):\n{}",
            ideas.len(),
            serde_json::to_string_pretty(ideas)?
        );
        let response = self.agent.run(&self.task, Some(&context)).await?;

        let list = validate_scored(&response.content, ideas, &self.rules).inspect_err(|e| {
            warn!("Scorer output rejected: {}", e);
        })?;

        info!("Scored {} ideas", list.len());

        Ok(StageOutput {
            value: list,
            raw: response.content,
        })
    }
}
