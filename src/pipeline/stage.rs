//! Stage names and definitions.
//!
//! The pipeline is assembled from an explicit, ordered list of
//! [`StageDefinition`]s rather than from any registry.

use crate::config::{AgentPrompt, PipelineSettings, Prompts, TaskPrompt};
use serde::Serialize;
use std::collections::HashMap;

/// The four pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageName {
    FilterComments,
    GenerateIdeas,
    ResearchIdeas,
    ScoreIdeas,
}

impl StageName {
    /// All stages in the order they run.
    pub const ALL: [StageName; 4] = [
        StageName::FilterComments,
        StageName::GenerateIdeas,
        StageName::ResearchIdeas,
        StageName::ScoreIdeas,
    ];

    /// Short human label.
    pub fn label(&self) -> &'static str {
        match self {
            StageName::FilterComments => "Filtering comments",
            StageName::GenerateIdeas => "Generating ideas",
            StageName::ResearchIdeas => "Researching ideas",
            StageName::ScoreIdeas => "Scoring ideas",
        }
    }
}

impl std::fmt::Display for StageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageName::FilterComments => write!(f, "filter_comments"),
            StageName::GenerateIdeas => write!(f, "generate_ideas"),
            StageName::ResearchIdeas => write!(f, "research_ideas"),
            StageName::ScoreIdeas => write!(f, "score_ideas"),
        }
    }
}

/// Configuration of one stage: the agent persona and the task it performs.
#[derive(Debug, Clone, PartialEq)]
pub struct StageDefinition {
    pub name: StageName,
    pub agent: AgentPrompt,
    pub task: TaskPrompt,
}

impl StageDefinition {
    /// Build the ordered stage list from prompts, rendering all variables.
    pub fn assemble(prompts: &Prompts, pipeline: &PipelineSettings) -> Vec<StageDefinition> {
        let mut vars = HashMap::new();
        vars.insert("min_score".to_string(), pipeline.min_score.to_string());
        vars.insert("max_score".to_string(), pipeline.max_score.to_string());
        vars.insert("max_results".to_string(), pipeline.max_research_results.to_string());

        StageName::ALL
            .iter()
            .map(|&name| {
                let (agent, task) = match name {
                    StageName::FilterComments => {
                        (&prompts.agents.comment_filter, &prompts.tasks.filter_comments)
                    }
                    StageName::GenerateIdeas => {
                        (&prompts.agents.idea_generator, &prompts.tasks.generate_ideas)
                    }
                    StageName::ResearchIdeas => {
                        (&prompts.agents.researcher, &prompts.tasks.research_ideas)
                    }
                    StageName::ScoreIdeas => (&prompts.agents.scorer, &prompts.tasks.score_ideas),
                };
                StageDefinition {
                    name,
                    agent: prompts.render_agent(agent),
                    task: prompts.render_task(task, &vars),
                }
            })
            .collect()
    }
}

/// A stage's structured result together with the text it produced.
#[derive(Debug, Clone)]
pub struct StageOutput<T> {
    pub value: T,
    pub raw: String,
}

/// What a stage said, kept for inspection after a run.
#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    pub name: StageName,
    pub raw_output: String,
    /// Number of items the stage passed on.
    pub items: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_is_ordered_and_rendered() {
        let mut prompts = Prompts::default();
        prompts
            .variables
            .insert("channel_name".to_string(), "Bake With Me".to_string());

        let definitions = StageDefinition::assemble(&prompts, &PipelineSettings::default());
        let names: Vec<_> = definitions.iter().map(|d| d.name).collect();
        assert_eq!(names, StageName::ALL.to_vec());

        let filter = &definitions[0];
        assert!(filter.agent.goal.contains("Bake With Me"));

        let scorer = &definitions[3];
        assert!(scorer.task.description.contains("from 1 (weak) to 10"));
        assert!(!scorer.task.description.contains("{{"));
    }

    #[test]
    fn test_stage_name_display() {
        assert_eq!(StageName::ResearchIdeas.to_string(), "research_ideas");
        assert_eq!(
            serde_json::to_string(&StageName::ScoreIdeas).unwrap(),
            "\"score_ideas\""
        );
    }
}
