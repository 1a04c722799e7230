//! The comment-to-video-idea pipeline.
//!
//! Four agents run strictly in sequence:
//!
//! 1. [`CommentFilter`] keeps the comments worth acting on
//! 2. [`IdeaGenerator`] turns each kept comment into a candidate idea
//! 3. [`Researcher`] searches for comparable videos per idea
//! 4. [`Scorer`] rates the ideas and emits a validated [`VideoIdeasList`]
//!
//! Each stage's structured output feeds the next; the first error ends the run.

mod filter;
mod format;
mod generate;
mod model;
mod research;
mod score;
mod stage;
mod validate;

pub use filter::CommentFilter;
pub use format::{format_ideas, OutputFormat};
pub use generate::IdeaGenerator;
pub use model::{CandidateIdea, ResearchItem, ResearchedIdea, VideoIdea, VideoIdeasList};
pub use research::Researcher;
pub use score::Scorer;
pub use stage::{StageDefinition, StageName, StageOutput, StageReport};
pub use validate::{validate_scored, ScoreRules};

use crate::comments::Comment;
use crate::config::{Prompts, Settings};
use crate::error::Result;
use crate::llm::{LanguageModel, OpenAiModel};
use crate::search::{SearchCapability, YoutubeSearch};
use crate::youtube::YoutubeClient;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

/// Result of a successful pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct CrewOutput {
    pub ideas: VideoIdeasList,
    pub stages: Vec<StageReport>,
}

/// The assembled four-stage pipeline.
pub struct Pipeline {
    filter: CommentFilter,
    generator: IdeaGenerator,
    researcher: Researcher,
    scorer: Scorer,
}

impl Pipeline {
    /// Assemble the pipeline from explicit capabilities.
    pub fn assemble(
        settings: &Settings,
        prompts: &Prompts,
        model: Arc<dyn LanguageModel>,
        search: Arc<dyn SearchCapability>,
    ) -> Result<Self> {
        settings.validate()?;

        let pipeline = &settings.pipeline;
        let iterations = settings.llm.max_iterations;
        let definitions = StageDefinition::assemble(prompts, pipeline);

        let definition = |name: StageName| &definitions[name as usize];

        let filter = CommentFilter::new(definition(StageName::FilterComments), model.clone(), iterations);
        let generator = IdeaGenerator::new(definition(StageName::GenerateIdeas), model.clone(), iterations);
        let researcher = Researcher::new(
            definition(StageName::ResearchIdeas),
            model.clone(),
            search,
            pipeline.max_research_results,
            iterations,
        );
        let scorer = Scorer::new(definition(StageName::ScoreIdeas), model, pipeline, iterations);

        Ok(Self {
            filter,
            generator,
            researcher,
            scorer,
        })
    }

    /// Assemble the pipeline against the OpenAI-compatible API and YouTube search.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let prompts = Prompts::load(settings.prompts_dir().as_deref(), Some(&settings.prompts.variables))?;

        let model = Arc::new(OpenAiModel::from_settings(&settings.llm)?);
        let search = Arc::new(YoutubeSearch::new(YoutubeClient::from_settings(&settings.youtube)?));

        info!("Assembling pipeline with model {}", settings.llm.model);
        Self::assemble(settings, &prompts, model, search)
    }

    /// Run all four stages over `comments`.
    pub async fn run(&self, comments: &[Comment]) -> Result<CrewOutput> {
        self.run_with_progress(comments, |_| {}).await
    }

    /// Run all four stages, calling `on_stage` as each one starts.
    #[instrument(skip_all, fields(comments = comments.len()))]
    pub async fn run_with_progress<F>(&self, comments: &[Comment], mut on_stage: F) -> Result<CrewOutput>
    where
        F: FnMut(StageName),
    {
        let mut stages = Vec::with_capacity(StageName::ALL.len());

        on_stage(StageName::FilterComments);
        let filtered = self.filter.run(comments).await?;
        stages.push(report(StageName::FilterComments, &filtered.raw, filtered.value.len()));

        on_stage(StageName::GenerateIdeas);
        let generated = self.generator.run(&filtered.value).await?;
        stages.push(report(StageName::GenerateIdeas, &generated.raw, generated.value.len()));

        on_stage(StageName::ResearchIdeas);
        let researched = self.researcher.run(&generated.value).await?;
        stages.push(report(StageName::ResearchIdeas, &researched.raw, researched.value.len()));

        on_stage(StageName::ScoreIdeas);
        let scored = self.scorer.run(&researched.value).await?;
        stages.push(report(StageName::ScoreIdeas, &scored.raw, scored.value.len()));

        info!(
            "Pipeline finished: {} comments -> {} kept -> {} ideas scored",
            comments.len(),
            filtered.value.len(),
            scored.value.len()
        );

        Ok(CrewOutput {
            ideas: scored.value,
            stages,
        })
    }
}

fn report(name: StageName, raw: &str, items: usize) -> StageReport {
    StageReport {
        name,
        raw_output: raw.to_string(),
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IdeacrewError;
    use crate::llm::{Completion, ScriptedModel};
    use crate::search::StaticSearch;

    fn scenario_comments() -> Vec<Comment> {
        vec![
            Comment::new("c1", "v1", "Great video!"),
            Comment::new("c2", "v1", "Please cover topic X"),
            Comment::new("c3", "v1", "spam link"),
        ]
    }

    fn catalogue() -> Vec<ResearchItem> {
        vec![ResearchItem {
            title: "Topic X intro".to_string(),
            url: "https://www.youtube.com/watch?v=xxxxxxxxxxx".to_string(),
            view_count: 1200,
        }]
    }

    fn pipeline(model: Arc<ScriptedModel>, search: Arc<StaticSearch>) -> Pipeline {
        Pipeline::assemble(&Settings::default(), &Prompts::default(), model, search).unwrap()
    }

    #[tokio::test]
    async fn test_three_comment_scenario() {
        let model = Arc::new(ScriptedModel::new(vec![
            Completion::text(r#"{"comment_ids": ["c2"]}"#),
            Completion::text(
                r#"{"ideas": [{"comment_id": "c2", "video_title": "Topic X explained", "description": "A primer on topic X"}]}"#,
            ),
            Completion::text("One popular intro exists; a deeper take has room."),
            Completion::text(
                r#"{"video_ideas": [{"score": 7, "video_title": "Topic X explained", "description": "A primer on topic X",
                  "video_id": "v1", "comment_id": "c2",
                  "research": [{"title": "Topic X intro", "url": "https://www.youtube.com/watch?v=xxxxxxxxxxx", "view_count": 1200}]}]}"#,
            ),
        ]));
        let search = Arc::new(StaticSearch::new(catalogue()));

        let mut started = Vec::new();
        let output = pipeline(model.clone(), search)
            .run_with_progress(&scenario_comments(), |stage| started.push(stage))
            .await
            .unwrap();

        assert_eq!(started, StageName::ALL.to_vec());
        assert_eq!(model.call_count(), 4);

        assert_eq!(output.ideas.len(), 1);
        let idea = &output.ideas.video_ideas[0];
        assert!((1..=10).contains(&idea.score));
        assert!(!idea.video_title.is_empty());
        assert_eq!(idea.comment_id, "c2");
        assert!(idea.research.len() <= 5);

        let items: Vec<_> = output.stages.iter().map(|s| s.items).collect();
        assert_eq!(items, vec![1, 1, 1, 1]);
        assert!(output.stages[2].raw_output.contains("deeper take"));
    }

    #[tokio::test]
    async fn test_nothing_filtered_gives_empty_list() {
        let model = Arc::new(ScriptedModel::new(vec![Completion::text(r#"{"comment_ids": []}"#)]));
        let search = Arc::new(StaticSearch::new(catalogue()));

        let output = pipeline(model.clone(), search.clone())
            .run(&scenario_comments())
            .await
            .unwrap();

        assert_eq!(output.ideas, VideoIdeasList::default());
        assert_eq!(output.stages.len(), 4);
        assert_eq!(model.call_count(), 1);
        assert!(search.queries().is_empty());
    }

    #[tokio::test]
    async fn test_first_error_stops_the_run() {
        let model = Arc::new(ScriptedModel::with_results(vec![
            Ok(Completion::text(r#"{"comment_ids": ["c2"]}"#)),
            Err(IdeacrewError::OpenAI("rate limited".to_string())),
        ]));
        let search = Arc::new(StaticSearch::new(catalogue()));

        let err = pipeline(model.clone(), search.clone())
            .run(&scenario_comments())
            .await
            .unwrap_err();

        assert!(err.is_capability_failure());
        assert_eq!(model.call_count(), 2);
        assert!(search.queries().is_empty());
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let mut settings = Settings::default();
        settings.pipeline.min_score = 11;
        let result = Pipeline::assemble(
            &settings,
            &Prompts::default(),
            Arc::new(ScriptedModel::new(Vec::new())),
            Arc::new(StaticSearch::new(Vec::new())),
        );
        assert!(result.is_err());
    }
}
