//! Research stage: gather evidence on comparable videos for each idea.
//!
//! Ideas are researched one at a time, in order. Each idea is searched with a
//! query derived from its title; the research agent may run further searches
//! through its tool, and those results are merged in after the first ones.

use super::model::{CandidateIdea, ResearchItem, ResearchedIdea};
use super::stage::{StageDefinition, StageName, StageOutput};
use crate::agent::{Agent, ToolContext};
use crate::config::TaskPrompt;
use crate::error::Result;
use crate::llm::LanguageModel;
use crate::search::SearchCapability;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Stage 3.
pub struct Researcher {
    agent: Agent,
    task: TaskPrompt,
    search: Arc<dyn SearchCapability>,
    max_results: usize,
}

impl Researcher {
    pub fn new(
        definition: &StageDefinition,
        model: Arc<dyn LanguageModel>,
        search: Arc<dyn SearchCapability>,
        max_results: usize,
        max_iterations: usize,
    ) -> Self {
        let agent = Agent::new(&StageName::ResearchIdeas.to_string(), definition.agent.clone(), model)
            .with_tools(ToolContext::new(search.clone(), max_results))
            .with_max_iterations(max_iterations);

        Self {
            agent,
            task: definition.task.clone(),
            search,
            max_results,
        }
    }

    /// Research every idea in order.
    #[instrument(skip_all, fields(ideas = ideas.len()))]
    pub async fn run(&self, ideas: &[CandidateIdea]) -> Result<StageOutput<Vec<ResearchedIdea>>> {
        let mut researched = Vec::with_capacity(ideas.len());
        let mut raw = Vec::with_capacity(ideas.len());

        for (i, idea) in ideas.iter().enumerate() {
            info!("Researching idea {}/{}: {}", i + 1, ideas.len(), idea.video_title);
            let result = self.research_idea(idea).await?;
            raw.push(format!("[{}] {}", idea.comment_id, result.notes));
            researched.push(result);
        }

        Ok(StageOutput {
            value: researched,
            raw: raw.join("\n\n"),
        })
    }

    /// Research a single idea.
    pub async fn research_idea(&self, idea: &CandidateIdea) -> Result<ResearchedIdea> {
        let query = idea.search_query();
        let initial = self.search.search(&query, self.max_results).await?;
        debug!(
            "{} search returned {} results for '{}'",
            self.search.name(),
            initial.len(),
            query
        );

        let context = idea_context(idea, &query, &initial)?;
        let response = self.agent.run(&self.task, Some(&context)).await?;

        let extra = response
            .tool_calls
            .into_iter()
            .flat_map(|call| call.items);
        let research = merge_evidence(initial, extra, self.max_results);

        let notes = response.content.trim().to_string();
        if notes.is_empty() {
            warn!("Research agent returned no notes for '{}'", idea.video_title);
        }

        Ok(ResearchedIdea {
            idea: idea.clone(),
            research,
            notes,
        })
    }
}

fn idea_context(idea: &CandidateIdea, query: &str, results: &[ResearchItem]) -> Result<String> {
    Ok(format!(
        "Video idea:\n{}\n\nSearch results for \"{}\" ({}):\n{}",
        serde_json::to_string_pretty(idea)?,
        query,
        results.len(),
        serde_json::to_string_pretty(results)?
    ))
}

/// Concatenate evidence, dropping repeated URLs, and cap the length.
fn merge_evidence<I>(first: Vec<ResearchItem>, rest: I, cap: usize) -> Vec<ResearchItem>
where
    I: IntoIterator<Item = ResearchItem>,
{
    let mut seen = HashSet::new();
    first
        .into_iter()
        .chain(rest)
        .filter(|item| seen.insert(item.url.clone()))
        .take(cap)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::SEARCH_TOOL;
    use crate::comments::Comment;
    use crate::config::{PipelineSettings, Prompts};
    use crate::llm::{Completion, ScriptedModel, ToolInvocation};
    use crate::search::StaticSearch;

    fn item(title: &str, n: u64) -> ResearchItem {
        ResearchItem {
            title: title.to_string(),
            url: format!("https://www.youtube.com/watch?v=vid{:08}", n),
            view_count: n * 100,
        }
    }

    fn researcher(model: Arc<ScriptedModel>, search: Arc<StaticSearch>, cap: usize) -> Researcher {
        let definitions = StageDefinition::assemble(&Prompts::default(), &PipelineSettings::default());
        Researcher::new(&definitions[2], model, search, cap, 4)
    }

    fn idea(title: &str) -> CandidateIdea {
        CandidateIdea::from_comment(&Comment::new("c2", "v1", "Please cover it"), title, "desc")
    }

    #[test]
    fn test_merge_evidence_dedupes_and_caps() {
        let merged = merge_evidence(
            vec![item("a", 1), item("b", 2)],
            vec![item("b again", 2), item("c", 3), item("d", 4)],
            3,
        );
        let titles: Vec<_> = merged.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_research_uses_derived_query_and_tool_results() {
        let search = Arc::new(StaticSearch::new(vec![
            item("Sourdough starter guide", 1),
            item("Sourdough scoring patterns", 2),
            item("Rye bread basics", 3),
        ]));
        let model = Arc::new(ScriptedModel::new(vec![
            Completion::tool_calls(vec![ToolInvocation {
                id: "call_1".to_string(),
                name: SEARCH_TOOL.to_string(),
                arguments: r#"{"query": "rye bread"}"#.to_string(),
            }]),
            Completion::text("  Starter guides are popular.  "),
        ]));

        let output = researcher(model, search.clone(), 5)
            .run(&[idea("Sourdough for beginners")])
            .await
            .unwrap();

        assert_eq!(search.queries()[0], "Sourdough for beginners");
        let researched = &output.value[0];
        assert_eq!(researched.research.len(), 3);
        assert_eq!(researched.research[2].title, "Rye bread basics");
        assert_eq!(researched.notes, "Starter guides are popular.");
        assert!(output.raw.starts_with("[c2] Starter guides"));
    }

    #[tokio::test]
    async fn test_research_length_never_exceeds_cap() {
        let catalogue = (1..=10).map(|n| item(&format!("Pasta night {}", n), n)).collect();
        let search = Arc::new(StaticSearch::new(catalogue));
        let model = Arc::new(ScriptedModel::from_fn(|messages, _| {
            // Ask for more searches on the first turn only
            if messages.len() == 2 {
                Ok(Completion::tool_calls(vec![ToolInvocation {
                    id: "more".to_string(),
                    name: SEARCH_TOOL.to_string(),
                    arguments: r#"{"query": "pasta night", "max_results": 10}"#.to_string(),
                }]))
            } else {
                Ok(Completion::text("ok"))
            }
        }));

        for cap in 1..=4 {
            let output = researcher(model.clone(), search.clone(), cap)
                .run(&[idea("Pasta night ideas")])
                .await
                .unwrap();
            assert!(output.value[0].research.len() <= cap);
        }
    }

    #[tokio::test]
    async fn test_zero_results_are_tolerated() {
        let search = Arc::new(StaticSearch::new(Vec::new()));
        let model = Arc::new(ScriptedModel::new(vec![Completion::text("Nothing comparable exists.")]));

        let output = researcher(model, search, 5).run(&[idea("Underwater basket weaving")]).await.unwrap();
        assert!(output.value[0].research.is_empty());
    }

    #[tokio::test]
    async fn test_search_error_propagates() {
        let search = Arc::new(StaticSearch::failing("quota exceeded"));
        let model = Arc::new(ScriptedModel::new(Vec::new()));

        let err = researcher(model.clone(), search, 5).run(&[idea("Anything")]).await.unwrap_err();
        assert!(err.is_capability_failure());
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_input_is_noop() {
        let search = Arc::new(StaticSearch::new(Vec::new()));
        let model = Arc::new(ScriptedModel::new(Vec::new()));

        let output = researcher(model.clone(), search.clone(), 5).run(&[]).await.unwrap();
        assert!(output.value.is_empty());
        assert!(search.queries().is_empty());
        assert_eq!(model.call_count(), 0);
    }
}
