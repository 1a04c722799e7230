//! Tool definitions and implementations for the agent system.

use crate::error::{IdeacrewError, Result};
use crate::llm::ToolSpec;
use crate::pipeline::ResearchItem;
use crate::search::SearchCapability;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Name under which the search tool is exposed to the model.
pub const SEARCH_TOOL: &str = "search_youtube_videos";

/// Available tools for the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum ToolCall {
    /// Search YouTube for videos similar to an idea.
    SearchYoutubeVideos {
        query: String,
        max_results: Option<usize>,
    },
}

/// Tool execution context with access to the search capability.
#[derive(Clone)]
pub struct ToolContext {
    pub search: Arc<dyn SearchCapability>,
    /// Hard cap on results per search, whatever the model asks for.
    pub max_results: usize,
}

/// Output of one tool execution.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Text handed back to the model.
    pub text: String,
    /// Structured results, when the tool produced any.
    pub items: Vec<ResearchItem>,
}

impl ToolContext {
    /// Create a new tool context.
    pub fn new(search: Arc<dyn SearchCapability>, max_results: usize) -> Self {
        Self {
            search,
            max_results,
        }
    }

    /// Execute a tool call.
    ///
    /// Capability failures are returned as errors rather than fed back to the model.
    pub async fn execute(&self, tool: &ToolCall) -> Result<ToolOutput> {
        match tool {
            ToolCall::SearchYoutubeVideos { query, max_results } => {
                let cap = self.max_results.max(1);
                let limit = max_results.unwrap_or(cap).clamp(1, cap);
                self.execute_search(query, limit).await
            }
        }
    }

    async fn execute_search(&self, query: &str, limit: usize) -> Result<ToolOutput> {
        let items = self.search.search(query, limit).await?;

        if items.is_empty() {
            return Ok(ToolOutput {
                text: format!("No videos found for \"{}\".", query),
                items,
            });
        }

        let formatted = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                format!(
                    "{}. {} ({} views)\n   {}",
                    i + 1,
                    item.title,
                    item.view_count,
                    item.url
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        Ok(ToolOutput {
            text: format!("Found {} videos:\n{}", items.len(), formatted),
            items,
        })
    }
}

/// Tool definitions exposed to the model.
pub fn tool_definitions(max_results: usize) -> Vec<ToolSpec> {
    vec![ToolSpec {
        name: SEARCH_TOOL.to_string(),
        description: "Search YouTube for existing videos on a topic. Returns titles, URLs and \
            view counts. Use this to gauge demand and competition for a video idea."
            .to_string(),
        parameters: serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search keywords"
                },
                "max_results": {
                    "type": "integer",
                    "description": format!("Maximum number of videos (at most {})", max_results),
                    "default": max_results
                }
            },
            "required": ["query"]
        }),
    }]
}

/// Parse a tool call from the model's name and JSON arguments.
pub fn parse_tool_call(name: &str, arguments: &str) -> Result<ToolCall> {
    let args: serde_json::Value = serde_json::from_str(arguments)
        .map_err(|e| IdeacrewError::Agent(format!("Invalid tool arguments: {}", e)))?;

    match name {
        SEARCH_TOOL => {
            let query = args["query"]
                .as_str()
                .filter(|q| !q.trim().is_empty())
                .ok_or_else(|| IdeacrewError::Agent("Missing 'query' argument".to_string()))?
                .to_string();
            let max_results = args["max_results"].as_u64().map(|n| n as usize);
            Ok(ToolCall::SearchYoutubeVideos { query, max_results })
        }
        _ => Err(IdeacrewError::Agent(format!("Unknown tool: {}", name))),
    }
}
