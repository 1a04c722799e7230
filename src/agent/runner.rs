//! Agent runner with tool calling loop.

use super::tools::{parse_tool_call, tool_definitions, ToolContext};
use crate::config::{AgentPrompt, TaskPrompt};
use crate::error::{IdeacrewError, Result};
use crate::llm::{ChatMessage, LanguageModel, ToolInvocation, ToolSpec};
use crate::pipeline::ResearchItem;
use std::sync::Arc;
use tracing::{debug, info};

/// Default cap on model calls per run.
const DEFAULT_MAX_ITERATIONS: usize = 8;

/// An LLM persona bound to a model and, optionally, tools.
pub struct Agent {
    name: String,
    persona: AgentPrompt,
    model: Arc<dyn LanguageModel>,
    tools: Option<ToolContext>,
    max_iterations: usize,
}

impl Agent {
    /// Create a new agent without tools.
    pub fn new(name: &str, persona: AgentPrompt, model: Arc<dyn LanguageModel>) -> Self {
        Self {
            name: name.to_string(),
            persona,
            model,
            tools: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Give the agent access to tools.
    pub fn with_tools(mut self, tools: ToolContext) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Set maximum iterations for the agent loop.
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// System prompt built from the persona.
    pub fn system_prompt(&self) -> String {
        format!(
            "You are the {}.\n\n{}\n\nYour goal: {}",
            self.persona.role, self.persona.backstory, self.persona.goal
        )
    }

    /// Build the user message for a task with optional context.
    pub fn task_message(task: &TaskPrompt, context: Option<&str>) -> String {
        let body = format!(
            "Task: {}\n\nExpected output: {}",
            task.description, task.expected_output
        );
        match context {
            Some(ctx) => format!("Context: {}\n\n{}", ctx, body),
            None => body,
        }
    }

    /// Run the agent on a task.
    pub async fn run(&self, task: &TaskPrompt, context: Option<&str>) -> Result<AgentResponse> {
        let mut messages = vec![
            ChatMessage::System(self.system_prompt()),
            ChatMessage::User(Self::task_message(task, context)),
        ];

        let tool_specs: Vec<ToolSpec> = self
            .tools
            .as_ref()
            .map(|t| tool_definitions(t.max_results))
            .unwrap_or_default();

        let mut iterations = 0;
        let mut tool_calls_made = Vec::new();

        loop {
            iterations += 1;
            if iterations > self.max_iterations {
                return Err(IdeacrewError::Agent(format!(
                    "{} agent exceeded maximum iterations ({})",
                    self.name, self.max_iterations
                )));
            }

            debug!(
                "{} agent iteration {} ({})",
                self.name,
                iterations,
                self.model.model_name()
            );

            let completion = self.model.complete(&messages, &tool_specs).await?;

            if !completion.wants_tools() {
                return Ok(AgentResponse {
                    content: completion.content.unwrap_or_default(),
                    tool_calls: tool_calls_made,
                    iterations,
                });
            }

            messages.push(ChatMessage::Assistant {
                content: completion.content.clone(),
                tool_calls: completion.tool_calls.clone(),
            });

            for invocation in &completion.tool_calls {
                let record = self.execute_tool_call(invocation).await?;

                messages.push(ChatMessage::Tool {
                    call_id: invocation.id.clone(),
                    content: record.result.clone(),
                });

                tool_calls_made.push(record);
            }
        }
    }

    /// Execute a single tool call and return a record of it.
    ///
    /// Malformed calls are reported back to the model; capability errors abort the run.
    async fn execute_tool_call(&self, invocation: &ToolInvocation) -> Result<ToolCallRecord> {
        let name = &invocation.name;
        let arguments = &invocation.arguments;

        info!("{} agent calling tool: {} with args: {}", self.name, name, arguments);

        let Some(tools) = &self.tools else {
            return Ok(ToolCallRecord {
                name: name.clone(),
                arguments: arguments.clone(),
                result: format!("Tool '{}' is not available to this agent.", name),
                items: Vec::new(),
            });
        };

        let (result, items) = match parse_tool_call(name, arguments) {
            Ok(tool) => {
                let output = tools.execute(&tool).await?;
                (output.text, output.items)
            }
            Err(e) => (format!("Failed to parse tool call: {}", e), Vec::new()),
        };

        Ok(ToolCallRecord {
            name: name.clone(),
            arguments: arguments.clone(),
            result,
            items,
        })
    }
}

/// Response from an agent run.
#[derive(Debug)]
pub struct AgentResponse {
    /// The final response content from the agent.
    pub content: String,
    /// Record of all tool calls made during execution.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Number of iterations (LLM calls) used.
    pub iterations: usize,
}

/// Record of a tool call made by the agent.
#[derive(Debug, Clone)]
pub struct ToolCallRecord {
    /// Name of the tool called.
    pub name: String,
    /// JSON arguments passed to the tool.
    pub arguments: String,
    /// Result returned to the model.
    pub result: String,
    /// Research items the call produced.
    pub items: Vec<ResearchItem>,
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}
