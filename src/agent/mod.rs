//! Agents: LLM personas that carry out pipeline tasks.
//!
//! An agent pairs a role/goal/backstory with the language-model capability and
//! an optional tool set, and loops on tool calls until the model answers.

mod runner;
mod tools;

pub use runner::{Agent, AgentResponse, ToolCallRecord};
pub use tools::{parse_tool_call, tool_definitions, ToolCall, ToolContext, ToolOutput, SEARCH_TOOL};
