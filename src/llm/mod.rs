//! Language-model capability.
//!
//! Stages never talk to an API directly. They hold an `Arc<dyn LanguageModel>`
//! that turns a message history (plus optional tool definitions) into either
//! text or a set of tool calls.

mod json;
mod openai;
mod scripted;

pub use json::{extract_json, parse_json_response};
pub use openai::OpenAiModel;
pub use scripted::ScriptedModel;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One message in a chat history.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatMessage {
    System(String),
    User(String),
    Assistant {
        content: Option<String>,
        tool_calls: Vec<ToolInvocation>,
    },
    Tool {
        call_id: String,
        content: String,
    },
}

/// A tool call requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub id: String,
    pub name: String,
    /// Raw JSON arguments.
    pub arguments: String,
}

/// A tool the model may call.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments object.
    pub parameters: serde_json::Value,
}

/// The model's reply to one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completion {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolInvocation>,
}

impl Completion {
    /// A plain text reply.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    /// A reply that only asks for tool calls.
    pub fn tool_calls(calls: Vec<ToolInvocation>) -> Self {
        Self {
            content: None,
            tool_calls: calls,
        }
    }

    /// Whether the model wants tools executed before answering.
    pub fn wants_tools(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Trait for chat-style language models.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate the next reply for the given history.
    async fn complete(&self, messages: &[ChatMessage], tools: &[ToolSpec]) -> Result<Completion>;

    /// Name of the underlying model, for logging.
    fn model_name(&self) -> &str;
}
