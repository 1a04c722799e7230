//! OpenAI chat completions backend.

use super::{ChatMessage, Completion, LanguageModel, ToolInvocation, ToolSpec};
use crate::config::LlmSettings;
use crate::error::{IdeacrewError, Result};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionTool, ChatCompletionToolType, CreateChatCompletionRequestArgs, FunctionCall,
    FunctionObject,
};
use async_trait::async_trait;
use tracing::{debug, instrument, warn};

/// Language model backed by an OpenAI-compatible API.
pub struct OpenAiModel {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
    max_retries: u32,
}

impl OpenAiModel {
    /// Create a model from LLM settings.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self> {
        Ok(Self {
            client: create_client(settings)?,
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_retries: settings.max_retries,
        })
    }

    fn to_request_messages(messages: &[ChatMessage]) -> Result<Vec<ChatCompletionRequestMessage>> {
        messages
            .iter()
            .map(|message| {
                let converted: ChatCompletionRequestMessage = match message {
                    ChatMessage::System(content) => ChatCompletionRequestSystemMessageArgs::default()
                        .content(content.clone())
                        .build()
                        .map_err(|e| IdeacrewError::Agent(e.to_string()))?
                        .into(),
                    ChatMessage::User(content) => ChatCompletionRequestUserMessageArgs::default()
                        .content(content.clone())
                        .build()
                        .map_err(|e| IdeacrewError::Agent(e.to_string()))?
                        .into(),
                    ChatMessage::Assistant {
                        content,
                        tool_calls,
                    } => {
                        let mut args = ChatCompletionRequestAssistantMessageArgs::default();
                        if let Some(content) = content {
                            args.content(content.clone());
                        }
                        if !tool_calls.is_empty() {
                            args.tool_calls(
                                tool_calls
                                    .iter()
                                    .map(|call| ChatCompletionMessageToolCall {
                                        id: call.id.clone(),
                                        r#type: ChatCompletionToolType::Function,
                                        function: FunctionCall {
                                            name: call.name.clone(),
                                            arguments: call.arguments.clone(),
                                        },
                                    })
                                    .collect::<Vec<_>>(),
                            );
                        }
                        args.build()
                            .map_err(|e| IdeacrewError::Agent(e.to_string()))?
                            .into()
                    }
                    ChatMessage::Tool { call_id, content } => {
                        ChatCompletionRequestToolMessageArgs::default()
                            .tool_call_id(call_id.as_str())
                            .content(content.clone())
                            .build()
                            .map_err(|e| IdeacrewError::Agent(e.to_string()))?
                            .into()
                    }
                };
                Ok(converted)
            })
            .collect()
    }

    fn to_tools(tools: &[ToolSpec]) -> Vec<ChatCompletionTool> {
        tools
            .iter()
            .map(|tool| ChatCompletionTool {
                r#type: ChatCompletionToolType::Function,
                function: FunctionObject {
                    name: tool.name.clone(),
                    description: Some(tool.description.clone()),
                    parameters: Some(tool.parameters.clone()),
                    strict: None,
                },
            })
            .collect()
    }

    async fn complete_once(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSpec],
    ) -> Result<Completion> {
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&self.model)
            .messages(Self::to_request_messages(messages)?)
            .temperature(self.temperature);
        if !tools.is_empty() {
            args.tools(Self::to_tools(tools));
        }
        let request = args
            .build()
            .map_err(|e| IdeacrewError::Agent(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| IdeacrewError::OpenAI(format!("Chat completion failed: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| IdeacrewError::OpenAI("No choices in response".to_string()))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| ToolInvocation {
                id: call.id,
                name: call.function.name,
                arguments: call.function.arguments,
            })
            .collect();

        Ok(Completion {
            content: choice.message.content,
            tool_calls,
        })
    }
}

#[async_trait]
impl LanguageModel for OpenAiModel {
    #[instrument(skip(self, messages, tools), fields(model = %self.model, messages = messages.len()))]
    async fn complete(&self, messages: &[ChatMessage], tools: &[ToolSpec]) -> Result<Completion> {
        let mut attempt = 0;
        loop {
            match self.complete_once(messages, tools).await {
                Ok(completion) => {
                    debug!(
                        "Model replied ({} tool calls)",
                        completion.tool_calls.len()
                    );
                    return Ok(completion);
                }
                Err(e) if attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        "Model call failed (attempt {}/{}): {}",
                        attempt,
                        self.max_retries + 1,
                        e
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
