//! Scripted language model.
//!
//! Useful for testing and offline runs: replies come from a queue or a
//! closure instead of an API.

use super::{ChatMessage, Completion, LanguageModel, ToolSpec};
use crate::error::{IdeacrewError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

type ReplyFn = dyn Fn(&[ChatMessage], &[ToolSpec]) -> Result<Completion> + Send + Sync;

enum Responder {
    Queue(Mutex<VecDeque<Result<Completion>>>),
    Func(Box<ReplyFn>),
}

/// A model whose replies are fixed in advance.
pub struct ScriptedModel {
    responder: Responder,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedModel {
    /// Reply with the given completions, in order.
    pub fn new(replies: Vec<Completion>) -> Self {
        Self::with_results(replies.into_iter().map(Ok).collect())
    }

    /// Reply with the given results, in order. Errors are returned as-is.
    pub fn with_results(replies: Vec<Result<Completion>>) -> Self {
        Self {
            responder: Responder::Queue(Mutex::new(replies.into())),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Compute every reply from the request.
    pub fn from_fn<F>(reply: F) -> Self
    where
        F: Fn(&[ChatMessage], &[ToolSpec]) -> Result<Completion> + Send + Sync + 'static,
    {
        Self {
            responder: Responder::Func(Box::new(reply)),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// All message histories received so far.
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of calls received so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, messages: &[ChatMessage], tools: &[ToolSpec]) -> Result<Completion> {
        self.requests.lock().unwrap().push(messages.to_vec());

        match &self.responder {
            Responder::Queue(queue) => queue.lock().unwrap().pop_front().unwrap_or_else(|| {
                Err(IdeacrewError::OpenAI(
                    "Scripted model has no replies left".to_string(),
                ))
            }),
            Responder::Func(reply) => reply(messages, tools),
        }
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}
