//! Configuration module for Ideacrew.
//!
//! Handles loading and managing application settings and agent/task prompts.

mod prompts;
mod settings;

pub use prompts::{AgentPrompt, AgentPrompts, Prompts, TaskPrompt, TaskPrompts, AGENTS_FILE, TASKS_FILE};
pub use settings::{
    GeneralSettings, LlmSettings, PipelineSettings, PromptSettings, Settings, YoutubeSettings,
};
