//! Ideacrew - YouTube comments to video ideas
//!
//! A multi-agent CLI that reads viewer comments and turns them into
//! researched, scored video ideas.
//!
//! # Overview
//!
//! Four agents, each backed by a chat-completion model, run in sequence:
//! - a curator filters out praise, spam and noise
//! - a strategist proposes one video idea per useful comment
//! - a researcher searches YouTube for comparable videos and their view counts
//! - an evaluator scores every idea and returns a validated [`pipeline::VideoIdeasList`]
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Settings and agent/task prompt templates
//! - `comments` - Comment model and loaders
//! - `youtube` - YouTube Data API client
//! - `llm` - Language-model capability (OpenAI-compatible and scripted)
//! - `search` - Search capability used during research
//! - `agent` - Persona-driven agent with a tool loop
//! - `pipeline` - The four stages and the driver that runs them
//!
//! # Example
//!
//! ```rust,no_run
//! use ideacrew::comments;
//! use ideacrew::config::Settings;
//! use ideacrew::pipeline::Pipeline;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let pipeline = Pipeline::from_settings(&settings)?;
//!
//!     let comments = comments::load_from_file(Path::new("comments.json"), None)?;
//!     let output = pipeline.run(&comments).await?;
//!     println!("{} ideas", output.ideas.len());
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod comments;
pub mod config;
pub mod error;
pub mod llm;
pub mod openai;
pub mod pipeline;
pub mod search;
pub mod youtube;

pub use error::{IdeacrewError, Result};
