//! OpenAI client configuration built from [`LlmSettings`].

use crate::config::LlmSettings;
use crate::error::{IdeacrewError, Result};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Create an OpenAI-compatible client for the configured endpoint.
///
/// A timeout is only applied when `timeout_seconds` is set. The client's own
/// rate-limit backoff is disabled; `max_retries` is the only retry policy.
pub fn create_client(settings: &LlmSettings) -> Result<Client<OpenAIConfig>> {
    let mut config = OpenAIConfig::new();
    if let Some(base_url) = &settings.base_url {
        config = config.with_api_base(base_url.trim_end_matches('/'));
    }
    if let Some(api_key) = &settings.api_key {
        config = config.with_api_key(api_key);
    }

    let mut builder = reqwest::Client::builder();
    if let Some(secs) = settings.timeout_seconds {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    let http_client = builder
        .build()
        .map_err(|e| IdeacrewError::Config(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Client::with_config(config)
        .with_http_client(http_client)
        .with_backoff(no_backoff()))
}

/// A backoff that gives up after the first failed attempt.
fn no_backoff() -> backoff::ExponentialBackoff {
    backoff::ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build()
}
