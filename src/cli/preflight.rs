//! Pre-flight checks before expensive operations.
//!
//! Validates that required keys and configuration are available
//! before starting a run that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{IdeacrewError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// A pipeline run needs the model API and YouTube search.
    Run,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Run => {
            check_llm_key(settings)?;
            check_youtube_key(settings)?;
            settings.validate()?;
        }
    }
    Ok(())
}

/// A key is required unless a custom OpenAI-compatible endpoint is configured.
fn check_llm_key(settings: &Settings) -> Result<()> {
    let has_key = settings
        .llm
        .api_key
        .as_deref()
        .is_some_and(|k| !k.trim().is_empty());

    if has_key || settings.llm.base_url.is_some() {
        Ok(())
    } else {
        Err(IdeacrewError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        ))
    }
}

fn check_youtube_key(settings: &Settings) -> Result<()> {
    match settings.youtube.api_key.as_deref() {
        Some(key) if !key.trim().is_empty() => Ok(()),
        _ => Err(IdeacrewError::Config(
            "YOUTUBE_API_KEY not set. Set it with: export YOUTUBE_API_KEY='AIza...'".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_needs_both_keys() {
        let mut settings = Settings::default();
        assert!(check(Operation::Run, &settings).is_err());

        settings.llm.api_key = Some("sk-test".to_string());
        let err = check(Operation::Run, &settings).unwrap_err();
        assert!(err.to_string().contains("YOUTUBE_API_KEY"));

        settings.youtube.api_key = Some("AIza-test".to_string());
        assert!(check(Operation::Run, &settings).is_ok());
    }

    #[test]
    fn test_custom_endpoint_needs_no_llm_key() {
        let mut settings = Settings::default();
        settings.llm.base_url = Some("http://localhost:11434/v1".to_string());
        settings.youtube.api_key = Some("AIza-test".to_string());
        assert!(check(Operation::Run, &settings).is_ok());
    }
}
