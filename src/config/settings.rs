//! Configuration settings for Ideacrew.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub llm: LlmSettings,
    pub youtube: YoutubeSettings,
    pub pipeline: PipelineSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Optional .env file loaded before environment overrides are applied.
    pub env_file: Option<String>,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            env_file: None,
        }
    }
}

/// Language model endpoint settings.
///
/// `base_url`, `api_key` and `model` can be overridden with
/// `OPENAI_API_BASE`, `OPENAI_API_KEY` and `OPENAI_MODEL_NAME`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// OpenAI-compatible API base URL (None = api.openai.com).
    pub base_url: Option<String>,
    /// API key. Prefer the environment over storing this in the file.
    pub api_key: Option<String>,
    /// Chat model used by every agent.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Request timeout in seconds (None = client default).
    pub timeout_seconds: Option<u64>,
    /// Extra attempts after a failed model call. 0 fails fast.
    pub max_retries: u32,
    /// Upper bound on model calls within one agent run.
    pub max_iterations: usize,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            timeout_seconds: None,
            max_retries: 0,
            max_iterations: 8,
        }
    }
}

/// YouTube Data API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeSettings {
    /// YouTube Data API key. Overridden by `YOUTUBE_API_KEY`.
    pub api_key: Option<String>,
    /// Data API base URL.
    pub api_base: String,
    /// Maximum comments fetched per video.
    pub max_comments: usize,
}

impl Default for YoutubeSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: "https://www.googleapis.com/youtube/v3".to_string(),
            max_comments: 100,
        }
    }
}

/// Pipeline behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Maximum research items attached to a single idea.
    pub max_research_results: usize,
    /// Lowest score the scorer may assign.
    pub min_score: i64,
    /// Highest score the scorer may assign.
    pub max_score: i64,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_research_results: 5,
            min_score: 1,
            max_score: 10,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PromptSettings {
    /// Directory holding `agents.toml` / `tasks.toml` overrides.
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    ///
    /// Environment overrides are applied after the file is read.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let mut settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Settings::default()
        };

        settings.load_env_file()?;
        settings.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Load the configured .env file, or `./.env` when present.
    fn load_env_file(&self) -> crate::error::Result<()> {
        match &self.general.env_file {
            Some(path) => {
                let path = Self::expand_path(path);
                dotenvy::from_path(&path).map_err(|e| {
                    crate::error::IdeacrewError::Config(format!(
                        "Failed to load env file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
            }
            None => {
                dotenvy::dotenv().ok();
            }
        }
        Ok(())
    }

    /// Apply environment overrides using the given lookup.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(base) = non_empty("OPENAI_API_BASE") {
            self.llm.base_url = Some(base);
        }
        if let Some(key) = non_empty("OPENAI_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(model) = non_empty("OPENAI_MODEL_NAME") {
            self.llm.model = model;
        }
        if let Some(key) = non_empty("YOUTUBE_API_KEY") {
            self.youtube.api_key = Some(key);
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::IdeacrewError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ideacrew")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded prompt override directory, if configured.
    pub fn prompts_dir(&self) -> Option<PathBuf> {
        self.prompts.custom_dir.as_deref().map(Self::expand_path)
    }

    /// Check that the score range is usable.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.pipeline.min_score > self.pipeline.max_score {
            return Err(crate::error::IdeacrewError::Config(format!(
                "pipeline.min_score ({}) is greater than pipeline.max_score ({})",
                self.pipeline.min_score, self.pipeline.max_score
            )));
        }
        if self.pipeline.max_research_results == 0 {
            return Err(crate::error::IdeacrewError::Config(
                "pipeline.max_research_results must be at least 1".to_string(),
            ));
        }
        if self.llm.max_iterations == 0 {
            return Err(crate::error::IdeacrewError::Config(
                "llm.max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_reference_configuration() {
        let settings = Settings::default();
        assert_eq!(settings.llm.temperature, 0.7);
        assert_eq!(settings.llm.max_retries, 0);
        assert!(settings.llm.timeout_seconds.is_none());
        assert_eq!(settings.pipeline.min_score, 1);
        assert_eq!(settings.pipeline.max_score, 10);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_env_overrides_win_over_file() {
        let mut settings: Settings = toml::from_str(
            r#"
            [llm]
            model = "from-file"
            base_url = "http://file.local/v1"
            "#,
        )
        .unwrap();

        let env: HashMap<&str, &str> = [
            ("OPENAI_MODEL_NAME", "from-env"),
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_API_BASE", "   "),
            ("YOUTUBE_API_KEY", "yt-key"),
        ]
        .into_iter()
        .collect();
        settings.apply_env_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(settings.llm.model, "from-env");
        assert_eq!(settings.llm.api_key.as_deref(), Some("sk-test"));
        // Blank values are ignored
        assert_eq!(settings.llm.base_url.as_deref(), Some("http://file.local/v1"));
        assert_eq!(settings.youtube.api_key.as_deref(), Some("yt-key"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings: Settings = toml::from_str("[pipeline]\nmax_score = 5\n").unwrap();
        assert_eq!(settings.pipeline.max_score, 5);
        assert_eq!(settings.pipeline.min_score, 1);
        assert_eq!(settings.llm.model, "gpt-4o-mini");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.pipeline.max_research_results = 3;
        settings.save_to(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let reloaded: Settings = toml::from_str(&content).unwrap();
        assert_eq!(reloaded.pipeline.max_research_results, 3);
    }

    #[test]
    fn test_validate_rejects_inverted_score_range() {
        let mut settings = Settings::default();
        settings.pipeline.min_score = 8;
        settings.pipeline.max_score = 2;
        assert!(settings.validate().is_err());
    }
}
