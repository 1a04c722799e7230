//! Error types for Ideacrew.

use thiserror::Error;

/// Library-level error type for Ideacrew operations.
#[derive(Error, Debug)]
pub enum IdeacrewError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("YouTube API error: {0}")]
    YouTube(String),

    #[error("Search failed: {0}")]
    Search(String),

    #[error("Malformed response from {stage} stage: {reason}")]
    MalformedResponse { stage: String, reason: String },

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Scored output failed schema validation: {}", .violations.join("; "))]
    SchemaValidation { violations: Vec<String> },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Output encoding error: {0}")]
    Output(String),
}

/// Broad classification of an error, for callers that need to tell
/// misbehaving capabilities apart from invalid scored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The language model or search tool failed or returned garbage.
    Capability,
    /// The scoring stage produced output that does not fit `VideoIdeasList`.
    SchemaValidation,
    /// Bad settings, prompt files or environment.
    Config,
    /// Bad caller input (missing files, unparsable ids) or data the chosen
    /// output format cannot represent.
    Input,
}

impl IdeacrewError {
    /// Build a malformed-response error for a named stage.
    pub fn malformed(stage: impl std::fmt::Display, reason: impl Into<String>) -> Self {
        IdeacrewError::MalformedResponse {
            stage: stage.to_string(),
            reason: reason.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            IdeacrewError::Http(_)
            | IdeacrewError::OpenAI(_)
            | IdeacrewError::YouTube(_)
            | IdeacrewError::Search(_)
            | IdeacrewError::MalformedResponse { .. }
            | IdeacrewError::Agent(_) => ErrorKind::Capability,
            IdeacrewError::SchemaValidation { .. } => ErrorKind::SchemaValidation,
            IdeacrewError::Config(_) | IdeacrewError::TomlParse(_) => ErrorKind::Config,
            IdeacrewError::Io(_)
            | IdeacrewError::Json(_)
            | IdeacrewError::InvalidInput(_)
            | IdeacrewError::Output(_) => ErrorKind::Input,
        }
    }

    /// True for language-model and search failures.
    pub fn is_capability_failure(&self) -> bool {
        self.kind() == ErrorKind::Capability
    }

    /// True when the scored output did not validate.
    pub fn is_schema_failure(&self) -> bool {
        self.kind() == ErrorKind::SchemaValidation
    }
}

/// Result type alias for Ideacrew operations.
pub type Result<T> = std::result::Result<T, IdeacrewError>;
