use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdeaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("LLM API error: {0}")]
    LLMApi(String),

    #[error("Rate limited: {0}")]
    RateLimit(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Report envelope could not be decoded: {0}")]
    EnvelopeDecode(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IdeaError {
    /// True for failures that happened while talking to the LLM API.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            IdeaError::Authentication(_)
                | IdeaError::LLMApi(_)
                | IdeaError::RateLimit(_)
                | IdeaError::Network(_)
                | IdeaError::Timeout(_)
        )
    }
}
