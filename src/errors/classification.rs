use super::types::IdeaError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    pub retryable: bool,
}

impl IdeaError {
    /// Classify this error to determine its type and whether the transport may retry it.
    pub fn classify(&self) -> ErrorClassification {
        let (error_type, retryable) = match self {
            IdeaError::RateLimit(_) => ("RateLimitError", true),
            IdeaError::Network(_) => ("NetworkError", true),
            IdeaError::Timeout(_) => ("TimeoutError", true),
            IdeaError::LLMApi(_) => ("LLMApiError", true),

            IdeaError::Authentication(_) => ("AuthenticationError", false),
            IdeaError::Config(_) => ("ConfigError", false),
            IdeaError::InvalidInput(_) => ("InvalidInputError", false),
            IdeaError::EnvelopeDecode(_) => ("EnvelopeDecodeError", false),
            IdeaError::Prompt(_) => ("PromptError", false),
            IdeaError::Json(_) => ("JsonError", false),
            IdeaError::Yaml(_) => ("YamlError", false),

            IdeaError::Io(_) => ("IoError", true),
            IdeaError::Database(_) => ("DatabaseError", true),
            IdeaError::Internal(_) => ("InternalError", true),
        };
        ErrorClassification { error_type, retryable }
    }
}
