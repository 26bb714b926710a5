use async_trait::async_trait;
use crate::errors::IdeaError;
use super::types::LLMResponse;

#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// One system + user exchange. The raw response body is returned untouched.
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<LLMResponse, IdeaError>;

    /// Provider name for logging
    fn provider_name(&self) -> &str;

    /// Model identifier
    fn model_name(&self) -> &str;
}
