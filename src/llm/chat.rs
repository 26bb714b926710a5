use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::errors::IdeaError;
use crate::utils::truncation::truncate_error;
use super::provider::LLMProvider;
use super::types::{ChatRequest, LLMResponse, Message, SamplingParams};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

/// Client for any `/chat/completions` endpoint (Perplexity, OpenAI and
/// compatible gateways).
pub struct ChatCompletionsProvider {
    client: Client,
    name: String,
    api_key: String,
    model: String,
    base_url: String,
    params: SamplingParams,
}

impl ChatCompletionsProvider {
    pub fn new(
        name: &str,
        api_key: &str,
        model: &str,
        base_url: &str,
        params: SamplingParams,
    ) -> Result<Self, IdeaError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| IdeaError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            name: name.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            params,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    pub fn request(&self, system: &str, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![Message::system(system), Message::user(prompt)],
            temperature: self.params.temperature,
            max_tokens: self.params.max_tokens,
        }
    }
}

#[async_trait]
impl LLMProvider for ChatCompletionsProvider {
    async fn complete(&self, system: &str, prompt: &str) -> Result<LLMResponse, IdeaError> {
        let body = self.request(system, prompt);

        debug!(provider = %self.name, model = %self.model, prompt_chars = prompt.len(), "Sending completion request");

        let resp = self.client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    IdeaError::Timeout(format!("{} request timed out", self.name))
                } else {
                    IdeaError::Network(format!("{} request failed: {}", self.name, e))
                }
            })?;

        let status = resp.status();
        let raw_body = resp.text().await
            .map_err(|e| IdeaError::Network(format!("Failed to read {} response: {}", self.name, e)))?;

        check_response(&self.name, status, &raw_body)?;

        let total_tokens = serde_json::from_str::<Value>(&raw_body)
            .ok()
            .and_then(|v| v["usage"]["total_tokens"].as_u64());

        debug!(provider = %self.name, status = status.as_u16(), body_bytes = raw_body.len(), total_tokens, "Completion received");

        Ok(LLMResponse {
            raw_body,
            model: self.model.clone(),
            total_tokens,
        })
    }

    fn provider_name(&self) -> &str { &self.name }
    fn model_name(&self) -> &str { &self.model }
}

/// Map an HTTP status and body onto the transport error family.
fn check_response(provider: &str, status: StatusCode, body: &str) -> Result<(), IdeaError> {
    if status == StatusCode::UNAUTHORIZED {
        return Err(IdeaError::Authentication(format!("Invalid {} API key", provider)));
    }
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(IdeaError::RateLimit(format!("{} rate limit exceeded", provider)));
    }

    let parsed: Option<Value> = serde_json::from_str(body).ok();
    if let Some(error) = parsed.as_ref().and_then(|v| v.get("error")) {
        let msg = error["message"]
            .as_str()
            .or_else(|| error.as_str())
            .unwrap_or("Unknown error");
        return Err(IdeaError::LLMApi(format!("{}: {}", provider, msg)));
    }

    if !status.is_success() {
        return Err(IdeaError::LLMApi(format!(
            "{} returned HTTP {}: {}",
            provider,
            status.as_u16(),
            truncate_error(body)
        )));
    }
    Ok(())
}
