use crate::errors::IdeaError;
use super::catalog;
use super::chat::ChatCompletionsProvider;
use super::provider::LLMProvider;
use super::types::SamplingParams;

pub fn create_provider(
    provider_name: &str,
    api_key: &str,
    model: Option<&str>,
    base_url: Option<&str>,
    params: SamplingParams,
) -> Result<Box<dyn LLMProvider>, IdeaError> {
    if api_key.trim().is_empty() {
        return Err(IdeaError::Authentication(
            "No API key configured. Run `ideascope key set <KEY>` or set PERPLEXITY_API_KEY.".into(),
        ));
    }

    let model = model.unwrap_or_else(|| catalog::get_default_model(provider_name));

    match provider_name {
        "perplexity" | "openai" => {
            let url = base_url
                .or_else(|| catalog::get_provider(provider_name).map(|p| p.base_url))
                .unwrap_or(catalog::PROVIDERS[0].base_url);
            Ok(Box::new(ChatCompletionsProvider::new(provider_name, api_key, model, url, params)?))
        }
        "openai_compatible" => {
            let url = base_url.ok_or_else(|| {
                IdeaError::Config("openai_compatible provider requires llm.base_url".into())
            })?;
            Ok(Box::new(ChatCompletionsProvider::new(provider_name, api_key, model, url, params)?))
        }
        _ => Err(IdeaError::Config(format!("Unknown LLM provider: {}", provider_name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_perplexity_provider() {
        let p = create_provider("perplexity", "pplx-key", None, None, SamplingParams::default()).unwrap();
        assert_eq!(p.provider_name(), "perplexity");
        assert_eq!(p.model_name(), "sonar-pro");
    }

    #[test]
    fn test_empty_key_is_authentication_error() {
        let err = create_provider("perplexity", "  ", None, None, SamplingParams::default()).err().unwrap();
        assert!(matches!(err, IdeaError::Authentication(_)));
    }

    #[test]
    fn test_compatible_needs_base_url() {
        let err = create_provider("openai_compatible", "k", Some("m"), None, SamplingParams::default()).err().unwrap();
        assert!(matches!(err, IdeaError::Config(_)));
        assert!(create_provider("openai_compatible", "k", Some("m"), Some("http://localhost:8080/v1"), SamplingParams::default()).is_ok());
    }

    #[test]
    fn test_unknown_provider() {
        assert!(matches!(
            create_provider("gemini", "k", None, None, SamplingParams::default()).err().unwrap(),
            IdeaError::Config(_)
        ));
    }
}
