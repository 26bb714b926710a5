use std::path::PathBuf;

use crate::errors::{IdeaError, RetryConfig};
use crate::llm::catalog;
use crate::llm::SamplingParams;
use crate::pipeline::SubmissionPolicy;
use super::credentials::resolve_credential;
use super::types::IdeaConfig;

pub const API_KEY_ENV: &str = "PERPLEXITY_API_KEY";
pub const DB_PATH_ENV: &str = "IDEASCOPE_DB";

/// Where the API key in use came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Flag,
    Environment,
    ConfigFile,
    Stored,
}

impl KeySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flag => "--api-key",
            Self::Environment => API_KEY_ENV,
            Self::ConfigFile => "config file",
            Self::Stored => "saved key",
        }
    }
}

/// Pick the API key: flag, then environment, then config file, then the
/// saved key. Blank values are skipped.
pub fn resolve_api_key(
    flag: Option<&str>,
    env: Option<String>,
    config: &IdeaConfig,
    stored: Option<&str>,
) -> Option<(String, KeySource)> {
    let from_config = config
        .llm
        .as_ref()
        .and_then(|l| l.api_key.as_deref())
        .map(resolve_credential);

    [
        (flag.map(str::to_string), KeySource::Flag),
        (env, KeySource::Environment),
        (from_config, KeySource::ConfigFile),
        (stored.map(str::to_string), KeySource::Stored),
    ]
    .into_iter()
    .find_map(|(value, source)| {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(|v| (v, source))
    })
}

/// Same precedence as [`resolve_api_key`], but the saved key is only
/// loaded when flag, environment and config file are all empty.
pub fn resolve_api_key_with<F>(
    flag: Option<&str>,
    env: Option<String>,
    config: &IdeaConfig,
    load_stored: F,
) -> Result<Option<(String, KeySource)>, IdeaError>
where
    F: FnOnce() -> Result<Option<String>, IdeaError>,
{
    if let Some(found) = resolve_api_key(flag, env, config, None) {
        return Ok(Some(found));
    }
    let stored = load_stored()?;
    Ok(resolve_api_key(None, None, config, stored.as_deref()))
}

/// Environment first, then config file, then the per-user data directory.
pub fn resolve_db_path(env: Option<String>, config: &IdeaConfig) -> PathBuf {
    if let Some(path) = env.filter(|p| !p.trim().is_empty()) {
        return PathBuf::from(path);
    }
    if let Some(path) = config.storage.as_ref().and_then(|s| s.db_path.as_deref()) {
        return PathBuf::from(path);
    }
    default_db_path()
}

pub fn default_db_path() -> PathBuf {
    std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(".local/share/ideascope/ideascope.db"))
        .unwrap_or_else(|| PathBuf::from("./ideascope.db"))
}

/// Analysis settings after applying CLI overrides on top of the config file.
#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    pub provider: String,
    pub model: String,
    pub base_url: Option<String>,
    pub params: SamplingParams,
    pub retry: RetryConfig,
    pub policy: SubmissionPolicy,
    pub prompts_dir: Option<PathBuf>,
}

impl AnalysisSettings {
    pub fn resolve(config: &IdeaConfig, model_flag: Option<&str>, partial_flag: bool) -> Self {
        let llm = config.llm.clone().unwrap_or_default();
        let analysis = config.analysis.clone().unwrap_or_default();
        let defaults = SamplingParams::default();

        let provider = llm.provider.unwrap_or_else(|| catalog::DEFAULT_PROVIDER.to_string());
        let model = model_flag
            .map(str::to_string)
            .or(llm.model)
            .unwrap_or_else(|| catalog::get_default_model(&provider).to_string());

        let partial = partial_flag || analysis.partial_success.unwrap_or(false);

        Self {
            provider,
            model,
            base_url: llm.base_url,
            params: SamplingParams {
                temperature: llm.temperature.unwrap_or(defaults.temperature),
                max_tokens: llm.max_tokens.unwrap_or(defaults.max_tokens),
            },
            retry: llm
                .max_retries
                .map(|max_retries| RetryConfig { max_retries })
                .unwrap_or_default(),
            policy: if partial {
                SubmissionPolicy::PartialSuccess
            } else {
                SubmissionPolicy::AllOrNothing
            },
            prompts_dir: analysis.prompts_dir.map(PathBuf::from),
        }
    }
}
