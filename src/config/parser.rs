use std::path::{Path, PathBuf};
use crate::errors::IdeaError;
use super::types::IdeaConfig;
use super::schema::CONFIG_SCHEMA;
use tracing::{debug, warn};

const MAX_CONFIG_BYTES: u64 = 1_048_576;

pub async fn parse_config(path: &Path) -> Result<IdeaConfig, IdeaError> {
    if !path.exists() {
        return Err(IdeaError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > MAX_CONFIG_BYTES {
        return Err(IdeaError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let yaml: serde_yaml::Value = serde_yaml::from_str(&content)?;
    if yaml.is_null() {
        return Ok(IdeaConfig::default());
    }

    validate_schema(&yaml)?;

    let config: IdeaConfig = serde_yaml::from_value(yaml)?;

    validate_semantics(&config)?;

    debug!(path = %path.display(), "Config loaded");
    Ok(config)
}

/// Load the config named on the command line, else the default file if it
/// exists, else an empty config.
pub async fn load_config(explicit: Option<&Path>) -> Result<IdeaConfig, IdeaError> {
    if let Some(path) = explicit {
        return parse_config(path).await;
    }
    match default_config_path() {
        Some(path) if path.exists() => parse_config(&path).await,
        _ => Ok(IdeaConfig::default()),
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(PathBuf::from(home).join(".config/ideascope/config.yaml"))
}

/// Validate config against the JSON schema for structural correctness.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), IdeaError> {
    let json_value: serde_json::Value = serde_json::to_value(yaml)
        .map_err(|e| IdeaError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| IdeaError::Config(format!("Schema compilation error: {}", e)))?;

    let result = compiled.validate(&json_value);
    if let Err(errors) = result {
        // Advisory only; the typed parse and semantic checks decide.
        for e in errors {
            warn!(validation_error = %format!("{} at {}", e, e.instance_path), "Config schema warning");
        }
    }

    Ok(())
}

fn validate_semantics(config: &IdeaConfig) -> Result<(), IdeaError> {
    let Some(llm) = &config.llm else {
        return Ok(());
    };

    if let Some(t) = llm.temperature {
        if !(0.0..=2.0).contains(&t) {
            return Err(IdeaError::Config(format!("llm.temperature must be between 0 and 2, got {}", t)));
        }
    }
    if llm.max_tokens == Some(0) {
        return Err(IdeaError::Config("llm.max_tokens must be greater than 0".into()));
    }
    if let Some(r) = llm.max_retries {
        if r > 10 {
            return Err(IdeaError::Config(format!("llm.max_retries must be at most 10, got {}", r)));
        }
    }
    if llm.provider.as_deref() == Some("openai_compatible") && llm.base_url.is_none() {
        warn!("openai_compatible provider configured without llm.base_url");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LLMConfig;

    fn with_llm(llm: LLMConfig) -> IdeaConfig {
        IdeaConfig { llm: Some(llm), ..Default::default() }
    }

    #[test]
    fn test_semantics_temperature_range() {
        assert!(validate_semantics(&with_llm(LLMConfig { temperature: Some(2.5), ..Default::default() })).is_err());
        assert!(validate_semantics(&with_llm(LLMConfig { temperature: Some(0.3), ..Default::default() })).is_ok());
    }

    #[test]
    fn test_semantics_max_tokens_and_retries() {
        assert!(validate_semantics(&with_llm(LLMConfig { max_tokens: Some(0), ..Default::default() })).is_err());
        assert!(validate_semantics(&with_llm(LLMConfig { max_retries: Some(11), ..Default::default() })).is_err());
    }

    #[test]
    fn test_semantics_empty_config() {
        assert!(validate_semantics(&IdeaConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_parse_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "llm:\n  model: sonar\n  max_retries: 1\nstorage:\n  db_path: /tmp/x.db\n").unwrap();

        let config = parse_config(&path).await.unwrap();
        assert_eq!(config.llm.and_then(|l| l.max_retries), Some(1));
        assert_eq!(config.storage.and_then(|s| s.db_path).as_deref(), Some("/tmp/x.db"));
    }

    #[tokio::test]
    async fn test_parse_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "").unwrap();
        assert!(parse_config(&path).await.unwrap().llm.is_none());
    }

    #[tokio::test]
    async fn test_missing_explicit_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("nope.yaml"))).await.unwrap_err();
        assert!(matches!(err, IdeaError::Config(_)));
    }

    #[tokio::test]
    async fn test_invalid_semantics_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "llm:\n  temperature: 5\n").unwrap();
        assert!(matches!(parse_config(&path).await, Err(IdeaError::Config(_))));
    }
}
