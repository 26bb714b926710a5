use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The chat-completions response body returned by the research API.
///
/// Only `choices` matters for decoding. Every metadata field falls back to
/// its default when it is missing, `null`, or of an unexpected type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportEnvelope {
    #[serde(default, deserialize_with = "lenient")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub model: String,
    /// Unix seconds.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub usage: Usage,
    #[serde(default, deserialize_with = "lenient")]
    pub citations: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub search_results: Vec<SearchResult>,
    #[serde(default, deserialize_with = "lenient")]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default, deserialize_with = "lenient")]
    pub prompt_tokens: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub completion_tokens: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub total_tokens: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default, deserialize_with = "lenient")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default, deserialize_with = "lenient")]
    pub index: u32,
    #[serde(default, deserialize_with = "lenient")]
    pub finish_reason: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default, deserialize_with = "lenient")]
    pub role: String,
    #[serde(default, deserialize_with = "content_text")]
    pub content: String,
}

/// Deserialize `T`, or fall back to `T::default()` on `null` or a type
/// mismatch.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Integer, float, or numeric string seconds. Anything else is 0.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let seconds = match &value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f as i64),
        _ => None,
    };
    Ok(seconds.unwrap_or(0))
}

/// Message text. `null` is empty; non-string content keeps its JSON text.
fn content_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

impl ReportEnvelope {
    /// The assistant text of the first choice.
    pub fn raw_content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}
