use serde_json::Value;
use tracing::debug;

use crate::errors::IdeaError;
use crate::models::ReportEnvelope;

/// Decode a serialized API response into a [`ReportEnvelope`].
///
/// Fails with [`IdeaError::EnvelopeDecode`] when the text is not JSON, is not
/// an object, or carries no choices. An `error` field sent in place of
/// choices becomes the failure message.
pub fn decode_envelope(raw: &str) -> Result<ReportEnvelope, IdeaError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| IdeaError::EnvelopeDecode(format!("response is not valid JSON: {}", e)))?;

    if !value.is_object() {
        return Err(IdeaError::EnvelopeDecode("response is not a JSON object".into()));
    }

    let api_error = error_message(&value);

    let envelope: ReportEnvelope = serde_json::from_value(value)
        .map_err(|e| IdeaError::EnvelopeDecode(format!("unexpected response shape: {}", e)))?;

    if envelope.choices.is_empty() {
        return Err(IdeaError::EnvelopeDecode(
            api_error.unwrap_or_else(|| "response contains no choices".to_string()),
        ));
    }

    debug!(
        id = %envelope.id,
        model = %envelope.model,
        choices = envelope.choices.len(),
        "Decoded report envelope"
    );
    Ok(envelope)
}

fn error_message(value: &Value) -> Option<String> {
    let error = value.get("error")?;
    match error {
        Value::String(s) => Some(s.clone()),
        Value::Object(_) => error["message"].as_str().map(str::to_string),
        _ => None,
    }
}
