use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "llm": {
                "type": "object",
                "properties": {
                    "provider": { "type": "string", "enum": ["perplexity", "openai", "openai_compatible"] },
                    "model": { "type": "string" },
                    "api_key": { "type": "string" },
                    "base_url": { "type": "string" },
                    "temperature": { "type": "number", "minimum": 0, "maximum": 2 },
                    "max_tokens": { "type": "integer", "minimum": 1 },
                    "max_retries": { "type": "integer", "minimum": 0, "maximum": 10 }
                }
            },
            "storage": {
                "type": "object",
                "properties": {
                    "db_path": { "type": "string" }
                }
            },
            "analysis": {
                "type": "object",
                "properties": {
                    "partial_success": { "type": "boolean" },
                    "prompts_dir": { "type": "string" }
                }
            },
            "output": {
                "type": "object",
                "properties": {
                    "directory": { "type": "string" },
                    "format": { "type": "string", "enum": ["terminal", "markdown", "json"] }
                }
            }
        }
    })
});
