use tracing::info;

use crate::db::Database;
use crate::errors::IdeaError;

/// Settings key the API key is stored under.
pub const API_KEY_SETTING: &str = "perplexity_api_key";

/// The user's API key. Read once when loaded; persisted only by an explicit
/// [`save`](Self::save) or [`clear`](Self::clear).
pub struct ApiKeyStore {
    db: Database,
    key: Option<String>,
}

impl ApiKeyStore {
    pub fn load(db: Database) -> Result<Self, IdeaError> {
        let key = db
            .get_setting(API_KEY_SETTING)?
            .filter(|k| !k.trim().is_empty());
        Ok(Self { db, key })
    }

    pub fn api_key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn is_set(&self) -> bool {
        self.key.is_some()
    }

    pub fn save(&mut self, key: &str) -> Result<(), IdeaError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(IdeaError::InvalidInput("API key must not be empty".into()));
        }
        self.db.set_setting(API_KEY_SETTING, key)?;
        info!(key = %mask_key(key), "API key saved");
        self.key = Some(key.to_string());
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), IdeaError> {
        self.db.delete_setting(API_KEY_SETTING)?;
        info!("API key cleared");
        self.key = None;
        Ok(())
    }

    pub fn masked(&self) -> Option<String> {
        self.key.as_deref().map(mask_key)
    }
}

/// `pplx-0123456789abcd` → `pplx…abcd`. Short keys are fully hidden.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}
