use crate::errors::IdeaError;
use super::Database;

impl Database {
    pub fn get_setting(&self, key: &str) -> Result<Option<String>, IdeaError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT value FROM settings WHERE key = ?1")
            .map_err(|e| IdeaError::Database(format!("Query failed: {}", e)))?;

        match stmt.query_row(rusqlite::params![key], |row: &rusqlite::Row| row.get::<_, String>(0)) {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(IdeaError::Database(format!("Query error: {}", e))),
        }
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<(), IdeaError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![key, value, chrono::Utc::now().to_rfc3339()],
        ).map_err(|e| IdeaError::Database(format!("Insert failed: {}", e)))?;
        Ok(())
    }

    /// Returns whether a row was removed.
    pub fn delete_setting(&self, key: &str) -> Result<bool, IdeaError> {
        let conn = self.lock()?;
        let removed = conn.execute("DELETE FROM settings WHERE key = ?1", rusqlite::params![key])
            .map_err(|e| IdeaError::Database(format!("Delete failed: {}", e)))?;
        Ok(removed > 0)
    }
}
