//! Word library export/import.
//!
//! A library snapshot is a versioned JSON document that can be downloaded
//! from one table and loaded on another.

use super::AppState;
use crate::error::{GameError, GameResult};
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Schema version for export format compatibility
pub const EXPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LibraryExport {
    /// Schema version for forward compatibility
    pub schema_version: u32,
    /// Export timestamp (ISO8601)
    pub exported_at: String,
    pub words: Vec<WordPair>,
}

impl LibraryExport {
    /// Create a new export with current timestamp
    pub fn new(words: Vec<WordPair>) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION,
            exported_at: chrono::Utc::now().to_rfc3339(),
            words,
        }
    }

    /// Validate the export before import
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version > EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Export schema version {} is newer than supported version {}. \
                 Please update the server.",
                self.schema_version, EXPORT_SCHEMA_VERSION
            ));
        }

        let mut seen = HashSet::new();
        for pair in &self.words {
            if pair.id.trim().is_empty() {
                return Err(format!("Word '{}' has an empty id", pair.word));
            }
            if !seen.insert(pair.id.as_str()) {
                return Err(format!("Duplicate word id '{}'", pair.id));
            }
            if pair.word.trim().is_empty() || pair.hint.trim().is_empty() {
                return Err(format!("Word '{}' needs both a word and a hint", pair.id));
            }
        }

        Ok(())
    }
}

impl AppState {
    pub async fn export_library(&self) -> LibraryExport {
        LibraryExport::new(self.library.words().await)
    }

    /// Replace the library with a validated snapshot. Returns the number of pairs loaded.
    pub async fn import_library(&self, export: LibraryExport) -> GameResult<usize> {
        export.validate().map_err(GameError::InvalidWordPair)?;

        let count = export.words.len();
        self.library.replace_all(export.words).await?;
        tracing::info!(
            "Imported {} word pairs (exported at {})",
            count,
            export.exported_at
        );
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(id: &str, word: &str, hint: &str) -> WordPair {
        WordPair {
            id: id.to_string(),
            word: word.to_string(),
            hint: hint.to_string(),
        }
    }

    #[test]
    fn test_validation_future_schema() {
        let export = LibraryExport {
            schema_version: EXPORT_SCHEMA_VERSION + 1,
            exported_at: chrono::Utc::now().to_rfc3339(),
            words: Vec::new(),
        };

        let result = export.validate();
        assert!(result.unwrap_err().contains("newer than supported"));
    }

    #[test]
    fn test_validation_duplicate_and_blank() {
        let dup = LibraryExport::new(vec![pair("a", "Moon", "Night"), pair("a", "Sun", "Day")]);
        assert!(dup.validate().unwrap_err().contains("Duplicate"));

        let blank = LibraryExport::new(vec![pair("b", "Moon", "  ")]);
        assert!(blank.validate().unwrap_err().contains("both"));

        let no_id = LibraryExport::new(vec![pair("", "Moon", "Night")]);
        assert!(no_id.validate().unwrap_err().contains("empty id"));
    }

    #[tokio::test]
    async fn test_export_then_import_on_another_table() {
        let source = AppState::seeded(1);
        source.library.add("Comet", "Ice with a tail").await.unwrap();
        let export = source.export_library().await;
        let json = serde_json::to_string(&export).unwrap();

        let target = AppState::seeded(2);
        let parsed: LibraryExport = serde_json::from_str(&json).unwrap();
        let count = target.import_library(parsed).await.unwrap();

        assert_eq!(count, export.words.len());
        assert_eq!(target.library.words().await, export.words);
    }

    #[tokio::test]
    async fn test_rejected_import_keeps_library() {
        let state = AppState::seeded(1);
        let before = state.library.words().await;

        let bad = LibraryExport::new(vec![pair("x", "", "hint")]);
        assert!(matches!(
            state.import_library(bad).await,
            Err(GameError::InvalidWordPair(_))
        ));
        assert_eq!(state.library.words().await, before);
    }
}
