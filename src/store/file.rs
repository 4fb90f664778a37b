use super::{StoreResult, WordRepository};
use crate::types::{WordPair, STORAGE_KEY};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Repository backed by one JSON file in the data directory
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    /// Store the library at `<data_dir>/impostor_game_words.json`
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(format!("{}.json", STORAGE_KEY)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl WordRepository for JsonFileRepository {
    async fn get(&self) -> StoreResult<Option<Vec<WordPair>>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Ok(Some(serde_json::from_str(&raw)?))
    }

    async fn put(&self, words: &[WordPair]) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write next to the target and rename so a crash never leaves half a file
        let json = serde_json::to_string_pretty(words)?;
        let tmp = self
            .path
            .with_extension(format!("json.{}.tmp", ulid::Ulid::new()));
        tokio::fs::write(&tmp, json).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        tracing::debug!("Saved {} word pairs to {}", words.len(), self.path.display());
        Ok(())
    }
}
