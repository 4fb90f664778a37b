//! Persistence for the personal word library.
//!
//! The library is a single JSON blob under [`STORAGE_KEY`](crate::types::STORAGE_KEY).
//! Callers go through [`WordRepository`] so the game can run against an
//! in-memory store in tests and a file on disk in production.

mod file;
mod library;

use crate::types::WordPair;
use async_trait::async_trait;
use tokio::sync::RwLock;

pub use file::JsonFileRepository;
pub use library::WordLibrary;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored library is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Flat key-value access to the persisted word library.
///
/// No transactions: every mutation is a read followed by a full write, so a
/// single writer is assumed.
#[async_trait]
pub trait WordRepository: Send + Sync {
    /// Read the stored library, `None` if nothing was ever written
    async fn get(&self) -> StoreResult<Option<Vec<WordPair>>>;

    /// Replace the stored library
    async fn put(&self, words: &[WordPair]) -> StoreResult<()>;
}

/// Repository that keeps the library in memory
#[derive(Debug, Default)]
pub struct MemoryRepository {
    words: RwLock<Option<Vec<WordPair>>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an already-populated library
    pub fn with_words(words: Vec<WordPair>) -> Self {
        Self {
            words: RwLock::new(Some(words)),
        }
    }
}

#[async_trait]
impl WordRepository for MemoryRepository {
    async fn get(&self) -> StoreResult<Option<Vec<WordPair>>> {
        Ok(self.words.read().await.clone())
    }

    async fn put(&self, words: &[WordPair]) -> StoreResult<()> {
        *self.words.write().await = Some(words.to_vec());
        Ok(())
    }
}
