use super::WordRepository;
use crate::error::{GameError, GameResult};
use crate::llm::GeneratedPair;
use crate::packs;
use crate::types::{WordPair, WordSource};
use std::sync::Arc;
use tokio::sync::Mutex;

/// The personal word library plus pool resolution for rounds
#[derive(Clone)]
pub struct WordLibrary {
    repo: Arc<dyn WordRepository>,
    /// Held across every read-modify-write of the stored library
    write_lock: Arc<Mutex<()>>,
}

impl WordLibrary {
    pub fn new(repo: Arc<dyn WordRepository>) -> Self {
        Self {
            repo,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Current library contents.
    ///
    /// Seeds the store with the default set on first access. An unreadable
    /// store is logged and answered with the default set instead.
    pub async fn words(&self) -> Vec<WordPair> {
        // Seeding writes, so it takes the lock too
        let _guard = self.write_lock.lock().await;
        self.load().await
    }

    async fn load(&self) -> Vec<WordPair> {
        match self.repo.get().await {
            Ok(Some(words)) => words,
            Ok(None) => {
                let defaults = packs::default_words();
                tracing::info!("Seeding word library with {} default pairs", defaults.len());
                if let Err(e) = self.repo.put(&defaults).await {
                    tracing::warn!("Failed to persist default word library: {}", e);
                }
                defaults
            }
            Err(e) => {
                tracing::error!("Error reading word library, using defaults: {}", e);
                packs::default_words()
            }
        }
    }

    /// Append a new pair; both fields are trimmed and required
    pub async fn add(&self, word: &str, hint: &str) -> GameResult<Vec<WordPair>> {
        let (word, hint) = validate_pair(word, hint)?;
        let _guard = self.write_lock.lock().await;
        let mut words = self.load().await;
        words.push(WordPair::new(word, hint));
        self.repo.put(&words).await?;
        Ok(words)
    }

    /// Replace the pair with the same id
    pub async fn update(&self, pair: WordPair) -> GameResult<Vec<WordPair>> {
        let (word, hint) = validate_pair(&pair.word, &pair.hint)?;
        let _guard = self.write_lock.lock().await;
        let mut words = self.load().await;
        let slot = words
            .iter_mut()
            .find(|w| w.id == pair.id)
            .ok_or_else(|| GameError::WordNotFound(pair.id.clone()))?;
        slot.word = word;
        slot.hint = hint;
        self.repo.put(&words).await?;
        Ok(words)
    }

    /// Remove the pair with the given id
    pub async fn delete(&self, id: &str) -> GameResult<Vec<WordPair>> {
        let _guard = self.write_lock.lock().await;
        let mut words = self.load().await;
        let before = words.len();
        words.retain(|w| w.id != id);
        if words.len() == before {
            return Err(GameError::WordNotFound(id.to_string()));
        }
        self.repo.put(&words).await?;
        Ok(words)
    }

    /// Mint ids for generated pairs and append them in one write
    pub async fn append_generated(
        &self,
        generated: Vec<GeneratedPair>,
    ) -> GameResult<Vec<WordPair>> {
        if generated.is_empty() {
            return Err(GameError::ExternalGenerationFailure(
                "Generator returned no word pairs".to_string(),
            ));
        }

        let _guard = self.write_lock.lock().await;
        let mut words = self.load().await;
        let added = generated.len();
        words.extend(
            generated
                .into_iter()
                .map(|pair| WordPair::new(pair.word, pair.hint)),
        );
        self.repo.put(&words).await?;

        tracing::info!("Added {} generated word pairs to the library", added);
        Ok(words)
    }

    /// Overwrite the whole library (used by import)
    pub async fn replace_all(&self, words: Vec<WordPair>) -> GameResult<()> {
        let _guard = self.write_lock.lock().await;
        self.repo.put(&words).await?;
        Ok(())
    }

    /// Resolve the pool a round draws from.
    ///
    /// Unknown pack ids resolve to an empty pool, which like any empty pool
    /// is reported as [`GameError::NoWordsAvailable`].
    pub async fn resolve(&self, source: &WordSource) -> GameResult<Vec<WordPair>> {
        let pool = match source {
            WordSource::Library => self.words().await,
            WordSource::Pack(id) => packs::find_pack(id)
                .map(|pack| pack.words)
                .unwrap_or_default(),
        };

        if pool.is_empty() {
            return Err(GameError::NoWordsAvailable);
        }
        Ok(pool)
    }
}

fn validate_pair(word: &str, hint: &str) -> GameResult<(String, String)> {
    let word = word.trim();
    let hint = hint.trim();
    if word.is_empty() || hint.is_empty() {
        return Err(GameError::InvalidWordPair(
            "word and hint are both required".to_string(),
        ));
    }
    Ok((word.to_string(), hint.to_string()))
}
