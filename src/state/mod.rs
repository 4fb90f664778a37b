mod assign;
pub mod export;
mod game;
mod generate;
mod round;
mod setup;
mod tally;

pub use assign::{assign, Assignment};
pub use round::{ActiveRound, Action, RevealContent, RoundMachine, RoundState, Transition};
pub use setup::{max_impostors, SetupChange};
pub use tally::{evaluate, Outcome};

use crate::llm::LlmManager;
use crate::protocol::ServerMessage;
use crate::store::{MemoryRepository, WordLibrary, WordRepository};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, RwLock};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub round: Arc<RwLock<RoundMachine>>,
    pub library: WordLibrary,
    pub llm: Option<Arc<LlmManager>>,
    /// Random source for dealing rounds
    rng: Arc<Mutex<StdRng>>,
    /// Held while an image request is outstanding
    image_slot: Arc<Mutex<()>>,
    /// Broadcast channel for round updates to every connected screen
    pub broadcast: broadcast::Sender<ServerMessage>,
}

impl AppState {
    /// In-memory library, OS-seeded randomness, no content provider
    pub fn new() -> Self {
        Self::with_parts(
            Arc::new(MemoryRepository::new()),
            None,
            StdRng::from_os_rng(),
        )
    }

    /// Deterministic state for tests
    pub fn seeded(seed: u64) -> Self {
        Self::with_parts(
            Arc::new(MemoryRepository::new()),
            None,
            StdRng::seed_from_u64(seed),
        )
    }

    pub fn with_parts(
        repo: Arc<dyn WordRepository>,
        llm: Option<LlmManager>,
        rng: StdRng,
    ) -> Self {
        let (tx, _rx) = broadcast::channel(100);
        Self {
            round: Arc::new(RwLock::new(RoundMachine::new())),
            library: WordLibrary::new(repo),
            llm: llm.map(Arc::new),
            rng: Arc::new(Mutex::new(rng)),
            image_slot: Arc::new(Mutex::new(())),
            broadcast: tx,
        }
    }

    /// Broadcast a message to all connected clients
    pub fn broadcast_to_all(&self, msg: ServerMessage) {
        // No receivers connected is fine
        let _ = self.broadcast.send(msg);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;
    use crate::store::StoreResult;
    use crate::types::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Memory store that counts reads and answers them slowly
    #[derive(Default)]
    struct SlowRepository {
        inner: MemoryRepository,
        reads: AtomicUsize,
        delay: Duration,
    }

    #[async_trait]
    impl WordRepository for SlowRepository {
        async fn get(&self) -> StoreResult<Option<Vec<WordPair>>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.inner.get().await
        }

        async fn put(&self, words: &[WordPair]) -> StoreResult<()> {
            self.inner.put(words).await
        }
    }

    fn slow_state(delay: Duration) -> (Arc<SlowRepository>, Arc<AppState>) {
        let repo = Arc::new(SlowRepository {
            delay,
            ..Default::default()
        });
        let state = AppState::with_parts(repo.clone(), None, StdRng::seed_from_u64(3));
        (repo, Arc::new(state))
    }

    #[tokio::test]
    async fn test_new_state_starts_in_setup() {
        let state = AppState::new();
        assert_eq!(state.round.read().await.phase(), GamePhase::Setup);
        assert!(state.llm.is_none());
    }

    #[tokio::test]
    async fn test_start_round_from_library() {
        let state = AppState::seeded(1);
        state.start_round().await.unwrap();

        let machine = state.round.read().await;
        assert_eq!(machine.phase(), GamePhase::Reveal);
        let word = &machine.state().round().unwrap().word;
        assert!(crate::packs::default_words().contains(word));
    }

    #[tokio::test]
    async fn test_start_round_with_unknown_pack_stays_in_setup() {
        let state = AppState::seeded(1);
        state
            .update_setup(SetupChange::WordSource {
                source: WordSource::Pack("empty".to_string()),
            })
            .await
            .unwrap();

        let before = state.round.read().await.config().clone();
        let result = state.start_round().await;
        assert!(matches!(result, Err(GameError::NoWordsAvailable)));

        let machine = state.round.read().await;
        assert_eq!(machine.state(), &RoundState::Setup);
        assert_eq!(machine.config(), &before);
    }

    #[tokio::test]
    async fn test_seeded_states_deal_identically() {
        let a = AppState::seeded(77);
        let b = AppState::seeded(77);
        a.start_round().await.unwrap();
        b.start_round().await.unwrap();

        let a = a.round.read().await.state().clone();
        let b = b.round.read().await.state().clone();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_actions_are_broadcast() {
        let state = AppState::seeded(2);
        let mut rx = state.broadcast.subscribe();

        state.start_round().await.unwrap();
        state.apply_action(Action::Reveal).await.unwrap();

        assert!(matches!(rx.recv().await, Ok(ServerMessage::Round { .. })));
        assert!(matches!(rx.recv().await, Ok(ServerMessage::Round { .. })));
    }

    #[tokio::test]
    async fn test_generation_without_provider_fails_cleanly() {
        let state = AppState::seeded(2);
        let before = state.library.words().await;

        let result = state.generate_words().await;
        assert!(matches!(result, Err(GameError::ExternalGenerationFailure(_))));
        assert_eq!(state.library.words().await, before);
    }

    #[tokio::test]
    async fn test_start_round_out_of_phase_skips_the_store() {
        let (repo, state) = slow_state(Duration::ZERO);
        state.start_round().await.unwrap();
        let reads = repo.reads.load(Ordering::SeqCst);

        let result = state.start_round().await;
        assert!(matches!(
            result,
            Err(GameError::InvalidAction {
                phase: GamePhase::Reveal,
                ..
            })
        ));
        assert_eq!(repo.reads.load(Ordering::SeqCst), reads);
    }

    #[tokio::test]
    async fn test_setup_edit_cannot_slip_into_a_deal() {
        let (_repo, state) = slow_state(Duration::from_millis(100));

        let deal = {
            let state = state.clone();
            tokio::spawn(async move { state.start_round().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        // Lands while the library is still being read
        let edit = state
            .update_setup(SetupChange::WordSource {
                source: WordSource::Pack("travel".to_string()),
            })
            .await;
        assert!(matches!(edit, Err(GameError::InvalidAction { .. })));

        deal.await.unwrap().unwrap();
        let machine = state.round.read().await;
        assert_eq!(machine.config().word_source, WordSource::Library);
        let word = &machine.state().round().unwrap().word;
        assert!(crate::packs::default_words().contains(word));
    }
}
