use crate::llm::LlmError;
use crate::store::StoreError;
use crate::types::{GamePhase, PlayerId, WordId};

pub type GameResult<T> = Result<T, GameError>;

/// Errors surfaced by the game core and the word manager
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("No words available in this source. Pick another one or add words to your library.")]
    NoWordsAvailable,

    #[error("Invalid round configuration: {0}")]
    InvalidRoundConfig(String),

    #[error("Action '{action}' is not allowed during {phase:?}")]
    InvalidAction {
        phase: GamePhase,
        action: &'static str,
    },

    #[error("Player {0} is not part of this round")]
    UnknownPlayer(PlayerId),

    #[error("Word pair '{0}' not found")]
    WordNotFound(WordId),

    #[error("Invalid word pair: {0}")]
    InvalidWordPair(String),

    #[error("Prompt must not be empty")]
    EmptyPrompt,

    #[error("Content generation failed: {0}")]
    ExternalGenerationFailure(String),

    #[error("A valid API key from a project with billing enabled is required")]
    CredentialMissing,

    #[error("An image is already being generated")]
    GenerationInProgress,

    #[error("Word library unavailable: {0}")]
    Store(#[from] StoreError),
}

impl GameError {
    /// Stable machine-readable code for the wire
    pub fn code(&self) -> &'static str {
        match self {
            GameError::NoWordsAvailable => "NO_WORDS_AVAILABLE",
            GameError::InvalidRoundConfig(_) => "INVALID_ROUND_CONFIG",
            GameError::InvalidAction { .. } => "INVALID_ACTION",
            GameError::UnknownPlayer(_) => "UNKNOWN_PLAYER",
            GameError::WordNotFound(_) => "WORD_NOT_FOUND",
            GameError::InvalidWordPair(_) => "INVALID_WORD_PAIR",
            GameError::EmptyPrompt => "EMPTY_PROMPT",
            GameError::ExternalGenerationFailure(_) => "GENERATION_FAILED",
            GameError::CredentialMissing => "KEY_NOT_FOUND",
            GameError::GenerationInProgress => "GENERATION_IN_PROGRESS",
            GameError::Store(_) => "STORE_FAILURE",
        }
    }
}

impl From<LlmError> for GameError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::KeyNotFound => GameError::CredentialMissing,
            other => GameError::ExternalGenerationFailure(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_not_found_maps_to_credential_missing() {
        let err: GameError = LlmError::KeyNotFound.into();
        assert!(matches!(err, GameError::CredentialMissing));
        assert_eq!(err.code(), "KEY_NOT_FOUND");
    }

    #[test]
    fn test_provider_failures_map_to_generation_failure() {
        let err: GameError = LlmError::ParseError("not json".to_string()).into();
        assert!(matches!(err, GameError::ExternalGenerationFailure(_)));
        assert!(err.to_string().contains("not json"));
    }
}
