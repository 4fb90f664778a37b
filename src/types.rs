use serde::{Deserialize, Serialize};

/// Opaque ID types for type safety
pub type WordId = String;
pub type PackId = String;
pub type PlayerId = u32;

/// Smallest table the game works with
pub const MIN_PLAYERS: usize = 3;
/// Largest table the game works with
pub const MAX_PLAYERS: usize = 20;

/// Shown to an impostor when hints are disabled (or the pair has no hint)
pub const NO_HINT_PLACEHOLDER: &str = "No hint";

/// Storage key for the personal word library
pub const STORAGE_KEY: &str = "impostor_game_words";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WordPair {
    pub id: WordId,
    /// The secret shown to everyone who is not an impostor
    pub word: String,
    /// The weak signal shown to impostors when hints are enabled
    pub hint: String,
}

impl WordPair {
    /// Create a pair with a freshly minted id
    pub fn new(word: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            id: mint_word_id(),
            word: word.into(),
            hint: hint.into(),
        }
    }
}

/// Mint a word id from a millisecond timestamp plus 80 random bits.
///
/// Collisions are practically impossible but not ruled out.
pub fn mint_word_id() -> WordId {
    ulid::Ulid::new().to_string()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WordPack {
    pub id: PackId,
    pub name: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub words: Vec<WordPair>,
}

/// Where the round draws its word from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "kind", content = "pack_id", rename_all = "snake_case")]
pub enum WordSource {
    /// The persisted personal word library
    #[default]
    Library,
    /// One of the bundled curated packs
    Pack(PackId),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    /// 1-based seat number, stable for the round
    pub id: PlayerId,
    pub name: String,
    pub is_impostor: bool,
    pub votes_received: u32,
}

/// Default display name for the seat at `index` (0-based)
pub fn default_player_name(index: usize) -> String {
    format!("Player {}", index + 1)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    Setup,
    Reveal,
    Discuss,
    Vote,
    Result,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundConfig {
    pub player_count: usize,
    pub impostor_count: usize,
    pub use_hints: bool,
    pub word_source: WordSource,
    /// Editable seat names, always `player_count` long
    pub names: Vec<String>,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            player_count: MIN_PLAYERS,
            impostor_count: 1,
            use_hints: true,
            word_source: WordSource::Library,
            names: (0..MIN_PLAYERS).map(default_player_name).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ImageSize {
    #[default]
    #[serde(rename = "1K")]
    OneK,
    #[serde(rename = "2K")]
    TwoK,
    #[serde(rename = "4K")]
    FourK,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::OneK => "1K",
            ImageSize::TwoK => "2K",
            ImageSize::FourK => "4K",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_source_wire_format() {
        let json = serde_json::to_string(&WordSource::Pack("kitchen".to_string())).unwrap();
        assert_eq!(json, r#"{"kind":"pack","pack_id":"kitchen"}"#);

        let parsed: WordSource = serde_json::from_str(r#"{"kind":"library"}"#).unwrap();
        assert_eq!(parsed, WordSource::Library);
    }

    #[test]
    fn test_image_options_wire_format() {
        assert_eq!(serde_json::to_string(&ImageSize::FourK).unwrap(), r#""4K""#);
        let ratio: AspectRatio = serde_json::from_str(r#""9:16""#).unwrap();
        assert_eq!(ratio, AspectRatio::Portrait);
        assert_eq!(ratio.as_str(), "9:16");
    }

    #[test]
    fn test_minted_ids_differ() {
        let a = WordPair::new("Pizza", "Round food");
        let b = WordPair::new("Pizza", "Round food");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_default_config_names() {
        let config = RoundConfig::default();
        assert_eq!(config.names, vec!["Player 1", "Player 2", "Player 3"]);
        assert_eq!(config.names.len(), config.player_count);
    }
}
