//! Bundled word content: the library's first-run defaults and the curated packs.

use crate::types::{Difficulty, WordPack, WordPair};

/// Seeded into the personal library the first time it is read
const DEFAULT_WORDS: &[(&str, &str)] = &[
    ("Pizza", "Popular round food"),
    ("Lighthouse", "Coastal warning"),
    ("Guitar", "Six of something"),
    ("Volcano", "Sleeping giant"),
    ("Passport", "Border paperwork"),
    ("Penguin", "Dressed for dinner"),
];

struct PackDef {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    difficulty: Difficulty,
    words: &'static [(&'static str, &'static str)],
}

const OFFICIAL_PACKS: &[PackDef] = &[
    PackDef {
        id: "everyday",
        name: "Everyday Things",
        description: "Objects everyone has at home.",
        difficulty: Difficulty::Easy,
        words: &[
            ("Toothbrush", "Morning routine"),
            ("Umbrella", "Opens when it rains"),
            ("Refrigerator", "Humming in the kitchen"),
            ("Pillow", "Soft and square"),
            ("Keys", "Jingle in your pocket"),
            ("Mirror", "Shows you back"),
            ("Sofa", "Living room throne"),
            ("Candle", "Melts slowly"),
        ],
    },
    PackDef {
        id: "travel",
        name: "Around the World",
        description: "Places, landmarks and things you meet on a trip.",
        difficulty: Difficulty::Medium,
        words: &[
            ("Eiffel Tower", "Iron lady"),
            ("Desert", "Lots of sand"),
            ("Airport", "Gates and delays"),
            ("Suitcase", "Wheels and a handle"),
            ("Jungle", "Humid and green"),
            ("Cruise ship", "Floating hotel"),
            ("Museum", "Do not touch"),
            ("Glacier", "Slow river"),
        ],
    },
    PackDef {
        id: "abstract",
        name: "Big Ideas",
        description: "Concepts and feelings. Hard to describe, harder to fake.",
        difficulty: Difficulty::Hard,
        words: &[
            ("Nostalgia", "Looking back"),
            ("Gravity", "Keeps you grounded"),
            ("Democracy", "Counting hands"),
            ("Jealousy", "Green feeling"),
            ("Infinity", "Never stops"),
            ("Silence", "Golden, they say"),
            ("Luck", "Four leaves"),
            ("Time", "Flies or drags"),
        ],
    },
];

/// The built-in starting set for the personal library
pub fn default_words() -> Vec<WordPair> {
    DEFAULT_WORDS
        .iter()
        .enumerate()
        .map(|(i, (word, hint))| WordPair {
            id: format!("default-{}", i + 1),
            word: word.to_string(),
            hint: hint.to_string(),
        })
        .collect()
}

impl From<&PackDef> for WordPack {
    fn from(def: &PackDef) -> Self {
        WordPack {
            id: def.id.to_string(),
            name: def.name.to_string(),
            description: def.description.to_string(),
            difficulty: def.difficulty,
            words: def
                .words
                .iter()
                .enumerate()
                .map(|(i, (word, hint))| WordPair {
                    id: format!("{}-{}", def.id, i + 1),
                    word: word.to_string(),
                    hint: hint.to_string(),
                })
                .collect(),
        }
    }
}

/// All curated packs in display order
pub fn official_packs() -> Vec<WordPack> {
    OFFICIAL_PACKS.iter().map(WordPack::from).collect()
}

/// Look up a curated pack by id
pub fn find_pack(id: &str) -> Option<WordPack> {
    OFFICIAL_PACKS
        .iter()
        .find(|def| def.id == id)
        .map(WordPack::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_packs_cover_every_difficulty() {
        let packs = official_packs();
        let difficulties: HashSet<_> = packs
            .iter()
            .map(|p| format!("{:?}", p.difficulty))
            .collect();
        assert_eq!(difficulties.len(), 3);
        assert!(packs.iter().all(|p| !p.words.is_empty()));
    }

    #[test]
    fn test_pack_word_ids_are_unique_and_stable() {
        let first = find_pack("travel").unwrap();
        let second = find_pack("travel").unwrap();
        assert_eq!(first, second);

        let ids: HashSet<_> = first.words.iter().map(|w| w.id.clone()).collect();
        assert_eq!(ids.len(), first.words.len());
        assert_eq!(first.words[0].id, "travel-1");
    }

    #[test]
    fn test_unknown_pack() {
        assert!(find_pack("nope").is_none());
    }

    #[test]
    fn test_default_words_are_complete() {
        let words = default_words();
        assert_eq!(words.len(), 6);
        assert!(words
            .iter()
            .all(|w| !w.word.is_empty() && !w.hint.is_empty()));
    }
}
