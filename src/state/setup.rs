use crate::error::{GameError, GameResult};
use crate::types::*;
use serde::{Deserialize, Serialize};

/// One edit made on the setup screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum SetupChange {
    PlayerCount { count: usize },
    ImpostorCount { count: usize },
    UseHints { enabled: bool },
    WordSource { source: WordSource },
    RenamePlayer { index: usize, name: String },
}

/// Most impostors a table of `player_count` can hold while the crew keeps a
/// strict majority
pub fn max_impostors(player_count: usize) -> usize {
    (player_count.saturating_sub(1) / 2).max(1)
}

impl RoundConfig {
    /// Apply a setup edit, rejecting values outside the allowed ranges
    pub fn apply(&mut self, change: SetupChange) -> GameResult<()> {
        match change {
            SetupChange::PlayerCount { count } => self.set_player_count(count),
            SetupChange::ImpostorCount { count } => self.set_impostor_count(count),
            SetupChange::UseHints { enabled } => {
                self.use_hints = enabled;
                Ok(())
            }
            SetupChange::WordSource { source } => {
                self.word_source = source;
                Ok(())
            }
            SetupChange::RenamePlayer { index, name } => self.rename_player(index, name),
        }
    }

    /// Change the table size, clamping impostors down and resizing names
    pub fn set_player_count(&mut self, count: usize) -> GameResult<()> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
            return Err(GameError::InvalidRoundConfig(format!(
                "player count must be between {} and {}, got {}",
                MIN_PLAYERS, MAX_PLAYERS, count
            )));
        }

        self.player_count = count;

        let max = max_impostors(count);
        if self.impostor_count > max {
            tracing::debug!("Clamping impostors from {} to {}", self.impostor_count, max);
            self.impostor_count = max;
        }

        if count > self.names.len() {
            let start = self.names.len();
            self.names.extend((start..count).map(default_player_name));
        } else {
            self.names.truncate(count);
        }

        Ok(())
    }

    pub fn set_impostor_count(&mut self, count: usize) -> GameResult<()> {
        let max = self.max_impostors();
        if count == 0 || count > max {
            return Err(GameError::InvalidRoundConfig(format!(
                "impostor count must be between 1 and {} for {} players, got {}",
                max, self.player_count, count
            )));
        }
        self.impostor_count = count;
        Ok(())
    }

    pub fn rename_player(&mut self, index: usize, name: String) -> GameResult<()> {
        let slot = self.names.get_mut(index).ok_or_else(|| {
            GameError::InvalidRoundConfig(format!("no player at seat {}", index + 1))
        })?;
        *slot = name;
        Ok(())
    }

    pub fn max_impostors(&self) -> usize {
        max_impostors(self.player_count)
    }

    /// Names as they will appear in the round (blank names fall back to the default)
    pub fn player_names(&self) -> Vec<String> {
        (0..self.player_count)
            .map(|i| {
                self.names
                    .get(i)
                    .map(|n| n.trim())
                    .filter(|n| !n.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| default_player_name(i))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_impostors_keeps_majority() {
        assert_eq!(max_impostors(3), 1);
        assert_eq!(max_impostors(4), 1);
        assert_eq!(max_impostors(5), 2);
        assert_eq!(max_impostors(20), 9);
    }

    #[test]
    fn test_player_count_change_never_violates_bound() {
        for from in MIN_PLAYERS..=MAX_PLAYERS {
            for to in MIN_PLAYERS..=MAX_PLAYERS {
                let mut config = RoundConfig::default();
                config.set_player_count(from).unwrap();
                let before = max_impostors(from);
                config.set_impostor_count(before).unwrap();

                config.set_player_count(to).unwrap();
                assert!(config.impostor_count <= (to - 1) / 2);
                // Clamping only ever lowers the count
                assert!(config.impostor_count <= before);
                assert_eq!(config.names.len(), to);
            }
        }
    }

    #[test]
    fn test_growing_the_table_keeps_impostors() {
        let mut config = RoundConfig::default();
        config.set_player_count(9).unwrap();
        config.set_impostor_count(2).unwrap();
        config.set_player_count(15).unwrap();
        assert_eq!(config.impostor_count, 2);
    }

    #[test]
    fn test_player_count_out_of_range() {
        let mut config = RoundConfig::default();
        assert!(config.set_player_count(2).is_err());
        assert!(config.set_player_count(21).is_err());
        assert_eq!(config.player_count, 3);
    }

    #[test]
    fn test_impostor_count_bounds() {
        let mut config = RoundConfig::default();
        config.set_player_count(7).unwrap();
        assert!(config.set_impostor_count(0).is_err());
        assert!(config.set_impostor_count(4).is_err());
        config.set_impostor_count(3).unwrap();
        assert_eq!(config.impostor_count, 3);
    }

    #[test]
    fn test_names_resize_and_keep_edits() {
        let mut config = RoundConfig::default();
        config.rename_player(0, "Ana".to_string()).unwrap();
        config.set_player_count(5).unwrap();
        assert_eq!(
            config.names,
            vec!["Ana", "Player 2", "Player 3", "Player 4", "Player 5"]
        );

        config.set_player_count(3).unwrap();
        assert_eq!(config.names, vec!["Ana", "Player 2", "Player 3"]);
        assert!(config.rename_player(3, "Nobody".to_string()).is_err());
    }

    #[test]
    fn test_blank_names_fall_back() {
        let mut config = RoundConfig::default();
        config.rename_player(1, "   ".to_string()).unwrap();
        config.rename_player(2, "  Zoë ".to_string()).unwrap();
        assert_eq!(config.player_names(), vec!["Player 1", "Player 2", "Zoë"]);
    }

    #[test]
    fn test_apply_dispatches_changes() {
        let mut config = RoundConfig::default();
        config
            .apply(SetupChange::UseHints { enabled: false })
            .unwrap();
        config
            .apply(SetupChange::WordSource {
                source: WordSource::Pack("travel".to_string()),
            })
            .unwrap();
        assert!(!config.use_hints);
        assert_eq!(config.word_source, WordSource::Pack("travel".to_string()));
    }
}
