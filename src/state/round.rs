use super::assign::assign;
use super::setup::SetupChange;
use super::tally::{evaluate, Outcome};
use crate::error::{GameError, GameResult};
use crate::types::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Everything dealt at round start
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveRound {
    pub players: Vec<Player>,
    pub word: WordPair,
    pub use_hints: bool,
    pub impostor_count: usize,
}

/// Runtime state of the table
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RoundState {
    #[default]
    Setup,
    Reveal {
        round: ActiveRound,
        turn_index: usize,
        revealing: bool,
    },
    Discuss {
        round: ActiveRound,
    },
    Vote {
        round: ActiveRound,
    },
    Result {
        round: ActiveRound,
    },
}

impl RoundState {
    pub fn phase(&self) -> GamePhase {
        match self {
            RoundState::Setup => GamePhase::Setup,
            RoundState::Reveal { .. } => GamePhase::Reveal,
            RoundState::Discuss { .. } => GamePhase::Discuss,
            RoundState::Vote { .. } => GamePhase::Vote,
            RoundState::Result { .. } => GamePhase::Result,
        }
    }

    pub fn round(&self) -> Option<&ActiveRound> {
        match self {
            RoundState::Setup => None,
            RoundState::Reveal { round, .. }
            | RoundState::Discuss { round }
            | RoundState::Vote { round }
            | RoundState::Result { round } => Some(round),
        }
    }
}

/// Player actions once a round is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum Action {
    /// Show the current player their role
    Reveal,
    /// Hide the role and hand the device to the next player
    HideAndPass,
    ProceedToVote,
    /// Add one vote; repeated votes for the same player are allowed
    CastVote { player_id: PlayerId },
    FinishVoting,
    PlayAgain,
    ReturnToMenu,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Reveal => "reveal",
            Action::HideAndPass => "hide_and_pass",
            Action::ProceedToVote => "proceed_to_vote",
            Action::CastVote { .. } => "cast_vote",
            Action::FinishVoting => "finish_voting",
            Action::PlayAgain => "play_again",
            Action::ReturnToMenu => "return_to_menu",
        }
    }
}

/// Result of a successful action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The table is now in this phase (possibly the same one)
    Phase(GamePhase),
    /// The game was left for the main menu
    Exited,
}

/// What the current reveal turn shows once revealed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum RevealContent {
    Crew { word: String },
    Impostor { hint: Option<String> },
}

impl RevealContent {
    pub fn display_text(&self) -> &str {
        match self {
            RevealContent::Crew { word } => word,
            RevealContent::Impostor { hint: Some(hint) } => hint,
            RevealContent::Impostor { hint: None } => NO_HINT_PLACEHOLDER,
        }
    }
}

/// The round lifecycle: Setup -> Reveal -> Discuss -> Vote -> Result -> Setup
#[derive(Debug, Clone, Default)]
pub struct RoundMachine {
    config: RoundConfig,
    state: RoundState,
}

impl RoundMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RoundConfig) -> Self {
        Self {
            config,
            state: RoundState::Setup,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase()
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    /// Edit the configuration; only possible between rounds
    pub fn update_setup(&mut self, change: SetupChange) -> GameResult<()> {
        if self.phase() != GamePhase::Setup {
            return Err(GameError::InvalidAction {
                phase: self.phase(),
                action: "update_setup",
            });
        }
        self.config.apply(change)
    }

    /// Deal a new round from `pool`.
    ///
    /// On any error the machine stays in Setup untouched.
    pub fn start_round<R: Rng + ?Sized>(
        &mut self,
        pool: &[WordPair],
        rng: &mut R,
    ) -> GameResult<()> {
        if self.phase() != GamePhase::Setup {
            return Err(GameError::InvalidAction {
                phase: self.phase(),
                action: "start_round",
            });
        }
        if pool.is_empty() {
            return Err(GameError::NoWordsAvailable);
        }

        let assignment = assign(
            &self.config.player_names(),
            self.config.impostor_count,
            pool,
            rng,
        )?;

        self.state = RoundState::Reveal {
            round: ActiveRound {
                players: assignment.players,
                word: assignment.word,
                use_hints: self.config.use_hints,
                impostor_count: self.config.impostor_count,
            },
            turn_index: 0,
            revealing: false,
        };
        Ok(())
    }

    /// Apply an in-round action; invalid combinations leave the state as it was
    pub fn apply(&mut self, action: Action) -> GameResult<Transition> {
        let state = std::mem::take(&mut self.state);
        match self.transition(state, action) {
            Ok((next, transition)) => {
                self.state = next;
                Ok(transition)
            }
            Err((previous, err)) => {
                self.state = previous;
                Err(err)
            }
        }
    }

    fn transition(
        &mut self,
        state: RoundState,
        action: Action,
    ) -> Result<(RoundState, Transition), (RoundState, GameError)> {
        let next = match (state, action) {
            (
                RoundState::Reveal {
                    round,
                    turn_index,
                    revealing: false,
                },
                Action::Reveal,
            ) => RoundState::Reveal {
                round,
                turn_index,
                revealing: true,
            },

            (
                RoundState::Reveal {
                    round,
                    turn_index,
                    revealing: true,
                },
                Action::HideAndPass,
            ) => {
                if turn_index + 1 < round.players.len() {
                    RoundState::Reveal {
                        round,
                        turn_index: turn_index + 1,
                        revealing: false,
                    }
                } else {
                    RoundState::Discuss { round }
                }
            }

            (RoundState::Discuss { round }, Action::ProceedToVote) => RoundState::Vote { round },

            (RoundState::Vote { mut round }, Action::CastVote { player_id }) => {
                match round.players.iter().position(|p| p.id == player_id) {
                    Some(seat) => round.players[seat].votes_received += 1,
                    None => {
                        return Err((
                            RoundState::Vote { round },
                            GameError::UnknownPlayer(player_id),
                        ))
                    }
                }
                RoundState::Vote { round }
            }

            (RoundState::Vote { round }, Action::FinishVoting) => RoundState::Result { round },

            (RoundState::Result { .. }, Action::PlayAgain) => RoundState::Setup,

            (RoundState::Result { .. } | RoundState::Setup, Action::ReturnToMenu) => {
                self.config = RoundConfig::default();
                return Ok((RoundState::Setup, Transition::Exited));
            }

            (state, action) => {
                let phase = state.phase();
                return Err((
                    state,
                    GameError::InvalidAction {
                        phase,
                        action: action.name(),
                    },
                ));
            }
        };

        let phase = next.phase();
        Ok((next, Transition::Phase(phase)))
    }

    /// The player whose turn it is during Reveal
    pub fn current_player(&self) -> Option<&Player> {
        match &self.state {
            RoundState::Reveal {
                round, turn_index, ..
            } => round.players.get(*turn_index),
            _ => None,
        }
    }

    /// Role-specific content for the current turn, only while revealed
    pub fn reveal_content(&self) -> Option<RevealContent> {
        let RoundState::Reveal {
            round,
            turn_index,
            revealing: true,
        } = &self.state
        else {
            return None;
        };
        let player = round.players.get(*turn_index)?;

        Some(if player.is_impostor {
            RevealContent::Impostor {
                hint: round
                    .use_hints
                    .then(|| round.word.hint.clone())
                    .filter(|h| !h.trim().is_empty()),
            }
        } else {
            RevealContent::Crew {
                word: round.word.word.clone(),
            }
        })
    }

    /// Final tally, available in Result
    pub fn outcome(&self) -> Option<Outcome> {
        match &self.state {
            RoundState::Result { round } => Some(evaluate(&round.players)),
            _ => None,
        }
    }
}
