use crate::state::{Action, Outcome, RevealContent, RoundMachine, RoundState, SetupChange};
use crate::types::*;
use serde::{Deserialize, Serialize};

pub const PROTOCOL_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Ask for the current view (e.g. after a reload)
    GetState,
    // Setup screen
    SetPlayerCount {
        count: usize,
    },
    SetImpostorCount {
        count: usize,
    },
    SetUseHints {
        enabled: bool,
    },
    SetWordSource {
        source: WordSource,
    },
    RenamePlayer {
        index: usize,
        name: String,
    },
    StartRound,
    // Round flow
    Reveal,
    HideAndPass,
    ProceedToVote,
    CastVote {
        player_id: PlayerId,
    },
    FinishVoting,
    PlayAgain,
    ReturnToMenu,
}

impl ClientMessage {
    /// The setup edit this message carries, if any
    pub fn setup_change(&self) -> Option<SetupChange> {
        match self {
            ClientMessage::SetPlayerCount { count } => {
                Some(SetupChange::PlayerCount { count: *count })
            }
            ClientMessage::SetImpostorCount { count } => {
                Some(SetupChange::ImpostorCount { count: *count })
            }
            ClientMessage::SetUseHints { enabled } => {
                Some(SetupChange::UseHints { enabled: *enabled })
            }
            ClientMessage::SetWordSource { source } => Some(SetupChange::WordSource {
                source: source.clone(),
            }),
            ClientMessage::RenamePlayer { index, name } => Some(SetupChange::RenamePlayer {
                index: *index,
                name: name.clone(),
            }),
            _ => None,
        }
    }

    /// The round action this message carries, if any
    pub fn action(&self) -> Option<Action> {
        match self {
            ClientMessage::Reveal => Some(Action::Reveal),
            ClientMessage::HideAndPass => Some(Action::HideAndPass),
            ClientMessage::ProceedToVote => Some(Action::ProceedToVote),
            ClientMessage::CastVote { player_id } => Some(Action::CastVote {
                player_id: *player_id,
            }),
            ClientMessage::FinishVoting => Some(Action::FinishVoting),
            ClientMessage::PlayAgain => Some(Action::PlayAgain),
            ClientMessage::ReturnToMenu => Some(Action::ReturnToMenu),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome {
        protocol: String,
        view: RoundView,
        server_now: String,
    },
    Round {
        view: RoundView,
    },
    /// The table went back to the main menu
    Exited {},
    Error {
        code: String,
        msg: String,
    },
}

/// Seat info that does not give away roles
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SeatInfo {
    pub id: PlayerId,
    pub name: String,
}

/// Seat info plus running vote count
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VoteInfo {
    pub id: PlayerId,
    pub name: String,
    pub votes: u32,
}

/// What the shared screen shows in each phase
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "phase", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundView {
    Setup {
        config: RoundConfig,
        max_impostors: usize,
    },
    Reveal {
        /// 1-based turn number
        turn: usize,
        total: usize,
        player: SeatInfo,
        revealing: bool,
        /// Only present while the current player is looking
        #[serde(skip_serializing_if = "Option::is_none")]
        content: Option<RevealContent>,
    },
    Discuss {
        impostor_count: usize,
        use_hints: bool,
        message: String,
    },
    Vote {
        players: Vec<VoteInfo>,
    },
    Result {
        headline: String,
        narrative: String,
        outcome: Outcome,
        word: WordPair,
    },
}

/// Reminder shown to the table while they discuss
pub fn discussion_message(impostor_count: usize, use_hints: bool) -> String {
    if impostor_count > 1 {
        format!("There are {} impostors among us.", impostor_count)
    } else if use_hints {
        "The impostor has the hint.".to_string()
    } else {
        "The impostor has NO hint.".to_string()
    }
}

impl From<&RoundMachine> for RoundView {
    fn from(machine: &RoundMachine) -> Self {
        match machine.state() {
            RoundState::Setup => RoundView::Setup {
                config: machine.config().clone(),
                max_impostors: machine.config().max_impostors(),
            },
            RoundState::Reveal {
                round,
                turn_index,
                revealing,
            } => {
                let player = &round.players[*turn_index];
                RoundView::Reveal {
                    turn: turn_index + 1,
                    total: round.players.len(),
                    player: SeatInfo {
                        id: player.id,
                        name: player.name.clone(),
                    },
                    revealing: *revealing,
                    content: machine.reveal_content(),
                }
            }
            RoundState::Discuss { round } => RoundView::Discuss {
                impostor_count: round.impostor_count,
                use_hints: round.use_hints,
                message: discussion_message(round.impostor_count, round.use_hints),
            },
            RoundState::Vote { round } => RoundView::Vote {
                players: round
                    .players
                    .iter()
                    .map(|p| VoteInfo {
                        id: p.id,
                        name: p.name.clone(),
                        votes: p.votes_received,
                    })
                    .collect(),
            },
            RoundState::Result { round } => {
                let outcome = crate::state::evaluate(&round.players);
                RoundView::Result {
                    headline: outcome.headline().to_string(),
                    narrative: outcome.narrative(),
                    outcome,
                    word: round.word.clone(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_wire_format() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"t":"cast_vote","player_id":2}"#).unwrap();
        assert_eq!(msg.action(), Some(Action::CastVote { player_id: 2 }));

        let msg: ClientMessage = serde_json::from_str(
            r#"{"t":"set_word_source","source":{"kind":"pack","pack_id":"travel"}}"#,
        )
        .unwrap();
        assert_eq!(
            msg.setup_change(),
            Some(SetupChange::WordSource {
                source: WordSource::Pack("travel".to_string())
            })
        );
        assert!(msg.action().is_none());
    }

    #[test]
    fn test_setup_view_serialization() {
        let view = RoundView::from(&RoundMachine::new());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["phase"], "SETUP");
        assert_eq!(json["max_impostors"], 1);
        assert_eq!(json["config"]["player_count"], 3);
    }

    #[test]
    fn test_hidden_reveal_has_no_content() {
        let mut machine = RoundMachine::new();
        let pool = crate::packs::default_words();
        machine
            .start_round(&pool, &mut <rand::rngs::StdRng as rand::SeedableRng>::seed_from_u64(1))
            .unwrap();

        let json = serde_json::to_value(RoundView::from(&machine)).unwrap();
        assert_eq!(json["phase"], "REVEAL");
        assert_eq!(json["turn"], 1);
        assert_eq!(json["total"], 3);
        assert!(json.get("content").is_none());
        // Seat info never leaks the role
        assert!(json["player"].get("is_impostor").is_none());
    }

    #[test]
    fn test_discussion_message() {
        assert_eq!(discussion_message(3, true), "There are 3 impostors among us.");
        assert_eq!(discussion_message(1, true), "The impostor has the hint.");
        assert_eq!(discussion_message(1, false), "The impostor has NO hint.");
    }
}
