//! WebSocket message dispatch
//!
//! Successful commands answer through the broadcast channel so every screen
//! (the sender included) sees the same view. Only failures and state queries
//! get a direct reply.

use crate::error::GameError;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use std::sync::Arc;

/// Handle client messages and return optional response
pub async fn handle_message(msg: ClientMessage, state: &Arc<AppState>) -> Option<ServerMessage> {
    if let ClientMessage::GetState = msg {
        return Some(ServerMessage::Round {
            view: state.view().await,
        });
    }

    if let ClientMessage::StartRound = msg {
        return state.start_round().await.err().map(error_message);
    }

    if let Some(change) = msg.setup_change() {
        return state.update_setup(change).await.err().map(error_message);
    }

    if let Some(action) = msg.action() {
        return state.apply_action(action).await.err().map(|e| {
            tracing::debug!("Rejected {}: {}", action.name(), e);
            error_message(e)
        });
    }

    tracing::warn!("Unhandled client message: {:?}", msg);
    None
}

fn error_message(err: GameError) -> ServerMessage {
    ServerMessage::Error {
        code: err.code().to_string(),
        msg: err.to_string(),
    }
}
