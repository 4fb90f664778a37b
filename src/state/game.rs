use super::{Action, AppState, SetupChange, Transition};
use crate::error::{GameError, GameResult};
use crate::protocol::{RoundView, ServerMessage};
use crate::types::{GamePhase, RoundConfig};

impl AppState {
    /// Snapshot of what the shared screen should show
    pub async fn view(&self) -> RoundView {
        RoundView::from(&*self.round.read().await)
    }

    /// Edit the round configuration (Setup only)
    pub async fn update_setup(&self, change: SetupChange) -> GameResult<RoundConfig> {
        let config = {
            let mut machine = self.round.write().await;
            machine.update_setup(change)?;
            machine.config().clone()
        };

        self.broadcast_view().await;
        Ok(config)
    }

    /// Resolve the configured word source and deal a new round.
    ///
    /// The machine stays write-locked from the phase check to the deal, so no
    /// setup edit can land between resolving the pool and using it.
    pub async fn start_round(&self) -> GameResult<RoundView> {
        let view = {
            let mut machine = self.round.write().await;
            if machine.phase() != GamePhase::Setup {
                return Err(GameError::InvalidAction {
                    phase: machine.phase(),
                    action: "start_round",
                });
            }

            let source = machine.config().word_source.clone();
            let pool = match self.library.resolve(&source).await {
                Ok(pool) => pool,
                Err(e) => {
                    tracing::warn!("Cannot start round from {:?}: {}", source, e);
                    return Err(e);
                }
            };

            let mut rng = self.rng.lock().await;
            machine.start_round(&pool, &mut *rng)?;

            let config = machine.config();
            tracing::info!(
                "Round started: {} players, {} impostor(s), hints {}, pool of {}",
                config.player_count,
                config.impostor_count,
                if config.use_hints { "on" } else { "off" },
                pool.len()
            );
            RoundView::from(&*machine)
        };

        self.broadcast_to_all(ServerMessage::Round { view: view.clone() });
        Ok(view)
    }

    /// Drive the round forward with a player action
    pub async fn apply_action(&self, action: Action) -> GameResult<Transition> {
        let transition = self.round.write().await.apply(action)?;
        tracing::debug!("Applied {}: {:?}", action.name(), transition);

        match transition {
            Transition::Exited => self.broadcast_to_all(ServerMessage::Exited {}),
            Transition::Phase(_) => self.broadcast_view().await,
        }
        Ok(transition)
    }

    async fn broadcast_view(&self) {
        let view = self.view().await;
        self.broadcast_to_all(ServerMessage::Round { view });
    }
}
