//! The per-cycle decision logic.

use derive_more::{Display, Error, From};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use super::collaborators::{BoardRenderer, GameStateSource, MoveRecommender, MoveSubmitter};
use super::events::LoopEvent;
use super::state::{ControllerSettings, ControllerState, Phase};
use crate::engine::EngineError;
use crate::game::{GameOutcome, GameSnapshot, Orientation};
use crate::render::RenderError;

/// Faults that end the loop.
///
/// Transport failures and missing engine moves are reported as events
/// and never surface here.
#[derive(Debug, Clone, Display, Error, From)]
pub enum ControllerError {
    /// The engine process failed.
    #[display("{_0}")]
    Engine(EngineError),
    /// The board could not be drawn.
    #[display("{_0}")]
    Render(RenderError),
}

/// What the driver should do after a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStep {
    /// Sleep for the poll interval, then run another cycle.
    Continue,
    /// The game ended; stop polling.
    Terminated(GameOutcome),
}

/// Polls the game, decides, and acts, one cycle at a time.
pub struct GameLoopController {
    source: Box<dyn GameStateSource>,
    recommender: Box<dyn MoveRecommender>,
    renderer: Box<dyn BoardRenderer>,
    submitter: Box<dyn MoveSubmitter>,
    settings: ControllerSettings,
    state: ControllerState,
    phase: Phase,
    event_tx: mpsc::UnboundedSender<LoopEvent>,
}

impl GameLoopController {
    /// Creates a controller over the given collaborators.
    #[instrument(skip_all, fields(refresh_every = settings.refresh_every()))]
    pub fn new(
        source: Box<dyn GameStateSource>,
        recommender: Box<dyn MoveRecommender>,
        renderer: Box<dyn BoardRenderer>,
        submitter: Box<dyn MoveSubmitter>,
        settings: ControllerSettings,
        event_tx: mpsc::UnboundedSender<LoopEvent>,
    ) -> Self {
        info!("Creating game loop controller");
        Self {
            source,
            recommender,
            renderer,
            submitter,
            settings,
            state: ControllerState::default(),
            phase: Phase::Idle,
            event_tx,
        }
    }

    /// Current phase of the state machine.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Cross-cycle state.
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Runs one fetch, decide, act cycle.
    ///
    /// Once terminated, further calls return the recorded outcome without
    /// touching any collaborator.
    #[instrument(skip(self), fields(move_count = *self.state.move_count()))]
    pub async fn cycle(&mut self) -> Result<CycleStep, ControllerError> {
        if let Some(outcome) = self.state.outcome() {
            debug!("Cycle requested after termination");
            return Ok(CycleStep::Terminated(*outcome));
        }

        self.phase = Phase::Observing;
        let snapshot = match self.source.fetch_current().await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                self.phase = Phase::Reporting;
                self.report(LoopEvent::Waiting);
                return Ok(self.finish());
            }
            Err(e) => {
                self.phase = Phase::Reporting;
                self.report(LoopEvent::FetchFailed { reason: e.message });
                return Ok(self.finish());
            }
        };

        debug!(
            game_id = %snapshot.game_id(),
            status = %snapshot.status(),
            is_my_turn = *snapshot.is_my_turn(),
            "Polled game state"
        );

        if let Some(outcome) = GameOutcome::classify(&snapshot) {
            info!(%outcome, "Game over");
            self.state.terminate(outcome);
            self.phase = Phase::Terminated;
            self.report(LoopEvent::GameOver(outcome));
            return Ok(CycleStep::Terminated(outcome));
        }

        if !self.state.observe(snapshot.position()) {
            self.phase = Phase::Reporting;
            self.report(LoopEvent::WaitingForTurn);
            return Ok(self.finish());
        }

        let orientation = Orientation::from(*snapshot.color());
        self.report(LoopEvent::PositionChanged {
            position: snapshot.position().clone(),
            move_count: *self.state.move_count(),
        });
        self.renderer.render(snapshot.position(), None, orientation)?;

        if *snapshot.is_my_turn() {
            self.phase = Phase::Analyzing;
            self.play_turn(&snapshot, orientation).await?;
        }

        self.phase = Phase::Reporting;
        if self.state.refresh_due(*self.settings.refresh_every()) {
            debug!("Refreshing renderer");
            self.renderer.refresh()?;
        }

        Ok(self.finish())
    }

    /// Asks the engine for a move, shows it, then submits or advises.
    #[instrument(skip_all, fields(game_id = %snapshot.game_id(), speed = %snapshot.speed()))]
    async fn play_turn(
        &mut self,
        snapshot: &GameSnapshot,
        orientation: Orientation,
    ) -> Result<(), ControllerError> {
        let speed = *snapshot.speed();
        let budget = self.settings.budget().for_speed(speed);
        debug!(budget_ms = budget.as_millis() as u64, "Requesting recommendation");

        let recommendation = self
            .recommender
            .recommend(snapshot.position(), budget)
            .await?;
        self.phase = Phase::Reporting;

        let Some(recommendation) = recommendation else {
            warn!("Engine returned no move");
            self.report(LoopEvent::AnalysisFailed);
            return Ok(());
        };

        self.report(LoopEvent::Recommended {
            uci: recommendation.uci().clone(),
            rationale: recommendation.rationale().clone(),
        });
        self.renderer
            .render(snapshot.position(), Some(&recommendation), orientation)?;

        if !speed.auto_submits() {
            self.report(LoopEvent::ManualMoveRequired {
                speed,
                uci: recommendation.uci().clone(),
            });
            return Ok(());
        }

        match self
            .submitter
            .submit(snapshot.game_id(), recommendation.uci())
            .await
        {
            Ok(()) => self.report(LoopEvent::Submitted {
                game_id: snapshot.game_id().clone(),
                uci: recommendation.uci().clone(),
            }),
            Err(e) => self.report(LoopEvent::SubmitFailed {
                uci: recommendation.uci().clone(),
                reason: e.message,
            }),
        }
        Ok(())
    }

    /// Closes a non-terminal cycle.
    fn finish(&mut self) -> CycleStep {
        self.phase = Phase::Idle;
        CycleStep::Continue
    }

    /// Sends a status event to whoever is listening.
    fn report(&self, event: LoopEvent) {
        debug!(%event, "Status");
        if self.event_tx.send(event).is_err() {
            debug!("Status receiver closed");
        }
    }
}
