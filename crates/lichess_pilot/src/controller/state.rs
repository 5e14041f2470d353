//! State the controller carries from one cycle to the next.

use derive_getters::Getters;
use derive_new::new;
use tracing::{debug, instrument};

use crate::game::{GameOutcome, TimeBudget};

/// Where the controller is within a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
pub enum Phase {
    /// Between cycles.
    #[default]
    Idle,
    /// Snapshot fetched, deciding what to do.
    Observing,
    /// Waiting on the engine.
    Analyzing,
    /// Emitting the cycle's status.
    Reporting,
    /// Game over; no further polling.
    Terminated,
}

/// Facts remembered across cycles for de-duplication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct ControllerState {
    /// Position of the most recent snapshot that was rendered.
    last_rendered_position: Option<String>,
    /// Number of distinct positions observed.
    move_count: u64,
    /// Set once a terminal snapshot has been seen.
    outcome: Option<GameOutcome>,
}

impl ControllerState {
    /// Records `position` if it differs from the last rendered one.
    ///
    /// Returns true when the position is new and must be rendered.
    #[instrument(skip(self, position))]
    pub fn observe(&mut self, position: &str) -> bool {
        if self.last_rendered_position.as_deref() == Some(position) {
            return false;
        }
        self.last_rendered_position = Some(position.to_string());
        self.move_count += 1;
        debug!(move_count = self.move_count, "New position observed");
        true
    }

    /// True when the renderer should be flushed after this many positions.
    #[instrument(skip(self))]
    pub fn refresh_due(&self, every: u64) -> bool {
        every > 0 && self.move_count > 0 && self.move_count % every == 0
    }

    /// Marks the game as finished.
    #[instrument(skip(self))]
    pub fn terminate(&mut self, outcome: GameOutcome) {
        self.outcome = Some(outcome);
    }
}

/// Tunables the controller is constructed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, new)]
pub struct ControllerSettings {
    /// Engine budget per speed class.
    budget: TimeBudget,
    /// Flush the renderer every this many distinct positions.
    refresh_every: u64,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            budget: TimeBudget::default(),
            refresh_every: 10,
        }
    }
}
