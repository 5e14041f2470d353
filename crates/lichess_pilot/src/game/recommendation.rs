//! Engine output and the per-speed thinking budget.

use std::time::Duration;

use derive_getters::Getters;
use derive_new::new;
use tracing::instrument;

use super::{Color, Speed};

/// A single best move with a short explanation.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct RecommendedMove {
    /// Move in UCI notation, e.g. `e2e4` or `e7e8q`.
    #[new(into)]
    uci: String,
    /// Free-text rationale.
    #[new(into)]
    rationale: String,
}

/// Which side of the board is drawn at the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    /// White at the bottom.
    #[default]
    White,
    /// Black at the bottom.
    Black,
}

impl Orientation {
    /// True when the board is drawn from Black's side.
    #[instrument]
    pub fn flipped(self) -> bool {
        self == Self::Black
    }
}

impl From<Color> for Orientation {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Self::White,
            Color::Black => Self::Black,
        }
    }
}

/// Engine thinking time per speed class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, new)]
pub struct TimeBudget {
    /// Budget for bullet and blitz games.
    fast: Duration,
    /// Budget for everything slower.
    slow: Duration,
}

impl Default for TimeBudget {
    fn default() -> Self {
        Self {
            fast: Duration::from_millis(300),
            slow: Duration::from_secs(2),
        }
    }
}

impl TimeBudget {
    /// Selects the budget for a game speed.
    #[instrument(skip(self))]
    pub fn for_speed(&self, speed: Speed) -> Duration {
        if speed.is_fast() { self.fast } else { self.slow }
    }
}
