//! Traits for the external collaborators the loop drives.
//!
//! Each trait is a seam: the binary wires in the Lichess client, the
//! Stockfish process and a board renderer, while tests inject recording stubs.

use std::time::Duration;

use crate::engine::EngineError;
use crate::game::{GameSnapshot, Orientation, RecommendedMove};
use crate::lichess::TransportError;
use crate::render::RenderError;

/// Supplies the snapshot of the player's active game.
#[async_trait::async_trait]
pub trait GameStateSource: Send {
    /// Fetches the current game.
    ///
    /// `Ok(None)` means there is no active game with the player to move;
    /// transport failures are reported as errors, never as `None`.
    async fn fetch_current(&mut self) -> Result<Option<GameSnapshot>, TransportError>;
}

/// Computes a move for a position within a time budget.
#[async_trait::async_trait]
pub trait MoveRecommender: Send {
    /// Returns the best move, or `None` when the engine could not produce one.
    async fn recommend(
        &mut self,
        position: &str,
        budget: Duration,
    ) -> Result<Option<RecommendedMove>, EngineError>;
}

/// Draws a position, optionally highlighting a move.
pub trait BoardRenderer: Send {
    /// Renders `position` oriented for the given side.
    fn render(
        &mut self,
        position: &str,
        highlight: Option<&RecommendedMove>,
        orientation: Orientation,
    ) -> Result<(), RenderError>;

    /// Forces a full redraw of the last rendered board.
    fn refresh(&mut self) -> Result<(), RenderError>;
}

/// Commits a move to a remote game.
///
/// Not assumed idempotent: the controller calls it at most once per decided move.
#[async_trait::async_trait]
pub trait MoveSubmitter: Send {
    /// Submits `uci` in game `game_id`.
    async fn submit(&mut self, game_id: &str, uci: &str) -> Result<(), TransportError>;
}
