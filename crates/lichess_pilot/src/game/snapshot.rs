//! Point-in-time view of the player's active game.

use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Side of the board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Color {
    /// Moves first.
    White,
    /// Moves second.
    Black,
}

/// Time-control category of a game.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Speed {
    /// Under 30 seconds per side.
    UltraBullet,
    /// Under 3 minutes per side.
    Bullet,
    /// Under 8 minutes per side.
    Blitz,
    /// Under 25 minutes per side.
    Rapid,
    /// Slow over-the-board style games.
    Classical,
    /// Days per move.
    Correspondence,
    /// Anything the server reports that we do not recognize.
    #[serde(other)]
    Other,
}

impl Speed {
    /// Fast speeds get the short engine budget and are never auto-submitted.
    #[instrument]
    pub fn is_fast(self) -> bool {
        matches!(self, Self::UltraBullet | Self::Bullet | Self::Blitz)
    }

    /// Whether a recommendation at this speed is submitted without user input.
    #[instrument]
    pub fn auto_submits(self) -> bool {
        !self.is_fast()
    }
}

/// Lifecycle status of a game as reported by the server.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum GameStatus {
    /// Challenge accepted, no move yet.
    Created,
    /// Game in progress.
    Started,
    /// Aborted before both sides moved.
    Aborted,
    /// Checkmate.
    Mate,
    /// One side resigned.
    Resign,
    /// Stalemate.
    Stalemate,
    /// One side left the game.
    Timeout,
    /// Agreed or claimed draw.
    Draw,
    /// Flag fell.
    #[serde(rename = "outoftime")]
    #[strum(serialize = "outoftime")]
    OutOfTime,
    /// Cheat detected.
    Cheat,
    /// A player did not make the first move in time.
    NoStart,
    /// Finished for an unknown reason.
    UnknownFinish,
    /// Variant-specific ending.
    VariantEnd,
    /// Status name not known to this client.
    #[serde(other)]
    Unknown,
}

impl GameStatus {
    /// Statuses that end the loop.
    pub const TERMINAL: [GameStatus; 4] = [Self::Mate, Self::Resign, Self::Timeout, Self::Draw];

    /// Returns true when this status ends the polling loop.
    #[instrument]
    pub fn is_terminal(self) -> bool {
        Self::TERMINAL.contains(&self)
    }
}

/// Snapshot of the one active game the local player has joined.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct GameSnapshot {
    /// FEN of the current position.
    position: String,
    /// Opaque server game identifier.
    game_id: String,
    /// Whether the local player is to move.
    is_my_turn: bool,
    /// Local player's color.
    color: Color,
    /// Time-control category.
    speed: Speed,
    /// Game status.
    status: GameStatus,
    /// Winner, once decided.
    winner: Option<Color>,
}

/// Result of a finished game from the local player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum GameOutcome {
    /// Local player won.
    #[display("You won ({})", _0)]
    Win(GameStatus),
    /// Local player lost.
    #[display("You lost ({})", _0)]
    Loss(GameStatus),
    /// Nobody won.
    #[display("Draw ({})", _0)]
    Draw(GameStatus),
}

impl GameOutcome {
    /// Classifies a terminal snapshot by comparing `winner` to the local color.
    ///
    /// Returns `None` when the snapshot's status is not terminal.
    #[instrument(skip(snapshot), fields(status = %snapshot.status, winner = ?snapshot.winner))]
    pub fn classify(snapshot: &GameSnapshot) -> Option<Self> {
        if !snapshot.status.is_terminal() {
            return None;
        }
        let status = snapshot.status;
        Some(match snapshot.winner {
            Some(winner) if winner == snapshot.color => Self::Win(status),
            Some(_) => Self::Loss(status),
            None => Self::Draw(status),
        })
    }
}
