//! Lichess REST payloads.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::game::{Color, GameSnapshot, GameStatus, Speed};

/// Body of `GET /api/account/playing`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NowPlaying {
    /// Ongoing games, most urgent first.
    #[serde(default)]
    pub now_playing: Vec<PlayingGame>,
}

/// One entry of `nowPlaying`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayingGame {
    /// Game identifier used in board API paths.
    pub game_id: String,
    /// Current position.
    pub fen: String,
    /// Our color.
    pub color: Color,
    /// Whether we are to move.
    pub is_my_turn: bool,
    /// Time-control category.
    pub speed: Speed,
    /// Game status.
    #[serde(default)]
    pub status: StatusField,
    /// Winner, once decided.
    #[serde(default)]
    pub winner: Option<Color>,
    /// Last move played, in UCI.
    #[serde(default)]
    pub last_move: Option<String>,
}

/// Lichess nests the status name inside an object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusField {
    /// Numeric status code.
    #[serde(default)]
    pub id: u32,
    /// Status name.
    pub name: GameStatus,
}

impl Default for StatusField {
    fn default() -> Self {
        Self {
            id: 20,
            name: GameStatus::Started,
        }
    }
}

impl PlayingGame {
    /// Converts the wire entry into a domain snapshot.
    #[instrument(skip(self), fields(game_id = %self.game_id))]
    pub fn into_snapshot(self) -> GameSnapshot {
        GameSnapshot::new(
            self.fen,
            self.game_id,
            self.is_my_turn,
            self.color,
            self.speed,
            self.status.name,
            self.winner,
        )
    }
}

impl NowPlaying {
    /// Picks the snapshot the controller should see this poll.
    ///
    /// The first game is considered. It is returned when it is our turn or
    /// when it has reached a terminal status; otherwise there is nothing for
    /// us to do and `None` is returned.
    #[instrument(skip(self), fields(games = self.now_playing.len()))]
    pub fn current(self) -> Option<GameSnapshot> {
        let game = self.now_playing.into_iter().next()?;
        if game.is_my_turn || game.status.name.is_terminal() {
            Some(game.into_snapshot())
        } else {
            debug!(game_id = %game.game_id, "Opponent to move");
            None
        }
    }
}
