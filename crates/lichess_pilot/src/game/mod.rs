//! Game domain types shared by the controller and its collaborators.

mod notation;
mod recommendation;
mod snapshot;

pub use notation::{is_legal, parse_fen, parse_uci_move};
pub use recommendation::{Orientation, RecommendedMove, TimeBudget};
pub use snapshot::{Color, GameOutcome, GameSnapshot, GameStatus, Speed};
