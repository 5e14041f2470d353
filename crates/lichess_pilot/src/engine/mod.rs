//! UCI chess engine integration.

mod error;
mod stockfish;
mod uci;

pub use error::EngineError;
pub use stockfish::{DEFAULT_RATIONALE, StockfishEngine};
pub use uci::{Score, SearchInfo, UciLine, parse_line};
