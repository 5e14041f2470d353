//! FEN and UCI parsing on top of the `chess` crate.

use std::str::FromStr;

use chess::{Board, ChessMove, Piece, Square};
use tracing::{debug, instrument};

/// Parses a FEN string into a board.
#[instrument]
pub fn parse_fen(fen: &str) -> Option<Board> {
    match Board::from_str(fen.trim()) {
        Ok(board) => Some(board),
        Err(e) => {
            debug!(error = %e, "Rejected FEN");
            None
        }
    }
}

/// Parses a UCI move token such as `g1f3` or `a7a8q`.
#[instrument]
pub fn parse_uci_move(uci: &str) -> Option<ChessMove> {
    if !uci.is_ascii() || !(4..=5).contains(&uci.len()) {
        return None;
    }
    let source = Square::from_str(&uci[0..2]).ok()?;
    let dest = Square::from_str(&uci[2..4]).ok()?;
    let promotion = match uci.as_bytes().get(4) {
        None => None,
        Some(b'q') => Some(Piece::Queen),
        Some(b'r') => Some(Piece::Rook),
        Some(b'b') => Some(Piece::Bishop),
        Some(b'n') => Some(Piece::Knight),
        Some(_) => return None,
    };
    Some(ChessMove::new(source, dest, promotion))
}

/// True when `uci` is a legal move in `fen`.
///
/// Returns `None` if the FEN cannot be parsed, since legality is then unknown.
#[instrument]
pub fn is_legal(fen: &str, uci: &str) -> Option<bool> {
    let board = parse_fen(fen)?;
    Some(parse_uci_move(uci).is_some_and(|mv| board.legal(mv)))
}
