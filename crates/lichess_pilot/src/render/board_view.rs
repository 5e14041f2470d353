//! Render-ready model of a position.

use chess::{ALL_FILES, ALL_RANKS, Board, Color as Side, File, Piece, Rank, Square};
use tracing::{instrument, warn};

use super::error::RenderError;
use crate::game::{Orientation, RecommendedMove, parse_fen, parse_uci_move};

/// One square as it should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Board square.
    pub square: Square,
    /// Unicode piece glyph, if occupied.
    pub glyph: Option<char>,
    /// Light or dark square.
    pub light: bool,
    /// Part of the highlighted move.
    pub highlighted: bool,
}

/// A position laid out in display order for a given orientation.
///
/// Row 0 is the top of the picture: rank 8 when White is at the bottom,
/// rank 1 when Black is. Files are mirrored for Black as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    cells: Vec<Cell>,
    orientation: Orientation,
}

impl BoardView {
    /// Board width and height in squares.
    pub const SIZE: usize = 8;

    /// Builds the view from a FEN and an optional move to highlight.
    #[instrument(skip(highlight), fields(highlight = ?highlight.map(|m| m.uci())))]
    pub fn parse(
        fen: &str,
        highlight: Option<&RecommendedMove>,
        orientation: Orientation,
    ) -> Result<Self, RenderError> {
        let board = parse_fen(fen)
            .ok_or_else(|| RenderError::new(format!("Invalid FEN: {}", fen)))?;

        let highlight = highlight.and_then(|mv| {
            let parsed = parse_uci_move(mv.uci());
            if parsed.is_none() {
                warn!(uci = %mv.uci(), "Cannot highlight malformed move");
            }
            parsed.map(|m| (m.get_source(), m.get_dest()))
        });

        Ok(Self::from_board(&board, highlight, orientation))
    }

    fn from_board(
        board: &Board,
        highlight: Option<(Square, Square)>,
        orientation: Orientation,
    ) -> Self {
        let cells = Self::display_ranks(orientation)
            .into_iter()
            .flat_map(|rank| {
                Self::display_files(orientation)
                    .into_iter()
                    .map(move |file| Square::make_square(rank, file))
            })
            .map(|square| Cell {
                square,
                glyph: board
                    .piece_on(square)
                    .zip(board.color_on(square))
                    .map(|(piece, side)| glyph(piece, side)),
                light: (square.get_rank().to_index() + square.get_file().to_index()) % 2 == 1,
                highlighted: highlight.is_some_and(|(from, to)| square == from || square == to),
            })
            .collect();

        Self { cells, orientation }
    }

    /// Ranks from top to bottom of the picture.
    pub fn display_ranks(orientation: Orientation) -> Vec<Rank> {
        let mut ranks = ALL_RANKS.to_vec();
        if !orientation.flipped() {
            ranks.reverse();
        }
        ranks
    }

    /// Files from left to right of the picture.
    pub fn display_files(orientation: Orientation) -> Vec<File> {
        let mut files = ALL_FILES.to_vec();
        if orientation.flipped() {
            files.reverse();
        }
        files
    }

    /// The eight cells of display row `row` (0 = top).
    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * Self::SIZE;
        &self.cells[start..start + Self::SIZE]
    }

    /// All cells in display order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Rank label for display row `row`.
    pub fn rank_label(&self, row: usize) -> char {
        let rank = Self::display_ranks(self.orientation)[row];
        char::from(b'1' + rank.to_index() as u8)
    }

    /// File label for display column `col`.
    pub fn file_label(&self, col: usize) -> char {
        let file = Self::display_files(self.orientation)[col];
        char::from(b'a' + file.to_index() as u8)
    }
}

/// Unicode glyph for a piece.
pub fn glyph(piece: Piece, side: Side) -> char {
    match (side, piece) {
        (Side::White, Piece::King) => '♔',
        (Side::White, Piece::Queen) => '♕',
        (Side::White, Piece::Rook) => '♖',
        (Side::White, Piece::Bishop) => '♗',
        (Side::White, Piece::Knight) => '♘',
        (Side::White, Piece::Pawn) => '♙',
        (Side::Black, Piece::King) => '♚',
        (Side::Black, Piece::Queen) => '♛',
        (Side::Black, Piece::Rook) => '♜',
        (Side::Black, Piece::Bishop) => '♝',
        (Side::Black, Piece::Knight) => '♞',
        (Side::Black, Piece::Pawn) => '♟',
    }
}
