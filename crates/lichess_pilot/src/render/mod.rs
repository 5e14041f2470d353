//! Board renderers: terminal text and SVG file.

mod board_view;
mod error;
mod svg;
mod terminal;

pub use board_view::{BoardView, Cell, glyph};
pub use error::RenderError;
pub use svg::{SvgBoardRenderer, svg_document};
pub use terminal::{BoardWidget, TerminalBoardRenderer};
