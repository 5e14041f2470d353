//! SVG file board rendering.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use super::board_view::BoardView;
use super::error::RenderError;
use crate::controller::BoardRenderer;
use crate::game::{Orientation, RecommendedMove};

const LIGHT_FILL: &str = "#f0d9b5";
const DARK_FILL: &str = "#b58863";
const HIGHLIGHT_FILL: &str = "#cdd26a";

/// Builds an SVG document for a board, `square` pixels per square.
///
/// A margin of half a square carries the coordinates.
#[instrument(skip(view))]
pub fn svg_document(view: &BoardView, square: u32) -> String {
    let margin = square / 2;
    let size = square * 8 + margin * 2;
    let mut svg = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#
    );
    let _ = writeln!(svg, r##"<rect width="{size}" height="{size}" fill="#212121"/>"##);

    for row in 0..BoardView::SIZE {
        for (col, cell) in view.row(row).iter().enumerate() {
            let x = margin + col as u32 * square;
            let y = margin + row as u32 * square;
            let fill = if cell.highlighted {
                HIGHLIGHT_FILL
            } else if cell.light {
                LIGHT_FILL
            } else {
                DARK_FILL
            };
            let _ = writeln!(
                svg,
                r#"<rect class="square {}" x="{x}" y="{y}" width="{square}" height="{square}" fill="{fill}"/>"#,
                cell.square
            );
            if let Some(glyph) = cell.glyph {
                let _ = writeln!(
                    svg,
                    r#"<text x="{}" y="{}" font-size="{}" text-anchor="middle" dominant-baseline="central">{glyph}</text>"#,
                    x + square / 2,
                    y + square / 2,
                    square * 3 / 4
                );
            }
        }
    }

    let label_size = margin * 3 / 4;
    for i in 0..BoardView::SIZE {
        let offset = margin + i as u32 * square + square / 2;
        let _ = writeln!(
            svg,
            r##"<text x="{offset}" y="{}" font-size="{label_size}" fill="#e5e5e5" text-anchor="middle" dominant-baseline="central">{}</text>"##,
            size - margin / 2,
            view.file_label(i)
        );
        let _ = writeln!(
            svg,
            r##"<text x="{}" y="{offset}" font-size="{label_size}" fill="#e5e5e5" text-anchor="middle" dominant-baseline="central">{}</text>"##,
            margin / 2,
            view.rank_label(i)
        );
    }

    svg.push_str("</svg>\n");
    svg
}

/// Writes each board to an SVG file, overwriting the previous one.
#[derive(Debug, Clone)]
pub struct SvgBoardRenderer {
    path: PathBuf,
    square: u32,
    last: Option<String>,
}

impl SvgBoardRenderer {
    /// Default pixels per square.
    pub const DEFAULT_SQUARE: u32 = 50;

    /// Renderer writing to `path`.
    #[instrument(skip(path))]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        info!(path = %path.display(), "SVG board output");
        Self {
            path,
            square: Self::DEFAULT_SQUARE,
            last: None,
        }
    }

    /// Output file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, svg: &str) -> Result<(), RenderError> {
        std::fs::write(&self.path, svg).map_err(|e| {
            RenderError::new(format!("Failed to write {}: {}", self.path.display(), e))
        })?;
        debug!(path = %self.path.display(), bytes = svg.len(), "Board written");
        Ok(())
    }
}

impl BoardRenderer for SvgBoardRenderer {
    fn render(
        &mut self,
        position: &str,
        highlight: Option<&RecommendedMove>,
        orientation: Orientation,
    ) -> Result<(), RenderError> {
        let view = BoardView::parse(position, highlight, orientation)?;
        let svg = svg_document(&view, self.square);
        self.write(&svg)?;
        self.last = Some(svg);
        Ok(())
    }

    fn refresh(&mut self) -> Result<(), RenderError> {
        match &self.last {
            Some(svg) => self.write(svg),
            None => Ok(()),
        }
    }
}
