//! Terminal board rendering.

use std::io::Write;

use crossterm::{
    queue,
    style::{self, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
    cursor::MoveTo,
};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};
use tracing::{debug, instrument};

use super::board_view::BoardView;
use super::error::RenderError;
use crate::controller::BoardRenderer;
use crate::game::{Orientation, RecommendedMove};

const LIGHT: Color = Color::Rgb(240, 217, 181);
const DARK: Color = Color::Rgb(181, 136, 99);
const HIGHLIGHT: Color = Color::Rgb(205, 210, 106);
const PIECE: Color = Color::Black;
const LABEL: Color = Color::DarkGray;

/// Draws a [`BoardView`] into a ratatui buffer.
///
/// Each square is three columns wide; rank labels sit in the two leftmost
/// columns and file labels on the row below the board.
#[derive(Debug, Clone, Copy)]
pub struct BoardWidget<'a> {
    view: &'a BoardView,
}

impl<'a> BoardWidget<'a> {
    /// Columns per square.
    pub const SQUARE_WIDTH: u16 = 3;
    /// Total width: labels plus eight squares.
    pub const WIDTH: u16 = 2 + 8 * Self::SQUARE_WIDTH;
    /// Total height: eight ranks plus the file labels.
    pub const HEIGHT: u16 = 9;

    /// Wraps a view for rendering.
    pub fn new(view: &'a BoardView) -> Self {
        Self { view }
    }
}

impl Widget for BoardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < Self::WIDTH || area.height < Self::HEIGHT {
            return;
        }
        let label_style = Style::default().fg(LABEL);

        for row in 0..BoardView::SIZE {
            let y = area.y + row as u16;
            buf.set_string(
                area.x,
                y,
                format!("{} ", self.view.rank_label(row)),
                label_style,
            );

            for (col, cell) in self.view.row(row).iter().enumerate() {
                let bg = if cell.highlighted {
                    HIGHLIGHT
                } else if cell.light {
                    LIGHT
                } else {
                    DARK
                };
                let style = Style::default()
                    .bg(bg)
                    .fg(PIECE)
                    .add_modifier(Modifier::BOLD);
                let text = format!(" {} ", cell.glyph.unwrap_or(' '));
                let x = area.x + 2 + col as u16 * Self::SQUARE_WIDTH;
                buf.set_string(x, y, text, style);
            }
        }

        let y = area.y + BoardView::SIZE as u16;
        for col in 0..BoardView::SIZE {
            let x = area.x + 2 + col as u16 * Self::SQUARE_WIDTH;
            buf.set_string(
                x,
                y,
                format!(" {} ", self.view.file_label(col)),
                label_style,
            );
        }
    }
}

/// Prints boards as colored text blocks on a terminal stream.
///
/// Boards are written inline like log output, so status lines printed
/// between renders stay readable.
pub struct TerminalBoardRenderer<W: Write + Send> {
    out: W,
    last: Option<BoardView>,
}

impl TerminalBoardRenderer<std::io::Stdout> {
    /// Renderer writing to standard output.
    #[instrument]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> TerminalBoardRenderer<W> {
    /// Renderer writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out, last: None }
    }

    /// Consumes the renderer and returns the stream.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Writes one board.
    #[instrument(skip_all)]
    fn draw(&mut self, view: &BoardView) -> Result<(), RenderError> {
        let area = Rect::new(0, 0, BoardWidget::WIDTH, BoardWidget::HEIGHT);
        let mut buffer = Buffer::empty(area);
        BoardWidget::new(view).render(area, &mut buffer);

        for y in 0..area.height {
            for x in 0..area.width {
                let cell = &buffer[(x, y)];
                queue!(
                    self.out,
                    SetBackgroundColor(to_terminal_color(cell.bg)),
                    SetForegroundColor(to_terminal_color(cell.fg)),
                    Print(cell.symbol()),
                )?;
            }
            queue!(self.out, ResetColor, Print("\n"))?;
        }
        self.out.flush()?;
        debug!("Board drawn");
        Ok(())
    }
}

impl<W: Write + Send> BoardRenderer for TerminalBoardRenderer<W> {
    fn render(
        &mut self,
        position: &str,
        highlight: Option<&RecommendedMove>,
        orientation: Orientation,
    ) -> Result<(), RenderError> {
        let view = BoardView::parse(position, highlight, orientation)?;
        self.draw(&view)?;
        self.last = Some(view);
        Ok(())
    }

    fn refresh(&mut self) -> Result<(), RenderError> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        match self.last.take() {
            Some(view) => {
                let result = self.draw(&view);
                self.last = Some(view);
                result
            }
            None => Ok(self.out.flush()?),
        }
    }
}

/// Maps the palette used by [`BoardWidget`] onto terminal colors.
fn to_terminal_color(color: Color) -> style::Color {
    match color {
        Color::Rgb(r, g, b) => style::Color::Rgb { r, g, b },
        Color::Black => style::Color::Black,
        Color::DarkGray => style::Color::DarkGrey,
        Color::White => style::Color::White,
        _ => style::Color::Reset,
    }
}
