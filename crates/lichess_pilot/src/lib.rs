//! Lichess Pilot library - engine-assisted play on Lichess
//!
//! Polls the player's active game, decides whether a move is needed, asks a
//! UCI engine for one, and either submits it or shows it for manual entry.
//!
//! # Architecture
//!
//! - **Controller**: the polling state machine, one cycle at a time
//! - **Lichess**: REST client supplying snapshots and submitting moves
//! - **Engine**: UCI process driver producing recommendations
//! - **Render**: terminal and SVG board renderers
//!
//! # Example
//!
//! ```no_run
//! use lichess_pilot::{
//!     ControllerSettings, GameLoopController, LichessClient, StatusPrinter, StatusWriter,
//!     StockfishEngine, SvgBoardRenderer, run_loop,
//! };
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = LichessClient::new("https://lichess.org", "token");
//! let (event_tx, event_rx) = tokio::sync::mpsc::unbounded_channel();
//! let mut status = StatusWriter::stdout(event_rx, StatusPrinter::default());
//! let mut controller = GameLoopController::new(
//!     Box::new(client.clone()),
//!     Box::new(StockfishEngine::new("stockfish", Duration::from_secs(5))),
//!     Box::new(SvgBoardRenderer::new("chess_board.svg")),
//!     Box::new(client),
//!     ControllerSettings::default(),
//!     event_tx,
//! );
//! run_loop(
//!     &mut controller,
//!     &mut status,
//!     Duration::from_millis(200),
//!     std::future::pending(),
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod controller;
mod engine;
mod game;
mod lichess;
mod render;

// Crate-level exports - Configuration
pub use config::{ConfigError, PilotConfig, RendererKind, TOKEN_VARS};

// Crate-level exports - Controller
pub use controller::{
    BoardRenderer, ControllerError, ControllerSettings, ControllerState, CycleStep,
    GameLoopController, GameStateSource, LoopEvent, LoopExit, MoveRecommender, MoveSubmitter,
    Phase, StatusPrinter, StatusWriter, run_loop,
};

// Crate-level exports - Engine
pub use engine::{DEFAULT_RATIONALE, EngineError, Score, SearchInfo, StockfishEngine, UciLine, parse_line};

// Crate-level exports - Game types
pub use game::{
    Color, GameOutcome, GameSnapshot, GameStatus, Orientation, RecommendedMove, Speed, TimeBudget,
    is_legal, parse_fen, parse_uci_move,
};

// Crate-level exports - Lichess transport
pub use lichess::{LichessClient, NowPlaying, PlayingGame, StatusField, TransportError};

// Crate-level exports - Rendering
pub use render::{
    BoardView, BoardWidget, Cell, RenderError, SvgBoardRenderer, TerminalBoardRenderer, glyph,
    svg_document,
};
