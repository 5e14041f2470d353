//! Status events emitted by the game loop.

use std::io::Write;

use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::game::{GameOutcome, Speed};

/// One user-visible condition produced during a cycle.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum LoopEvent {
    /// No active game with the player to move.
    #[display("Waiting for your turn...")]
    Waiting,
    /// Same position as last cycle.
    #[display("Waiting for turn (position unchanged)")]
    WaitingForTurn,
    /// A new position was drawn.
    #[display("FEN: {position} (position #{move_count})")]
    PositionChanged {
        /// FEN of the new position.
        position: String,
        /// Distinct positions seen so far.
        move_count: u64,
    },
    /// The engine produced a move.
    #[display("Suggested move: {uci}\nExplanation: {rationale}")]
    Recommended {
        /// Move in UCI notation.
        uci: String,
        /// Engine rationale.
        rationale: String,
    },
    /// Move is advisory only; the user must play it.
    #[display("{speed} game detected. Please make the move {uci} manually.")]
    ManualMoveRequired {
        /// Speed that disabled auto-submission.
        speed: Speed,
        /// Move to enter.
        uci: String,
    },
    /// Move accepted by the server.
    #[display("Move {uci} played successfully.")]
    Submitted {
        /// Game the move was played in.
        game_id: String,
        /// Move played.
        uci: String,
    },
    /// Engine returned no move.
    #[display("Could not analyze the position.")]
    AnalysisFailed,
    /// Snapshot fetch failed; retried next poll.
    #[display("Error fetching game state: {reason}")]
    FetchFailed {
        /// Failure description.
        reason: String,
    },
    /// Server rejected or never received the move.
    #[display("Error playing move {uci}: {reason}")]
    SubmitFailed {
        /// Move that was not played.
        uci: String,
        /// Failure description.
        reason: String,
    },
    /// Terminal status reached.
    #[display("Game over: {_0}")]
    GameOver(GameOutcome),
}

impl LoopEvent {
    /// Idle notices that repeat every poll while nothing happens.
    #[instrument(skip(self))]
    pub fn is_idle_notice(&self) -> bool {
        matches!(self, Self::Waiting | Self::WaitingForTurn)
    }
}

/// Turns events into status lines, collapsing runs of idle notices.
///
/// The first `repeat_limit` identical idle notices in a row are printed;
/// later repeats are suppressed until a different event arrives.
#[derive(Debug, Clone)]
pub struct StatusPrinter {
    repeat_limit: usize,
    last_idle: Option<LoopEvent>,
    repeats: usize,
}

impl StatusPrinter {
    /// Default number of repeated idle lines shown.
    pub const DEFAULT_REPEAT_LIMIT: usize = 4;

    /// Creates a printer showing at most `repeat_limit` repeated idle lines.
    #[instrument]
    pub fn new(repeat_limit: usize) -> Self {
        Self {
            repeat_limit,
            last_idle: None,
            repeats: 0,
        }
    }

    /// Returns the line to print for `event`, or `None` if suppressed.
    #[instrument(skip(self))]
    pub fn line(&mut self, event: &LoopEvent) -> Option<String> {
        if !event.is_idle_notice() {
            self.last_idle = None;
            self.repeats = 0;
            return Some(event.to_string());
        }

        if self.last_idle.as_ref() == Some(event) {
            self.repeats += 1;
        } else {
            self.last_idle = Some(event.clone());
            self.repeats = 1;
        }

        (self.repeats <= self.repeat_limit).then(|| event.to_string())
    }
}

impl Default for StatusPrinter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_REPEAT_LIMIT)
    }
}

/// Writes queued status lines to an output stream.
///
/// Owned by the task that runs the loop, so status lines and boards drawn by
/// a renderer on the same stream never interleave mid-write.
pub struct StatusWriter<W: Write> {
    events: mpsc::UnboundedReceiver<LoopEvent>,
    printer: StatusPrinter,
    out: W,
}

impl StatusWriter<std::io::Stdout> {
    /// Status lines on standard output.
    #[instrument(skip(events))]
    pub fn stdout(events: mpsc::UnboundedReceiver<LoopEvent>, printer: StatusPrinter) -> Self {
        Self::new(events, printer, std::io::stdout())
    }
}

impl<W: Write> StatusWriter<W> {
    /// Writer draining `events` into `out`.
    pub fn new(events: mpsc::UnboundedReceiver<LoopEvent>, printer: StatusPrinter, out: W) -> Self {
        Self {
            events,
            printer,
            out,
        }
    }

    /// Writes every event queued so far, without waiting for more.
    #[instrument(skip(self))]
    pub fn flush(&mut self) -> std::io::Result<usize> {
        let mut written = 0;
        while let Ok(event) = self.events.try_recv() {
            if let Some(line) = self.printer.line(&event) {
                writeln!(self.out, "{}", line)?;
                written += 1;
            }
        }
        self.out.flush()?;
        debug!(written, "Status lines flushed");
        Ok(written)
    }

    /// Consumes the writer and returns the stream.
    pub fn into_inner(self) -> W {
        self.out
    }
}
