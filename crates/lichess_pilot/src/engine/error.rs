//! Engine error types.

use derive_more::{Display, Error};
use tracing::{error, instrument};

/// Engine process failure with location tracking.
///
/// A move the engine cannot find is not an error; this covers the
/// process itself misbehaving (missing binary, broken pipe).
#[derive(Debug, Clone, Display, Error)]
#[display("Engine error: {} at {}:{}", message, file, line)]
pub struct EngineError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl EngineError {
    /// Creates a new engine error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        let message = message.into();
        error!(error_message = %message, "Engine error created");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<std::io::Error> for EngineError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(format!("Engine I/O error: {}", err))
    }
}
