//! Transport error types.

use derive_more::{Display, Error};
use tracing::{instrument, warn};

/// Failure talking to the game server, with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Transport error: {} at {}:{}", message, file, line)]
pub struct TransportError {
    /// Error message.
    pub message: String,
    /// HTTP status code, when the server answered.
    pub status: Option<u16>,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl TransportError {
    /// Creates a new transport error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        let message = message.into();
        warn!(error_message = %message, "Transport error created");
        Self {
            message,
            status: None,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Creates an error for a non-success HTTP response.
    #[track_caller]
    #[instrument(skip(body))]
    pub fn http(status: u16, body: &str) -> Self {
        let mut err = Self::new(format!("HTTP {}: {}", status, body));
        err.status = Some(status);
        err
    }
}

impl From<reqwest::Error> for TransportError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        let mut converted = Self::new(format!("Request failed: {}", err));
        converted.status = err.status().map(|s| s.as_u16());
        converted
    }
}
