//! Lichess transport: fetching the active game and playing moves.

mod client;
mod error;
mod wire;

pub use client::LichessClient;
pub use error::TransportError;
pub use wire::{NowPlaying, PlayingGame, StatusField};
