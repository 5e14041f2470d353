//! Command-line interface for lichess_pilot.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use lichess_pilot::{Color, RendererKind, Speed};

/// Lichess Pilot - engine-assisted play on Lichess
#[derive(Parser, Debug)]
#[command(name = "lichess_pilot")]
#[command(about = "Polls your Lichess game and plays or suggests engine moves", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML config file (missing file means defaults)
    #[arg(short, long, global = true, default_value = "lichess_pilot.toml")]
    pub config: PathBuf,

    /// Path to the UCI engine binary
    #[arg(long, global = true)]
    pub engine: Option<PathBuf>,

    /// Board renderer
    #[arg(long, global = true, value_enum)]
    pub renderer: Option<RendererKind>,

    /// Output file for the SVG renderer
    #[arg(long, global = true)]
    pub svg_path: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Poll the active game and play or suggest moves until it ends
    Play {
        /// Milliseconds between polls
        #[arg(long)]
        poll_ms: Option<u64>,

        /// Lichess server URL
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Ask the engine for one move in a position and draw it
    Analyze {
        /// Position to analyze
        #[arg(long)]
        fen: String,

        /// Speed class, which selects the thinking time
        #[arg(long, default_value = "rapid")]
        speed: Speed,

        /// Side to draw at the bottom
        #[arg(long, default_value = "white")]
        color: Color,
    },
}
