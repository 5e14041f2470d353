//! Lichess Pilot - Unified CLI
//!
//! Polls the active Lichess game, asks a UCI engine for moves, and plays
//! or suggests them depending on the time control.

#![warn(missing_docs)]

mod cli;

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use lichess_pilot::{
    BoardRenderer, Color, GameLoopController, LichessClient, LoopExit, Orientation, PilotConfig,
    RendererKind, Speed, StatusPrinter, StatusWriter, StockfishEngine, SvgBoardRenderer,
    TerminalBoardRenderer, run_loop,
};
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    initialize_tracing(cli.log_file.as_deref())?;

    let config = build_config(&cli)?;

    match cli.command {
        Command::Play { .. } => run_play(config).await,
        Command::Analyze { fen, speed, color } => run_analyze(config, fen, speed, color).await,
    }
}

/// Sets up tracing to stderr, or to a file when requested.
fn initialize_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,lichess_pilot=debug"));

    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::sync::Arc::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    info!("Tracing initialized");
    Ok(())
}

/// Layers defaults, config file, environment and CLI flags.
#[instrument(skip(cli), fields(config_path = %cli.config.display()))]
fn build_config(cli: &Cli) -> Result<PilotConfig> {
    let mut config =
        PilotConfig::load_or_default(&cli.config)?.with_env(|key| std::env::var(key).ok());

    if let Some(engine) = &cli.engine {
        config = config.with_engine_path(engine.clone());
    }
    if let Some(renderer) = cli.renderer {
        config = config.with_renderer(renderer);
    }
    if let Some(svg_path) = &cli.svg_path {
        config = config.with_svg_path(svg_path.clone());
    }
    if let Command::Play { poll_ms, base_url } = &cli.command {
        if let Some(poll_ms) = poll_ms {
            config = config.with_poll_interval_ms(*poll_ms);
        }
        if let Some(base_url) = base_url {
            config = config.with_base_url(base_url.clone());
        }
    }

    config.validate()?;
    info!(?config, "Configuration ready");
    Ok(config)
}

/// Builds the configured board renderer.
#[instrument(skip(config))]
fn make_renderer(config: &PilotConfig) -> Box<dyn BoardRenderer> {
    match config.renderer() {
        RendererKind::Terminal => Box::new(TerminalBoardRenderer::stdout()),
        RendererKind::Svg => Box::new(SvgBoardRenderer::new(config.svg_path().clone())),
    }
}

/// Builds the engine driver from config.
fn make_engine(config: &PilotConfig) -> StockfishEngine {
    StockfishEngine::new(config.engine_path().clone(), config.engine_grace())
        .with_args(config.engine_args().clone())
}

/// Runs the polling loop until the game ends or Ctrl-C.
#[instrument(skip(config))]
async fn run_play(config: PilotConfig) -> Result<()> {
    info!("Starting Lichess pilot");

    let client = LichessClient::new(config.base_url().clone(), config.require_token()?);
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let mut status = StatusWriter::stdout(event_rx, StatusPrinter::default());

    let mut controller = GameLoopController::new(
        Box::new(client.clone()),
        Box::new(make_engine(&config)),
        make_renderer(&config),
        Box::new(client),
        config.controller_settings(),
        event_tx,
    );

    let shutdown = async {
        if tokio::signal::ctrl_c().await.is_err() {
            warn!("Ctrl-C handler unavailable");
            std::future::pending::<()>().await;
        }
    };
    let exit = run_loop(&mut controller, &mut status, config.poll_interval(), shutdown).await?;

    match exit {
        LoopExit::Finished(outcome) => info!(%outcome, "Game finished"),
        LoopExit::Cancelled => info!("Stopped by user"),
    }
    Ok(())
}

/// Asks the engine for one move and draws it.
#[instrument(skip(config))]
async fn run_analyze(config: PilotConfig, fen: String, speed: Speed, color: Color) -> Result<()> {
    let engine = make_engine(&config);
    let mut renderer = make_renderer(&config);
    let orientation = Orientation::from(color);

    renderer.render(&fen, None, orientation)?;

    let budget = config.time_budget().for_speed(speed);
    match engine.best_move(&fen, budget).await? {
        Some(recommendation) => {
            renderer.render(&fen, Some(&recommendation), orientation)?;
            println!("Suggested move: {}", recommendation.uci());
            println!("Explanation: {}", recommendation.rationale());
        }
        None => println!("Could not analyze the position."),
    }
    Ok(())
}
