//! UCI engine process driver.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{ChildStdin, ChildStdout, Command};
use tracing::{debug, info, instrument, warn};

use super::error::EngineError;
use super::uci::{SearchInfo, UciLine, parse_line};
use crate::controller::MoveRecommender;
use crate::game::{RecommendedMove, is_legal};

/// Rationale used when the engine printed no search info.
pub const DEFAULT_RATIONALE: &str = "Best move calculated based on evaluation.";

/// Launches a UCI engine binary for each recommendation.
#[derive(Debug, Clone)]
pub struct StockfishEngine {
    path: PathBuf,
    args: Vec<String>,
    grace: Duration,
}

impl StockfishEngine {
    /// Creates a driver for the engine at `path`.
    ///
    /// `grace` is added to each search budget before giving up on `bestmove`.
    #[instrument(skip(path))]
    pub fn new(path: impl Into<PathBuf>, grace: Duration) -> Self {
        let path = path.into();
        debug!(path = %path.display(), "Configured engine");
        Self {
            path,
            args: Vec::new(),
            grace,
        }
    }

    /// Sets extra command-line arguments passed to the engine binary.
    #[instrument(skip(self))]
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Engine binary path.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Searches `fen` for `budget` and returns the engine's move.
    #[instrument(skip(self), fields(budget_ms = budget.as_millis() as u64))]
    pub async fn best_move(
        &self,
        fen: &str,
        budget: Duration,
    ) -> Result<Option<RecommendedMove>, EngineError> {
        info!(engine = %self.path.display(), "Starting engine");
        let mut child = Command::new(&self.path)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                EngineError::new(format!(
                    "Failed to start engine {}: {}",
                    self.path.display(),
                    e
                ))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| EngineError::new("Failed to capture engine stdin"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::new("Failed to capture engine stdout"))?;
        let mut lines = BufReader::new(stdout).lines();

        let deadline = budget + self.grace;
        let search = tokio::time::timeout(
            deadline,
            Self::converse(&mut stdin, &mut lines, fen, budget),
        )
        .await;

        // Best effort: the child is killed on drop if it ignores quit.
        let _ = send(&mut stdin, "quit").await;
        drop(stdin);
        let _ = tokio::time::timeout(Duration::from_millis(500), child.wait()).await;

        let (uci, info) = match search {
            Ok(result) => result?,
            Err(_) => {
                warn!(deadline_ms = deadline.as_millis() as u64, "Engine did not answer in time");
                return Ok(None);
            }
        };

        let Some(uci) = uci else {
            warn!("Engine reported no move");
            return Ok(None);
        };

        if is_legal(fen, &uci) == Some(false) {
            warn!(uci = %uci, "Engine move is not legal in this position");
            return Ok(None);
        }

        let rationale = info
            .and_then(|info| info.rationale())
            .unwrap_or_else(|| DEFAULT_RATIONALE.to_string());
        debug!(uci = %uci, rationale = %rationale, "Engine move");
        Ok(Some(RecommendedMove::new(uci, rationale)))
    }

    /// Runs the UCI exchange up to `bestmove`.
    async fn converse(
        stdin: &mut ChildStdin,
        lines: &mut Lines<BufReader<ChildStdout>>,
        fen: &str,
        budget: Duration,
    ) -> Result<(Option<String>, Option<SearchInfo>), EngineError> {
        send(stdin, "uci").await?;
        wait_for(lines, &UciLine::UciOk).await?;
        send(stdin, "isready").await?;
        wait_for(lines, &UciLine::ReadyOk).await?;

        send(stdin, "ucinewgame").await?;
        send(stdin, &format!("position fen {}", fen.trim())).await?;
        send(stdin, &format!("go movetime {}", budget.as_millis().max(1))).await?;

        let mut last_info: Option<SearchInfo> = None;
        while let Some(line) = lines.next_line().await? {
            match parse_line(&line) {
                UciLine::BestMove(uci) => return Ok((uci, last_info)),
                UciLine::Info(info) if info.score.is_some() || !info.pv.is_empty() => {
                    last_info = Some(info);
                }
                _ => {}
            }
        }
        Err(EngineError::new("Engine exited before reporting bestmove"))
    }
}

/// Writes one command line to the engine.
async fn send(stdin: &mut ChildStdin, command: &str) -> Result<(), EngineError> {
    debug!(command, "To engine");
    stdin.write_all(command.as_bytes()).await?;
    stdin.write_all(b"\n").await?;
    stdin.flush().await?;
    Ok(())
}

/// Reads lines until `expected` arrives.
async fn wait_for(
    lines: &mut Lines<BufReader<ChildStdout>>,
    expected: &UciLine,
) -> Result<(), EngineError> {
    while let Some(line) = lines.next_line().await? {
        if &parse_line(&line) == expected {
            return Ok(());
        }
    }
    Err(EngineError::new(format!(
        "Engine exited while waiting for {:?}",
        expected
    )))
}

#[async_trait::async_trait]
impl MoveRecommender for StockfishEngine {
    async fn recommend(
        &mut self,
        position: &str,
        budget: Duration,
    ) -> Result<Option<RecommendedMove>, EngineError> {
        self.best_move(position, budget).await
    }
}
