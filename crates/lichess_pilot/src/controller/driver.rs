//! Fixed-cadence driver for the controller.

use std::future::Future;
use std::io::Write;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, instrument, warn};

use super::events::StatusWriter;
use super::game_loop::{ControllerError, CycleStep, GameLoopController};
use crate::game::GameOutcome;

/// Why the driver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// A terminal game status was observed.
    Finished(GameOutcome),
    /// The shutdown future completed first.
    Cancelled,
}

/// Runs cycles on a fixed cadence until the game ends or `shutdown` resolves.
///
/// `shutdown` is checked before each cycle and during the sleep, never while
/// a cycle runs. Status lines queued by a cycle are written once it returns.
/// The interval is slept after every non-terminal cycle; there is no backoff.
#[instrument(skip(controller, status, shutdown), fields(poll_interval_ms = poll_interval.as_millis() as u64))]
pub async fn run_loop<W, F>(
    controller: &mut GameLoopController,
    status: &mut StatusWriter<W>,
    poll_interval: Duration,
    shutdown: F,
) -> Result<LoopExit, ControllerError>
where
    W: Write,
    F: Future<Output = ()>,
{
    info!("Starting game loop");
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!("Shutdown requested");
                return Ok(LoopExit::Cancelled);
            }
            _ = std::future::ready(()) => {}
        }

        let step = controller.cycle().await;
        flush_status(status);
        if let CycleStep::Terminated(outcome) = step? {
            info!(%outcome, "Game loop finished");
            return Ok(LoopExit::Finished(outcome));
        }

        tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!("Shutdown requested");
                return Ok(LoopExit::Cancelled);
            }
            _ = sleep(poll_interval) => {}
        }
    }
}

fn flush_status<W: Write>(status: &mut StatusWriter<W>) {
    if let Err(e) = status.flush() {
        warn!(error = %e, "Failed to write status lines");
    }
}
