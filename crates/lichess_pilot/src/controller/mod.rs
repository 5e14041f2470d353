//! Game loop controller: polling, change detection, turn handling.

mod collaborators;
mod driver;
mod events;
mod game_loop;
mod state;

pub use collaborators::{BoardRenderer, GameStateSource, MoveRecommender, MoveSubmitter};
pub use driver::{LoopExit, run_loop};
pub use events::{LoopEvent, StatusPrinter, StatusWriter};
pub use game_loop::{ControllerError, CycleStep, GameLoopController};
pub use state::{ControllerSettings, ControllerState, Phase};
