//! Recording stubs for the controller's collaborators.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use lichess_pilot::{
    BoardRenderer, Color, ControllerSettings, EngineError, GameLoopController, GameSnapshot,
    GameStateSource, GameStatus, LoopEvent, MoveRecommender, MoveSubmitter, NowPlaying,
    Orientation, RecommendedMove, RenderError, Speed, TransportError,
};
use tokio::sync::mpsc;

pub const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
pub const AFTER_E4: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";
pub const AFTER_E4_E5: &str = "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2";

/// Everything the stubs were asked to do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Fetch,
    Render {
        position: String,
        highlight: Option<String>,
        flipped: bool,
    },
    Refresh,
    Recommend {
        position: String,
        budget: Duration,
    },
    Submit {
        game_id: String,
        uci: String,
    },
}

pub type Log = Arc<Mutex<Vec<Call>>>;

pub fn calls(log: &Log) -> Vec<Call> {
    log.lock().expect("log poisoned").clone()
}

pub fn count(log: &Log, pred: impl Fn(&Call) -> bool) -> usize {
    calls(log).iter().filter(|c| pred(c)).count()
}

/// One scripted fetch result.
pub enum Fetch {
    Snapshot(GameSnapshot),
    Playing(NowPlaying),
    Nothing,
    Fail,
}

/// Replays fetch results; returns `None` once the script runs out.
pub struct ScriptedSource {
    log: Log,
    script: VecDeque<Fetch>,
}

#[async_trait::async_trait]
impl GameStateSource for ScriptedSource {
    async fn fetch_current(&mut self) -> Result<Option<GameSnapshot>, TransportError> {
        self.log.lock().expect("log poisoned").push(Call::Fetch);
        match self.script.pop_front() {
            Some(Fetch::Snapshot(snapshot)) => Ok(Some(snapshot)),
            Some(Fetch::Playing(playing)) => Ok(playing.current()),
            Some(Fetch::Fail) => Err(TransportError::new("connection reset")),
            Some(Fetch::Nothing) | None => Ok(None),
        }
    }
}

/// What the engine stub answers.
#[derive(Clone)]
pub enum Reply {
    Move(&'static str),
    NoMove,
    Crash,
}

pub struct StubRecommender {
    log: Log,
    reply: Reply,
}

#[async_trait::async_trait]
impl MoveRecommender for StubRecommender {
    async fn recommend(
        &mut self,
        position: &str,
        budget: Duration,
    ) -> Result<Option<RecommendedMove>, EngineError> {
        self.log.lock().expect("log poisoned").push(Call::Recommend {
            position: position.to_string(),
            budget,
        });
        match self.reply {
            Reply::Move(uci) => Ok(Some(RecommendedMove::new(uci, "stub analysis"))),
            Reply::NoMove => Ok(None),
            Reply::Crash => Err(EngineError::new("engine vanished")),
        }
    }
}

pub struct RecordingRenderer {
    log: Log,
    fail: bool,
}

impl BoardRenderer for RecordingRenderer {
    fn render(
        &mut self,
        position: &str,
        highlight: Option<&RecommendedMove>,
        orientation: Orientation,
    ) -> Result<(), RenderError> {
        if self.fail {
            return Err(RenderError::new("display gone"));
        }
        self.log.lock().expect("log poisoned").push(Call::Render {
            position: position.to_string(),
            highlight: highlight.map(|m| m.uci().clone()),
            flipped: orientation.flipped(),
        });
        Ok(())
    }

    fn refresh(&mut self) -> Result<(), RenderError> {
        self.log.lock().expect("log poisoned").push(Call::Refresh);
        Ok(())
    }
}

pub struct RecordingSubmitter {
    log: Log,
    fail: bool,
    delay: Duration,
}

#[async_trait::async_trait]
impl MoveSubmitter for RecordingSubmitter {
    async fn submit(&mut self, game_id: &str, uci: &str) -> Result<(), TransportError> {
        self.log.lock().expect("log poisoned").push(Call::Submit {
            game_id: game_id.to_string(),
            uci: uci.to_string(),
        });
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            Err(TransportError::http(400, r#"{"error":"Not your turn"}"#))
        } else {
            Ok(())
        }
    }
}

/// Builder for a controller wired to stubs.
pub struct Harness {
    pub script: Vec<Fetch>,
    pub reply: Reply,
    pub render_fails: bool,
    pub submit_fails: bool,
    pub submit_delay: Duration,
    pub renderer: Option<Box<dyn BoardRenderer>>,
    pub settings: ControllerSettings,
}

impl Default for Harness {
    fn default() -> Self {
        Self {
            script: Vec::new(),
            reply: Reply::Move("e7e5"),
            render_fails: false,
            submit_fails: false,
            submit_delay: Duration::ZERO,
            renderer: None,
            settings: ControllerSettings::default(),
        }
    }
}

impl Harness {
    pub fn script(script: Vec<Fetch>) -> Self {
        Self {
            script,
            ..Self::default()
        }
    }

    pub fn build(self) -> (GameLoopController, Log, mpsc::UnboundedReceiver<LoopEvent>) {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let controller = GameLoopController::new(
            Box::new(ScriptedSource {
                log: log.clone(),
                script: self.script.into(),
            }),
            Box::new(StubRecommender {
                log: log.clone(),
                reply: self.reply,
            }),
            self.renderer.unwrap_or_else(|| {
                Box::new(RecordingRenderer {
                    log: log.clone(),
                    fail: self.render_fails,
                }) as Box<dyn BoardRenderer>
            }),
            Box::new(RecordingSubmitter {
                log: log.clone(),
                fail: self.submit_fails,
                delay: self.submit_delay,
            }),
            self.settings,
            event_tx,
        );
        (controller, log, event_rx)
    }
}

pub fn snapshot(
    position: &str,
    is_my_turn: bool,
    color: Color,
    speed: Speed,
    status: GameStatus,
    winner: Option<Color>,
) -> GameSnapshot {
    GameSnapshot::new(
        position.to_string(),
        "abcd1234".to_string(),
        is_my_turn,
        color,
        speed,
        status,
        winner,
    )
}

/// A started game where it is our move.
pub fn my_turn(position: &str, color: Color, speed: Speed) -> GameSnapshot {
    snapshot(position, true, color, speed, GameStatus::Started, None)
}

pub fn drain(rx: &mut mpsc::UnboundedReceiver<LoopEvent>) -> Vec<LoopEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// `nowPlaying` body with a single game.
pub fn now_playing(json_game: serde_json::Value) -> NowPlaying {
    serde_json::from_value(serde_json::json!({ "nowPlaying": [json_game] }))
        .expect("valid nowPlaying fixture")
}

/// In-memory stream that several writers can share.
#[derive(Clone, Default)]
pub struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().expect("buffer poisoned").clone()).expect("utf8 output")
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().expect("buffer poisoned").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
