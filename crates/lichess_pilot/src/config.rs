//! Runtime configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::controller::ControllerSettings;
use crate::game::TimeBudget;

/// Environment variables consulted for the API token, in order.
pub const TOKEN_VARS: [&str; 2] = ["LICHESS_API_KEY", "lichess_api_key"];

/// Which board renderer to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// Colored text board on stdout.
    #[default]
    Terminal,
    /// SVG file rewritten on every render.
    Svg,
}

/// Settings for a pilot session.
///
/// Every field has a default, so a config file only lists what it changes.
#[derive(Clone, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct PilotConfig {
    /// Lichess server URL.
    base_url: String,

    /// Personal API token with board play scope.
    #[serde(skip_serializing)]
    #[setters(strip_option)]
    api_token: Option<String>,

    /// UCI engine binary.
    engine_path: PathBuf,

    /// Extra arguments for the engine binary.
    engine_args: Vec<String>,

    /// Delay between polls.
    poll_interval_ms: u64,

    /// Engine budget for bullet and blitz.
    fast_think_ms: u64,

    /// Engine budget for slower games.
    slow_think_ms: u64,

    /// Extra time allowed for the engine beyond its budget.
    engine_grace_ms: u64,

    /// Redraw the board every this many distinct positions.
    refresh_every: u64,

    /// Board renderer.
    renderer: RendererKind,

    /// Output file for the SVG renderer.
    svg_path: PathBuf,
}

impl Default for PilotConfig {
    fn default() -> Self {
        Self {
            base_url: "https://lichess.org".to_string(),
            api_token: None,
            engine_path: PathBuf::from("stockfish"),
            engine_args: Vec::new(),
            poll_interval_ms: 200,
            fast_think_ms: 300,
            slow_think_ms: 2000,
            engine_grace_ms: 5000,
            refresh_every: 10,
            renderer: RendererKind::Terminal,
            svg_path: PathBuf::from("chess_board.svg"),
        }
    }
}

impl std::fmt::Debug for PilotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PilotConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("engine_path", &self.engine_path)
            .field("engine_args", &self.engine_args)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("fast_think_ms", &self.fast_think_ms)
            .field("slow_think_ms", &self.slow_think_ms)
            .field("engine_grace_ms", &self.engine_grace_ms)
            .field("refresh_every", &self.refresh_every)
            .field("renderer", &self.renderer)
            .field("svg_path", &self.svg_path)
            .finish()
    }
}

impl PilotConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!("Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise starts from defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Fills the API token from the environment.
    ///
    /// `lookup` resolves a variable name; pass `|k| std::env::var(k).ok()`
    /// in production. An environment token overrides one from the file.
    #[instrument(skip_all)]
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some((var, token)) = TOKEN_VARS
            .iter()
            .find_map(|var| lookup(var).filter(|v| !v.trim().is_empty()).map(|v| (var, v)))
        {
            debug!(var, "API token taken from environment");
            self.api_token = Some(token.trim().to_string());
        }
        self
    }

    /// Checks values the loop cannot run with.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::new("poll_interval_ms must be positive".to_string()));
        }
        if self.refresh_every == 0 {
            return Err(ConfigError::new("refresh_every must be positive".to_string()));
        }
        if self.fast_think_ms == 0 || self.slow_think_ms == 0 {
            return Err(ConfigError::new("engine think times must be positive".to_string()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::new(format!(
                "base_url must be an http(s) URL, got {}",
                self.base_url
            )));
        }
        Ok(())
    }

    /// The API token, required for talking to the server.
    #[instrument(skip(self))]
    pub fn require_token(&self) -> Result<&str, ConfigError> {
        self.api_token.as_deref().ok_or_else(|| {
            ConfigError::new(format!(
                "No API token: set {} or api_token in the config file",
                TOKEN_VARS[0]
            ))
        })
    }

    /// Delay between polls.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Extra time given to the engine beyond its budget.
    pub fn engine_grace(&self) -> Duration {
        Duration::from_millis(self.engine_grace_ms)
    }

    /// Engine budgets per speed class.
    pub fn time_budget(&self) -> TimeBudget {
        TimeBudget::new(
            Duration::from_millis(self.fast_think_ms),
            Duration::from_millis(self.slow_think_ms),
        )
    }

    /// Settings handed to the controller.
    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings::new(self.time_budget(), self.refresh_every)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
