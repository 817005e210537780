//! Session configuration: TOML file with command-line overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::cli::Cli;

/// Who plays mark O.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum PlayMode {
    /// O is played automatically after a delay.
    #[default]
    SinglePlayer,
    /// Both marks come from the keyboard.
    TwoPlayer,
}

impl PlayMode {
    /// Returns the display label for this mode.
    pub fn label(self) -> &'static str {
        match self {
            Self::SinglePlayer => "Single player",
            Self::TwoPlayer => "Two players",
        }
    }

    /// Switches to the other mode.
    pub fn toggle(self) -> Self {
        match self {
            Self::SinglePlayer => Self::TwoPlayer,
            Self::TwoPlayer => Self::SinglePlayer,
        }
    }
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_log_file() -> PathBuf {
    PathBuf::from("tictactoe.log")
}

/// Settings for one play session.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Single- or two-player.
    mode: PlayMode,

    /// Pause before the automated move, in milliseconds.
    computer_delay_ms: u64,

    /// Seed for the automated player. Random when absent.
    seed: Option<u64>,

    /// Where log output goes while the terminal UI owns the screen.
    log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: PlayMode::default(),
            computer_delay_ms: default_delay_ms(),
            seed: None,
            log_file: default_log_file(),
        }
    }
}

impl Settings {
    /// Parses settings from TOML text. Missing keys take defaults.
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Loads settings from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let settings = Self::from_toml_str(&content)?;
        info!(mode = %settings.mode, delay_ms = settings.computer_delay_ms, "Config loaded");
        Ok(settings)
    }

    /// Resolves settings from the command line: config file first, then
    /// flag overrides.
    #[instrument(skip(cli))]
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let base = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(base.apply_overrides(cli))
    }

    /// Applies any flags given on the command line.
    pub fn apply_overrides(self, cli: &Cli) -> Self {
        let mut settings = self;
        if let Some(mode) = cli.mode {
            settings = settings.with_mode(mode);
        }
        if let Some(delay) = cli.delay_ms {
            settings = settings.with_computer_delay_ms(delay);
        }
        if let Some(seed) = cli.seed {
            settings = settings.with_seed(Some(seed));
        }
        if let Some(path) = &cli.log_file {
            settings = settings.with_log_file(path.clone());
        }
        settings
    }

    /// The automated move delay.
    pub fn computer_delay(&self) -> Duration {
        Duration::from_millis(self.computer_delay_ms)
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
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
