//! Terminal tic-tac-toe.
//!
//! # Architecture
//!
//! - **Session**: wraps a [`tictactoe_engine::GameEngine`], owns the play
//!   mode, and schedules the computer's delayed move in single-player mode
//! - **Config**: TOML settings with command-line overrides
//! - **TUI**: ratatui front end that renders the session and turns keys
//!   into moves

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cli;
mod config;
mod logging;
mod session;
mod tui;

pub use cli::Cli;
pub use config::{ConfigError, PlayMode, Settings};
pub use logging::init_file_logging;
pub use session::{COMPUTER_MARK, Session, SessionEvent};
pub use tui::run_tui;
