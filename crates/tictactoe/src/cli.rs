//! Command-line interface for tictactoe.

use std::path::PathBuf;

use clap::Parser;

use crate::config::PlayMode;

/// Tic-tac-toe in the terminal, against a friend or a random opponent
#[derive(Parser, Debug)]
#[command(name = "tictactoe")]
#[command(about = "Terminal tic-tac-toe with a running score", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Who plays O (overrides the settings file)
    #[arg(short, long, value_enum)]
    pub mode: Option<PlayMode>,

    /// Milliseconds before the computer plays
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Seed for the computer's random choices
    #[arg(long)]
    pub seed: Option<u64>,

    /// File that receives log output
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
