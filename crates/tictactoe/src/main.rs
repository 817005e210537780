//! tictactoe - terminal tic-tac-toe with a running score.

use anyhow::{Context, Result};
use clap::Parser;
use tictactoe::{Cli, Settings, init_file_logging, run_tui};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = Settings::resolve(&cli).context("Failed to load settings")?;

    init_file_logging(settings.log_file())?;
    info!(?settings, "Starting tictactoe");

    run_tui(settings).await
}
