//! taiwa cli definition and entrypoint.
mod chat;
pub mod ux;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use taiwa_core::config::{Config, get_config};
use taiwa_core::credential::load_env_file;

use crate::log::setup_logging;

/// taiwa - chat with an OpenAI model from the terminal.
///
/// Type a message and press enter. Type the exit word (default `終了`) to quit.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Model to use, overrides the config file.
    #[arg(short, long)]
    model: Option<String>,

    /// Path to the config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Load environment variables from this file instead of `./.env`.
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Write debug logs to the data directory.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn apply_overrides(&self, mut config: Config) -> Config {
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        config
    }
}

/// Runs the main CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        setup_logging().context("Failed to set up logging")?;
    }

    let config = get_config(cli.config.clone()).context("Failed to load configuration")?;
    let config = cli.apply_overrides(config);

    load_env_file(cli.env_file.as_deref()).context("Failed to load env file")?;

    chat::execute(&config).await
}
