use crate::cli::ux;
use anyhow::{Context, Result};
use std::io::{Write, stdout};
use taiwa_core::config::Config;
use taiwa_core::credential::Credential;
use taiwa_core::get_data_dir;
use taiwa_core::relay::ChatRelay;

mod repl;
mod test_utils;

use repl::{ReadlineSource, history_path};

/// Executes the chat session, starting an interactive REPL.
pub async fn execute(config: &Config) -> Result<()> {
    let mut stdout = stdout();
    let credential = Credential::from_env(&config.api_key_env);
    writeln!(
        stdout,
        "{}",
        ux::credential_status(&config.api_key_env, credential.is_some())
    )?;

    let relay = credential.map(|credential| ChatRelay::from_config(config, &credential));
    let history = get_data_dir().ok().map(|dir| history_path(&dir));
    let mut input = ReadlineSource::new(history).context("Failed to initialize terminal input")?;

    repl::run(relay.as_ref(), config, &mut input, &mut stdout).await?;
    Ok(())
}
