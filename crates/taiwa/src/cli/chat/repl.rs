use crate::cli::ux::{self, GenerationSpinner};
use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::Write;
use std::path::{Path, PathBuf};
use taiwa_core::config::Config;
use taiwa_core::relay::ChatRelay;
use tracing::{debug, info, warn};

/// Where the REPL reads user input from.
pub trait LineSource {
    /// Shows `prompt` and reads one line. `None` means input has ended.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Terminal input with line editing. History is kept in `history_file`
/// across sessions when one is given.
pub struct ReadlineSource {
    editor: DefaultEditor,
    history_file: Option<PathBuf>,
}

impl ReadlineSource {
    pub fn new(history_file: Option<PathBuf>) -> Result<Self> {
        let mut editor = DefaultEditor::new()?;
        if let Some(path) = &history_file
            && let Err(e) = editor.load_history(path)
        {
            // Missing on first run
            debug!(?path, error = %e, "no history loaded");
        }
        Ok(Self {
            editor,
            history_file,
        })
    }
}

impl Drop for ReadlineSource {
    fn drop(&mut self) {
        if let Some(path) = &self.history_file
            && let Err(e) = self.editor.save_history(path)
        {
            warn!(?path, error = %e, "failed to save history");
        }
    }
}

/// History file inside the data directory.
pub fn history_path(data_dir: &Path) -> PathBuf {
    data_dir.join("history.txt")
}

impl LineSource for ReadlineSource {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.as_str())?;
                }
                Ok(Some(line))
            }
            // Ctrl-C and Ctrl-D end the session like the exit word
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The user typed the exit word or closed the input.
    UserQuit,
    /// No api key is configured.
    NotConfigured,
}

fn is_exit_word(line: &str, exit_word: &str) -> bool {
    line.trim().to_lowercase() == exit_word.to_lowercase()
}

/// Runs the read, relay, print loop until the user quits.
///
/// Without a relay the first non-exit input reports the missing api key and
/// ends the loop. No request is ever sent in that case.
pub async fn run<I, W>(
    relay: Option<&ChatRelay>,
    config: &Config,
    input: &mut I,
    out: &mut W,
) -> Result<ExitReason>
where
    I: LineSource,
    W: Write,
{
    writeln!(out, "{}", ux::greeting(config))?;
    let prompt = format!("{}: ", config.labels.user);

    loop {
        out.flush()?;
        let Some(line) = input.read_line(&prompt)? else {
            writeln!(out, "{}", ux::farewell())?;
            return Ok(ExitReason::UserQuit);
        };

        if is_exit_word(&line, &config.exit_word) {
            writeln!(out, "{}", ux::farewell())?;
            return Ok(ExitReason::UserQuit);
        }

        let Some(relay) = relay else {
            writeln!(out, "{}", ux::not_configured(&config.api_key_env))?;
            info!("api key missing, ending session");
            return Ok(ExitReason::NotConfigured);
        };

        if line.trim().is_empty() {
            continue;
        }

        let spinner =
            GenerationSpinner::new(format!("{} が応答を生成しています...", relay.model_name()));
        let result = relay.complete(&line).await;
        spinner.clear();

        match result {
            Ok(reply) if reply.is_empty() => debug!("empty reply"),
            Ok(reply) => writeln!(out, "{}", ux::format_reply(&config.labels.assistant, &reply))?,
            Err(err) => writeln!(out, "{err}")?,
        }
    }
}
