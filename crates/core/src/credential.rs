//! Api key loading.
//!
//! The key is read once at startup from the process environment, which may
//! first be populated from a `.env` file. Unset, blank and placeholder values
//! all mean the key is not configured.
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};

/// Value shipped in setup instructions, never a real key.
pub const PLACEHOLDER_API_KEY: &str = "あなたのOpenAI APIキーをここに貼り付けてください";

#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Returns `None` for any value that does not look like a configured key.
    pub fn parse(raw: Option<String>) -> Option<Self> {
        let raw = raw?;
        let key = raw.trim();
        if key.is_empty() || key == PLACEHOLDER_API_KEY {
            return None;
        }
        Some(Self(key.to_string()))
    }

    /// Reads the key from the environment variable `var`.
    #[instrument]
    pub fn from_env(var: &str) -> Option<Self> {
        let credential = Self::parse(std::env::var(var).ok());
        match &credential {
            Some(_) => debug!(var, "api key found"),
            None => warn!(var, "api key is not configured"),
        }
        credential
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Loads variables from a `.env` file without overriding the ones already set.
///
/// With no explicit path, a `.env` in the working directory (or its parents)
/// is used if present. An explicit path must exist.
#[instrument]
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>, dotenvy::Error> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)?;
            debug!(?path, "loaded env file");
            Ok(Some(path.to_path_buf()))
        }
        None => match dotenvy::dotenv() {
            Ok(path) => {
                debug!(?path, "loaded env file");
                Ok(Some(path))
            }
            Err(e) if e.not_found() => Ok(None),
            Err(e) => Err(e),
        },
    }
}
