use std::{
    fs::{self, File},
    io::Write,
    path::PathBuf,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::assets::{get_config_dir, get_default_config};

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_SYSTEM_PROMPT: &str = "あなたは親切なAIアシスタントです。";
pub const DEFAULT_EXIT_WORD: &str = "終了";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("File system error: {0}")]
    IO(#[from] std::io::Error),
    #[error("YAML parsing error: {0}")]
    YAMLError(#[from] serde_yaml::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Display names used on the console.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Labels {
    pub user: String,
    pub assistant: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            user: "あなた".to_string(),
            assistant: "ChatGPT".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    pub model: String,
    pub base_url: String,
    pub api_key_env: String,
    pub system_prompt: String,
    pub exit_word: String,
    pub labels: Labels,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            exit_word: DEFAULT_EXIT_WORD.to_string(),
            labels: Labels::default(),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
struct RawConfig {
    model: Option<String>,
    base_url: Option<String>,
    api_key_env: Option<String>,
    system_prompt: Option<String>,
    exit_word: Option<String>,
    #[serde(default)]
    labels: RawLabels,
}

#[derive(Deserialize, Debug, Default)]
struct RawLabels {
    user: Option<String>,
    assistant: Option<String>,
}

impl RawConfig {
    #[instrument]
    fn to_config(&self) -> Result<Config, ConfigError> {
        let defaults = Config::default();

        let required = |key: &str, value: &Option<String>, default: String| {
            match value.as_deref().map(str::trim) {
                None => Ok(default),
                Some("") => Err(ConfigError::Config(format!("'{key}' must not be empty"))),
                Some(v) => Ok(v.to_string()),
            }
        };

        let base_url = required("base_url", &self.base_url, defaults.base_url)?;

        Ok(Config {
            model: required("model", &self.model, defaults.model)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key_env: required("api_key_env", &self.api_key_env, defaults.api_key_env)?,
            // An empty system prompt is allowed
            system_prompt: self
                .system_prompt
                .clone()
                .unwrap_or(defaults.system_prompt),
            exit_word: required("exit_word", &self.exit_word, defaults.exit_word)?,
            labels: Labels {
                user: self.labels.user.clone().unwrap_or(defaults.labels.user),
                assistant: self
                    .labels
                    .assistant
                    .clone()
                    .unwrap_or(defaults.labels.assistant),
            },
        })
    }
}

#[instrument(skip(config_path))]
pub fn create_or_get_config_file(
    config_path: Option<PathBuf>,
) -> Result<(bool, PathBuf), ConfigError> {
    let actual_path = config_path.unwrap_or_else(|| get_config_dir().join("taiwa.yml"));

    let parent_dir = actual_path.parent().ok_or_else(|| {
        ConfigError::IO(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Config path has no parent directory",
        ))
    })?;

    if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
        fs::create_dir_all(parent_dir)?;
    }

    if actual_path.exists() {
        Ok((true, actual_path))
    } else {
        File::create(&actual_path)?.write_all(get_default_config().as_bytes())?;
        Ok((false, actual_path))
    }
}

/// Loads the configuration, writing the default file first if none exists.
#[instrument(skip(config_path))]
pub fn get_config(config_path: Option<PathBuf>) -> Result<Config, ConfigError> {
    let (_, config_file) = create_or_get_config_file(config_path)?;
    let content = fs::read_to_string(&config_file)?;
    parse_config(&content)
}

fn parse_config(content: &str) -> Result<Config, ConfigError> {
    // A file with only comments is an empty document
    let value: serde_yaml::Value = serde_yaml::from_str(content)?;
    let raw: RawConfig = if value.is_null() {
        RawConfig::default()
    } else {
        serde_yaml::from_value(value)?
    };
    raw.to_config()
}
