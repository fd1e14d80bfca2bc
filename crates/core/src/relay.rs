//! Stateless relay between the console and a completion model.
//!
//! Every call sends the system prompt and the current user text only. No
//! earlier turns are replayed.
use crate::completion::{ChatMessage, CompletionError, CompletionModel, SenderType};
use crate::config::Config;
use crate::credential::Credential;
use crate::provider::openai::OpenAIBaseModel;
use tracing::{debug, instrument, warn};

pub struct ChatRelay {
    model: Box<dyn CompletionModel>,
    system_prompt: String,
}

impl ChatRelay {
    pub fn new(model: Box<dyn CompletionModel>, system_prompt: impl Into<String>) -> Self {
        Self {
            model,
            system_prompt: system_prompt.into(),
        }
    }

    /// Relay backed by the OpenAI compatible endpoint in `config`.
    pub fn from_config(config: &Config, credential: &Credential) -> Self {
        let model = OpenAIBaseModel::new(config, credential);
        Self::new(Box::new(model), config.system_prompt.clone())
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// The `[system, user]` message pair sent for `prompt_text`.
    pub fn build_request(&self, prompt_text: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::new(SenderType::System, self.system_prompt.as_str()),
            ChatMessage::new(SenderType::User, prompt_text),
        ]
    }

    /// Sends one prompt and returns the reply text of the first choice.
    #[instrument(skip_all, fields(model = self.model.name(), prompt_len = prompt_text.len()))]
    pub async fn complete(&self, prompt_text: &str) -> Result<String, CompletionError> {
        let messages = self.build_request(prompt_text);
        let result = self.model.complete(&messages).await;
        match &result {
            Ok(text) => debug!(reply_len = text.len(), "completion succeeded"),
            Err(CompletionError::Provider(detail)) => warn!(%detail, "provider api error"),
            Err(CompletionError::Unexpected(detail)) => warn!(%detail, "unexpected completion error"),
        }
        result
    }
}
