//! A mock completion provider for unit testing purposes.
use crate::completion::{ChatMessage, CompletionError, CompletionModel, SenderType};
use async_trait::async_trait;
use std::sync::Mutex;

/// A mock `CompletionModel` for use in unit tests.
///
/// Each call records the messages it received. The reply depends on the mode:
/// - `Echo`: returns the last user message prefixed with `echo: `.
/// - `Fail(err)`: returns `err`.
#[derive(Debug)]
pub struct TestProviderModel {
    mode: ResponseMode,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

#[derive(Debug, Clone)]
pub enum ResponseMode {
    Echo,
    Fail(CompletionError),
}

impl TestProviderModel {
    pub fn new(mode: ResponseMode) -> Self {
        Self {
            mode,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionModel for TestProviderModel {
    fn name(&self) -> &str {
        "test-provider"
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        match &self.mode {
            ResponseMode::Fail(err) => Err(err.clone()),
            ResponseMode::Echo => {
                let last_user = messages
                    .iter()
                    .rev()
                    .find(|m| m.sender == SenderType::User)
                    .map(|m| m.text.as_str())
                    .unwrap_or_default();
                Ok(format!("echo: {last_user}"))
            }
        }
    }
}
