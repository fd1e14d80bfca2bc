use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenderType {
    System,
    User,
}

impl From<SenderType> for String {
    fn from(val: SenderType) -> Self {
        val.as_str().into()
    }
}

impl SenderType {
    pub fn as_str(&self) -> &'static str {
        match &self {
            SenderType::System => "system",
            SenderType::User => "user",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub text: String,
    pub sender: SenderType,
}

impl ChatMessage {
    pub fn new(sender: SenderType, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender,
        }
    }
}

/// Failure of a single completion call. Display yields the message shown to
/// the user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompletionError {
    /// The provider answered with an error object.
    #[error("OpenAI APIエラーが発生しました: {0}")]
    Provider(String),
    /// Transport failures, malformed payloads and anything else.
    #[error("予期せぬエラーが発生しました: {0}")]
    Unexpected(String),
}

/// A chat completion backend. One request, one reply, no streaming.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    fn name(&self) -> &str;
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError>;
}
