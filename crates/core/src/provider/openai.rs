use super::openai_types::{ChatCompletionRequest, ChatCompletionResponse, RequestMessage};
use crate::completion::{ChatMessage, CompletionError, CompletionModel};
use crate::config::Config;
use crate::credential::Credential;
use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::Client as OpenAIClient;
use async_trait::async_trait;
use backoff::ExponentialBackoff;
use std::time::Duration;
use tracing::{debug, instrument};

/// A policy that gives up after the first attempt. Rate limits and server
/// errors surface as provider errors instead of being retried.
fn no_retry() -> ExponentialBackoff {
    ExponentialBackoff {
        max_elapsed_time: Some(Duration::ZERO),
        ..Default::default()
    }
}

/// Chat completions against an OpenAI compatible endpoint.
pub struct OpenAIBaseModel {
    model: String,
    client: OpenAIClient<OpenAIConfig>,
}

impl OpenAIBaseModel {
    pub fn new(config: &Config, credential: &Credential) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(credential.expose())
            .with_api_base(config.base_url.clone());

        Self {
            model: config.model.clone(),
            client: OpenAIClient::with_config(openai_config).with_backoff(no_retry()),
        }
    }

    fn to_request(&self, messages: &[ChatMessage]) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: messages
                .iter()
                .map(|msg| RequestMessage {
                    role: msg.sender.as_str(),
                    content: msg.text.clone(),
                })
                .collect(),
        }
    }
}

impl From<OpenAIError> for CompletionError {
    fn from(err: OpenAIError) -> Self {
        match err {
            OpenAIError::ApiError(api_error) => CompletionError::Provider(api_error.to_string()),
            other => CompletionError::Unexpected(other.to_string()),
        }
    }
}

#[async_trait]
impl CompletionModel for OpenAIBaseModel {
    fn name(&self) -> &str {
        &self.model
    }

    #[instrument(skip_all, fields(model = %self.model))]
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        let request = self.to_request(messages);
        let response: ChatCompletionResponse = self.client.chat().create_byot(request).await?;

        let choice = response.choices.into_iter().next().ok_or_else(|| {
            CompletionError::Unexpected("response contained no choices".to_string())
        })?;
        debug!(finish_reason = ?choice.finish_reason, "completion received");

        Ok(choice.message.content.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::SenderType;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, header, method, path},
    };

    fn create_mock_config(server_url: &str) -> Config {
        Config {
            model: "test-model".to_string(),
            base_url: server_url.to_string(),
            ..Config::default()
        }
    }

    fn test_credential() -> Credential {
        Credential::parse(Some("sk-test".to_string())).unwrap()
    }

    fn prompt() -> Vec<ChatMessage> {
        vec![
            ChatMessage::new(SenderType::System, "sys"),
            ChatMessage::new(SenderType::User, "hi"),
        ]
    }

    fn completion_body(content: serde_json::Value) -> serde_json::Value {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1684,
            "model": "test-model",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 9, "completion_tokens": 1, "total_tokens": 10}
        })
    }

    async fn mount(server: &MockServer, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(response)
            .mount(server)
            .await;
    }

    #[test]
    fn test_openai_new_model() {
        let model = OpenAIBaseModel::new(&create_mock_config("http://localhost"), &test_credential());
        assert_eq!(model.name(), "test-model");
    }

    #[tokio::test]
    async fn test_openai_complete_sends_model_and_messages() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_json(json!({
                "model": "test-model",
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "hi"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(json!("hello"))))
            .expect(1)
            .mount(&server)
            .await;

        let model = OpenAIBaseModel::new(&create_mock_config(&server.uri()), &test_credential());
        let text = model.complete(&prompt()).await.unwrap();

        assert_eq!(text, "hello");
    }

    #[tokio::test]
    async fn test_openai_complete_null_content_is_empty_text() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(200).set_body_json(completion_body(serde_json::Value::Null)),
        )
        .await;

        let model = OpenAIBaseModel::new(&create_mock_config(&server.uri()), &test_credential());
        assert_eq!(model.complete(&prompt()).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_openai_complete_no_choices_is_unexpected() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({"choices": []})),
        )
        .await;

        let model = OpenAIBaseModel::new(&create_mock_config(&server.uri()), &test_credential());
        let err = model.complete(&prompt()).await.unwrap_err();

        assert_eq!(
            err,
            CompletionError::Unexpected("response contained no choices".to_string())
        );
    }

    #[tokio::test]
    async fn test_openai_complete_api_error_is_provider_error() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "message": "The model `nope` does not exist",
                    "type": "invalid_request_error",
                    "param": "model",
                    "code": "model_not_found"
                }
            })),
        )
        .await;

        let model = OpenAIBaseModel::new(&create_mock_config(&server.uri()), &test_credential());
        let err = model.complete(&prompt()).await.unwrap_err();

        match err {
            CompletionError::Provider(detail) => {
                assert!(detail.contains("The model `nope` does not exist"))
            }
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    async fn assert_single_attempt_provider_error(status: u16, error_type: &str) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": {
                    "message": format!("status {status}"),
                    "type": error_type,
                    "param": null,
                    "code": null
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let model = OpenAIBaseModel::new(&create_mock_config(&server.uri()), &test_credential());
        let result = tokio::time::timeout(Duration::from_secs(10), model.complete(&prompt()))
            .await
            .expect("completion should not be retried");

        match result {
            Err(CompletionError::Provider(detail)) => {
                assert!(detail.contains(&format!("status {status}")))
            }
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_openai_complete_rate_limit_is_not_retried() {
        assert_single_attempt_provider_error(429, "requests").await;
    }

    #[tokio::test]
    async fn test_openai_complete_server_error_is_not_retried() {
        assert_single_attempt_provider_error(500, "server_error").await;
    }

    #[tokio::test]
    async fn test_openai_complete_malformed_body_is_unexpected() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(200).set_body_raw("not json", "application/json"),
        )
        .await;

        let model = OpenAIBaseModel::new(&create_mock_config(&server.uri()), &test_credential());
        let err = model.complete(&prompt()).await.unwrap_err();

        assert!(matches!(err, CompletionError::Unexpected(_)));
    }

    #[tokio::test]
    async fn test_openai_complete_connection_refused_is_unexpected() {
        // Reserve a free port, then release it so nothing is listening
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let server_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let model = OpenAIBaseModel::new(&create_mock_config(&server_url), &test_credential());
        let err = model.complete(&prompt()).await.unwrap_err();

        assert!(matches!(err, CompletionError::Unexpected(_)));
    }
}
