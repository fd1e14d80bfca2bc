use console::{Style, StyledObject};
use taiwa_core::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatMessageType {
    Assistant,
    Footer,
    Error,
}

pub fn style_chat_text(text: &str, style: ChatMessageType) -> StyledObject<&str> {
    let style_obj = match style {
        ChatMessageType::Assistant => Style::new().green().bold(),
        ChatMessageType::Footer => Style::new().white().dim(),
        ChatMessageType::Error => Style::new().red().bold(),
    };
    style_obj.apply_to(text)
}

pub fn greeting(config: &Config) -> String {
    let text = format!(
        "{}との対話を開始します。'{}' と入力すると終了します。",
        config.labels.assistant, config.exit_word
    );
    style_chat_text(&text, ChatMessageType::Footer).to_string()
}

pub fn farewell() -> &'static str {
    "対話を終了します。"
}

pub fn not_configured(api_key_env: &str) -> String {
    let text = format!(
        "エラー: APIキーが設定されていません。.env ファイルか環境変数 {api_key_env} にAPIキーを設定してください。"
    );
    style_chat_text(&text, ChatMessageType::Error).to_string()
}

/// Startup line reporting whether the api key was found.
pub fn credential_status(api_key_env: &str, loaded: bool) -> String {
    if loaded {
        "OpenAI API Key loaded successfully.".to_string()
    } else {
        let text = format!(
            "Error: {api_key_env} environment variable not found. Please check your .env file."
        );
        style_chat_text(&text, ChatMessageType::Error).to_string()
    }
}

pub fn format_reply(label: &str, text: &str) -> String {
    let label = format!("{label}:");
    format!(
        "{} {text}",
        style_chat_text(&label, ChatMessageType::Assistant)
    )
}
