//! Best-effort alert delivery to a Telegram bot.
//!
//! Missing configuration is a silent no-op. Callers log and drop errors.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Bot API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Destination of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// A lead replied.
    Responses,
    /// A reply draft was generated.
    Drafts,
}

/// Backslash-escapes the characters legacy Telegram Markdown treats as entity
/// delimiters, so interpolated values render literally.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, channel: Channel, text: &str) -> Result<(), NotifyError>;
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

pub struct TelegramNotifier {
    http: Client,
    bot_token: Option<String>,
    responses_chat_id: Option<String>,
    drafts_chat_id: Option<String>,
}

impl TelegramNotifier {
    pub fn new(
        http: Client,
        bot_token: Option<String>,
        responses_chat_id: Option<String>,
        drafts_chat_id: Option<String>,
    ) -> Self {
        Self {
            http,
            bot_token,
            responses_chat_id,
            drafts_chat_id,
        }
    }

    fn chat_id(&self, channel: Channel) -> Option<&str> {
        match channel {
            Channel::Responses => self.responses_chat_id.as_deref(),
            Channel::Drafts => self.drafts_chat_id.as_deref(),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, channel: Channel, text: &str) -> Result<(), NotifyError> {
        let (Some(token), Some(chat_id)) = (self.bot_token.as_deref(), self.chat_id(channel))
        else {
            debug!("Telegram not configured for {channel:?}, skipping alert");
            return Ok(());
        };

        let response = self
            .http
            .post(format!("{TELEGRAM_API_BASE}/bot{token}/sendMessage"))
            .json(&SendMessage {
                chat_id,
                text,
                parse_mode: "Markdown",
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }
}
