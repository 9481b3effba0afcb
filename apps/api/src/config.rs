use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Only `DATABASE_URL` is required; every external integration degrades when its
/// credentials are absent.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Raw service-account JSON blob. Parsed lazily at sync time so a broken
    /// credential surfaces as an auth failure of the batch, not a boot failure.
    pub google_service_account_json: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub telegram_bot_token: Option<String>,
    pub telegram_responses_chat_id: Option<String>,
    pub telegram_drafts_chat_id: Option<String>,
    pub sheet_range: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            google_service_account_json: optional_env("GOOGLE_SERVICE_ACCOUNT_JSON"),
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_model: optional_env("OPENAI_MODEL")
                .unwrap_or_else(|| crate::llm_client::DEFAULT_MODEL.to_string()),
            telegram_bot_token: optional_env("TELEGRAM_BOT_TOKEN"),
            telegram_responses_chat_id: optional_env("TELEGRAM_RESPONSES_CHAT_ID"),
            telegram_drafts_chat_id: optional_env("TELEGRAM_DRAFTS_CHAT_ID"),
            sheet_range: optional_env("SHEET_RANGE").unwrap_or_else(|| "A:Z".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Blank values count as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
