//! Apps Script web-app trigger. Every failure is folded into a
//! `WebhookOutcome` so the caller can log it as the send result.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Action understood by the campaign script for an immediate run.
pub const RUN_CAMPAIGN_ACTION: &str = "runCampaignNow";

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("Erro ao acionar: {0}")]
    Status(u16),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookOutcome {
    pub success: bool,
    pub message: String,
}

impl WebhookOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: "Ação enviada com sucesso".to_string(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait CampaignWebhook: Send + Sync {
    async fn trigger(&self, web_url: &str, action: &str) -> WebhookOutcome;
}

pub struct HttpWebhook {
    http: Client,
}

impl HttpWebhook {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    async fn call(&self, web_url: &str, action: &str) -> Result<(), WebhookError> {
        let response = self
            .http
            .get(web_url)
            .query(&[("action", action)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(WebhookError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}

#[async_trait]
impl CampaignWebhook for HttpWebhook {
    async fn trigger(&self, web_url: &str, action: &str) -> WebhookOutcome {
        match self.call(web_url, action).await {
            Ok(()) => WebhookOutcome::ok(),
            Err(e) => {
                warn!("Webhook {action} on {web_url} failed: {e}");
                WebhookOutcome::failed(e.to_string())
            }
        }
    }
}
