//! Scheduled-send commands.
//!
//! `force_send` never fails on the webhook itself: the outcome is logged as an
//! `EXECUTED` or `FAILED` row and returned to the caller as-is.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::scheduled_send::{NewScheduledSend, SendStatus};
use crate::sends::webhook::{CampaignWebhook, WebhookOutcome, RUN_CAMPAIGN_ACTION};
use crate::store::Store;

pub const DEFAULT_MAX_EMAILS: i32 = 100;

const MISSING_WEB_URL: &str = "Web URL não configurada para este satélite";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggerResult {
    pub success: bool,
    pub message: String,
}

impl TriggerResult {
    fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }
}

impl From<WebhookOutcome> for TriggerResult {
    fn from(outcome: WebhookOutcome) -> Self {
        Self {
            success: outcome.success,
            message: outcome.message,
        }
    }
}

fn resolve_max_emails(max_emails: Option<i32>) -> Result<i32, AppError> {
    match max_emails {
        None => Ok(DEFAULT_MAX_EMAILS),
        Some(n) if n > 0 => Ok(n),
        Some(n) => Err(AppError::Validation(format!(
            "max_emails must be positive, got {n}"
        ))),
    }
}

/// Inserts a `PENDING` send for a future run.
pub async fn schedule(
    store: &dyn Store,
    satellite_id: Uuid,
    scheduled_for: DateTime<Utc>,
    max_emails: Option<i32>,
) -> Result<TriggerResult, AppError> {
    let max_emails = resolve_max_emails(max_emails)?;
    store
        .get_satellite(satellite_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Satélite não encontrado".to_string()))?;

    let row = store
        .insert_scheduled_send(&NewScheduledSend {
            satellite_id,
            scheduled_for,
            max_emails,
            status: SendStatus::Pending,
            result: None,
            executed_at: None,
        })
        .await?;
    info!("Scheduled send {} for {}", row.id, row.scheduled_for);

    Ok(TriggerResult::ok("Envio programado com sucesso"))
}

/// Triggers the satellite's campaign now and logs the outcome.
pub async fn force_send(
    store: &dyn Store,
    webhook: &dyn CampaignWebhook,
    satellite_id: Uuid,
    max_emails: Option<i32>,
) -> Result<TriggerResult, AppError> {
    let max_emails = resolve_max_emails(max_emails)?;
    let satellite = store
        .get_satellite(satellite_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Satélite não encontrado".to_string()))?;

    let outcome = match satellite.web_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => webhook.trigger(url, RUN_CAMPAIGN_ACTION).await,
        _ => WebhookOutcome::failed(MISSING_WEB_URL),
    };

    let now = Utc::now();
    let status = if outcome.success {
        SendStatus::Executed
    } else {
        SendStatus::Failed
    };
    let logged = store
        .insert_scheduled_send(&NewScheduledSend {
            satellite_id,
            scheduled_for: now,
            max_emails,
            status,
            result: serde_json::to_value(&outcome).ok(),
            executed_at: Some(now),
        })
        .await;
    if let Err(e) = logged {
        warn!("Failed to log forced send for {}: {e}", satellite.alias);
    }

    info!(
        "Forced send on {}: {} ({})",
        satellite.alias, status, outcome.message
    );
    Ok(outcome.into())
}

/// `PENDING → CANCELLED`. Any other current state is rejected.
pub async fn cancel(store: &dyn Store, schedule_id: Uuid) -> Result<TriggerResult, AppError> {
    if store
        .transition_scheduled_send(schedule_id, SendStatus::Pending, SendStatus::Cancelled)
        .await?
    {
        info!("Cancelled scheduled send {schedule_id}");
        return Ok(TriggerResult::ok("Agendamento cancelado"));
    }

    match store.get_scheduled_send(schedule_id).await? {
        None => Err(AppError::NotFound(format!(
            "Agendamento {schedule_id} não encontrado"
        ))),
        Some(row) => match row.status.parse::<SendStatus>() {
            Ok(status) if status.is_terminal() => Err(AppError::UnprocessableEntity(format!(
                "Agendamento já finalizado: {status}"
            ))),
            // Still PENDING here means a concurrent transition won the race.
            _ => Err(AppError::UnprocessableEntity(format!(
                "Agendamento não pode ser cancelado: status {}",
                row.status
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::store::memory::MemoryStore;

    struct FakeWebhook {
        outcome: WebhookOutcome,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl FakeWebhook {
        fn returning(outcome: WebhookOutcome) -> Self {
            Self {
                outcome,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CampaignWebhook for FakeWebhook {
        async fn trigger(&self, web_url: &str, action: &str) -> WebhookOutcome {
            self.calls
                .lock()
                .unwrap()
                .push((web_url.to_string(), action.to_string()));
            self.outcome.clone()
        }
    }

    #[tokio::test]
    async fn test_force_send_without_web_url_logs_failed() {
        let sat = MemoryStore::satellite("sat-1", "sheet-1", None);
        let sat_id = sat.id;
        let store = MemoryStore::with_satellites(vec![sat]);
        let hook = FakeWebhook::returning(WebhookOutcome::ok());

        let result = force_send(&store, &hook, sat_id, None).await.unwrap();

        assert!(!result.success);
        assert!(result.message.starts_with("Web URL não configurada"));
        assert!(hook.calls.lock().unwrap().is_empty());

        let sends = store.sends.lock().unwrap();
        assert_eq!(sends.len(), 1);
        assert_eq!(sends[0].status, "FAILED");
        assert_eq!(sends[0].max_emails, Some(DEFAULT_MAX_EMAILS));
        assert!(sends[0].executed_at.is_some());
        assert_eq!(sends[0].result.as_ref().unwrap()["success"], false);
    }

    #[tokio::test]
    async fn test_force_send_blank_web_url_counts_as_missing() {
        let sat = MemoryStore::satellite("sat-1", "sheet-1", Some("  "));
        let sat_id = sat.id;
        let store = MemoryStore::with_satellites(vec![sat]);
        let hook = FakeWebhook::returning(WebhookOutcome::ok());

        let result = force_send(&store, &hook, sat_id, Some(10)).await.unwrap();
        assert!(!result.success);
        assert!(hook.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_force_send_success_logs_executed() {
        let sat = MemoryStore::satellite("sat-1", "sheet-1", Some("https://script.example/exec"));
        let sat_id = sat.id;
        let store = MemoryStore::with_satellites(vec![sat]);
        let hook = FakeWebhook::returning(WebhookOutcome::ok());

        let result = force_send(&store, &hook, sat_id, Some(25)).await.unwrap();

        assert!(result.success);
        assert_eq!(
            *hook.calls.lock().unwrap(),
            vec![(
                "https://script.example/exec".to_string(),
                "runCampaignNow".to_string()
            )]
        );
        let sends = store.sends.lock().unwrap();
        assert_eq!(sends[0].status, "EXECUTED");
        assert_eq!(sends[0].max_emails, Some(25));
    }

    #[tokio::test]
    async fn test_force_send_webhook_failure_is_reported_not_raised() {
        let sat = MemoryStore::satellite("sat-1", "sheet-1", Some("https://script.example/exec"));
        let sat_id = sat.id;
        let store = MemoryStore::with_satellites(vec![sat]);
        let hook = FakeWebhook::returning(WebhookOutcome::failed("Erro ao acionar: 500"));

        let result = force_send(&store, &hook, sat_id, None).await.unwrap();

        assert_eq!(
            result,
            TriggerResult {
                success: false,
                message: "Erro ao acionar: 500".to_string()
            }
        );
        assert_eq!(store.sends.lock().unwrap()[0].status, "FAILED");
    }

    #[tokio::test]
    async fn test_force_send_unknown_satellite_is_not_found() {
        let store = MemoryStore::default();
        let hook = FakeWebhook::returning(WebhookOutcome::ok());
        let err = force_send(&store, &hook, Uuid::new_v4(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(store.sends.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_schedule_inserts_pending_with_default_cap() {
        let sat = MemoryStore::satellite("sat-1", "sheet-1", None);
        let sat_id = sat.id;
        let store = MemoryStore::with_satellites(vec![sat]);
        let when = Utc::now() + chrono::Duration::hours(2);

        let result = schedule(&store, sat_id, when, None).await.unwrap();
        assert!(result.success);

        let sends = store.sends.lock().unwrap();
        assert_eq!(sends[0].status, "PENDING");
        assert_eq!(sends[0].scheduled_for, when);
        assert_eq!(sends[0].max_emails, Some(100));
        assert!(sends[0].executed_at.is_none());
    }

    #[tokio::test]
    async fn test_schedule_rejects_non_positive_cap() {
        let sat = MemoryStore::satellite("sat-1", "sheet-1", None);
        let sat_id = sat.id;
        let store = MemoryStore::with_satellites(vec![sat]);
        let err = schedule(&store, sat_id, Utc::now(), Some(0))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_cancel_pending() {
        let sat = MemoryStore::satellite("sat-1", "sheet-1", None);
        let sat_id = sat.id;
        let store = MemoryStore::with_satellites(vec![sat]);
        schedule(&store, sat_id, Utc::now(), None).await.unwrap();
        let id = store.sends.lock().unwrap()[0].id;

        let result = cancel(&store, id).await.unwrap();
        assert!(result.success);
        assert_eq!(store.sends.lock().unwrap()[0].status, "CANCELLED");
    }

    #[tokio::test]
    async fn test_cancel_executed_is_rejected_and_unchanged() {
        let sat = MemoryStore::satellite("sat-1", "sheet-1", Some("https://script.example/exec"));
        let sat_id = sat.id;
        let store = MemoryStore::with_satellites(vec![sat]);
        let hook = FakeWebhook::returning(WebhookOutcome::ok());
        force_send(&store, &hook, sat_id, None).await.unwrap();
        let id = store.sends.lock().unwrap()[0].id;

        let err = cancel(&store, id).await.unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
        assert_eq!(store.sends.lock().unwrap()[0].status, "EXECUTED");
    }

    #[tokio::test]
    async fn test_cancel_twice_is_rejected() {
        let sat = MemoryStore::satellite("sat-1", "sheet-1", None);
        let sat_id = sat.id;
        let store = MemoryStore::with_satellites(vec![sat]);
        schedule(&store, sat_id, Utc::now(), None).await.unwrap();
        let id = store.sends.lock().unwrap()[0].id;

        cancel(&store, id).await.unwrap();
        assert!(matches!(
            cancel(&store, id).await.unwrap_err(),
            AppError::UnprocessableEntity(_)
        ));
    }

    #[tokio::test]
    async fn test_cancel_unknown_is_not_found() {
        let store = MemoryStore::default();
        assert!(matches!(
            cancel(&store, Uuid::new_v4()).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }
}
