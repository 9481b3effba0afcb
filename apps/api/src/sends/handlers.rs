use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::ingest::pipeline::IngestReport;
use crate::models::scheduled_send::ScheduledSendRow;
use crate::sends::trigger::{self, TriggerResult};
use crate::state::AppState;

const RECENT_SENDS_LIMIT: i64 = 50;

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SendAction {
    Schedule {
        satellite_id: Uuid,
        scheduled_for: DateTime<Utc>,
        max_emails: Option<i32>,
    },
    ForceSend {
        satellite_id: Uuid,
        max_emails: Option<i32>,
    },
    Cancel {
        schedule_id: Uuid,
    },
    Sync,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SendActionResponse {
    Trigger(TriggerResult),
    Sync(IngestReport),
}

/// POST /api/v1/sends
pub async fn handle_send_action(
    State(state): State<AppState>,
    Json(action): Json<SendAction>,
) -> Result<Json<SendActionResponse>, AppError> {
    let store = state.store.as_ref();
    let response = match action {
        SendAction::Schedule {
            satellite_id,
            scheduled_for,
            max_emails,
        } => SendActionResponse::Trigger(
            trigger::schedule(store, satellite_id, scheduled_for, max_emails).await?,
        ),
        SendAction::ForceSend {
            satellite_id,
            max_emails,
        } => SendActionResponse::Trigger(
            trigger::force_send(store, state.webhook.as_ref(), satellite_id, max_emails).await?,
        ),
        SendAction::Cancel { schedule_id } => {
            SendActionResponse::Trigger(trigger::cancel(store, schedule_id).await?)
        }
        SendAction::Sync => SendActionResponse::Sync(state.ingestor.run().await?),
    };
    Ok(Json(response))
}

/// GET /api/v1/sends
pub async fn handle_list_sends(
    State(state): State<AppState>,
) -> Result<Json<Vec<ScheduledSendRow>>, AppError> {
    let rows: Vec<ScheduledSendRow> = sqlx::query_as(
        "SELECT * FROM scheduled_sends ORDER BY scheduled_for DESC LIMIT $1",
    )
    .bind(RECENT_SENDS_LIMIT)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(rows))
}
