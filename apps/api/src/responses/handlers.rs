use axum::{extract::State, Json};
use serde::Serialize;
use sqlx::FromRow;

use crate::errors::AppError;
use crate::models::response::EmailResponseRow;
use crate::state::AppState;

const RECENT_RESPONSES_LIMIT: i64 = 100;

/// A recorded reply with the alias of the account it came through.
#[derive(Debug, Serialize, FromRow)]
pub struct ResponseWithAlias {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub response: EmailResponseRow,
    pub alias: String,
}

/// GET /api/v1/responses
pub async fn handle_list_responses(
    State(state): State<AppState>,
) -> Result<Json<Vec<ResponseWithAlias>>, AppError> {
    let rows: Vec<ResponseWithAlias> = sqlx::query_as(
        r#"
        SELECT r.*, s.alias
        FROM email_responses r
        JOIN satellites s ON s.id = r.satellite_id
        ORDER BY r.received_at DESC
        LIMIT $1
        "#,
    )
    .bind(RECENT_RESPONSES_LIMIT)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(rows))
}
