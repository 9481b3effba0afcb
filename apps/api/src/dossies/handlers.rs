use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::dossie::{DossieRequestRow, DossieStatus};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CompleteDossieRequest {
    #[serde(default)]
    pub notes: Option<String>,
}

/// Blank line between appended note blocks.
const NOTE_SEPARATOR: &str = "\n\n";

#[derive(Debug, Deserialize)]
pub struct AddNoteRequest {
    pub note: String,
}

/// `[dd/mm/yyyy hh:mm:ss]` header followed by the note on its own line.
fn note_block(note: &str, at: DateTime<Utc>) -> String {
    format!("[{}]\n{}", at.format("%d/%m/%Y %H:%M:%S"), note)
}

impl AddNoteRequest {
    fn validate(&self) -> Result<&str, AppError> {
        let note = self.note.trim();
        if note.is_empty() {
            return Err(AppError::Validation("note must not be empty".to_string()));
        }
        Ok(note)
    }
}

/// GET /api/v1/dossies
pub async fn handle_list_dossies(
    State(state): State<AppState>,
) -> Result<Json<Vec<DossieRequestRow>>, AppError> {
    let rows: Vec<DossieRequestRow> =
        sqlx::query_as("SELECT * FROM dossie_requests ORDER BY requested_at DESC")
            .fetch_all(&state.db)
            .await?;
    Ok(Json(rows))
}

/// PATCH /api/v1/dossies/:id/complete
///
/// Notes are kept as-is when the body carries none.
pub async fn handle_complete_dossie(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CompleteDossieRequest>,
) -> Result<Json<DossieRequestRow>, AppError> {
    let updated: Option<DossieRequestRow> = sqlx::query_as(
        r#"
        UPDATE dossie_requests
        SET status = $1, completed_at = now(), notes = COALESCE($2, notes)
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(DossieStatus::Done.as_str())
    .bind(&req.notes)
    .bind(id)
    .fetch_optional(&state.db)
    .await?;

    let dossie = updated.ok_or_else(|| AppError::NotFound(format!("Dossiê {id} not found")))?;
    info!("Dossiê {} for {} completed", dossie.id, dossie.lead_email);
    Ok(Json(dossie))
}

/// PATCH /api/v1/dossies/:id/notes
///
/// Appends a timestamped block; earlier notes and the status are untouched.
pub async fn handle_add_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddNoteRequest>,
) -> Result<Json<DossieRequestRow>, AppError> {
    let block = note_block(req.validate()?, Utc::now());
    let updated: Option<DossieRequestRow> = sqlx::query_as(
        r#"
        UPDATE dossie_requests
        SET notes = CASE
            WHEN COALESCE(notes, '') = '' THEN $1
            ELSE notes || $2 || $1
        END
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(&block)
    .bind(NOTE_SEPARATOR)
    .bind(id)
    .fetch_optional(&state.db)
    .await?;

    let dossie = updated.ok_or_else(|| AppError::NotFound(format!("Dossiê {id} not found")))?;
    info!("Note added to dossiê {}", dossie.id);
    Ok(Json(dossie))
}
