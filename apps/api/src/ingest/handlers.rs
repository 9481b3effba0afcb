use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::ingest::pipeline::IngestReport;
use crate::state::AppState;

/// POST /api/v1/sync
///
/// Runs one ingestion batch over every active satellite. Per-satellite
/// failures are reported inside `results`; only token acquisition or the
/// satellite listing fail the request.
pub async fn handle_sync(State(state): State<AppState>) -> Result<Json<IngestReport>, AppError> {
    let report = state.ingestor.run().await?;
    Ok(Json(report))
}
