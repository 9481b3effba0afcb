use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::metrics::MetricsSnapshotRow;
use crate::models::satellite::Satellite;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SatelliteWithMetrics {
    #[serde(flatten)]
    pub satellite: Satellite,
    pub latest_metrics: Option<MetricsSnapshotRow>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSatelliteRequest {
    pub alias: String,
    pub sheet_id: String,
    pub web_url: Option<String>,
}

/// Trimmed, validated form of `CreateSatelliteRequest`.
#[derive(Debug, PartialEq)]
struct NewSatellite {
    alias: String,
    sheet_id: String,
    web_url: Option<String>,
}

impl CreateSatelliteRequest {
    fn validate(self) -> Result<NewSatellite, AppError> {
        let alias = self.alias.trim().to_string();
        let sheet_id = self.sheet_id.trim().to_string();
        if alias.is_empty() {
            return Err(AppError::Validation("alias must not be empty".to_string()));
        }
        if sheet_id.is_empty() {
            return Err(AppError::Validation(
                "sheet_id must not be empty".to_string(),
            ));
        }
        let web_url = self
            .web_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        Ok(NewSatellite {
            alias,
            sheet_id,
            web_url,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ActiveToggle {
    pub is_active: bool,
}

fn attach_latest_metrics(
    satellites: Vec<Satellite>,
    latest: Vec<MetricsSnapshotRow>,
) -> Vec<SatelliteWithMetrics> {
    let mut by_satellite: HashMap<Uuid, MetricsSnapshotRow> = latest
        .into_iter()
        .map(|m| (m.satellite_id, m))
        .collect();
    satellites
        .into_iter()
        .map(|satellite| {
            let latest_metrics = by_satellite.remove(&satellite.id);
            SatelliteWithMetrics {
                satellite,
                latest_metrics,
            }
        })
        .collect()
}

/// GET /api/v1/satellites
pub async fn handle_list_satellites(
    State(state): State<AppState>,
) -> Result<Json<Vec<SatelliteWithMetrics>>, AppError> {
    let satellites: Vec<Satellite> =
        sqlx::query_as("SELECT * FROM satellites ORDER BY alias")
            .fetch_all(&state.db)
            .await?;

    let latest: Vec<MetricsSnapshotRow> = sqlx::query_as(
        r#"
        SELECT DISTINCT ON (satellite_id) *
        FROM satellite_metrics
        ORDER BY satellite_id, recorded_at DESC
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(attach_latest_metrics(satellites, latest)))
}

/// POST /api/v1/satellites
pub async fn handle_create_satellite(
    State(state): State<AppState>,
    Json(req): Json<CreateSatelliteRequest>,
) -> Result<(StatusCode, Json<Satellite>), AppError> {
    let new = req.validate()?;
    let satellite: Satellite = sqlx::query_as(
        r#"
        INSERT INTO satellites (alias, sheet_id, web_url)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(&new.alias)
    .bind(&new.sheet_id)
    .bind(&new.web_url)
    .fetch_one(&state.db)
    .await?;

    info!("Registered satellite {} ({})", satellite.alias, satellite.id);
    Ok((StatusCode::CREATED, Json(satellite)))
}

/// PATCH /api/v1/satellites/:id/active
pub async fn handle_toggle_active(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ActiveToggle>,
) -> Result<Json<Satellite>, AppError> {
    let updated: Option<Satellite> = sqlx::query_as(
        r#"
        UPDATE satellites
        SET is_active = $1, updated_at = now()
        WHERE id = $2
        RETURNING *
        "#,
    )
    .bind(req.is_active)
    .bind(id)
    .fetch_optional(&state.db)
    .await?;

    let satellite =
        updated.ok_or_else(|| AppError::NotFound(format!("Satellite {id} not found")))?;
    info!(
        "Satellite {} is now {}",
        satellite.alias,
        if satellite.is_active { "active" } else { "paused" }
    );
    Ok(Json(satellite))
}

/// DELETE /api/v1/satellites/:id
pub async fn handle_delete_satellite(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM satellites WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Satellite {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
