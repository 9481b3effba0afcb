use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Append-only aggregate row. The dashboard always reads the latest one per satellite.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MetricsSnapshotRow {
    pub id: Uuid,
    pub satellite_id: Uuid,
    pub sent: i32,
    pub opened: i32,
    pub replied: i32,
    pub bounced: i32,
    pub failed: i32,
    pub opt_out: i32,
    pub recorded_at: DateTime<Utc>,
}
