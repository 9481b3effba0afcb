use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A tracked outbound-email identity backed by one spreadsheet.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Satellite {
    pub id: Uuid,
    pub alias: String,
    pub sheet_id: String,
    /// Apps Script web-app URL used to trigger campaign runs.
    pub web_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
