use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DossieStatus {
    Pending,
    Done,
}

impl DossieStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DossieStatus::Pending => "PENDING",
            DossieStatus::Done => "DONE",
        }
    }
}

/// Follow-up research request ("dossiê") raised for an interested lead.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DossieRequestRow {
    pub id: Uuid,
    pub satellite_id: Option<Uuid>,
    pub response_id: Option<Uuid>,
    pub lead_email: String,
    pub lead_name: Option<String>,
    pub lead_company: Option<String>,
    pub lead_website: Option<String>,
    pub lead_city: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Always inserted as `PENDING`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDossieRequest {
    pub satellite_id: Uuid,
    pub response_id: Uuid,
    pub lead_email: String,
    pub lead_name: Option<String>,
    pub lead_company: Option<String>,
    pub lead_website: Option<String>,
    pub lead_city: Option<String>,
}
