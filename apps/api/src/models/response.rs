use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmailResponseRow {
    pub id: Uuid,
    pub satellite_id: Uuid,
    pub sender_email: String,
    pub recipient_email: String,
    pub response_content: Option<String>,
    pub lead_name: Option<String>,
    pub lead_company: Option<String>,
    pub lead_website: Option<String>,
    pub lead_city: Option<String>,
    pub lead_tag: Option<String>,
    pub gpt_response: Option<String>,
    pub gpt_responded_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub received_at: DateTime<Utc>,
}

/// Insert payload for a deduplicated lead reply.
/// `(satellite_id, recipient_email)` is the dedupe key.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmailResponse {
    pub satellite_id: Uuid,
    pub sender_email: String,
    pub recipient_email: String,
    pub response_content: Option<String>,
    pub lead_name: Option<String>,
    pub lead_company: Option<String>,
    pub lead_website: Option<String>,
    pub lead_city: Option<String>,
    pub lead_tag: String,
    pub gpt_response: Option<String>,
    pub gpt_responded_at: Option<DateTime<Utc>>,
}
