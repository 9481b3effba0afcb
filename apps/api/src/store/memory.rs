//! In-memory `Store` used by ingestion and trigger tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{count_to_db, Store, StoreError};
use crate::models::dossie::{DossieRequestRow, DossieStatus, NewDossieRequest};
use crate::models::metrics::MetricsSnapshotRow;
use crate::models::response::{EmailResponseRow, NewEmailResponse};
use crate::models::satellite::Satellite;
use crate::models::scheduled_send::{NewScheduledSend, ScheduledSendRow, SendStatus};
use crate::sheets::metrics::SheetMetrics;

#[derive(Default)]
pub struct MemoryStore {
    pub satellites: Mutex<Vec<Satellite>>,
    pub metrics: Mutex<Vec<MetricsSnapshotRow>>,
    pub responses: Mutex<Vec<EmailResponseRow>>,
    pub dossies: Mutex<Vec<DossieRequestRow>>,
    pub sends: Mutex<Vec<ScheduledSendRow>>,
    /// Makes `insert_metrics` fail, to exercise the logged-and-continue path.
    pub fail_metrics: bool,
    /// Makes `insert_response` fail, to exercise per-satellite failure capture.
    pub fail_responses_for: Option<Uuid>,
    /// Makes the dedupe lookup fail for this recipient email.
    pub fail_lookup_for: Option<String>,
    /// Makes every `insert_dossie` fail.
    pub fail_dossies: bool,
}

impl MemoryStore {
    pub fn with_satellites(satellites: Vec<Satellite>) -> Self {
        Self {
            satellites: Mutex::new(satellites),
            ..Default::default()
        }
    }

    pub fn satellite(alias: &str, sheet_id: &str, web_url: Option<&str>) -> Satellite {
        let now = Utc::now();
        Satellite {
            id: Uuid::new_v4(),
            alias: alias.to_string(),
            sheet_id: sheet_id.to_string(),
            web_url: web_url.map(String::from),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn response_count(&self) -> usize {
        self.responses.lock().unwrap().len()
    }

    pub fn dossie_count(&self) -> usize {
        self.dossies.lock().unwrap().len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_active_satellites(&self) -> Result<Vec<Satellite>, StoreError> {
        Ok(self
            .satellites
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.is_active)
            .cloned()
            .collect())
    }

    async fn get_satellite(&self, id: Uuid) -> Result<Option<Satellite>, StoreError> {
        Ok(self
            .satellites
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn insert_metrics(
        &self,
        satellite_id: Uuid,
        metrics: &SheetMetrics,
    ) -> Result<Uuid, StoreError> {
        if self.fail_metrics {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        let id = Uuid::new_v4();
        self.metrics.lock().unwrap().push(MetricsSnapshotRow {
            id,
            satellite_id,
            sent: count_to_db(metrics.sent),
            opened: count_to_db(metrics.opened),
            replied: count_to_db(metrics.replied),
            bounced: count_to_db(metrics.bounced),
            failed: count_to_db(metrics.failed),
            opt_out: count_to_db(metrics.opt_out),
            recorded_at: Utc::now(),
        });
        Ok(id)
    }

    async fn find_response_id(
        &self,
        satellite_id: Uuid,
        recipient_email: &str,
    ) -> Result<Option<Uuid>, StoreError> {
        if self.fail_lookup_for.as_deref() == Some(recipient_email) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self
            .responses
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.satellite_id == satellite_id && r.recipient_email == recipient_email)
            .map(|r| r.id))
    }

    async fn insert_response(&self, response: &NewEmailResponse) -> Result<Uuid, StoreError> {
        if self.fail_responses_for == Some(response.satellite_id) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        let id = Uuid::new_v4();
        self.responses.lock().unwrap().push(EmailResponseRow {
            id,
            satellite_id: response.satellite_id,
            sender_email: response.sender_email.clone(),
            recipient_email: response.recipient_email.clone(),
            response_content: response.response_content.clone(),
            lead_name: response.lead_name.clone(),
            lead_company: response.lead_company.clone(),
            lead_website: response.lead_website.clone(),
            lead_city: response.lead_city.clone(),
            lead_tag: Some(response.lead_tag.clone()),
            gpt_response: response.gpt_response.clone(),
            gpt_responded_at: response.gpt_responded_at,
            notes: None,
            received_at: Utc::now(),
        });
        Ok(id)
    }

    async fn insert_dossie(&self, dossie: &NewDossieRequest) -> Result<Uuid, StoreError> {
        if self.fail_dossies {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        let id = Uuid::new_v4();
        self.dossies.lock().unwrap().push(DossieRequestRow {
            id,
            satellite_id: Some(dossie.satellite_id),
            response_id: Some(dossie.response_id),
            lead_email: dossie.lead_email.clone(),
            lead_name: dossie.lead_name.clone(),
            lead_company: dossie.lead_company.clone(),
            lead_website: dossie.lead_website.clone(),
            lead_city: dossie.lead_city.clone(),
            status: DossieStatus::Pending.as_str().to_string(),
            notes: None,
            requested_at: Utc::now(),
            completed_at: None,
        });
        Ok(id)
    }

    async fn insert_scheduled_send(
        &self,
        send: &NewScheduledSend,
    ) -> Result<ScheduledSendRow, StoreError> {
        let row = ScheduledSendRow {
            id: Uuid::new_v4(),
            satellite_id: Some(send.satellite_id),
            scheduled_for: send.scheduled_for,
            max_emails: Some(send.max_emails),
            status: send.status.as_str().to_string(),
            result: send.result.clone(),
            executed_at: send.executed_at,
            created_at: Utc::now(),
        };
        self.sends.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn get_scheduled_send(&self, id: Uuid) -> Result<Option<ScheduledSendRow>, StoreError> {
        Ok(self
            .sends
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn transition_scheduled_send(
        &self,
        id: Uuid,
        from: SendStatus,
        to: SendStatus,
    ) -> Result<bool, StoreError> {
        let mut sends = self.sends.lock().unwrap();
        match sends
            .iter_mut()
            .find(|s| s.id == id && s.status == from.as_str())
        {
            Some(row) => {
                row.status = to.as_str().to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
