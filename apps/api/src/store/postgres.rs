use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{count_to_db, Store, StoreError};
use crate::models::dossie::{DossieStatus, NewDossieRequest};
use crate::models::response::NewEmailResponse;
use crate::models::satellite::Satellite;
use crate::models::scheduled_send::{NewScheduledSend, ScheduledSendRow, SendStatus};
use crate::sheets::metrics::SheetMetrics;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn list_active_satellites(&self) -> Result<Vec<Satellite>, StoreError> {
        Ok(sqlx::query_as::<_, Satellite>(
            "SELECT * FROM satellites WHERE is_active = TRUE ORDER BY alias",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_satellite(&self, id: Uuid) -> Result<Option<Satellite>, StoreError> {
        Ok(
            sqlx::query_as::<_, Satellite>("SELECT * FROM satellites WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn insert_metrics(
        &self,
        satellite_id: Uuid,
        metrics: &SheetMetrics,
    ) -> Result<Uuid, StoreError> {
        Ok(sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO satellite_metrics
                (satellite_id, sent, opened, replied, bounced, failed, opt_out)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(satellite_id)
        .bind(count_to_db(metrics.sent))
        .bind(count_to_db(metrics.opened))
        .bind(count_to_db(metrics.replied))
        .bind(count_to_db(metrics.bounced))
        .bind(count_to_db(metrics.failed))
        .bind(count_to_db(metrics.opt_out))
        .fetch_one(&self.pool)
        .await?)
    }

    async fn find_response_id(
        &self,
        satellite_id: Uuid,
        recipient_email: &str,
    ) -> Result<Option<Uuid>, StoreError> {
        Ok(sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM email_responses WHERE satellite_id = $1 AND recipient_email = $2 LIMIT 1",
        )
        .bind(satellite_id)
        .bind(recipient_email)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn insert_response(&self, response: &NewEmailResponse) -> Result<Uuid, StoreError> {
        Ok(sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO email_responses
                (satellite_id, sender_email, recipient_email, response_content,
                 lead_name, lead_company, lead_website, lead_city, lead_tag,
                 gpt_response, gpt_responded_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            "#,
        )
        .bind(response.satellite_id)
        .bind(&response.sender_email)
        .bind(&response.recipient_email)
        .bind(&response.response_content)
        .bind(&response.lead_name)
        .bind(&response.lead_company)
        .bind(&response.lead_website)
        .bind(&response.lead_city)
        .bind(&response.lead_tag)
        .bind(&response.gpt_response)
        .bind(response.gpt_responded_at)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn insert_dossie(&self, dossie: &NewDossieRequest) -> Result<Uuid, StoreError> {
        Ok(sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO dossie_requests
                (satellite_id, response_id, lead_email, lead_name, lead_company,
                 lead_website, lead_city, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(dossie.satellite_id)
        .bind(dossie.response_id)
        .bind(&dossie.lead_email)
        .bind(&dossie.lead_name)
        .bind(&dossie.lead_company)
        .bind(&dossie.lead_website)
        .bind(&dossie.lead_city)
        .bind(DossieStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await?)
    }

    async fn insert_scheduled_send(
        &self,
        send: &NewScheduledSend,
    ) -> Result<ScheduledSendRow, StoreError> {
        Ok(sqlx::query_as::<_, ScheduledSendRow>(
            r#"
            INSERT INTO scheduled_sends
                (satellite_id, scheduled_for, max_emails, status, result, executed_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(send.satellite_id)
        .bind(send.scheduled_for)
        .bind(send.max_emails)
        .bind(send.status.as_str())
        .bind(&send.result)
        .bind(send.executed_at)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn get_scheduled_send(&self, id: Uuid) -> Result<Option<ScheduledSendRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, ScheduledSendRow>("SELECT * FROM scheduled_sends WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn transition_scheduled_send(
        &self,
        id: Uuid,
        from: SendStatus,
        to: SendStatus,
    ) -> Result<bool, StoreError> {
        let result =
            sqlx::query("UPDATE scheduled_sends SET status = $1 WHERE id = $2 AND status = $3")
                .bind(to.as_str())
                .bind(id)
                .bind(from.as_str())
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() == 1)
    }
}
