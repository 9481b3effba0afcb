//! Persistence seam used by ingestion and the send trigger.
//!
//! `PgStore` is the production implementation; tests run against
//! `memory::MemoryStore`.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::dossie::NewDossieRequest;
use crate::models::response::NewEmailResponse;
use crate::models::satellite::Satellite;
use crate::models::scheduled_send::{NewScheduledSend, ScheduledSendRow, SendStatus};
use crate::sheets::metrics::SheetMetrics;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn list_active_satellites(&self) -> Result<Vec<Satellite>, StoreError>;

    async fn get_satellite(&self, id: Uuid) -> Result<Option<Satellite>, StoreError>;

    /// Appends a metrics snapshot stamped with the current time.
    async fn insert_metrics(
        &self,
        satellite_id: Uuid,
        metrics: &SheetMetrics,
    ) -> Result<Uuid, StoreError>;

    /// Dedupe lookup on `(satellite_id, recipient_email)`.
    async fn find_response_id(
        &self,
        satellite_id: Uuid,
        recipient_email: &str,
    ) -> Result<Option<Uuid>, StoreError>;

    async fn insert_response(&self, response: &NewEmailResponse) -> Result<Uuid, StoreError>;

    async fn insert_dossie(&self, dossie: &NewDossieRequest) -> Result<Uuid, StoreError>;

    async fn insert_scheduled_send(
        &self,
        send: &NewScheduledSend,
    ) -> Result<ScheduledSendRow, StoreError>;

    async fn get_scheduled_send(&self, id: Uuid) -> Result<Option<ScheduledSendRow>, StoreError>;

    /// Moves `id` from `from` to `to`. Returns `false` when the row is absent
    /// or not currently in `from`.
    async fn transition_scheduled_send(
        &self,
        id: Uuid,
        from: SendStatus,
        to: SendStatus,
    ) -> Result<bool, StoreError>;
}

/// Counters are stored as INTEGER; values beyond `i32::MAX` saturate.
pub(crate) fn count_to_db(n: u32) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}
