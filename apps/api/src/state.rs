use std::sync::Arc;

use sqlx::PgPool;

use crate::ingest::pipeline::Ingestor;
use crate::sends::webhook::CampaignWebhook;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Dashboard listings query the pool directly.
    pub db: PgPool,
    pub store: Arc<dyn Store>,
    pub ingestor: Arc<Ingestor>,
    pub webhook: Arc<dyn CampaignWebhook>,
}
