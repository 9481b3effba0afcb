mod auth;
mod classification;
mod config;
mod db;
mod dossies;
mod errors;
mod ingest;
mod llm_client;
mod models;
mod notify;
mod responses;
mod routes;
mod satellites;
mod sends;
mod sheets;
mod state;
mod store;
mod text;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::ServiceAccountTokenSource;
use crate::classification::LlmLeadClassifier;
use crate::config::Config;
use crate::db::create_pool;
use crate::ingest::pipeline::Ingestor;
use crate::llm_client::LlmClient;
use crate::notify::TelegramNotifier;
use crate::routes::build_router;
use crate::sends::webhook::HttpWebhook;
use crate::sheets::SheetsClient;
use crate::state::AppState;
use crate::store::PgStore;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("satellite_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Satellite API v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config.database_url).await?;

    // One HTTP client shared by every outbound integration
    let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;

    if config.google_service_account_json.is_none() {
        warn!("GOOGLE_SERVICE_ACCOUNT_JSON not set; sync requests will fail until it is");
    }
    let tokens = Arc::new(ServiceAccountTokenSource::new(
        http.clone(),
        config.google_service_account_json.clone(),
    ));
    let sheets = Arc::new(SheetsClient::new(http.clone()));

    let llm = LlmClient::new(
        http.clone(),
        config.openai_api_key.clone(),
        config.openai_model.clone(),
    );
    if llm.is_configured() {
        info!("LLM client initialized (model: {})", llm.model());
    } else {
        warn!("OPENAI_API_KEY not set; replies will be tagged INDEFINIDO without drafts");
    }
    let classifier = Arc::new(LlmLeadClassifier::new(llm));

    let notifier = Arc::new(TelegramNotifier::new(
        http.clone(),
        config.telegram_bot_token.clone(),
        config.telegram_responses_chat_id.clone(),
        config.telegram_drafts_chat_id.clone(),
    ));

    let store = Arc::new(PgStore::new(db.clone()));
    let ingestor = Arc::new(Ingestor::new(
        tokens,
        sheets,
        classifier,
        notifier,
        store.clone(),
        config.sheet_range.clone(),
    ));

    let state = AppState {
        db,
        store,
        ingestor,
        webhook: Arc::new(HttpWebhook::new(http)),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
