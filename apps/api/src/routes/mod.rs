pub mod health;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::dossies::handlers as dossies;
use crate::ingest::handlers as ingest;
use crate::responses::handlers as responses;
use crate::satellites::handlers as satellites;
use crate::sends::handlers as sends;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Ingestion
        .route("/api/v1/sync", post(ingest::handle_sync))
        // Campaign sends
        .route(
            "/api/v1/sends",
            get(sends::handle_list_sends).post(sends::handle_send_action),
        )
        // Accounts
        .route(
            "/api/v1/satellites",
            get(satellites::handle_list_satellites).post(satellites::handle_create_satellite),
        )
        .route(
            "/api/v1/satellites/:id",
            delete(satellites::handle_delete_satellite),
        )
        .route(
            "/api/v1/satellites/:id/active",
            patch(satellites::handle_toggle_active),
        )
        // Replies
        .route("/api/v1/responses", get(responses::handle_list_responses))
        // Follow-ups
        .route("/api/v1/dossies", get(dossies::handle_list_dossies))
        .route(
            "/api/v1/dossies/:id/complete",
            patch(dossies::handle_complete_dossie),
        )
        .route("/api/v1/dossies/:id/notes", patch(dossies::handle_add_note))
        .with_state(state)
}
