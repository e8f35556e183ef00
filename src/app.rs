use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route(
            "/journal",
            get(handlers::journal_page).post(handlers::journal_submit),
        )
        .route("/chat", get(handlers::chat_page).post(handlers::chat_submit))
        .route(
            "/api/journal",
            get(handlers::get_journal).post(handlers::save_journal),
        )
        .route("/api/chat", get(handlers::get_chat).post(handlers::send_chat))
        .with_state(state)
}
