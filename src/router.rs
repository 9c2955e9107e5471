use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::sync::Semaphore;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::download;
use crate::pages;

/// Upper bound on the urlencoded form body. Two short fields fit with room
/// to spare; anything bigger is noise.
pub const MAX_FORM_BYTES: usize = 8 * 1024;

/// Shared, immutable per-process state: the parsed config and the slot
/// gate for concurrent downloader runs.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub downloads: Arc<Semaphore>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let downloads = Arc::new(Semaphore::new(config.max_downloads));
        Self {
            config: Arc::new(config),
            downloads,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();
    Router::new()
        .route("/", get(home))
        .route(
            "/download",
            post(download::download).layer(DefaultBodyLimit::max(MAX_FORM_BYTES)),
        )
        .route("/health", get(health))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn home() -> Html<String> {
    Html(pages::home())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Html(pages::not_found()))
}
