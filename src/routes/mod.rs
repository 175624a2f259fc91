//! Route modules for PDF Share Server

pub mod files;
pub mod health;
pub mod index;
pub mod upload;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index::index))
        .route("/health", get(health::health_check))
        .merge(upload::router(state.max_file_size()))
        .nest("/api/files", files::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
