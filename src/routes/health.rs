//! Health check endpoint

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
    pub database: &'static str,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database_ok = sqlx::query("SELECT 1").execute(state.db()).await.is_ok();

    if !database_ok {
        tracing::warn!("Health check: database unavailable");
    }

    Json(HealthResponse {
        status: if database_ok { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        service: "pdf-share-server",
        database: if database_ok { "ok" } else { "unavailable" },
    })
}
