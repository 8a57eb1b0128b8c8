//! Health check endpoint
//!
//! Reports whether the service answers with real predictions or is running
//! degraded (no model artifact, so every prediction is `"unknown"`).

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `"ok"`, or `"degraded"` when no classifier is loaded
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
    /// Labels the loaded classifier can produce; empty when degraded
    pub classifier_labels: usize,
    pub catalog_songs: usize,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let classifier_labels = state.classifier.labels().len();
    Json(HealthResponse {
        status: if classifier_labels == 0 { "degraded" } else { "ok" },
        module: "moodtunes-server",
        version: env!("CARGO_PKG_VERSION"),
        classifier_labels,
        catalog_songs: state.selector.catalog().len(),
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
