//! moodtunes-server library
//!
//! HTTP surface of MoodTunes: text in, emotion and matching songs out, with
//! every prediction recorded for the statistics chart.

use axum::Router;
use moodtunes_common::db::PredictionLog;
use moodtunes_common::{AliasTable, EmotionClassifier, SongSelector};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod cli;

/// Application state shared across HTTP handlers
///
/// Everything except the prediction log is built once at startup and only
/// read afterwards.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn EmotionClassifier>,
    pub aliases: Arc<AliasTable>,
    pub selector: Arc<SongSelector>,
    pub prediction_log: Arc<dyn PredictionLog>,
}

impl AppState {
    pub fn new(
        classifier: Arc<dyn EmotionClassifier>,
        aliases: Arc<AliasTable>,
        selector: Arc<SongSelector>,
        prediction_log: Arc<dyn PredictionLog>,
    ) -> Self {
        Self {
            classifier,
            aliases,
            selector,
            prediction_log,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    // Pages and their assets
    let pages = Router::new()
        .route("/", get(api::serve_index))
        .route("/feeling", get(api::serve_feeling))
        .route("/chart", get(api::serve_chart))
        .route("/static/script.js", get(api::serve_script_js))
        .route("/static/chart.js", get(api::serve_chart_js))
        .route("/static/style.css", get(api::serve_style_css));

    // JSON API
    let api = Router::new()
        .route("/predict", post(api::predict))
        .route("/get_emotion_data", get(api::get_emotion_data))
        .route("/catalog/emotions", get(api::get_catalog_emotions))
        .merge(api::health_routes());

    Router::new()
        .merge(pages)
        .merge(api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
