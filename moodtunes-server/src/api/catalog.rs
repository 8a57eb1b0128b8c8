//! Catalog overview

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CatalogEmotionsResponse {
    /// Distinct emotion tags, sorted
    pub emotions: Vec<String>,
    pub total_songs: usize,
}

/// GET /catalog/emotions
///
/// Lists the emotion tags the catalog can serve songs for.
pub async fn get_catalog_emotions(State(state): State<AppState>) -> Json<CatalogEmotionsResponse> {
    let catalog = state.selector.catalog();
    Json(CatalogEmotionsResponse {
        emotions: catalog.emotions().into_iter().collect(),
        total_songs: catalog.len(),
    })
}
