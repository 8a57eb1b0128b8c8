//! Prediction statistics for the chart page

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use moodtunes_common::Error;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, error};

use crate::AppState;

/// Parallel arrays: `counts[i]` predictions were `labels[i]`
#[derive(Debug, Serialize)]
pub struct EmotionDataResponse {
    pub labels: Vec<String>,
    pub counts: Vec<i64>,
}

/// GET /get_emotion_data
pub async fn get_emotion_data(
    State(state): State<AppState>,
) -> Result<Json<EmotionDataResponse>, StatsError> {
    let rows = state
        .prediction_log
        .counts_by_emotion()
        .await
        .map_err(StatsError::from)?;

    debug!("Aggregated {} emotion rows", rows.len());

    let (labels, counts) = rows.into_iter().map(|row| (row.emotion, row.count)).unzip();
    Ok(Json(EmotionDataResponse { labels, counts }))
}

/// Statistics errors
#[derive(Debug)]
pub enum StatsError {
    DatabaseError(String),
}

impl From<Error> for StatsError {
    fn from(e: Error) -> Self {
        error!("Failed to read emotion counts: {}", e);
        match e {
            Error::Database(inner) => StatsError::DatabaseError(inner.to_string()),
            other => StatsError::DatabaseError(other.to_string()),
        }
    }
}

impl IntoResponse for StatsError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            StatsError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
