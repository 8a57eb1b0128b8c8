//! Emotion prediction and song recommendation

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use moodtunes_common::{Classification, Song};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, info};

use crate::AppState;

/// POST /predict request body
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub text: Option<String>,
}

/// POST /predict response
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    /// Canonical emotion, `"unknown"` when the classifier is unavailable
    pub emotion: String,
    pub songs: Vec<Song>,
}

/// POST /predict
///
/// Classifies the text, picks songs for the normalized emotion and records
/// the prediction. The record is written on a spawned task; its outcome
/// never affects the response.
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, PredictError> {
    let text = match payload {
        Ok(Json(PredictRequest { text: Some(text) })) if !text.is_empty() => text,
        Ok(_) => return Err(PredictError::NoText),
        Err(rejection) => {
            debug!("Rejected /predict body: {}", rejection);
            return Err(PredictError::NoText);
        }
    };

    let classification = Classification::of(state.classifier.as_ref(), &text);
    let emotion = state.aliases.normalize(classification.label());
    let songs = state.selector.select(&emotion);

    info!("Predicted emotion '{}' ({} songs)", emotion, songs.len());
    debug!(
        "Selected songs: {:?}",
        songs.iter().map(|s| s.title.as_str()).collect::<Vec<_>>()
    );

    let log = state.prediction_log.clone();
    let logged_emotion = emotion.clone();
    tokio::spawn(async move {
        if let Err(e) = log.append(&text, &logged_emotion).await {
            error!("Failed to log prediction: {}", e);
        }
    });

    Ok(Json(PredictResponse { emotion, songs }))
}

/// Prediction errors
#[derive(Debug)]
pub enum PredictError {
    /// Body missing, not a JSON object, or `text` empty
    NoText,
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            PredictError::NoText => (StatusCode::BAD_REQUEST, "No text provided"),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
