//! Database models

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One logged prediction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: i64,
    pub text_input: String,
    pub predicted_emotion: String,
    /// Insertion time (UTC, set by the database)
    pub timestamp: NaiveDateTime,
}

/// Aggregate row of the analytics query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionCount {
    pub emotion: String,
    pub count: i64,
}

impl EmotionCount {
    pub fn new(emotion: impl Into<String>, count: i64) -> Self {
        Self {
            emotion: emotion.into(),
            count,
        }
    }
}
