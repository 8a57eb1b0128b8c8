//! Prediction log storage
//!
//! Every `/predict` call appends one row to `emotion_logs`; the analytics
//! endpoint reads the table back only as counts grouped by emotion.

pub mod init;
pub mod models;
pub mod prediction_log;

pub use init::init_database;
pub use models::{EmotionCount, PredictionRecord};
pub use prediction_log::{PredictionLog, SqlitePredictionLog};
