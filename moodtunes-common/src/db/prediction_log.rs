//! Prediction log access

use super::models::{EmotionCount, PredictionRecord};
use crate::Result;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Append-only store of predictions
#[async_trait]
pub trait PredictionLog: Send + Sync {
    /// Record one prediction
    ///
    /// Callers on the request path are expected to log and ignore failures.
    async fn append(&self, text: &str, emotion: &str) -> Result<()>;

    /// Number of predictions per emotion, in order of first appearance
    async fn counts_by_emotion(&self) -> Result<Vec<EmotionCount>>;
}

/// SQLite-backed prediction log
///
/// The pool connects lazily: a missing or unreachable database fails the
/// individual call, never construction. Each call acquires its own
/// connection, which returns to the pool when the call finishes.
#[derive(Clone)]
pub struct SqlitePredictionLog {
    pool: SqlitePool,
}

impl SqlitePredictionLog {
    /// Lazily connect to an existing database file
    pub fn open(db_path: &Path) -> Self {
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(false)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect_lazy_with(options);

        Self { pool }
    }

    /// Wrap an already-initialized pool
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Latest predictions, newest first
    pub async fn recent(&self, limit: i64) -> Result<Vec<PredictionRecord>> {
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query_as::<_, (i64, String, String, chrono::NaiveDateTime)>(
            r#"
            SELECT id, text_input, predicted_emotion, timestamp
            FROM emotion_logs
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, text_input, predicted_emotion, timestamp)| PredictionRecord {
                id,
                text_input,
                predicted_emotion,
                timestamp,
            })
            .collect())
    }
}

#[async_trait]
impl PredictionLog for SqlitePredictionLog {
    async fn append(&self, text: &str, emotion: &str) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("INSERT INTO emotion_logs (text_input, predicted_emotion) VALUES (?, ?)")
            .bind(text)
            .bind(emotion)
            .execute(&mut *conn)
            .await?;

        info!("Logged prediction '{}' -> '{}'", text, emotion);
        Ok(())
    }

    async fn counts_by_emotion(&self) -> Result<Vec<EmotionCount>> {
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT predicted_emotion, COUNT(*) AS count
            FROM emotion_logs
            GROUP BY predicted_emotion
            ORDER BY MIN(id)
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        debug!("Emotion counts: {:?}", rows);

        Ok(rows
            .into_iter()
            .map(|(emotion, count)| EmotionCount { emotion, count })
            .collect())
    }
}
