//! Append-only prediction log in SQLite.

use std::path::Path;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::error::StoreError;
use crate::models::{Label, PredictionRecord};

#[derive(Debug, sqlx::FromRow)]
struct ReviewRow {
    id: i64,
    review: String,
    prediction: String,
    confidence: f64,
}

impl TryFrom<ReviewRow> for PredictionRecord {
    type Error = StoreError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let prediction = row
            .prediction
            .parse::<Label>()
            .map_err(|label| StoreError::CorruptLabel { id: row.id, label })?;
        Ok(PredictionRecord {
            id: row.id,
            review: row.review,
            prediction,
            confidence: row.confidence,
        })
    }
}

/// Pooled handle; each call checks a connection out and returns it when done.
#[derive(Clone)]
pub struct PredictionStore {
    pool: SqlitePool,
}

impl PredictionStore {
    /// Opens (creating if needed) the database file and ensures the table exists.
    pub async fn open(path: &Path, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(StoreError::Connect)?;

        let store = Self { pool };
        store.init().await?;
        Ok(store)
    }

    pub async fn init(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS reviews (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                review TEXT NOT NULL,
                prediction TEXT NOT NULL,
                confidence REAL NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(StoreError::Init)?;
        Ok(())
    }

    /// Inserts one record and returns its id.
    pub async fn append(
        &self,
        review: &str,
        prediction: Label,
        confidence: f64,
    ) -> Result<i64, StoreError> {
        let result = sqlx::query(
            "INSERT INTO reviews (review, prediction, confidence) VALUES (?, ?, ?)",
        )
        .bind(review)
        .bind(prediction.as_str())
        .bind(confidence)
        .execute(&self.pool)
        .await
        .map_err(StoreError::Write)?;
        Ok(result.last_insert_rowid())
    }

    /// Up to `limit` records, newest first.
    pub async fn recent(&self, limit: u32) -> Result<Vec<PredictionRecord>, StoreError> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            "SELECT id, review, prediction, confidence FROM reviews ORDER BY id DESC LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::Read)?;

        rows.into_iter().map(PredictionRecord::try_from).collect()
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    pub(crate) async fn temp_store() -> (TempDir, PredictionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = PredictionStore::open(&dir.path().join("reviews.db"), 2)
            .await
            .unwrap();
        (dir, store)
    }

    #[actix_web::test]
    async fn init_is_idempotent() {
        let (_dir, store) = temp_store().await;
        store.init().await.unwrap();
        store.init().await.unwrap();
        assert!(store.recent(20).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn ids_increase_and_recent_is_newest_first() {
        let (_dir, store) = temp_store().await;
        let a = store.append("first", Label::Genuine, 0.9).await.unwrap();
        let b = store.append("second", Label::Fake, 0.6).await.unwrap();
        let c = store.append("third", Label::Genuine, 0.7).await.unwrap();
        assert!(a < b && b < c);

        let records = store.recent(20).await.unwrap();
        let reviews: Vec<&str> = records.iter().map(|r| r.review.as_str()).collect();
        assert_eq!(reviews, vec!["third", "second", "first"]);
        assert_eq!(records[1].prediction, Label::Fake);
        assert_eq!(records[1].confidence, 0.6);
    }

    #[actix_web::test]
    async fn recent_respects_limit() {
        let (_dir, store) = temp_store().await;
        for i in 0..5 {
            store
                .append(&format!("review {i}"), Label::Genuine, 0.5)
                .await
                .unwrap();
        }
        let records = store.recent(3).await.unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].review, "review 4");
    }

    #[actix_web::test]
    async fn long_reviews_are_stored_whole() {
        let (_dir, store) = temp_store().await;
        let long = "word ".repeat(200);
        store.append(&long, Label::Fake, 0.8).await.unwrap();
        assert_eq!(store.recent(1).await.unwrap()[0].review, long);
    }

    #[actix_web::test]
    async fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.db");
        let store = PredictionStore::open(&path, 1).await.unwrap();
        store.append("kept", Label::Genuine, 0.75).await.unwrap();
        store.close().await;

        let reopened = PredictionStore::open(&path, 1).await.unwrap();
        let records = reopened.recent(20).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].review, "kept");
    }

    #[actix_web::test]
    async fn writes_fail_loudly_on_closed_pool() {
        let (_dir, store) = temp_store().await;
        store.close().await;
        let err = store.append("lost", Label::Fake, 0.9).await.unwrap_err();
        assert!(matches!(err, StoreError::Write(_)));
        let err = store.recent(20).await.unwrap_err();
        assert!(matches!(err, StoreError::Read(_)));
    }

    #[actix_web::test]
    async fn unknown_stored_label_is_reported() {
        let (_dir, store) = temp_store().await;
        sqlx::query("INSERT INTO reviews (review, prediction, confidence) VALUES ('x', 'spam', 0.5)")
            .execute(&store.pool)
            .await
            .unwrap();
        let err = store.recent(20).await.unwrap_err();
        assert!(matches!(err, StoreError::CorruptLabel { label, .. } if label == "spam"));
    }
}
