//! SQLite implementation of [`ReelStore`].
//!
//! Uses [`sqlx`] with the `sqlite` feature.  Migrations are run automatically
//! on startup via [`SqliteReelStore::connect`].
//!
//! # Migrations path
//!
//! `sqlx::migrate!("./migrations")` resolves the path **at compile time**
//! relative to `CARGO_MANIFEST_DIR` (the crate root), so the directory is
//! embedded into the binary.  The database file location is determined at
//! runtime by the `REEL_DATABASE_URL` environment variable and is **not**
//! related to the current working directory at runtime.
//!
//! # Queries
//!
//! The `sqlx::query` (runtime-verified) form is used deliberately so that no
//! `DATABASE_URL` environment variable is needed at compile time.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::warn;

use reelforge_core::store::{ReelStore, StoreError};
use reelforge_core::Reel;

type ReelRow = (String, String, String, String, String, String, String);

/// SQLite-backed reel record store.
#[derive(Clone, Debug)]
pub struct SqliteReelStore {
    pool: SqlitePool,
}

impl SqliteReelStore {
    /// Open (or create) the SQLite database at `url` and run pending migrations.
    ///
    /// `url` should be a sqlx-compatible SQLite URL, e.g. `"sqlite://reels.db"`
    /// or `"sqlite::memory:"` for tests.
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        // In-memory SQLite gives each connection its own database, so the
        // pool must be capped at one connection for `sqlite::memory:`.
        let max_connections = if url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        // Path is resolved relative to CARGO_MANIFEST_DIR at compile time.
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    fn row_to_reel(row: ReelRow) -> Reel {
        let (id, title, subject, video_url, thumbnail_url, script, created_at) = row;
        Reel {
            id,
            title,
            subject,
            video_url,
            thumbnail_url,
            script,
            created_at: created_at
                .parse::<DateTime<Utc>>()
                .unwrap_or_else(|e| {
                    warn!(raw = %created_at, error = %e, "failed to parse reel created_at; using now");
                    Utc::now()
                }),
        }
    }
}

#[async_trait]
impl ReelStore for SqliteReelStore {
    async fn list(&self) -> Result<Vec<Reel>, StoreError> {
        let rows: Vec<ReelRow> = sqlx::query_as(
            "SELECT id, title, subject, video_url, thumbnail_url, script, created_at \
             FROM reels ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError(e.to_string()))?;
        Ok(rows.into_iter().map(Self::row_to_reel).collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Reel>, StoreError> {
        let row: Option<ReelRow> = sqlx::query_as(
            "SELECT id, title, subject, video_url, thumbnail_url, script, created_at \
             FROM reels WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError(e.to_string()))?;
        Ok(row.map(Self::row_to_reel))
    }

    async fn insert(&self, reel: &Reel) -> Result<(), StoreError> {
        let created_at = reel.created_at.to_rfc3339();
        sqlx::query(
            "INSERT INTO reels (id, title, subject, video_url, thumbnail_url, script, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&reel.id)
        .bind(&reel.title)
        .bind(&reel.subject)
        .bind(&reel.video_url)
        .bind(&reel.thumbnail_url)
        .bind(&reel.script)
        .bind(&created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM reels WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;
    use chrono::Duration;

    async fn memory_store() -> SqliteReelStore {
        SqliteReelStore::connect("sqlite::memory:")
            .await
            .expect("in-memory store")
    }

    fn reel(id: &str, created_at: DateTime<Utc>) -> Reel {
        Reel {
            id: id.to_owned(),
            title: "Pele - AI History Reel".to_owned(),
            subject: "Pele".to_owned(),
            video_url: format!("https://cdn/{id}.mp4"),
            thumbnail_url: "https://img/pele.jpg".to_owned(),
            script: "A legend of the game.".to_owned(),
            created_at,
        }
    }

    #[tokio::test]
    async fn insert_then_get_round_trips() {
        let store = memory_store().await;
        let original = reel("r-1", Utc::now());
        store.insert(&original).await.unwrap();

        let loaded = store.get("r-1").await.unwrap().expect("reel present");
        assert_eq!(loaded.id, original.id);
        assert_eq!(loaded.title, original.title);
        assert_eq!(loaded.subject, original.subject);
        assert_eq!(loaded.video_url, original.video_url);
        assert_eq!(loaded.thumbnail_url, original.thumbnail_url);
        assert_eq!(loaded.script, original.script);
        // RFC 3339 keeps sub-second precision, so timestamps survive.
        assert_eq!(loaded.created_at, original.created_at);
    }

    #[tokio::test]
    async fn get_missing_id_is_none() {
        let store = memory_store().await;
        assert!(store.get("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_returns_newest_first() {
        let store = memory_store().await;
        let now = Utc::now();
        store.insert(&reel("old", now - Duration::hours(2))).await.unwrap();
        store.insert(&reel("mid", now - Duration::hours(1))).await.unwrap();
        store.insert(&reel("new", now)).await.unwrap();

        let ids: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, ["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn delete_removes_exactly_one() {
        let store = memory_store().await;
        let now = Utc::now();
        store.insert(&reel("a", now)).await.unwrap();
        store.insert(&reel("b", now)).await.unwrap();

        assert!(store.delete("a").await.unwrap());
        let remaining = store.list().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, "b");
    }

    #[tokio::test]
    async fn delete_missing_id_reports_false_and_changes_nothing() {
        let store = memory_store().await;
        store.insert(&reel("a", Utc::now())).await.unwrap();

        assert!(!store.delete("missing").await.unwrap());
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let store = memory_store().await;
        let r = reel("dup", Utc::now());
        store.insert(&r).await.unwrap();
        assert!(store.insert(&r).await.is_err());
    }
}
