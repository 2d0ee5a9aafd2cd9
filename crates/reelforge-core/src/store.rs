//! Reel record store abstraction.
//!
//! The pipeline inserts finished reels through this trait and the HTTP
//! layer lists/deletes through it; the concrete backend (SQLite in the
//! server binary) is injected at startup. Implement [`ReelStore`] for
//! another database to swap backends without touching pipeline code.

use async_trait::async_trait;
use thiserror::Error;

use crate::error::PipelineError;
use crate::types::Reel;

/// A transport/backend failure inside the record store. Distinct from
/// "record not found", which [`ReelStore::delete`] signals with `false`.
#[derive(Debug, Error)]
#[error("record store error: {0}")]
pub struct StoreError(pub String);

impl From<StoreError> for PipelineError {
    fn from(e: StoreError) -> Self {
        PipelineError::Persistence(e.to_string())
    }
}

/// Persistent list of reel metadata records.
#[async_trait]
pub trait ReelStore: Send + Sync {
    /// All reels, newest-first by creation time.
    async fn list(&self) -> Result<Vec<Reel>, StoreError>;

    /// Fetch one reel by id.
    async fn get(&self, id: &str) -> Result<Option<Reel>, StoreError>;

    /// Insert a finished reel. Atomic from the caller's perspective;
    /// concurrent inserts from independent runs never corrupt the list.
    async fn insert(&self, reel: &Reel) -> Result<(), StoreError>;

    /// Delete by id. Returns `false` when the id was absent — callers
    /// distinguish "nothing to delete" from a backend error.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;
}
