use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;

use crate::domain::HistoryRecord;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store lock poisoned")]
    LockPoisoned,
    #[error("background task failed: {0}")]
    Task(String),
    #[error("history worker stopped")]
    WorkerStopped,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Every record in the store, newest first.
pub type Snapshot = Arc<Vec<HistoryRecord>>;

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Inserts, replacing any record with the same id.
    async fn insert(&self, record: HistoryRecord) -> StoreResult<()>;

    /// Removes the record with `record.id`; absent records are not an error.
    async fn delete(&self, record: &HistoryRecord) -> StoreResult<()>;

    /// Removes every record, returning how many were removed. The emptiness
    /// check and the delete are one step; an empty store is not written to.
    async fn clear(&self) -> StoreResult<usize>;

    async fn get_by_id(&self, id: &str) -> StoreResult<Option<HistoryRecord>>;

    async fn count(&self) -> StoreResult<usize>;

    /// Live view, republished after every successful mutation.
    fn observe_all(&self) -> watch::Receiver<Snapshot>;
}
