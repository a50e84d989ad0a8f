use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::watch;

use super::traits::{HistoryStore, Snapshot, StoreError, StoreResult};
use crate::domain::{Argb, HistoryRecord};

const SCHEMA_VERSION: i32 = 1;

const SELECT_COLUMNS: &str =
    "SELECT id, category, payload, created_at, foreground_color, background_color FROM history";

/// SQLite-backed history. Every mutation and the snapshot it publishes happen
/// under one connection lock, so observers never see snapshots out of order.
pub struct SqliteHistoryStore {
    conn: Arc<Mutex<Connection>>,
    snapshot_tx: Arc<watch::Sender<Snapshot>>,
}

impl SqliteHistoryStore {
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        let store = Self::from_connection(conn)?;
        tracing::info!(
            "Opened history database at {} ({} records)",
            path.display(),
            store.snapshot_tx.borrow().len()
        );
        Ok(store)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        init_schema(&conn)?;
        let initial = load_all(&conn)?;
        let (snapshot_tx, _) = watch::channel(Arc::new(initial));
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            snapshot_tx: Arc::new(snapshot_tx),
        })
    }

    async fn run<T, F>(&self, op: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| StoreError::LockPoisoned)?;
            op(&guard)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }

    /// Runs a write returning the number of affected rows and republishes the
    /// snapshot when anything changed.
    async fn mutate<F>(&self, op: F) -> StoreResult<usize>
    where
        F: FnOnce(&Connection) -> StoreResult<usize> + Send + 'static,
    {
        let snapshot_tx = Arc::clone(&self.snapshot_tx);
        self.run(move |conn| {
            let affected = op(conn)?;
            if affected > 0 {
                let records = load_all(conn)?;
                snapshot_tx.send_replace(Arc::new(records));
            }
            Ok(affected)
        })
        .await
    }
}

#[async_trait]
impl HistoryStore for SqliteHistoryStore {
    async fn insert(&self, record: HistoryRecord) -> StoreResult<()> {
        self.mutate(move |conn| {
            let affected = conn.execute(
                "INSERT OR REPLACE INTO history
                    (id, category, payload, created_at, foreground_color, background_color)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.id(),
                    record.category(),
                    record.payload(),
                    record.created_at(),
                    record.foreground_color().to_stored(),
                    record.background_color().to_stored(),
                ],
            )?;
            Ok(affected)
        })
        .await?;
        Ok(())
    }

    async fn delete(&self, record: &HistoryRecord) -> StoreResult<()> {
        let id = record.id().to_string();
        self.mutate(move |conn| Ok(conn.execute("DELETE FROM history WHERE id = ?1", [id])?))
            .await?;
        Ok(())
    }

    async fn clear(&self) -> StoreResult<usize> {
        self.mutate(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM history", [], |r| r.get(0))?;
            if count == 0 {
                return Ok(0);
            }
            Ok(conn.execute("DELETE FROM history", [])?)
        })
        .await
    }

    async fn get_by_id(&self, id: &str) -> StoreResult<Option<HistoryRecord>> {
        let id = id.to_string();
        self.run(move |conn| {
            let record = conn
                .query_row(&format!("{SELECT_COLUMNS} WHERE id = ?1"), [id], map_row)
                .optional()?;
            Ok(record)
        })
        .await
    }

    async fn count(&self) -> StoreResult<usize> {
        self.run(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM history", [], |r| r.get(0))?;
            Ok(usize::try_from(count).unwrap_or(0))
        })
        .await
    }

    fn observe_all(&self) -> watch::Receiver<Snapshot> {
        self.snapshot_tx.subscribe()
    }
}

fn init_schema(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS history (
            id                TEXT    PRIMARY KEY NOT NULL,
            category          TEXT    NOT NULL,
            payload           TEXT    NOT NULL,
            created_at        TEXT    NOT NULL,
            foreground_color  INTEGER NOT NULL DEFAULT 4278190080,
            background_color  INTEGER NOT NULL DEFAULT 4294967295
        );",
    )?;
    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    Ok(())
}

/// Newest first; `INSERT OR REPLACE` assigns a fresh rowid, so a replaced
/// record moves to the front.
fn load_all(conn: &Connection) -> StoreResult<Vec<HistoryRecord>> {
    let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY rowid DESC"))?;
    let rows = stmt.query_map([], map_row)?;
    let mut records = Vec::new();
    for row in rows {
        records.push(row?);
    }
    Ok(records)
}

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<HistoryRecord> {
    Ok(HistoryRecord::from_parts(
        row.get::<_, String>(0)?,
        row.get::<_, String>(1)?,
        row.get::<_, String>(2)?,
        row.get::<_, String>(3)?,
        Argb::from_stored(row.get(4)?),
        Argb::from_stored(row.get(5)?),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(id: &str, category: &str, payload: &str) -> HistoryRecord {
        HistoryRecord::with_id(id, category, payload, Argb::BLACK, Argb::WHITE)
    }

    #[tokio::test]
    async fn insert_and_get_round_trip() {
        let store = SqliteHistoryStore::open_in_memory().expect("open");
        let rec = HistoryRecord::with_id(
            "a",
            "URL QR",
            "https://example.com",
            Argb(0xFF6F_4E37),
            Argb::WHITE,
        );
        store.insert(rec.clone()).await.expect("insert");

        let fetched = store.get_by_id("a").await.expect("get").expect("present");
        assert_eq!(fetched, rec);
        assert!(store.get_by_id("missing").await.expect("get").is_none());
    }

    #[tokio::test]
    async fn insert_replaces_on_conflict() {
        let store = SqliteHistoryStore::open_in_memory().expect("open");
        store.insert(record("same", "Text QR", "first")).await.expect("insert");
        store.insert(record("same", "URL QR", "second")).await.expect("insert");

        assert_eq!(store.count().await.expect("count"), 1);
        let fetched = store.get_by_id("same").await.expect("get").expect("present");
        assert_eq!(fetched.category(), "URL QR");
        assert_eq!(fetched.payload(), "second");
    }

    #[tokio::test]
    async fn replaced_record_moves_to_front() {
        let store = SqliteHistoryStore::open_in_memory().expect("open");
        store.insert(record("a", "Text QR", "A")).await.expect("insert");
        store.insert(record("b", "Text QR", "B")).await.expect("insert");
        store.insert(record("a", "Text QR", "A again")).await.expect("insert");

        let rx = store.observe_all();
        let ids: Vec<String> = rx.borrow().iter().map(|r| r.id().to_string()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(rx.borrow()[0].payload(), "A again");
    }

    #[tokio::test]
    async fn observe_all_is_newest_first() {
        let store = SqliteHistoryStore::open_in_memory().expect("open");
        let rx = store.observe_all();
        assert!(rx.borrow().is_empty());

        store.insert(record("a", "Text QR", "A")).await.expect("insert");
        store.insert(record("b", "Text QR", "B")).await.expect("insert");

        let ids: Vec<String> = rx.borrow().iter().map(|r| r.id().to_string()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn delete_absent_is_noop() {
        let store = SqliteHistoryStore::open_in_memory().expect("open");
        store.insert(record("a", "Text QR", "A")).await.expect("insert");
        let rx = store.observe_all();

        store.delete(&record("zzz", "Text QR", "")).await.expect("delete");

        assert_eq!(store.count().await.expect("count"), 1);
        assert!(!rx.has_changed().expect("sender alive"));
    }

    #[tokio::test]
    async fn delete_and_clear_publish_snapshots() {
        let store = SqliteHistoryStore::open_in_memory().expect("open");
        let a = record("a", "Text QR", "A");
        store.insert(a.clone()).await.expect("insert");
        store.insert(record("b", "Text QR", "B")).await.expect("insert");
        let rx = store.observe_all();

        store.delete(&a).await.expect("delete");
        assert_eq!(rx.borrow().len(), 1);

        assert_eq!(store.clear().await.expect("clear"), 1);
        assert!(rx.borrow().is_empty());
        assert_eq!(store.clear().await.expect("clear"), 0);
    }

    #[tokio::test]
    async fn clearing_empty_store_publishes_nothing() {
        let store = SqliteHistoryStore::open_in_memory().expect("open");
        let rx = store.observe_all();
        assert_eq!(store.clear().await.expect("clear"), 0);
        assert!(!rx.has_changed().expect("sender alive"));
    }

    #[tokio::test]
    async fn records_survive_reopen() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("nested").join("history.db");
        {
            let store = SqliteHistoryStore::open(&path).expect("open");
            store.insert(record("a", "WiFi QR", "WIFI:S:x;T:none;;")).await.expect("insert");
        }

        let store = SqliteHistoryStore::open(&path).expect("reopen");
        let rx = store.observe_all();
        assert_eq!(rx.borrow().len(), 1);
        assert_eq!(rx.borrow()[0].category(), "WiFi QR");
    }

    #[tokio::test]
    async fn signed_colors_from_older_rows_are_masked() {
        let store = SqliteHistoryStore::open_in_memory().expect("open");
        store
            .run(|conn| {
                conn.execute(
                    "INSERT INTO history VALUES ('legacy', 'Scanned', 'x', '2024-01-01 00:00', -16777216, -1)",
                    [],
                )?;
                Ok(())
            })
            .await
            .expect("raw insert");

        let fetched = store.get_by_id("legacy").await.expect("get").expect("present");
        assert_eq!(fetched.foreground_color(), Argb::BLACK);
        assert_eq!(fetched.background_color(), Argb::WHITE);
    }
}
