use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};

use crate::action::Action;
use crate::domain::{classify, ClassificationRule, HistoryRecord, RenderColors};
use crate::store::{HistoryStore, Snapshot, StoreError, StoreResult};

/// Result of a clear. `AlreadyEmpty` means nothing was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    Cleared(usize),
    AlreadyEmpty,
}

impl ClearOutcome {
    pub fn performed(&self) -> bool {
        matches!(self, Self::Cleared(_))
    }
}

#[derive(Debug)]
pub enum HistoryRequest {
    Insert(HistoryRecord),
    Remove {
        id: String,
    },
    /// With a reply channel the outcome goes back to the caller, otherwise
    /// it is reported as [`Action::HistoryCleared`].
    Clear {
        reply: Option<oneshot::Sender<StoreResult<ClearOutcome>>>,
    },
}

/// A record paired with the icon and accent it is displayed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryItem {
    pub record: HistoryRecord,
    pub rule: &'static ClassificationRule,
}

pub fn decorate(records: &[HistoryRecord]) -> Vec<HistoryItem> {
    records
        .iter()
        .map(|record| HistoryItem {
            rule: classify(record.category()),
            record: record.clone(),
        })
        .collect()
}

/// Front door to the history. Writes are fire-and-forget and applied in call
/// order by [`HistoryWorker`]; reads go straight to the store.
#[derive(Clone)]
pub struct HistoryManager {
    store: Arc<dyn HistoryStore>,
    tx: mpsc::UnboundedSender<HistoryRequest>,
    colors: RenderColors,
}

impl HistoryManager {
    pub fn new(
        store: Arc<dyn HistoryStore>,
        colors: RenderColors,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> (Self, HistoryWorker) {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = HistoryWorker {
            store: Arc::clone(&store),
            rx,
            action_tx,
        };
        let manager = Self { store, tx, colors };
        (manager, worker)
    }

    pub fn default_colors(&self) -> RenderColors {
        self.colors
    }

    /// Queues a record with the default colors and returns it.
    pub fn add(&self, category: &str, payload: &str) -> HistoryRecord {
        self.add_with_colors(category, payload, self.colors)
    }

    pub fn add_with_colors(
        &self,
        category: &str,
        payload: &str,
        colors: RenderColors,
    ) -> HistoryRecord {
        let record = HistoryRecord::new(category, payload, colors.foreground, colors.background);
        self.send(HistoryRequest::Insert(record.clone()));
        record
    }

    /// Queues removal of `id`. Unknown ids are ignored.
    pub fn remove(&self, id: &str) {
        self.send(HistoryRequest::Remove { id: id.to_string() });
    }

    /// Queues a clear; the outcome comes back as [`Action::HistoryCleared`].
    pub fn request_clear(&self) {
        self.send(HistoryRequest::Clear { reply: None });
    }

    pub async fn get(&self, id: &str) -> StoreResult<Option<HistoryRecord>> {
        self.store.get_by_id(id).await
    }

    /// Clears after every write queued before it, and waits for the outcome.
    pub async fn clear(&self) -> StoreResult<ClearOutcome> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(HistoryRequest::Clear { reply: Some(reply) })
            .map_err(|_| StoreError::WorkerStopped)?;
        rx.await.map_err(|_| StoreError::WorkerStopped)?
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.store.observe_all()
    }

    /// The current snapshot, decorated.
    pub fn items(&self) -> Vec<HistoryItem> {
        let rx = self.store.observe_all();
        let snapshot = rx.borrow().clone();
        decorate(&snapshot)
    }

    fn send(&self, request: HistoryRequest) {
        if self.tx.send(request).is_err() {
            tracing::warn!("history worker stopped; request dropped");
        }
    }
}

async fn clear_store(store: &dyn HistoryStore) -> StoreResult<ClearOutcome> {
    match store.clear().await? {
        0 => Ok(ClearOutcome::AlreadyEmpty),
        removed => Ok(ClearOutcome::Cleared(removed)),
    }
}

pub struct HistoryWorker {
    store: Arc<dyn HistoryStore>,
    rx: mpsc::UnboundedReceiver<HistoryRequest>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl HistoryWorker {
    /// Applies requests until every [`HistoryManager`] clone is dropped and
    /// the queue is empty.
    pub async fn run(mut self) {
        while let Some(request) = self.rx.recv().await {
            if let Some(action) = self.process(request).await {
                if let Err(e) = self.action_tx.send(action) {
                    tracing::warn!("UI gone; dropping history notification {:?}", e.0);
                }
            }
        }
        tracing::debug!("history worker exiting");
    }

    async fn process(&self, request: HistoryRequest) -> Option<Action> {
        match request {
            HistoryRequest::Insert(record) => {
                let id = record.id().to_string();
                match self.store.insert(record).await {
                    Ok(()) => {
                        tracing::debug!("saved history record {}", id);
                        None
                    }
                    Err(e) => {
                        tracing::error!("failed to save history record {}: {}", id, e);
                        Some(Action::Error(format!("Failed to save to history: {}", e)))
                    }
                }
            }
            HistoryRequest::Remove { id } => {
                let record = match self.store.get_by_id(&id).await {
                    Ok(Some(record)) => record,
                    Ok(None) => return None,
                    Err(e) => {
                        tracing::error!("failed to look up history record {}: {}", id, e);
                        return Some(Action::Error(format!("Failed to delete item: {}", e)));
                    }
                };
                match self.store.delete(&record).await {
                    Ok(()) => None,
                    Err(e) => {
                        tracing::error!("failed to delete history record {}: {}", id, e);
                        Some(Action::Error(format!("Failed to delete item: {}", e)))
                    }
                }
            }
            HistoryRequest::Clear { reply } => {
                let result = clear_store(self.store.as_ref()).await;
                match &result {
                    Ok(outcome) => tracing::info!("history clear: {:?}", outcome),
                    Err(e) => tracing::error!("failed to clear history: {}", e),
                }
                if let Some(reply) = reply {
                    // The caller may have stopped waiting
                    let _ = reply.send(result);
                    return None;
                }
                Some(match result {
                    Ok(outcome) => Action::HistoryCleared(outcome),
                    Err(e) => Action::Error(format!("Failed to clear history: {}", e)),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Argb, CategoryKey};
    use crate::store::{SqliteHistoryStore, StoreError};
    use async_trait::async_trait;

    fn setup() -> (HistoryManager, mpsc::UnboundedReceiver<Action>) {
        let store = Arc::new(SqliteHistoryStore::open_in_memory().expect("open"));
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (manager, worker) = HistoryManager::new(store, RenderColors::default(), action_tx);
        tokio::spawn(worker.run());
        (manager, action_rx)
    }

    async fn wait_for_len(rx: &mut watch::Receiver<Snapshot>, len: usize) {
        rx.wait_for(|records| records.len() == len)
            .await
            .expect("store alive");
    }

    #[tokio::test]
    async fn add_then_get() {
        let (manager, _actions) = setup();
        let mut rx = manager.subscribe();

        let record = manager.add("URL QR", "https://example.com");
        assert_eq!(record.foreground_color(), Argb::BLACK);
        assert_eq!(record.background_color(), Argb::WHITE);
        wait_for_len(&mut rx, 1).await;

        let fetched = manager.get(record.id()).await.expect("get");
        assert_eq!(fetched, Some(record));
    }

    #[tokio::test]
    async fn writes_apply_in_call_order() {
        let (manager, _actions) = setup();
        let mut rx = manager.subscribe();

        let a = manager.add("Text QR", "A");
        let b = manager.add("Text QR", "B");
        wait_for_len(&mut rx, 2).await;

        let ids: Vec<String> = manager
            .items()
            .iter()
            .map(|i| i.record.id().to_string())
            .collect();
        assert_eq!(ids, vec![b.id().to_string(), a.id().to_string()]);
    }

    #[tokio::test]
    async fn remove_unknown_id_is_ignored() {
        let (manager, mut actions) = setup();
        let mut rx = manager.subscribe();
        manager.add("Text QR", "keep");
        wait_for_len(&mut rx, 1).await;

        manager.remove("does-not-exist");
        manager.add("Text QR", "marker");
        wait_for_len(&mut rx, 2).await;

        assert!(actions.try_recv().is_err());
    }

    #[tokio::test]
    async fn remove_deletes_record() {
        let (manager, _actions) = setup();
        let mut rx = manager.subscribe();
        let record = manager.add("SMS QR", "smsto:123");
        wait_for_len(&mut rx, 1).await;

        manager.remove(record.id());
        wait_for_len(&mut rx, 0).await;
        assert_eq!(manager.get(record.id()).await.expect("get"), None);
    }

    #[tokio::test]
    async fn clear_reports_whether_anything_was_removed() {
        let (manager, _actions) = setup();
        assert_eq!(manager.clear().await.expect("clear"), ClearOutcome::AlreadyEmpty);

        let mut rx = manager.subscribe();
        manager.add("Text QR", "A");
        manager.add("Text QR", "B");
        wait_for_len(&mut rx, 2).await;

        let outcome = manager.clear().await.expect("clear");
        assert_eq!(outcome, ClearOutcome::Cleared(2));
        assert!(outcome.performed());
        assert!(manager.items().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn clear_waits_for_queued_adds() {
        let (manager, _actions) = setup();
        for _ in 0..50 {
            let record = manager.add("Text QR", "A");
            assert_eq!(manager.clear().await.expect("clear"), ClearOutcome::Cleared(1));
            assert_eq!(manager.get(record.id()).await.expect("get"), None);
        }
        assert!(manager.items().is_empty());
    }

    #[tokio::test]
    async fn queued_writes_survive_a_closed_ui_channel() {
        let store = Arc::new(SqliteHistoryStore::open_in_memory().expect("open"));
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (manager, worker) =
            HistoryManager::new(store.clone(), RenderColors::default(), action_tx);
        drop(action_rx);

        // The clear outcome has nowhere to go; later writes must still land.
        manager.request_clear();
        manager.add("Text QR", "A");
        manager.add("Text QR", "B");
        drop(manager);
        worker.run().await;

        assert_eq!(store.count().await.expect("count"), 2);
    }

    #[tokio::test]
    async fn queued_clear_reports_outcome() {
        let (manager, mut actions) = setup();
        manager.request_clear();
        match actions.recv().await {
            Some(Action::HistoryCleared(ClearOutcome::AlreadyEmpty)) => {}
            other => panic!("unexpected action: {:?}", other),
        }

        manager.add("Text QR", "A");
        manager.request_clear();
        match actions.recv().await {
            Some(Action::HistoryCleared(ClearOutcome::Cleared(1))) => {}
            other => panic!("unexpected action: {:?}", other),
        }
    }

    #[tokio::test]
    async fn items_carry_classification() {
        let (manager, _actions) = setup();
        let mut rx = manager.subscribe();
        manager.add("Scanned QR", "hello");
        manager.add("Email QR", "mailto:a@b.com");
        wait_for_len(&mut rx, 2).await;

        let keys: Vec<CategoryKey> = manager.items().iter().map(|i| i.rule.key).collect();
        assert_eq!(keys, vec![CategoryKey::Email, CategoryKey::Scanned]);
    }

    struct FailingStore {
        tx: watch::Sender<Snapshot>,
    }

    #[async_trait]
    impl HistoryStore for FailingStore {
        async fn insert(&self, _record: HistoryRecord) -> StoreResult<()> {
            Err(StoreError::LockPoisoned)
        }
        async fn delete(&self, _record: &HistoryRecord) -> StoreResult<()> {
            Err(StoreError::LockPoisoned)
        }
        async fn clear(&self) -> StoreResult<usize> {
            Err(StoreError::LockPoisoned)
        }
        async fn get_by_id(&self, _id: &str) -> StoreResult<Option<HistoryRecord>> {
            Ok(None)
        }
        async fn count(&self) -> StoreResult<usize> {
            Ok(1)
        }
        fn observe_all(&self) -> watch::Receiver<Snapshot> {
            self.tx.subscribe()
        }
    }

    #[tokio::test]
    async fn write_failures_surface_as_errors() {
        let (tx, _) = watch::channel(Arc::new(Vec::new()));
        let store = Arc::new(FailingStore { tx });
        let (action_tx, mut actions) = mpsc::unbounded_channel();
        let (manager, worker) = HistoryManager::new(store, RenderColors::default(), action_tx);
        tokio::spawn(worker.run());

        manager.add("Text QR", "lost");
        match actions.recv().await {
            Some(Action::Error(msg)) => assert!(msg.contains("Failed to save")),
            other => panic!("unexpected action: {:?}", other),
        }

        manager.request_clear();
        match actions.recv().await {
            Some(Action::Error(msg)) => assert!(msg.contains("Failed to clear")),
            other => panic!("unexpected action: {:?}", other),
        }
    }
}
