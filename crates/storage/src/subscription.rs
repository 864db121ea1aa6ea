//! Live document subscriptions shared by every storage backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use sheguard_core::model::DocPath;
use tokio::sync::mpsc;

use crate::document::{Document, DocumentSnapshot};
use crate::repository::StorageError;

type Delivery = Result<DocumentSnapshot, StorageError>;

struct Subscriber {
    path: DocPath,
    tx: mpsc::UnboundedSender<Delivery>,
}

#[derive(Default)]
struct HubInner {
    next_id: AtomicU64,
    subscribers: Mutex<HashMap<u64, Subscriber>>,
}

/// Registry of open subscriptions. Backends publish every committed write here.
///
/// Backends must serialize "read current state + register" against
/// "commit write + publish" so a subscriber never misses or reorders a write.
#[derive(Clone, Default)]
pub struct SubscriptionHub {
    inner: Arc<HubInner>,
}

impl SubscriptionHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber and queue the current state as its first snapshot.
    #[must_use]
    pub fn register(&self, path: DocPath, current: Option<Document>) -> DocumentSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let _ = tx.send(Ok(DocumentSnapshot {
            path: path.clone(),
            data: current,
        }));
        if let Ok(mut guard) = self.inner.subscribers.lock() {
            guard.insert(
                id,
                Subscriber {
                    path: path.clone(),
                    tx,
                },
            );
        }
        DocumentSubscription {
            id,
            path,
            rx,
            hub: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver the new state of `path` to every subscriber of that path.
    pub fn publish(&self, path: &DocPath, data: Option<&Document>) {
        self.deliver(path, |snapshot_path| {
            Ok(DocumentSnapshot {
                path: snapshot_path.clone(),
                data: data.cloned(),
            })
        });
    }

    /// Deliver a read failure to every subscriber of `path`.
    pub fn publish_error(&self, path: &DocPath, err: &StorageError) {
        self.deliver(path, |_| Err(err.clone()));
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .lock()
            .map(|guard| guard.len())
            .unwrap_or(0)
    }

    fn deliver(&self, path: &DocPath, make: impl Fn(&DocPath) -> Delivery) {
        let Ok(mut guard) = self.inner.subscribers.lock() else {
            return;
        };
        guard.retain(|id, sub| {
            if &sub.path != path {
                return true;
            }
            let open = sub.tx.send(make(&sub.path)).is_ok();
            if !open {
                tracing::debug!(subscription = *id, %path, "pruning closed subscription");
            }
            open
        });
    }
}

/// Handle for one live subscription. Dropping it (or calling `unsubscribe`)
/// deregisters it; nothing is delivered afterwards.
pub struct DocumentSubscription {
    id: u64,
    path: DocPath,
    rx: mpsc::UnboundedReceiver<Delivery>,
    hub: Weak<HubInner>,
}

impl DocumentSubscription {
    #[must_use]
    pub fn path(&self) -> &DocPath {
        &self.path
    }

    /// Wait for the next snapshot. Returns `None` once the store is gone.
    pub async fn next(&mut self) -> Option<Delivery> {
        self.rx.recv().await
    }

    /// Release the subscription explicitly.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for DocumentSubscription {
    fn drop(&mut self) {
        if let Some(inner) = self.hub.upgrade() {
            if let Ok(mut guard) = inner.subscribers.lock() {
                guard.remove(&self.id);
            }
        }
        self.rx.close();
    }
}

impl std::fmt::Debug for DocumentSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentSubscription")
            .field("id", &self.id)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
