//! Per-collection mutual exclusion.

use crate::MediaKind;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockKey = (MediaKind, String);

/// Registry of one async mutex per `(kind, id)`.
///
/// Create, delete, metadata writes and detail reads hold the guard for the
/// whole operation, so two of them never interleave on the same collection.
/// Clones share the same registry. Entries nobody holds or waits on are
/// pruned on the next acquisition.
#[derive(Debug, Clone, Default)]
pub struct CollectionLocks {
    locks: Arc<Mutex<HashMap<LockKey, Arc<Mutex<()>>>>>,
}

impl CollectionLocks {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to collection `id` of `kind`.
    pub async fn acquire(&self, kind: MediaKind, id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry((kind, id.to_string())).or_default())
        };
        tracing::trace!(kind = %kind, id, "Waiting for collection lock");
        lock.lock_owned().await
    }

    /// Number of collections currently locked or awaited.
    pub async fn active(&self) -> usize {
        self.locks
            .lock()
            .await
            .values()
            .filter(|lock| Arc::strong_count(lock) > 1)
            .count()
    }
}
