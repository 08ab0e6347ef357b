use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// One async mutex per catalog entry id, created on demand and dropped once
/// nobody holds or waits for it.
#[derive(Default)]
pub struct EntryLocks {
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

/// Held for the whole duration of an operation on one entry.
pub struct EntryGuard<'a> {
    locks: &'a EntryLocks,
    id: Uuid,
    guard: Option<OwnedMutexGuard<()>>,
}

impl EntryLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, id: Uuid) -> EntryGuard<'_> {
        let mutex = self.locks.entry(id).or_default().clone();
        let guard = mutex.lock_owned().await;
        EntryGuard {
            locks: self,
            id,
            guard: Some(guard),
        }
    }

    /// Number of ids with a live lock.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl Drop for EntryGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Waiters hold a clone, so a count of one means the map owns the only reference.
        self.locks
            .locks
            .remove_if(&self.id, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}
