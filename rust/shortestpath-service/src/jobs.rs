//! Background searches addressable by id.

use lru::LruCache;
use shortestpath_core::SearchHandle;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

pub struct SearchRegistry {
    searches: Mutex<LruCache<u64, SearchHandle>>,
    next_id: AtomicU64,
}

impl SearchRegistry {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self { searches: Mutex::new(LruCache::new(capacity)), next_id: AtomicU64::new(1) }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<u64, SearchHandle>> {
        // handles stay valid even if another request panicked while holding the lock
        self.searches.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Registers a running search. When the registry is full the least recently used search
    /// is cancelled and forgotten.
    pub fn insert(&self, handle: SearchHandle) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if let Some((evicted_id, evicted)) = self.lock().push(id, handle) {
            if evicted_id != id {
                evicted.cancel();
                debug!(evicted_id, "search evicted");
            }
        }
        id
    }

    pub fn get(&self, id: u64) -> Option<SearchHandle> {
        self.lock().get(&id).cloned()
    }

    /// Cancels and forgets a search.
    pub fn remove(&self, id: u64) -> Option<SearchHandle> {
        let handle = self.lock().pop(&id)?;
        handle.cancel();
        Some(handle)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
