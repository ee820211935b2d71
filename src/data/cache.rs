//! Single-flight load cache keyed by file path
//!
//! Each key owns a slot guarded by its own mutex. The first caller for a key
//! performs the load while holding the slot lock; concurrent callers for the
//! same key block on that lock and then share the stored `Arc`. Different
//! keys never contend. A failed load leaves the slot empty so a later call
//! can retry.

use crate::error::Result;
use dashmap::DashMap;
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

type Slot<T> = Arc<Mutex<Option<Arc<T>>>>;

pub struct SingleFlight<T> {
    slots: DashMap<PathBuf, Slot<T>>,
    loads: AtomicUsize,
}

impl<T> Default for SingleFlight<T> {
    fn default() -> Self {
        Self {
            slots: DashMap::new(),
            loads: AtomicUsize::new(0),
        }
    }
}

impl<T> SingleFlight<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load<F>(&self, key: &Path, load: F) -> Result<Arc<T>>
    where
        F: FnOnce(&Path) -> Result<T>,
    {
        // Clone the slot out so the map shard isn't held while loading
        let slot: Slot<T> = self.slots.entry(key.to_path_buf()).or_default().clone();

        // A panic inside a previous load leaves the slot empty, which is safe to reuse
        let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(value) = guard.as_ref() {
            debug!("cache hit: {}", key.display());
            return Ok(Arc::clone(value));
        }

        self.loads.fetch_add(1, Ordering::SeqCst);
        let value = Arc::new(load(key)?);
        *guard = Some(Arc::clone(&value));
        Ok(value)
    }

    /// Number of loads attempted (hits excluded).
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}
