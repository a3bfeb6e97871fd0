use futures::future::{AbortHandle, AbortRegistration};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Tracks in-flight requests by dedup key. Registering a key that is already
/// in flight aborts the older request; only the newest one may complete.
#[derive(Default)]
pub struct InFlightRegistry {
    entries: Mutex<HashMap<String, (u64, AbortHandle)>>,
    next_id: AtomicU64,
}

/// Removes its entry on drop, unless a newer request has taken the key.
pub struct InFlightGuard<'a> {
    registry: &'a InFlightRegistry,
    key: String,
    id: u64,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut entries = self.registry.lock();
        if entries.get(&self.key).is_some_and(|(id, _)| *id == self.id) {
            entries.remove(&self.key);
        }
    }
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, (u64, AbortHandle)>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Registers `key`, aborting any earlier request with the same key.
    /// Returns `true` in the tuple when an earlier request was superseded.
    pub fn register(&self, key: &str) -> (InFlightGuard<'_>, AbortRegistration, bool) {
        let (handle, registration) = AbortHandle::new_pair();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let previous = self.lock().insert(key.to_string(), (id, handle));
        let superseded = match previous {
            Some((_, earlier)) => {
                earlier.abort();
                true
            }
            None => false,
        };
        let guard = InFlightGuard {
            registry: self,
            key: key.to_string(),
            id,
        };
        (guard, registration, superseded)
    }

    /// Aborts every in-flight request, e.g. on logout. Returns how many.
    pub fn cancel_all(&self) -> usize {
        let drained: Vec<_> = self.lock().drain().collect();
        for (_, (_, handle)) in &drained {
            handle.abort();
        }
        drained.len()
    }

    pub fn in_flight(&self) -> usize {
        self.lock().len()
    }
}
