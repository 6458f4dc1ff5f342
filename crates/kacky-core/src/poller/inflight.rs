use std::collections::HashSet;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};

/// Admits at most one outstanding request per key.
///
/// `try_acquire` hands out a ticket while no other ticket for the same key
/// is alive; dropping the ticket releases the key. Callers that fail to
/// acquire should coalesce into the outstanding request, not queue.
pub struct InFlightGuard<K> {
    keys: Arc<Mutex<HashSet<K>>>,
}

impl<K> Clone for InFlightGuard<K> {
    fn clone(&self) -> Self {
        Self {
            keys: Arc::clone(&self.keys),
        }
    }
}

impl<K: Hash + Eq + Clone> Default for InFlightGuard<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq + Clone> InFlightGuard<K> {
    pub fn new() -> Self {
        Self {
            keys: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Claim `key`, or `None` if a request for it is already in flight.
    pub fn try_acquire(&self, key: &K) -> Option<InFlightTicket<K>> {
        let mut keys = lock(&self.keys);
        if !keys.insert(key.clone()) {
            return None;
        }
        Some(InFlightTicket {
            key: key.clone(),
            keys: Arc::clone(&self.keys),
        })
    }

    pub fn is_in_flight(&self, key: &K) -> bool {
        lock(&self.keys).contains(key)
    }

    /// Number of keys currently in flight.
    pub fn len(&self) -> usize {
        lock(&self.keys).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Proof of an in-flight request. Releases its key on drop.
pub struct InFlightTicket<K: Hash + Eq> {
    key: K,
    keys: Arc<Mutex<HashSet<K>>>,
}

impl<K: Hash + Eq> Drop for InFlightTicket<K> {
    fn drop(&mut self) {
        lock(&self.keys).remove(&self.key);
    }
}

// The set is only touched by insert/remove, so a poisoned lock still
// holds a consistent set.
fn lock<K>(keys: &Mutex<HashSet<K>>) -> MutexGuard<'_, HashSet<K>> {
    keys.lock().unwrap_or_else(|e| e.into_inner())
}
