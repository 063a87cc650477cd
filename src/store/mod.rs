//! Keyed in-process storage behind a trait, so short-lived state
//! (CSRF tokens, rate limit buckets) can move to a shared backend
//! without touching the middleware that uses it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub trait KeyedStore<V>: Send + Sync {
    fn get(&self, key: &str) -> Option<V>;
    fn set(&self, key: &str, value: V);
    fn remove(&self, key: &str) -> Option<V>;
    fn clear(&self);
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-local store backed by a mutexed map.
pub struct MemoryStore<V> {
    entries: Arc<Mutex<HashMap<String, V>>>,
}

impl<V> MemoryStore<V> {
    pub fn new() -> Self {
        MemoryStore {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<V> Default for MemoryStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for MemoryStore<V> {
    fn clone(&self) -> Self {
        MemoryStore {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<V: Clone + Send + Sync> KeyedStore<V> for MemoryStore<V> {
    fn get(&self, key: &str) -> Option<V> {
        self.entries
            .lock()
            .ok()
            .and_then(|map| map.get(key).cloned())
    }

    fn set(&self, key: &str, value: V) {
        if let Ok(mut map) = self.entries.lock() {
            map.insert(key.to_string(), value);
        }
    }

    fn remove(&self, key: &str) -> Option<V> {
        self.entries.lock().ok().and_then(|mut map| map.remove(key))
    }

    fn clear(&self) {
        if let Ok(mut map) = self.entries.lock() {
            map.clear();
        }
    }

    fn len(&self) -> usize {
        self.entries.lock().map(|map| map.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();
        store.set("a", 1u32);
        assert_eq!(store.get("a"), Some(1));
        assert_eq!(store.remove("a"), Some(1));
        assert_eq!(store.get("a"), None);
    }

    #[test]
    fn test_clones_share_state() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.set("k", "v".to_string());
        assert_eq!(other.get("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_clear() {
        let store = MemoryStore::new();
        store.set("a", 1u8);
        store.set("b", 2u8);
        assert_eq!(store.len(), 2);
        store.clear();
        assert!(store.is_empty());
    }
}
