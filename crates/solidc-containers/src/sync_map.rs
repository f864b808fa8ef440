//! Mutex-guarded hash map
//!
//! [`SyncMap`] wraps a [`HashMap`] in a per-map mutex. Each method holds the
//! lock for exactly one operation, so a `get` followed by a `set` is still a
//! race; use [`SyncMap::with_lock`] when several steps must be atomic.

use parking_lot::Mutex;

use crate::hash::MapKey;
use crate::map::{HashMap, MapConfig};
use crate::MapResult;

/// A [`HashMap`] safe to share between threads.
#[derive(Debug)]
pub struct SyncMap<K, V> {
    inner: Mutex<HashMap<K, V>>,
}

impl<K: MapKey, V> SyncMap<K, V> {
    /// Empty map with the default configuration.
    pub fn new() -> Self {
        Self::from_map(HashMap::new())
    }
}

impl<K: MapKey, V> Default for SyncMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> SyncMap<K, V> {
    /// Build from an explicit configuration.
    pub fn with_config(config: MapConfig<K>) -> MapResult<Self> {
        HashMap::with_config(config).map(Self::from_map)
    }

    /// Take ownership of an existing map.
    pub fn from_map(map: HashMap<K, V>) -> Self {
        Self {
            inner: Mutex::new(map),
        }
    }

    /// Insert or update under the lock.
    pub fn set(&self, key: K, value: V) -> MapResult<Option<V>> {
        self.inner.lock().set(key, value)
    }

    /// Clone out the value bound to `key`.
    pub fn get_cloned(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    /// Remove under the lock.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.lock().remove(key)
    }

    /// True if `key` is bound.
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.lock().contains_key(key)
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// True if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Run `f` with the lock held for its whole duration.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut HashMap<K, V>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Release the mutex and return the map.
    pub fn into_inner(self) -> HashMap<K, V> {
        self.inner.into_inner()
    }
}
