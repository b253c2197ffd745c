//! InMemoryKeyedStore - HashMap-backed keyed store for hosts without a
//! fetching library, and for tests.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[cfg(feature = "emitter")]
use std::sync::Mutex;

#[cfg(feature = "emitter")]
use event_emitter_rs::EventEmitter;
use serde_json::Value;

use super::KeyedStore;
use crate::error::StoreError;
use crate::key::CacheKey;

/// In-memory keyed store backed by a HashMap.
///
/// Clone-friendly via Arc: clones share the same slots and subscribers.
#[derive(Clone)]
pub struct InMemoryKeyedStore {
    storage: Arc<RwLock<HashMap<CacheKey, Value>>>,
    #[cfg(feature = "emitter")]
    emitter: Arc<Mutex<EventEmitter>>,
}

impl Default for InMemoryKeyedStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryKeyedStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
            #[cfg(feature = "emitter")]
            emitter: Arc::new(Mutex::new(EventEmitter::new())),
        }
    }

    /// Overwrite a slot with an arbitrary value, the way a host cache can
    /// be seeded or clobbered from outside the engines.
    pub fn put(&self, key: &CacheKey, value: Value) -> Result<(), StoreError> {
        self.write(key, |_| Ok(value))
    }

    /// Number of occupied slots.
    pub fn len(&self) -> Result<usize, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("len"))?;
        Ok(storage.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Drop every slot. Subscribers of each dropped slot see `"null"`, as
    /// with [`remove`](KeyedStore::remove).
    pub fn clear(&self) -> Result<(), StoreError> {
        let dropped: Vec<CacheKey> = {
            let mut storage = self
                .storage
                .write()
                .map_err(|_| StoreError::LockPoisoned("clear"))?;
            storage.drain().map(|(key, _)| key).collect()
        };
        for key in &dropped {
            self.notify(key, &Value::Null)?;
        }
        Ok(())
    }

    /// Register a listener called with the JSON text of the new value each
    /// time `key` is written (`"null"` when the slot is removed or cleared).
    ///
    /// Returns an id for [`unsubscribe`](Self::unsubscribe).
    #[cfg(feature = "emitter")]
    pub fn subscribe<F>(&self, key: &CacheKey, listener: F) -> Result<String, StoreError>
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        let mut emitter = self
            .emitter
            .lock()
            .map_err(|_| StoreError::LockPoisoned("subscribe"))?;
        Ok(emitter.on(&event_name(key)?, listener))
    }

    /// Remove a listener. Returns true if it was registered.
    #[cfg(feature = "emitter")]
    pub fn unsubscribe(&self, listener_id: &str) -> Result<bool, StoreError> {
        let mut emitter = self
            .emitter
            .lock()
            .map_err(|_| StoreError::LockPoisoned("unsubscribe"))?;
        Ok(emitter.remove_listener(listener_id).is_some())
    }

    // Listeners run on emitter threads; joining them keeps notification
    // complete before the write returns. Called with no storage lock held.
    #[cfg(feature = "emitter")]
    fn notify(&self, key: &CacheKey, value: &Value) -> Result<(), StoreError> {
        let handles = {
            let mut emitter = self
                .emitter
                .lock()
                .map_err(|_| StoreError::LockPoisoned("notify"))?;
            emitter.emit(&event_name(key)?, value.to_string())
        };
        for handle in handles {
            if handle.join().is_err() {
                tracing::warn!(key = %key, "cache subscriber panicked");
            }
        }
        Ok(())
    }

    #[cfg(not(feature = "emitter"))]
    fn notify(&self, _key: &CacheKey, _value: &Value) -> Result<(), StoreError> {
        Ok(())
    }
}

// Tokens are JSON-encoded so that distinct keys never share a channel,
// whatever separators their tokens contain.
#[cfg(feature = "emitter")]
fn event_name(key: &CacheKey) -> Result<String, StoreError> {
    Ok(serde_json::to_string(&key.tokens())?)
}

impl KeyedStore for InMemoryKeyedStore {
    fn read(&self, key: &CacheKey) -> Result<Option<Value>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        Ok(storage.get(key).cloned())
    }

    fn write<F>(&self, key: &CacheKey, updater: F) -> Result<(), StoreError>
    where
        F: FnOnce(Option<Value>) -> Result<Value, StoreError>,
    {
        let next = {
            let mut storage = self
                .storage
                .write()
                .map_err(|_| StoreError::LockPoisoned("write"))?;
            let next = updater(storage.get(key).cloned())?;
            storage.insert(key.clone(), next.clone());
            next
        };
        self.notify(key, &next)
    }

    fn remove(&self, key: &CacheKey) -> Result<bool, StoreError> {
        let existed = {
            let mut storage = self
                .storage
                .write()
                .map_err(|_| StoreError::LockPoisoned("remove"))?;
            storage.remove(key).is_some()
        };
        if existed {
            self.notify(key, &Value::Null)?;
        }
        Ok(existed)
    }
}
