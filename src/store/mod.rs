//! Keyed stores - the host-supplied value store the cache engines sit on.
//!
//! The engines never talk to a fetching library directly. Anything that can
//! read and atomically replace a value per key, with writes visible to the
//! next read, can back them.
//!
//! ## Example
//!
//! ```ignore
//! use rank_cache::{CacheKey, InMemoryKeyedStore, KeyedStore};
//!
//! let store = InMemoryKeyedStore::new();
//! let key = CacheKey::new("fixed_costs", "user-1");
//! store.write(&key, |_| Ok(serde_json::json!([])))?;
//! assert!(store.read(&key)?.is_some());
//! ```

mod in_memory;

use serde_json::Value;

use crate::error::StoreError;
use crate::key::CacheKey;

/// Synchronous per-key value store.
///
/// Values are held as `serde_json::Value` so a store never needs to know
/// the item types of the features it hosts.
pub trait KeyedStore: Send + Sync {
    /// Current value at `key`, or `None` if the slot was never written.
    fn read(&self, key: &CacheKey) -> Result<Option<Value>, StoreError>;

    /// Replace the value at `key` with the updater's result.
    ///
    /// The updater sees the current value and runs under the store's write
    /// guard. If it fails the slot is left untouched. Subscribers must be
    /// notified before `write` returns.
    fn write<F>(&self, key: &CacheKey, updater: F) -> Result<(), StoreError>
    where
        F: FnOnce(Option<Value>) -> Result<Value, StoreError>;

    /// Drop the slot at `key`. Returns true if it existed.
    fn remove(&self, key: &CacheKey) -> Result<bool, StoreError>;
}

pub use in_memory::InMemoryKeyedStore;
