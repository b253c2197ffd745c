//! Error types for cache engines and keyed stores.

use thiserror::Error;

use crate::item::ItemId;

/// Failures raised by a [`KeyedStore`](crate::KeyedStore) implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("store lock poisoned during {0}")]
    LockPoisoned(&'static str),

    #[error("store serialization error: {0}")]
    Serde(String),

    #[error("store backend error: {0}")]
    Backend(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serde(err.to_string())
    }
}

/// Settings that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid cache settings: {0}")]
pub struct SettingsError(pub String);

/// Errors surfaced to callers of the cache engines.
///
/// Corrupted cache values and validation defects are never reported here;
/// they are recovered from and logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// A strict operation targeted an item that is not in the collection.
    #[error("{operation}: item {item_id} not found for owner {owner_id}")]
    NotFound {
        operation: &'static str,
        owner_id: String,
        item_id: ItemId,
    },

    /// The underlying store failed while reading or writing.
    #[error("{operation}: store failure for owner {owner_id}{}: {source}", item_suffix(.item_id))]
    Store {
        operation: &'static str,
        owner_id: String,
        item_id: Option<ItemId>,
        #[source]
        source: StoreError,
    },
}

impl CacheError {
    pub(crate) fn store(
        operation: &'static str,
        owner_id: &str,
        item_id: Option<ItemId>,
        source: StoreError,
    ) -> Self {
        CacheError::Store {
            operation,
            owner_id: owner_id.to_string(),
            item_id,
            source,
        }
    }

    /// Name of the engine operation that failed.
    pub fn operation(&self) -> &'static str {
        match self {
            CacheError::NotFound { operation, .. } | CacheError::Store { operation, .. } => {
                *operation
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound { .. })
    }
}

fn item_suffix(item_id: &Option<ItemId>) -> String {
    match item_id {
        Some(id) => format!(" (item {})", id),
        None => String::new(),
    }
}
