//! Ordered collection caches.
//!
//! ## Example
//!
//! ```ignore
//! use rank_cache::{create_collection_engine, InMemoryKeyedStore, OperationLogger};
//! use rank_cache::features::{FixedCostDraft, FixedCosts};
//!
//! let costs = create_collection_engine(
//!     InMemoryKeyedStore::new(),
//!     FixedCosts,
//!     OperationLogger::disabled(),
//! );
//! let draft = costs.add_optimistic("user-1", FixedCostDraft::monthly("Rent", 1200.0))?;
//! // ... server confirms ...
//! costs.replace_temp("user-1", draft.id, confirmed)?;
//! ```

mod cache;

pub use cache::CollectionCache;

pub(crate) use cache::json_kind;

use crate::config::{CacheSettings, CollectionConfig};
use crate::logger::OperationLogger;
use crate::store::KeyedStore;

/// Bind a feature's configuration to a store.
pub fn create_collection_engine<S, C>(
    store: S,
    config: C,
    logger: OperationLogger,
) -> CollectionCache<S, C>
where
    S: KeyedStore,
    C: CollectionConfig,
{
    CollectionCache::new(store, config, logger)
}

/// Like [`create_collection_engine`], applying host settings.
pub fn create_collection_engine_with_settings<S, C>(
    store: S,
    config: C,
    logger: OperationLogger,
    settings: &CacheSettings,
) -> CollectionCache<S, C>
where
    S: KeyedStore,
    C: CollectionConfig,
{
    CollectionCache::new(store, config, logger).with_validation(settings.validation)
}
