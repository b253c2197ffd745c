extern crate self as rank_cache;

mod collection;
mod config;
mod error;
pub mod features;
mod id;
mod item;
mod key;
mod logger;
mod object;
mod optimistic;
mod rank;
mod store;
pub mod validation;

pub use collection::{
    create_collection_engine, create_collection_engine_with_settings, CollectionCache,
};
pub use config::{CacheSettings, CollectionConfig, LoggerSettings, ObjectConfig, ValidationMode};
pub use error::{CacheError, SettingsError, StoreError};
pub use id::OptimisticIdGenerator;
pub use item::{compare_by_rank, compare_by_rank_then_id, CacheItem, ItemId, Rank, RankableItem};
pub use key::CacheKey;
pub use logger::{OperationLogger, OperationRecord, OperationSummary, Outcome, SummaryReporter};
pub use object::{create_object_engine, create_object_engine_with_settings, ObjectCache};
pub use optimistic::OptimisticMutation;
pub use rank::{RankManager, RankUpdate};
pub use store::{InMemoryKeyedStore, KeyedStore};

// Derive macros for the item traits
pub use rank_cache_macros::{CacheItem, Rankable};
