//! Single-object caches: at most one item per owner, no ordering.

mod cache;

pub use cache::ObjectCache;

use crate::config::{CacheSettings, ObjectConfig};
use crate::logger::OperationLogger;
use crate::store::KeyedStore;

pub fn create_object_engine<S, C>(store: S, config: C, logger: OperationLogger) -> ObjectCache<S, C>
where
    S: KeyedStore,
    C: ObjectConfig,
{
    ObjectCache::new(store, config, logger)
}

pub fn create_object_engine_with_settings<S, C>(
    store: S,
    config: C,
    logger: OperationLogger,
    settings: &CacheSettings,
) -> ObjectCache<S, C>
where
    S: KeyedStore,
    C: ObjectConfig,
{
    ObjectCache::new(store, config, logger).with_validation(settings.validation)
}
