use std::sync::Arc;
use std::time::{Instant, SystemTime};

use serde_json::Value;

use crate::collection::json_kind;
use crate::config::{ObjectConfig, ValidationMode};
use crate::error::{CacheError, StoreError};
use crate::id::OptimisticIdGenerator;
use crate::item::{CacheItem, ItemId};
use crate::logger::{OperationLogger, OperationRecord, Outcome};
use crate::store::KeyedStore;

/// Cache engine for a feature stored as one object per owner.
///
/// Partial updates are composed by the caller from `get` and `set`.
pub struct ObjectCache<S, C> {
    store: S,
    config: C,
    logger: OperationLogger,
    ids: Arc<OptimisticIdGenerator>,
    validation: ValidationMode,
}

impl<S: KeyedStore, C: ObjectConfig> ObjectCache<S, C> {
    pub fn new(store: S, config: C, logger: OperationLogger) -> Self {
        Self {
            store,
            config,
            logger,
            ids: OptimisticIdGenerator::global(),
            validation: ValidationMode::default(),
        }
    }

    pub fn with_validation(mut self, validation: ValidationMode) -> Self {
        self.validation = validation;
        self
    }

    pub fn with_id_generator(mut self, ids: Arc<OptimisticIdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The cached object, or `None` when absent or not object-shaped.
    pub fn get(&self, owner_id: &str) -> Result<Option<C::Item>, CacheError> {
        let key = self.config.key_of(owner_id);
        let value = self
            .store
            .read(&key)
            .map_err(|e| CacheError::store("get", owner_id, None, e))?;
        Ok(self.decode(owner_id, value))
    }

    pub fn exists(&self, owner_id: &str) -> Result<bool, CacheError> {
        Ok(self.get(owner_id)?.is_some())
    }

    /// Overwrite the slot. Validation defects are logged, never enforced.
    pub fn set(&self, owner_id: &str, item: C::Item) -> Result<(), CacheError> {
        self.warn_defects(owner_id, &item);
        let id = item.id();
        self.write("set", owner_id, Some(id), Some(item))
    }

    /// Empty the slot.
    pub fn clear(&self, owner_id: &str) -> Result<(), CacheError> {
        self.write("clear", owner_id, None, None)
    }

    /// Write an optimistic object built from `draft` and return it together
    /// with the previous value, to hand back to [`restore`](Self::restore)
    /// if the mutation fails.
    pub fn set_optimistic(
        &self,
        owner_id: &str,
        draft: C::Draft,
    ) -> Result<(C::Item, Option<C::Item>), CacheError> {
        let previous = self.get(owner_id)?;
        let item = self
            .config
            .make_optimistic(draft, owner_id, self.ids.next_id());
        self.set(owner_id, item.clone())?;
        Ok((item, previous))
    }

    /// Put back a snapshot taken by [`set_optimistic`](Self::set_optimistic);
    /// a `None` snapshot empties the slot.
    pub fn restore(&self, owner_id: &str, snapshot: Option<C::Item>) -> Result<(), CacheError> {
        let id = snapshot.as_ref().map(CacheItem::id);
        self.write("restore", owner_id, id, snapshot)
    }

    fn decode(&self, owner_id: &str, value: Option<Value>) -> Option<C::Item> {
        match value? {
            Value::Null => None,
            value @ Value::Object(_) => match serde_json::from_value(value) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!(
                        feature = self.config.feature(),
                        owner_id = owner_id,
                        error = %e,
                        "cached object failed shape check, treating as absent"
                    );
                    None
                }
            },
            other => {
                tracing::warn!(
                    feature = self.config.feature(),
                    owner_id = owner_id,
                    found = json_kind(&other),
                    "cached object is not an object, treating as absent"
                );
                None
            }
        }
    }

    fn write(
        &self,
        operation: &'static str,
        owner_id: &str,
        item_id: Option<ItemId>,
        item: Option<C::Item>,
    ) -> Result<(), CacheError> {
        let started = Instant::now();
        let key = self.config.key_of(owner_id);
        let after = usize::from(item.is_some());
        let mut before = 0;

        let result = self.store.write(&key, |current| {
            before = usize::from(self.decode(owner_id, current).is_some());
            match &item {
                Some(item) => serde_json::to_value(item).map_err(StoreError::from),
                None => Ok(Value::Null),
            }
        });

        let outcome = match &result {
            Ok(()) => Outcome::Success,
            Err(e) => Outcome::Failure(e.to_string()),
        };
        self.logger.record(OperationRecord {
            operation,
            feature: self.config.feature().to_string(),
            owner_id: owner_id.to_string(),
            duration: started.elapsed(),
            before,
            after,
            outcome,
            at: SystemTime::now(),
        });

        result.map_err(|e| CacheError::store(operation, owner_id, item_id, e))
    }

    fn warn_defects(&self, owner_id: &str, item: &C::Item) {
        if self.validation == ValidationMode::Off {
            return;
        }
        for defect in self.config.validate(item) {
            tracing::warn!(
                feature = self.config.feature(),
                owner_id = owner_id,
                item_id = item.id(),
                defect = %defect,
                "cached object failed validation"
            );
        }
    }
}
