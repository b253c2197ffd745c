//! CollectionCache - ordered, per-owner collections of rankable items.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Instant, SystemTime};

use serde_json::Value;

use crate::config::{CollectionConfig, ValidationMode};
use crate::error::{CacheError, StoreError};
use crate::id::OptimisticIdGenerator;
use crate::item::{CacheItem, ItemId, Rank, RankableItem};
use crate::logger::{OperationLogger, OperationRecord, Outcome};
use crate::store::KeyedStore;
use crate::validation;

/// Cache engine for one feature's ordered collections.
///
/// Every write reads the owner's current sequence, applies the change,
/// re-sorts it with the feature's comparator and writes it back in a single
/// store update. Reads never fail on a corrupted slot; they treat it as
/// empty.
pub struct CollectionCache<S, C> {
    store: S,
    config: C,
    logger: OperationLogger,
    ids: Arc<OptimisticIdGenerator>,
    validation: ValidationMode,
}

impl<S: KeyedStore, C: CollectionConfig> CollectionCache<S, C> {
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

    /// Use a dedicated optimistic id generator instead of the global one.
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

    pub fn logger(&self) -> &OperationLogger {
        &self.logger
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// The owner's collection in cache order; empty if absent or corrupted.
    pub fn get_all(&self, owner_id: &str) -> Result<Vec<C::Item>, CacheError> {
        self.load("get_all", owner_id)
    }

    pub fn get(&self, owner_id: &str, id: ItemId) -> Result<Option<C::Item>, CacheError> {
        Ok(self
            .load("get", owner_id)?
            .into_iter()
            .find(|item| item.id() == id))
    }

    pub fn exists(&self, owner_id: &str, id: ItemId) -> Result<bool, CacheError> {
        Ok(self
            .load("exists", owner_id)?
            .iter()
            .any(|item| item.id() == id))
    }

    pub fn count(&self, owner_id: &str) -> Result<usize, CacheError> {
        Ok(self.load("count", owner_id)?.len())
    }

    /// One past the highest rank in the collection, or 1 when it is empty.
    pub fn next_rank(&self, owner_id: &str) -> Result<Rank, CacheError> {
        Ok(self
            .load("next_rank", owner_id)?
            .iter()
            .map(RankableItem::effective_rank)
            .max()
            .map_or(1, |max| max.saturating_add(1)))
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    /// Upsert: replaces the item with the same id in place, or appends.
    pub fn add(&self, owner_id: &str, item: C::Item) -> Result<(), CacheError> {
        let id = item.id();
        self.mutate("add", owner_id, Some(id), move |mut items| {
            match items.iter_mut().find(|existing| existing.id() == id) {
                Some(slot) => *slot = item,
                None => items.push(item),
            }
            items
        })?;
        Ok(())
    }

    /// Build an optimistic item from `draft` with a fresh negative id, add
    /// it, and return it so the caller can reconcile it later.
    pub fn add_optimistic(&self, owner_id: &str, draft: C::Draft) -> Result<C::Item, CacheError> {
        let item = self
            .config
            .make_optimistic(draft, owner_id, self.ids.next_id());
        self.add(owner_id, item.clone())?;
        Ok(item)
    }

    /// Replace an existing item. Fails with `NotFound`, leaving the
    /// collection untouched, when no item has the same id.
    pub fn update(&self, owner_id: &str, item: C::Item) -> Result<(), CacheError> {
        let id = item.id();
        self.update_with(owner_id, id, move |existing| *existing = item)
    }

    /// Patch an existing item in place. Same strictness as [`update`](Self::update).
    pub fn update_with<F>(&self, owner_id: &str, id: ItemId, patch: F) -> Result<(), CacheError>
    where
        F: FnOnce(&mut C::Item),
    {
        if !self.exists(owner_id, id)? {
            return Err(self.not_found("update", owner_id, id));
        }

        let mut found = false;
        self.mutate("update", owner_id, Some(id), |mut items| {
            if let Some(slot) = items.iter_mut().find(|existing| existing.id() == id) {
                patch(slot);
                found = true;
            }
            items
        })?;

        if found {
            Ok(())
        } else {
            Err(self.not_found("update", owner_id, id))
        }
    }

    /// Drop the item with `id`; absent ids are not an error.
    pub fn remove(&self, owner_id: &str, id: ItemId) -> Result<(), CacheError> {
        self.mutate("remove", owner_id, Some(id), |mut items| {
            items.retain(|item| item.id() != id);
            items
        })?;
        Ok(())
    }

    pub fn remove_multiple(&self, owner_id: &str, ids: &[ItemId]) -> Result<(), CacheError> {
        self.mutate("remove_multiple", owner_id, None, |mut items| {
            items.retain(|item| !ids.contains(&item.id()));
            items
        })?;
        Ok(())
    }

    /// Replace the sequence with a caller-computed order (e.g. after a drag).
    pub fn reorder_all(&self, owner_id: &str, items: Vec<C::Item>) -> Result<(), CacheError> {
        self.mutate("reorder_all", owner_id, None, |_| items)?;
        Ok(())
    }

    /// Replace every existing item whose id appears in `items`. Input items
    /// without a match are ignored.
    pub fn update_multiple(&self, owner_id: &str, items: Vec<C::Item>) -> Result<(), CacheError> {
        let mut patches: HashMap<ItemId, C::Item> =
            items.into_iter().map(|item| (item.id(), item)).collect();
        self.mutate("update_multiple", owner_id, None, |items| {
            items
                .into_iter()
                .map(|item| patches.remove(&item.id()).unwrap_or(item))
                .collect()
        })?;
        Ok(())
    }

    pub fn replace_all(&self, owner_id: &str, items: Vec<C::Item>) -> Result<(), CacheError> {
        self.mutate("replace_all", owner_id, None, |_| items)?;
        Ok(())
    }

    /// Empty the owner's collection.
    pub fn clear(&self, owner_id: &str) -> Result<(), CacheError> {
        self.mutate("clear", owner_id, None, |_| Vec::new())?;
        Ok(())
    }

    /// Swap the optimistic item `temp_id` for its server-confirmed version.
    ///
    /// Returns false, without writing, when `temp_id` is no longer cached;
    /// the caller decides whether to `add` the real item instead.
    pub fn replace_temp(
        &self,
        owner_id: &str,
        temp_id: ItemId,
        real: C::Item,
    ) -> Result<bool, CacheError> {
        if !self.exists(owner_id, temp_id)? {
            return Ok(false);
        }

        let mut replaced = false;
        self.mutate("replace_temp", owner_id, Some(temp_id), |mut items| {
            if let Some(slot) = items.iter_mut().find(|item| item.id() == temp_id) {
                *slot = real;
                replaced = true;
            }
            items
        })?;
        Ok(replaced)
    }

    // ------------------------------------------------------------------
    // Diagnostics
    // ------------------------------------------------------------------

    /// Every defect the validation utilities find in the owner's
    /// collection. Purely informational.
    pub fn diagnose(&self, owner_id: &str) -> Result<Vec<String>, CacheError> {
        let items = self.load("diagnose", owner_id)?;
        let mut defects = Vec::new();

        if !validation::is_properly_sorted(&items, |a, b| self.config.compare(a, b)) {
            defects.push("collection is not in cache order".to_string());
        }
        for id in validation::find_duplicate_ids(&items) {
            defects.push(format!("duplicate id {}", id));
        }
        let feature_check = |item: &C::Item, _index: usize| self.config.validate(item);
        defects.extend(validation::validate_items(&items, Some(&feature_check)));
        defects.extend(validation::validate_owner_consistency(&items, owner_id));

        Ok(defects)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn load(&self, operation: &'static str, owner_id: &str) -> Result<Vec<C::Item>, CacheError> {
        let key = self.config.key_of(owner_id);
        let value = self
            .store
            .read(&key)
            .map_err(|e| CacheError::store(operation, owner_id, None, e))?;
        Ok(self.decode(owner_id, value))
    }

    /// Decode a stored sequence. A value that is not an array reads as
    /// empty; elements that fail to decode are dropped.
    fn decode(&self, owner_id: &str, value: Option<Value>) -> Vec<C::Item> {
        let elements = match value {
            None | Some(Value::Null) => return Vec::new(),
            Some(Value::Array(elements)) => elements,
            Some(other) => {
                tracing::warn!(
                    feature = self.config.feature(),
                    owner_id = owner_id,
                    found = json_kind(&other),
                    "cached collection is not a sequence, treating as empty"
                );
                return Vec::new();
            }
        };

        elements
            .into_iter()
            .enumerate()
            .filter_map(|(index, element)| match serde_json::from_value(element) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!(
                        feature = self.config.feature(),
                        owner_id = owner_id,
                        index,
                        error = %e,
                        "dropping malformed cached item"
                    );
                    None
                }
            })
            .collect()
    }

    /// The single write path: read, apply, sort, validate, write back.
    fn mutate<F>(
        &self,
        operation: &'static str,
        owner_id: &str,
        item_id: Option<ItemId>,
        apply: F,
    ) -> Result<Vec<C::Item>, CacheError>
    where
        F: FnOnce(Vec<C::Item>) -> Vec<C::Item>,
    {
        let started = Instant::now();
        let key = self.config.key_of(owner_id);
        let mut before = 0;
        let mut written = Vec::new();

        let result = self.store.write(&key, |current| {
            let items = self.decode(owner_id, current);
            before = items.len();

            let mut next = apply(items);
            // Stable: equal elements keep their relative order.
            next.sort_by(|a, b| self.config.compare(a, b));
            self.warn_defects(owner_id, &next);

            let value = serde_json::to_value(&next).map_err(StoreError::from)?;
            written = next;
            Ok(value)
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
            after: written.len(),
            outcome,
            at: SystemTime::now(),
        });

        result.map_err(|e| CacheError::store(operation, owner_id, item_id, e))?;
        Ok(written)
    }

    fn warn_defects(&self, owner_id: &str, items: &[C::Item]) {
        if self.validation == ValidationMode::Off {
            return;
        }
        for item in items {
            for defect in self.config.validate(item) {
                tracing::warn!(
                    feature = self.config.feature(),
                    owner_id = owner_id,
                    item_id = item.id(),
                    defect = %defect,
                    "cached item failed validation"
                );
            }
        }
    }

    fn not_found(&self, operation: &'static str, owner_id: &str, id: ItemId) -> CacheError {
        let err = CacheError::NotFound {
            operation,
            owner_id: owner_id.to_string(),
            item_id: id,
        };
        self.logger.record(OperationRecord {
            operation,
            feature: self.config.feature().to_string(),
            owner_id: owner_id.to_string(),
            duration: std::time::Duration::ZERO,
            before: 0,
            after: 0,
            outcome: Outcome::Failure(err.to_string()),
            at: SystemTime::now(),
        });
        err
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
