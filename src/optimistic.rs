//! Optimistic mutation flow over a collection cache.
//!
//! A mutation handler snapshots the collection, applies its change to the
//! cache right away, and once the server answers either reconciles the
//! optimistic state or restores the snapshot:
//!
//! ```ignore
//! let (mutation, temp) = OptimisticMutation::begin_add(&costs, "user-1", draft)?;
//! match api.create(&temp) {
//!     Ok(saved) => mutation.commit(saved)?,
//!     Err(_) => mutation.rollback()?,
//! }
//! ```
//!
//! Two flows racing on the same owner are last-write-wins: a late rollback
//! can overwrite a newer optimistic state.

use crate::collection::CollectionCache;
use crate::config::CollectionConfig;
use crate::error::CacheError;
use crate::item::{CacheItem, ItemId};
use crate::store::KeyedStore;

/// An in-flight optimistic change awaiting the server's verdict.
#[must_use = "an optimistic mutation should be committed, settled or rolled back"]
pub struct OptimisticMutation<'a, S, C: CollectionConfig> {
    cache: &'a CollectionCache<S, C>,
    owner_id: String,
    snapshot: Vec<C::Item>,
    temp_id: Option<ItemId>,
}

impl<'a, S: KeyedStore, C: CollectionConfig> OptimisticMutation<'a, S, C> {
    /// Snapshot the owner's collection before an update, removal or
    /// reorder the caller is about to apply.
    pub fn begin(cache: &'a CollectionCache<S, C>, owner_id: &str) -> Result<Self, CacheError> {
        Ok(Self {
            cache,
            owner_id: owner_id.to_string(),
            snapshot: cache.get_all(owner_id)?,
            temp_id: None,
        })
    }

    /// Snapshot, then add an optimistic item built from `draft`.
    pub fn begin_add(
        cache: &'a CollectionCache<S, C>,
        owner_id: &str,
        draft: C::Draft,
    ) -> Result<(Self, C::Item), CacheError> {
        let mut mutation = Self::begin(cache, owner_id)?;
        let temp = cache.add_optimistic(owner_id, draft)?;
        mutation.temp_id = Some(temp.id());
        Ok((mutation, temp))
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn snapshot(&self) -> &[C::Item] {
        &self.snapshot
    }

    pub fn temp_id(&self) -> Option<ItemId> {
        self.temp_id
    }

    /// Reconcile with the server's item: it replaces the optimistic item in
    /// place, or is upserted when there is none (or it was already dropped).
    pub fn commit(self, confirmed: C::Item) -> Result<(), CacheError> {
        if let Some(temp_id) = self.temp_id {
            if self.cache.replace_temp(&self.owner_id, temp_id, confirmed.clone())? {
                return Ok(());
            }
        }
        self.cache.add(&self.owner_id, confirmed)
    }

    /// Accept the optimistic state as is.
    pub fn settle(self) {}

    /// Restore the collection exactly as it was at `begin`.
    pub fn rollback(self) -> Result<(), CacheError> {
        tracing::debug!(
            feature = self.cache.config().feature(),
            owner_id = %self.owner_id,
            temp_id = ?self.temp_id,
            "rolling back optimistic mutation"
        );
        self.cache.replace_all(&self.owner_id, self.snapshot)
    }
}
