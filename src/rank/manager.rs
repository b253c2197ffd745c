use crate::collection::CollectionCache;
use crate::config::CollectionConfig;
use crate::error::CacheError;
use crate::item::{CacheItem, ItemId, Rank, RankableItem};
use crate::store::KeyedStore;

use super::RankUpdate;

/// Rank algorithms bound to one collection engine.
///
/// Obtained with [`CollectionCache::ranks`].
pub struct RankManager<'a, S, C> {
    cache: &'a CollectionCache<S, C>,
}

impl<S: KeyedStore, C: CollectionConfig> CollectionCache<S, C> {
    pub fn ranks(&self) -> RankManager<'_, S, C> {
        RankManager::new(self)
    }
}

impl<'a, S: KeyedStore, C: CollectionConfig> RankManager<'a, S, C> {
    pub fn new(cache: &'a CollectionCache<S, C>) -> Self {
        Self { cache }
    }

    pub fn next_rank(&self, owner_id: &str) -> Result<Rank, CacheError> {
        self.cache.next_rank(owner_id)
    }

    /// Renumber the collection `1..=N` in its current order.
    pub fn normalize_ranks(&self, owner_id: &str) -> Result<(), CacheError> {
        let mut items = self.cache.get_all(owner_id)?;
        renumber(&mut items);
        self.cache.replace_all(owner_id, items)
    }

    /// Put `item` at `target_rank`, shifting every item ranked at or after
    /// it up by one. An item already cached under the same id is moved
    /// rather than duplicated: its old slot is closed first, so contiguous
    /// ranks stay contiguous.
    pub fn insert_at_rank(
        &self,
        owner_id: &str,
        mut item: C::Item,
        target_rank: Rank,
    ) -> Result<(), CacheError> {
        let mut items = self.cache.get_all(owner_id)?;
        if let Some(position) = items.iter().position(|existing| existing.id() == item.id()) {
            let vacated = items.remove(position).effective_rank();
            close_gap(&mut items, vacated);
        }

        for existing in items.iter_mut() {
            let rank = existing.effective_rank();
            if rank >= target_rank {
                existing.set_rank(rank.saturating_add(1));
            }
        }
        item.set_rank(target_rank);
        items.push(item);

        self.cache.replace_all(owner_id, items)
    }

    /// Remove `id` and close the gap it leaves. Returns false, without
    /// writing, when the item is not cached.
    pub fn remove_and_adjust_ranks(&self, owner_id: &str, id: ItemId) -> Result<bool, CacheError> {
        let mut items = self.cache.get_all(owner_id)?;
        let Some(position) = items.iter().position(|item| item.id() == id) else {
            return Ok(false);
        };

        let removed = items.remove(position).effective_rank();
        close_gap(&mut items, removed);

        self.cache.replace_all(owner_id, items)?;
        Ok(true)
    }

    /// Move the item at `source_index` to `destination_index` in the
    /// current order and renumber everything `1..=N`.
    ///
    /// Returns false, without writing, when the indices are equal or
    /// either one is out of range.
    pub fn reorder_by_drag_drop(
        &self,
        owner_id: &str,
        source_index: usize,
        destination_index: usize,
    ) -> Result<bool, CacheError> {
        let mut items = self.cache.get_all(owner_id)?;
        let len = items.len();
        if source_index == destination_index || source_index >= len || destination_index >= len {
            tracing::debug!(
                feature = self.cache.config().feature(),
                owner_id = owner_id,
                source_index,
                destination_index,
                len,
                "drag reorder rejected"
            );
            return Ok(false);
        }

        let moved = items.remove(source_index);
        items.insert(destination_index, moved);
        renumber(&mut items);

        self.cache.reorder_all(owner_id, items)?;
        Ok(true)
    }

    /// Apply each `(id, rank)` patch to its cached item. Unknown ids are
    /// ignored; a later patch for the same id wins.
    pub fn update_ranks(&self, owner_id: &str, updates: &[RankUpdate]) -> Result<(), CacheError> {
        let items = self.cache.get_all(owner_id)?;
        let mut patched: Vec<C::Item> = Vec::new();

        for update in updates {
            if let Some(item) = patched.iter_mut().find(|item| item.id() == update.id) {
                item.set_rank(update.rank);
            } else if let Some(item) = items.iter().find(|item| item.id() == update.id) {
                let mut item = item.clone();
                item.set_rank(update.rank);
                patched.push(item);
            }
        }

        if patched.is_empty() {
            return Ok(());
        }
        self.cache.update_multiple(owner_id, patched)
    }

    /// The item being picked up, if it is cached.
    pub fn handle_drag_start(
        &self,
        owner_id: &str,
        id: ItemId,
    ) -> Result<Option<C::Item>, CacheError> {
        self.cache.get(owner_id, id)
    }

    /// Drop `dragged_id` onto the position of `target_id`.
    ///
    /// Returns `None` when either id is not cached, otherwise the collection
    /// after the move.
    pub fn handle_drag_end(
        &self,
        owner_id: &str,
        dragged_id: ItemId,
        target_id: ItemId,
    ) -> Result<Option<Vec<C::Item>>, CacheError> {
        let items = self.cache.get_all(owner_id)?;
        let source = items.iter().position(|item| item.id() == dragged_id);
        let destination = items.iter().position(|item| item.id() == target_id);

        let (Some(source), Some(destination)) = (source, destination) else {
            tracing::debug!(
                feature = self.cache.config().feature(),
                owner_id = owner_id,
                dragged_id,
                target_id,
                "drag end on an uncached item"
            );
            return Ok(None);
        };

        self.reorder_by_drag_drop(owner_id, source, destination)?;
        self.cache.get_all(owner_id).map(Some)
    }

    /// Reorder and hand back the pre-move collection for
    /// [`rollback_drag_reorder`](Self::rollback_drag_reorder).
    pub fn optimistic_drag_reorder(
        &self,
        owner_id: &str,
        source_index: usize,
        destination_index: usize,
    ) -> Result<Vec<C::Item>, CacheError> {
        let snapshot = self.cache.get_all(owner_id)?;
        self.reorder_by_drag_drop(owner_id, source_index, destination_index)?;
        Ok(snapshot)
    }

    pub fn rollback_drag_reorder(
        &self,
        owner_id: &str,
        snapshot: Vec<C::Item>,
    ) -> Result<(), CacheError> {
        self.cache.replace_all(owner_id, snapshot)
    }
}

/// Pull every item ranked after `vacated` down by one.
fn close_gap<T: RankableItem>(items: &mut [T], vacated: Rank) {
    for item in items.iter_mut() {
        let rank = item.effective_rank();
        if rank > vacated {
            item.set_rank(rank - 1);
        }
    }
}

fn renumber<T: RankableItem>(items: &mut [T]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.set_rank(index as Rank + 1);
    }
}
