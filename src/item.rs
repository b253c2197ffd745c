//! Item shapes held by the caches and the rank comparators over them.

use std::cmp::Ordering;
use std::time::SystemTime;

use serde::{de::DeserializeOwned, Serialize};

/// Identifier of a cached record. Negative ids belong to optimistic items
/// that the server has not confirmed yet.
pub type ItemId = i64;

/// Position of an item within its owner's collection; lower sorts first.
pub type Rank = i64;

/// A record cached per owner.
pub trait CacheItem: Serialize + DeserializeOwned + Clone + Send + Sync {
    fn id(&self) -> ItemId;

    fn owner_id(&self) -> &str;

    fn created_at(&self) -> Option<SystemTime>;

    fn updated_at(&self) -> Option<SystemTime>;

    /// True while the item is a client-side placeholder.
    fn is_optimistic(&self) -> bool {
        self.id() < 0
    }
}

/// A cached record that carries an explicit rank.
pub trait RankableItem: CacheItem {
    fn rank(&self) -> Option<Rank>;

    fn set_rank(&mut self, rank: Rank);

    /// The rank used for ordering; an absent rank counts as 0.
    fn effective_rank(&self) -> Rank {
        self.rank().unwrap_or(0)
    }
}

/// Orders by rank ascending. Equal ranks compare equal, so a stable sort
/// keeps their existing relative order.
pub fn compare_by_rank<T: RankableItem>(a: &T, b: &T) -> Ordering {
    a.effective_rank().cmp(&b.effective_rank())
}

/// Orders by rank ascending, breaking ties by id ascending.
pub fn compare_by_rank_then_id<T: RankableItem>(a: &T, b: &T) -> Ordering {
    compare_by_rank(a, b).then_with(|| a.id().cmp(&b.id()))
}
