//! Rank management on top of [`CollectionCache`](crate::CollectionCache).
//!
//! Renumbering, insert-with-shift, remove-with-shift and drag-and-drop
//! reordering. Every write goes through the collection engine, so there is
//! still exactly one write path per key.

mod manager;

use serde::{Deserialize, Serialize};

use crate::item::{ItemId, Rank};

pub use manager::RankManager;

/// Partial patch setting one item's rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankUpdate {
    pub id: ItemId,
    pub rank: Rank,
}

impl RankUpdate {
    pub fn new(id: ItemId, rank: Rank) -> Self {
        Self { id, rank }
    }
}
