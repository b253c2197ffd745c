use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, OnceLock};

use crate::item::ItemId;

/// Hands out negative ids for optimistic items.
///
/// Ids come from a monotonic counter with the sign flipped, so they never
/// repeat for the lifetime of the generator and never collide with
/// server-assigned (positive) ids.
#[derive(Debug)]
pub struct OptimisticIdGenerator {
    next: AtomicI64,
}

impl Default for OptimisticIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl OptimisticIdGenerator {
    pub fn new() -> Self {
        Self {
            next: AtomicI64::new(1),
        }
    }

    /// The process-wide generator shared by engines that are not given one.
    pub fn global() -> Arc<OptimisticIdGenerator> {
        static GLOBAL: OnceLock<Arc<OptimisticIdGenerator>> = OnceLock::new();
        GLOBAL
            .get_or_init(|| Arc::new(OptimisticIdGenerator::new()))
            .clone()
    }

    pub fn next_id(&self) -> ItemId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        -n
    }

    pub fn is_optimistic(id: ItemId) -> bool {
        id < 0
    }
}
