//! Advisory diagnostics over item collections.
//!
//! None of these block a write. Engines use them for `diagnose`, and tests
//! and health checks can call them directly.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::item::{CacheItem, ItemId};

/// True iff no adjacent pair is out of order under `compare`.
pub fn is_properly_sorted<T, F>(items: &[T], compare: F) -> bool
where
    F: Fn(&T, &T) -> Ordering,
{
    items
        .windows(2)
        .all(|pair| compare(&pair[0], &pair[1]) != Ordering::Greater)
}

/// Required-field checks on every item, followed by whatever `extra`
/// reports for each `(item, index)`.
pub fn validate_items<T: CacheItem>(
    items: &[T],
    extra: Option<&dyn Fn(&T, usize) -> Vec<String>>,
) -> Vec<String> {
    let mut errors = Vec::new();
    for (index, item) in items.iter().enumerate() {
        if item.id() == 0 {
            errors.push(format!("item at index {} is missing an id", index));
        }
        if item.owner_id().is_empty() {
            errors.push(format!("item {} is missing an owner id", item.id()));
        }
        if item.created_at().is_none() {
            errors.push(format!("item {} is missing created_at", item.id()));
        }
        if item.updated_at().is_none() {
            errors.push(format!("item {} is missing updated_at", item.id()));
        }
        if let Some(extra) = extra {
            errors.extend(extra(item, index));
        }
    }
    errors
}

/// Ids that appear more than once, in order of first appearance.
pub fn find_duplicate_ids<T: CacheItem>(items: &[T]) -> Vec<ItemId> {
    let mut counts: HashMap<ItemId, usize> = HashMap::new();
    let mut duplicates = Vec::new();
    for item in items {
        let count = counts.entry(item.id()).or_insert(0);
        *count += 1;
        if *count == 2 {
            duplicates.push(item.id());
        }
    }
    duplicates
}

/// Flags every item whose owner differs from `expected_owner_id`.
pub fn validate_owner_consistency<T: CacheItem>(
    items: &[T],
    expected_owner_id: &str,
) -> Vec<String> {
    items
        .iter()
        .filter(|item| item.owner_id() != expected_owner_id)
        .map(|item| {
            format!(
                "item {} belongs to owner {} instead of {}",
                item.id(),
                item.owner_id(),
                expected_owner_id
            )
        })
        .collect()
}
