//! Integration tests for the collection engine.

#[path = "../support/mod.rs"]
mod support;

use rank_cache::features::FixedCosts;
use rank_cache::{CacheError, CollectionConfig, InMemoryKeyedStore, KeyedStore};
use support::{
    assert_sorted, billable, equipment, equipment_costs, fixed_cost, fixed_costs, fixed_draft,
    ids, billable_costs, OWNER,
};

#[test]
fn add_keeps_rank_order() {
    let cache = fixed_costs();
    cache.add(OWNER, fixed_cost(1, Some(2))).unwrap();
    cache.add(OWNER, fixed_cost(2, Some(1))).unwrap();

    let items = cache.get_all(OWNER).unwrap();
    assert_eq!(ids(&items), vec![2, 1]);
    assert_eq!(items[0].rank, Some(1));
    assert_eq!(items[1].rank, Some(2));
}

#[test]
fn absent_rank_sorts_as_zero() {
    let cache = fixed_costs();
    cache.add(OWNER, fixed_cost(1, Some(1))).unwrap();
    cache.add(OWNER, fixed_cost(2, None)).unwrap();
    cache.add(OWNER, fixed_cost(3, Some(-1))).unwrap();
    assert_eq!(ids(&cache.get_all(OWNER).unwrap()), vec![3, 2, 1]);
}

#[test]
fn add_is_an_idempotent_upsert() {
    let cache = fixed_costs();
    cache.add(OWNER, fixed_cost(1, Some(1))).unwrap();
    cache.add(OWNER, fixed_cost(2, Some(2))).unwrap();

    let mut renamed = fixed_cost(1, Some(1));
    renamed.name = "Rent".into();
    cache.add(OWNER, renamed.clone()).unwrap();
    cache.add(OWNER, renamed.clone()).unwrap();

    let items = cache.get_all(OWNER).unwrap();
    assert_eq!(items.iter().filter(|item| item.id == 1).count(), 1);
    assert_eq!(items[0], renamed);
    assert_eq!(items.len(), 2);
}

#[test]
fn update_replaces_in_place() {
    let cache = fixed_costs();
    cache.add(OWNER, fixed_cost(1, Some(1))).unwrap();
    cache.add(OWNER, fixed_cost(2, Some(2))).unwrap();

    let mut moved = fixed_cost(1, Some(3));
    moved.amount = 42.0;
    cache.update(OWNER, moved).unwrap();

    let items = cache.get_all(OWNER).unwrap();
    assert_eq!(ids(&items), vec![2, 1]);
    assert_eq!(items[1].amount, 42.0);
}

#[test]
fn update_missing_fails_and_leaves_collection_alone() {
    let cache = fixed_costs();
    cache.add(OWNER, fixed_cost(1, Some(1))).unwrap();
    let before = cache.get_all(OWNER).unwrap();

    let err = cache.update(OWNER, fixed_cost(99, Some(1))).unwrap_err();
    assert_eq!(
        err,
        CacheError::NotFound {
            operation: "update",
            owner_id: OWNER.to_string(),
            item_id: 99,
        }
    );
    assert_eq!(cache.get_all(OWNER).unwrap(), before);
}

#[test]
fn update_with_patches_fields() {
    let cache = fixed_costs();
    cache.add(OWNER, fixed_cost(1, Some(1))).unwrap();
    cache
        .update_with(OWNER, 1, |cost| cost.name = "Office".into())
        .unwrap();
    assert_eq!(cache.get(OWNER, 1).unwrap().unwrap().name, "Office");

    let err = cache.update_with(OWNER, 2, |_| {}).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn remove_is_total() {
    let cache = fixed_costs();
    cache.add(OWNER, fixed_cost(1, Some(1))).unwrap();
    let before = cache.get_all(OWNER).unwrap();

    cache.remove(OWNER, 404).unwrap();
    assert_eq!(cache.get_all(OWNER).unwrap(), before);

    cache.remove(OWNER, 1).unwrap();
    assert!(cache.get_all(OWNER).unwrap().is_empty());

    // Removing from a collection that was never written is fine too.
    cache.remove("nobody", 1).unwrap();
}

#[test]
fn remove_multiple_tolerates_duplicates() {
    let cache = fixed_costs();
    for id in 1..=4 {
        cache.add(OWNER, fixed_cost(id, Some(id))).unwrap();
    }
    cache.remove_multiple(OWNER, &[2, 2, 4, 77]).unwrap();
    assert_eq!(ids(&cache.get_all(OWNER).unwrap()), vec![1, 3]);
}

#[test]
fn reorder_all_sorts_the_given_items() {
    let cache = fixed_costs();
    cache.add(OWNER, fixed_cost(1, Some(1))).unwrap();
    cache
        .reorder_all(
            OWNER,
            vec![fixed_cost(5, Some(3)), fixed_cost(6, Some(1)), fixed_cost(7, Some(2))],
        )
        .unwrap();
    assert_eq!(ids(&cache.get_all(OWNER).unwrap()), vec![6, 7, 5]);
}

#[test]
fn update_multiple_never_inserts() {
    let cache = fixed_costs();
    cache.add(OWNER, fixed_cost(1, Some(1))).unwrap();
    cache.add(OWNER, fixed_cost(2, Some(2))).unwrap();

    let mut first = fixed_cost(1, Some(5));
    first.amount = 1.0;
    cache
        .update_multiple(OWNER, vec![first, fixed_cost(3, Some(0))])
        .unwrap();

    let items = cache.get_all(OWNER).unwrap();
    assert_eq!(ids(&items), vec![2, 1]);
    assert_eq!(items[1].amount, 1.0);
}

#[test]
fn replace_all_and_clear() {
    let cache = fixed_costs();
    cache
        .replace_all(OWNER, vec![fixed_cost(2, Some(2)), fixed_cost(1, Some(1))])
        .unwrap();
    assert_eq!(ids(&cache.get_all(OWNER).unwrap()), vec![1, 2]);
    assert_eq!(cache.count(OWNER).unwrap(), 2);

    cache.clear(OWNER).unwrap();
    assert_eq!(cache.count(OWNER).unwrap(), 0);
}

#[test]
fn exists_and_get() {
    let cache = fixed_costs();
    let cost = fixed_cost(1, Some(1));
    cache.add(OWNER, cost.clone()).unwrap();
    assert!(cache.exists(OWNER, 1).unwrap());
    assert!(!cache.exists(OWNER, 2).unwrap());
    assert_eq!(cache.get(OWNER, 1).unwrap(), Some(cost));
    assert_eq!(cache.get(OWNER, 2).unwrap(), None);
}

#[test]
fn replace_temp_reconciles_in_place() {
    let cache = fixed_costs();
    cache.add(OWNER, fixed_cost(1, Some(1))).unwrap();
    let temp = cache
        .add_optimistic(OWNER, fixed_draft("Phone").with_rank(2))
        .unwrap();
    cache.add(OWNER, fixed_cost(3, Some(3))).unwrap();
    assert!(temp.id < 0);

    let mut real = temp.clone();
    real.id = 2;
    assert!(cache.replace_temp(OWNER, temp.id, real.clone()).unwrap());

    let items = cache.get_all(OWNER).unwrap();
    assert_eq!(ids(&items), vec![1, 2, 3]);
    assert!(!items.iter().any(|item| item.id == temp.id));
    assert_eq!(items.iter().filter(|item| **item == real).count(), 1);
}

#[test]
fn replace_temp_without_temp_is_a_no_op() {
    let cache = fixed_costs();
    cache.add(OWNER, fixed_cost(1, Some(1))).unwrap();
    assert!(!cache.replace_temp(OWNER, -12, fixed_cost(2, Some(2))).unwrap());
    assert_eq!(ids(&cache.get_all(OWNER).unwrap()), vec![1]);
}

#[test]
fn owners_and_features_are_isolated() {
    let store = InMemoryKeyedStore::new();
    let fixed = rank_cache::create_collection_engine(
        store.clone(),
        FixedCosts,
        rank_cache::OperationLogger::disabled(),
    );
    let gear = rank_cache::create_collection_engine(
        store.clone(),
        rank_cache::features::EquipmentCosts,
        rank_cache::OperationLogger::disabled(),
    );

    fixed.add(OWNER, fixed_cost(1, Some(1))).unwrap();
    fixed.add("user-2", fixed_cost(1, Some(1))).unwrap();
    gear.add(OWNER, equipment(1, Some(1))).unwrap();

    fixed.remove(OWNER, 1).unwrap();
    assert!(fixed.get_all(OWNER).unwrap().is_empty());
    assert_eq!(fixed.count("user-2").unwrap(), 1);
    assert_eq!(gear.count(OWNER).unwrap(), 1);
    assert!(store.read(&FixedCosts.key_of("user-2")).unwrap().is_some());
}

#[test]
fn stable_ties_keep_insertion_order() {
    let cache = billable_costs();
    cache.add(OWNER, billable(5, Some(1))).unwrap();
    cache.add(OWNER, billable(2, Some(1))).unwrap();
    cache.add(OWNER, billable(9, Some(1))).unwrap();
    let items = cache.get_all(OWNER).unwrap();
    assert_eq!(ids(&items), vec![5, 2, 9]);
    assert_sorted(cache.config(), &items);
}

#[test]
fn id_tie_break_for_equipment() {
    let cache = equipment_costs();
    cache.add(OWNER, equipment(5, Some(1))).unwrap();
    cache.add(OWNER, equipment(2, Some(1))).unwrap();
    cache.add(OWNER, equipment(9, Some(0))).unwrap();
    let items = cache.get_all(OWNER).unwrap();
    assert_eq!(ids(&items), vec![9, 2, 5]);
    assert_sorted(cache.config(), &items);
}

#[test]
fn invalid_items_are_still_written() {
    let cache = equipment_costs();
    let mut broken = equipment(1, Some(1));
    broken.name = String::new();
    broken.amount = -10.0;
    broken.usage = 150.0;
    broken.life_span = 0;

    assert_eq!(
        cache.config().validate(&broken),
        vec![
            "name is required",
            "amount must not be negative",
            "usage must be between 0 and 100",
            "life span must be at least 1 year",
        ]
    );

    cache.add(OWNER, broken.clone()).unwrap();
    assert_eq!(cache.get(OWNER, 1).unwrap(), Some(broken));
    assert_eq!(cache.diagnose(OWNER).unwrap().len(), 4);
}

#[test]
fn diagnose_reports_foreign_owners_and_duplicates() {
    let cache = fixed_costs();
    let mut foreign = fixed_cost(2, Some(2));
    foreign.owner_id = "user-2".into();
    cache.add(OWNER, fixed_cost(1, Some(1))).unwrap();
    cache.add(OWNER, foreign).unwrap();
    assert_eq!(
        cache.diagnose(OWNER).unwrap(),
        vec!["item 2 belongs to owner user-2 instead of user-1".to_string()]
    );

    let dupes = serde_json::to_value(vec![fixed_cost(3, Some(1)), fixed_cost(3, Some(2))]).unwrap();
    cache
        .store()
        .write(&FixedCosts.key_of(OWNER), |_| Ok(dupes))
        .unwrap();
    assert_eq!(cache.diagnose(OWNER).unwrap(), vec!["duplicate id 3".to_string()]);
}
