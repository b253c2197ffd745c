//! Integration tests for the optimistic mutation flow.

#[path = "../support/mod.rs"]
mod support;

use std::sync::Arc;

use rank_cache::features::FixedCosts;
use rank_cache::{
    create_collection_engine, CacheItem, InMemoryKeyedStore, OperationLogger,
    OptimisticIdGenerator, OptimisticMutation,
};
use support::{fixed_cost, fixed_costs, fixed_draft, ids, seed_fixed, OWNER};

#[test]
fn add_then_commit_reconciles_temp_item() {
    let cache = fixed_costs();
    seed_fixed(&cache, 2);

    let (mutation, temp) =
        OptimisticMutation::begin_add(&cache, OWNER, fixed_draft("Software").with_rank(3)).unwrap();
    assert!(temp.is_optimistic());
    assert_eq!(mutation.temp_id(), Some(temp.id));
    assert_eq!(ids(mutation.snapshot()), vec![1, 2]);
    assert!(cache.exists(OWNER, temp.id).unwrap());

    let mut saved = temp.clone();
    saved.id = 3;
    mutation.commit(saved.clone()).unwrap();

    let items = cache.get_all(OWNER).unwrap();
    assert_eq!(ids(&items), vec![1, 2, 3]);
    assert_eq!(items[2], saved);
}

#[test]
fn add_then_rollback_discards_temp_item() {
    let cache = fixed_costs();
    seed_fixed(&cache, 2);
    let before = cache.get_all(OWNER).unwrap();

    let (mutation, temp) =
        OptimisticMutation::begin_add(&cache, OWNER, fixed_draft("Software")).unwrap();
    mutation.rollback().unwrap();

    assert!(!cache.exists(OWNER, temp.id).unwrap());
    assert_eq!(cache.get_all(OWNER).unwrap(), before);
}

#[test]
fn commit_after_temp_vanished_adds_the_real_item() {
    let cache = fixed_costs();
    let (mutation, temp) =
        OptimisticMutation::begin_add(&cache, OWNER, fixed_draft("Travel")).unwrap();
    // A refetch replaced the collection before the create call returned.
    cache.replace_all(OWNER, vec![fixed_cost(1, Some(1))]).unwrap();

    let mut saved = temp;
    saved.id = 2;
    saved.rank = Some(2);
    mutation.commit(saved).unwrap();
    assert_eq!(ids(&cache.get_all(OWNER).unwrap()), vec![1, 2]);
}

#[test]
fn update_rollback_restores_previous_value() {
    let cache = fixed_costs();
    seed_fixed(&cache, 2);
    let before = cache.get_all(OWNER).unwrap();

    let mutation = OptimisticMutation::begin(&cache, OWNER).unwrap();
    cache
        .update_with(OWNER, 1, |cost| cost.amount = 0.0)
        .unwrap();
    cache.remove(OWNER, 2).unwrap();
    mutation.rollback().unwrap();

    assert_eq!(cache.get_all(OWNER).unwrap(), before);
}

#[test]
fn settle_keeps_optimistic_state() {
    let cache = fixed_costs();
    seed_fixed(&cache, 2);
    let mutation = OptimisticMutation::begin(&cache, OWNER).unwrap();
    cache.remove(OWNER, 1).unwrap();
    mutation.settle();
    assert_eq!(ids(&cache.get_all(OWNER).unwrap()), vec![2]);
}

#[test]
fn late_rollback_overwrites_newer_state() {
    let cache = fixed_costs();
    seed_fixed(&cache, 1);

    let first = OptimisticMutation::begin(&cache, OWNER).unwrap();
    cache.add(OWNER, fixed_cost(2, Some(2))).unwrap();
    let second = OptimisticMutation::begin(&cache, OWNER).unwrap();
    cache.add(OWNER, fixed_cost(3, Some(3))).unwrap();
    second.settle();

    // Last write wins: the first flow's rollback drops both later adds.
    first.rollback().unwrap();
    assert_eq!(ids(&cache.get_all(OWNER).unwrap()), vec![1]);
}

#[test]
fn engines_can_share_a_dedicated_id_generator() {
    let ids_gen = Arc::new(OptimisticIdGenerator::new());
    let store = InMemoryKeyedStore::new();
    let a = create_collection_engine(store.clone(), FixedCosts, OperationLogger::disabled())
        .with_id_generator(ids_gen.clone());
    let b = create_collection_engine(store, FixedCosts, OperationLogger::disabled())
        .with_id_generator(ids_gen);

    let first = a.add_optimistic(OWNER, fixed_draft("a")).unwrap();
    let second = b.add_optimistic(OWNER, fixed_draft("b")).unwrap();
    assert_eq!((first.id, second.id), (-1, -2));
    assert_eq!(a.count(OWNER).unwrap(), 2);
}
