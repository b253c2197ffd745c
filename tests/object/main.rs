//! Integration tests for the single-object engine.

#[path = "../support/mod.rs"]
mod support;

use std::time::SystemTime;

use rank_cache::features::{CostSettings, CostSettingsConfig, CostSettingsDraft};
use rank_cache::{
    create_object_engine, create_object_engine_with_settings, CacheSettings, InMemoryKeyedStore,
    ObjectCache, ObjectConfig, OperationLogger,
};
use serde_json::json;
use support::{init_tracing, OWNER};

fn settings_cache() -> ObjectCache<InMemoryKeyedStore, CostSettingsConfig> {
    init_tracing();
    create_object_engine(InMemoryKeyedStore::new(), CostSettingsConfig, OperationLogger::disabled())
}

fn settings(id: i64, currency: &str) -> CostSettings {
    let now = SystemTime::now();
    CostSettings {
        id,
        user_id: OWNER.to_string(),
        created_at: Some(now),
        updated_at: Some(now),
        currency: currency.to_string(),
        hourly_rate: 80.0,
        tax_rate: 20.0,
    }
}

#[test]
fn absent_until_first_set() {
    let cache = settings_cache();
    assert_eq!(cache.get(OWNER).unwrap(), None);
    assert!(!cache.exists(OWNER).unwrap());

    let eur = settings(1, "EUR");
    cache.set(OWNER, eur.clone()).unwrap();
    assert!(cache.exists(OWNER).unwrap());
    assert_eq!(cache.get(OWNER).unwrap(), Some(eur));
}

#[test]
fn set_overwrites() {
    let cache = settings_cache();
    cache.set(OWNER, settings(1, "EUR")).unwrap();
    let usd = settings(1, "USD");
    cache.set(OWNER, usd.clone()).unwrap();
    assert_eq!(cache.get(OWNER).unwrap(), Some(usd));
}

#[test]
fn partial_update_composes_get_and_set() {
    let cache = settings_cache();
    cache.set(OWNER, settings(1, "EUR")).unwrap();

    let mut current = cache.get(OWNER).unwrap().unwrap();
    current.hourly_rate = 120.0;
    cache.set(OWNER, current).unwrap();

    let stored = cache.get(OWNER).unwrap().unwrap();
    assert_eq!(stored.hourly_rate, 120.0);
    assert_eq!(stored.currency, "EUR");
}

#[test]
fn invalid_object_is_still_written() {
    let cache = settings_cache();
    let mut odd = settings(1, "euro");
    odd.tax_rate = 300.0;
    assert_eq!(cache.config().validate(&odd).len(), 2);
    cache.set(OWNER, odd.clone()).unwrap();
    assert_eq!(cache.get(OWNER).unwrap(), Some(odd));
}

#[test]
fn wrong_shape_reads_as_absent() {
    let cache = settings_cache();
    let key = CostSettingsConfig.key_of(OWNER);

    cache.store().put(&key, json!([1, 2, 3])).unwrap();
    assert_eq!(cache.get(OWNER).unwrap(), None);

    cache.store().put(&key, json!({ "currency": "EUR" })).unwrap();
    assert_eq!(cache.get(OWNER).unwrap(), None);
    assert!(!cache.exists(OWNER).unwrap());
}

#[test]
fn optimistic_set_and_restore() {
    let cache = settings_cache();
    let original = settings(1, "EUR");
    cache.set(OWNER, original.clone()).unwrap();

    let (temp, previous) = cache
        .set_optimistic(
            OWNER,
            CostSettingsDraft {
                currency: "GBP".into(),
                hourly_rate: 70.0,
                tax_rate: 20.0,
            },
        )
        .unwrap();
    assert!(temp.id < 0);
    assert_eq!(previous, Some(original.clone()));
    assert_eq!(cache.get(OWNER).unwrap().unwrap().currency, "GBP");

    cache.restore(OWNER, previous).unwrap();
    assert_eq!(cache.get(OWNER).unwrap(), Some(original));
}

#[test]
fn restore_none_clears_the_slot() {
    let cache = settings_cache();
    let (_, previous) = cache
        .set_optimistic(
            OWNER,
            CostSettingsDraft {
                currency: "EUR".into(),
                hourly_rate: 1.0,
                tax_rate: 1.0,
            },
        )
        .unwrap();
    assert!(previous.is_none());
    cache.restore(OWNER, previous).unwrap();
    assert!(!cache.exists(OWNER).unwrap());
}

#[test]
fn clear_and_settings_variant() {
    let logger = OperationLogger::default();
    let cache = create_object_engine_with_settings(
        InMemoryKeyedStore::new(),
        CostSettingsConfig,
        logger.clone(),
        &CacheSettings::from_json_str(r#"{ "validation": "off" }"#).unwrap(),
    );
    cache.set(OWNER, settings(1, "EUR")).unwrap();
    cache.clear(OWNER).unwrap();
    assert!(cache.get(OWNER).unwrap().is_none());

    let ops: Vec<_> = logger.entries().iter().map(|r| r.operation).collect();
    assert_eq!(ops, vec!["set", "clear"]);
    assert_eq!((logger.entries()[1].before, logger.entries()[1].after), (1, 0));
}
