//! Per-feature cache configuration and engine-wide settings.
//!
//! A feature hands its capability bundle (key factory, comparator,
//! validator, optimistic-item factory) to a factory function once, and gets
//! back an engine that is typed end to end for that feature's items.

use std::cmp::Ordering;
use std::time::Duration;

use serde::Deserialize;

use crate::error::SettingsError;
use crate::item::{compare_by_rank, CacheItem, ItemId, RankableItem};
use crate::key::CacheKey;

/// Capability bundle for a feature cached as an ordered collection.
pub trait CollectionConfig: Send + Sync {
    type Item: RankableItem;

    /// Input accepted by [`make_optimistic`](Self::make_optimistic).
    type Draft;

    /// Feature name used as the first key token (e.g. `"fixed_costs"`).
    fn feature(&self) -> &str;

    fn key_of(&self, owner_id: &str) -> CacheKey {
        CacheKey::new(self.feature(), owner_id)
    }

    /// Collection order. Defaults to rank ascending with ties left in
    /// their existing order.
    fn compare(&self, a: &Self::Item, b: &Self::Item) -> Ordering {
        compare_by_rank(a, b)
    }

    /// Business-rule defects of one item. Advisory only.
    fn validate(&self, _item: &Self::Item) -> Vec<String> {
        Vec::new()
    }

    /// Build a placeholder item carrying the given temporary id.
    fn make_optimistic(&self, draft: Self::Draft, owner_id: &str, id: ItemId) -> Self::Item;
}

/// Capability bundle for a feature cached as a single object per owner.
pub trait ObjectConfig: Send + Sync {
    type Item: CacheItem;

    type Draft;

    fn feature(&self) -> &str;

    fn key_of(&self, owner_id: &str) -> CacheKey {
        CacheKey::new(self.feature(), owner_id)
    }

    fn validate(&self, _item: &Self::Item) -> Vec<String> {
        Vec::new()
    }

    fn make_optimistic(&self, draft: Self::Draft, owner_id: &str, id: ItemId) -> Self::Item;
}

/// Whether engines run the feature validator on write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Validate every written item and log defects as warnings.
    #[default]
    Warn,
    /// Skip validation entirely.
    Off,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggerSettings {
    pub enabled: bool,
    /// Maximum number of operation records retained.
    pub capacity: usize,
    /// Operations slower than this are logged at info level.
    pub slow_threshold_ms: u64,
    /// Interval between periodic summaries when a reporter is running.
    pub summary_interval_ms: u64,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: 1000,
            slow_threshold_ms: 16,
            summary_interval_ms: 60_000,
        }
    }
}

impl LoggerSettings {
    pub fn slow_threshold(&self) -> Duration {
        Duration::from_millis(self.slow_threshold_ms)
    }

    pub fn summary_interval(&self) -> Duration {
        Duration::from_millis(self.summary_interval_ms)
    }
}

/// Engine-wide settings supplied by the host application.
///
/// ```ignore
/// let settings = CacheSettings::from_json_str(r#"{ "validation": "off" }"#)?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub validation: ValidationMode,
    pub logger: LoggerSettings,
}

impl CacheSettings {
    /// Parse settings from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        serde_json::from_str(json).map_err(|e| SettingsError(e.to_string()))
    }
}
