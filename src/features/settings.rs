use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::config::ObjectConfig;
use crate::item::ItemId;
use crate::CacheItem;

/// Per-user defaults applied across all cost features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, CacheItem)]
pub struct CostSettings {
    pub id: ItemId,
    #[cache(owner)]
    pub user_id: String,
    pub created_at: Option<SystemTime>,
    pub updated_at: Option<SystemTime>,
    pub currency: String,
    pub hourly_rate: f64,
    /// Percent.
    pub tax_rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CostSettingsDraft {
    pub currency: String,
    pub hourly_rate: f64,
    pub tax_rate: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CostSettingsConfig;

impl ObjectConfig for CostSettingsConfig {
    type Item = CostSettings;
    type Draft = CostSettingsDraft;

    fn feature(&self) -> &str {
        "cost_settings"
    }

    fn validate(&self, item: &CostSettings) -> Vec<String> {
        let mut defects = Vec::new();
        if item.currency.len() != 3 || !item.currency.chars().all(|c| c.is_ascii_uppercase()) {
            defects.push("currency must be a three-letter code".to_string());
        }
        if item.hourly_rate < 0.0 {
            defects.push("hourly rate must not be negative".to_string());
        }
        if !(0.0..=100.0).contains(&item.tax_rate) {
            defects.push("tax rate must be between 0 and 100".to_string());
        }
        defects
    }

    fn make_optimistic(
        &self,
        draft: CostSettingsDraft,
        owner_id: &str,
        id: ItemId,
    ) -> CostSettings {
        let now = SystemTime::now();
        CostSettings {
            id,
            user_id: owner_id.to_string(),
            created_at: Some(now),
            updated_at: Some(now),
            currency: draft.currency,
            hourly_rate: draft.hourly_rate,
            tax_rate: draft.tax_rate,
        }
    }
}
