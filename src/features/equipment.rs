use std::cmp::Ordering;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::config::CollectionConfig;
use crate::item::{compare_by_rank_then_id, ItemId, Rank};
use crate::{CacheItem, Rankable};

/// A piece of equipment depreciated over its life span, partly used for
/// the business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, CacheItem, Rankable)]
pub struct EquipmentCost {
    pub id: ItemId,
    pub owner_id: String,
    pub created_at: Option<SystemTime>,
    pub updated_at: Option<SystemTime>,
    pub rank: Option<Rank>,
    pub name: String,
    pub amount: f64,
    /// Share of business use, in percent.
    pub usage: f64,
    /// Depreciation period in years.
    pub life_span: i32,
}

impl EquipmentCost {
    /// Business share of the purchase spread evenly over the life span.
    /// Zero when the life span is not positive.
    pub fn monthly_cost(&self) -> f64 {
        if self.life_span <= 0 {
            return 0.0;
        }
        self.amount * (self.usage / 100.0) / (self.life_span as f64 * 12.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentCostDraft {
    pub name: String,
    pub amount: f64,
    pub usage: f64,
    pub life_span: i32,
    pub rank: Option<Rank>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EquipmentCosts;

impl CollectionConfig for EquipmentCosts {
    type Item = EquipmentCost;
    type Draft = EquipmentCostDraft;

    fn feature(&self) -> &str {
        "equipment_costs"
    }

    fn compare(&self, a: &EquipmentCost, b: &EquipmentCost) -> Ordering {
        compare_by_rank_then_id(a, b)
    }

    fn validate(&self, item: &EquipmentCost) -> Vec<String> {
        let mut defects = Vec::new();
        if item.name.trim().is_empty() {
            defects.push("name is required".to_string());
        }
        if item.amount < 0.0 {
            defects.push("amount must not be negative".to_string());
        }
        if !(0.0..=100.0).contains(&item.usage) {
            defects.push("usage must be between 0 and 100".to_string());
        }
        if item.life_span < 1 {
            defects.push("life span must be at least 1 year".to_string());
        }
        defects
    }

    fn make_optimistic(
        &self,
        draft: EquipmentCostDraft,
        owner_id: &str,
        id: ItemId,
    ) -> EquipmentCost {
        let now = SystemTime::now();
        EquipmentCost {
            id,
            owner_id: owner_id.to_string(),
            created_at: Some(now),
            updated_at: Some(now),
            rank: draft.rank,
            name: draft.name,
            amount: draft.amount,
            usage: draft.usage,
            life_span: draft.life_span,
        }
    }
}
