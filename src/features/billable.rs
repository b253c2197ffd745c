use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::config::CollectionConfig;
use crate::item::{ItemId, Rank};
use crate::{CacheItem, Rankable};

/// Hours billed to a client at an hourly rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, CacheItem, Rankable)]
pub struct BillableCost {
    pub id: ItemId,
    pub owner_id: String,
    pub created_at: Option<SystemTime>,
    pub updated_at: Option<SystemTime>,
    pub rank: Option<Rank>,
    pub title: String,
    pub hours: f64,
    pub hourly_rate: f64,
}

impl BillableCost {
    pub fn total(&self) -> f64 {
        self.hours * self.hourly_rate
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BillableCostDraft {
    pub title: String,
    pub hours: f64,
    pub hourly_rate: f64,
    pub rank: Option<Rank>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BillableCosts;

impl CollectionConfig for BillableCosts {
    type Item = BillableCost;
    type Draft = BillableCostDraft;

    fn feature(&self) -> &str {
        "billable_costs"
    }

    fn validate(&self, item: &BillableCost) -> Vec<String> {
        let mut defects = Vec::new();
        if item.title.trim().is_empty() {
            defects.push("title is required".to_string());
        }
        if item.hours < 0.0 {
            defects.push("hours must not be negative".to_string());
        }
        if item.hourly_rate < 0.0 {
            defects.push("hourly rate must not be negative".to_string());
        }
        defects
    }

    fn make_optimistic(
        &self,
        draft: BillableCostDraft,
        owner_id: &str,
        id: ItemId,
    ) -> BillableCost {
        let now = SystemTime::now();
        BillableCost {
            id,
            owner_id: owner_id.to_string(),
            created_at: Some(now),
            updated_at: Some(now),
            rank: draft.rank,
            title: draft.title,
            hours: draft.hours,
            hourly_rate: draft.hourly_rate,
        }
    }
}
