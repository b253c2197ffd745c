use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::config::CollectionConfig;
use crate::item::{ItemId, Rank};
use crate::{CacheItem, Rankable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostPeriod {
    #[default]
    Monthly,
    Yearly,
}

/// A recurring cost such as rent or insurance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, CacheItem, Rankable)]
pub struct FixedCost {
    pub id: ItemId,
    pub owner_id: String,
    pub created_at: Option<SystemTime>,
    pub updated_at: Option<SystemTime>,
    pub rank: Option<Rank>,
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub period: CostPeriod,
}

impl FixedCost {
    pub fn monthly_amount(&self) -> f64 {
        match self.period {
            CostPeriod::Monthly => self.amount,
            CostPeriod::Yearly => self.amount / 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FixedCostDraft {
    pub name: String,
    pub amount: f64,
    pub period: CostPeriod,
    pub rank: Option<Rank>,
}

impl FixedCostDraft {
    pub fn monthly(name: impl Into<String>, amount: f64) -> Self {
        Self {
            name: name.into(),
            amount,
            period: CostPeriod::Monthly,
            rank: None,
        }
    }

    pub fn with_rank(mut self, rank: Rank) -> Self {
        self.rank = Some(rank);
        self
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FixedCosts;

impl CollectionConfig for FixedCosts {
    type Item = FixedCost;
    type Draft = FixedCostDraft;

    fn feature(&self) -> &str {
        "fixed_costs"
    }

    fn validate(&self, item: &FixedCost) -> Vec<String> {
        let mut defects = Vec::new();
        if item.name.trim().is_empty() {
            defects.push("name is required".to_string());
        }
        if item.amount < 0.0 {
            defects.push("amount must not be negative".to_string());
        }
        defects
    }

    fn make_optimistic(&self, draft: FixedCostDraft, owner_id: &str, id: ItemId) -> FixedCost {
        let now = SystemTime::now();
        FixedCost {
            id,
            owner_id: owner_id.to_string(),
            created_at: Some(now),
            updated_at: Some(now),
            rank: draft.rank,
            name: draft.name,
            amount: draft.amount,
            period: draft.period,
        }
    }
}
