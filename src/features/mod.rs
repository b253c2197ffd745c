//! Cache configurations for the expense tracker's features.
//!
//! Each feature binds its item type, ordering and validation rules to the
//! generic engines. Billable and fixed costs keep rank ties in their
//! existing order; equipment costs break rank ties by id.

mod billable;
mod equipment;
mod fixed;
mod settings;

pub use billable::{BillableCost, BillableCostDraft, BillableCosts};
pub use equipment::{EquipmentCost, EquipmentCostDraft, EquipmentCosts};
pub use fixed::{CostPeriod, FixedCost, FixedCostDraft, FixedCosts};
pub use settings::{CostSettings, CostSettingsConfig, CostSettingsDraft};
