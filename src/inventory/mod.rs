pub mod manager;
pub mod models;

pub use manager::{BatteryManager, RecycleResult};
pub use models::{Battery, BatteryFilter, BatteryId, BatteryKind, InventorySummary};
