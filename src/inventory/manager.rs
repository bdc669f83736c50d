use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::{
    error::{PileError, Result},
    inventory::models::{Battery, BatteryFilter, BatteryId, BatteryKind, InventorySummary},
};

/// Result of a recycling request
#[derive(Debug, Clone, PartialEq)]
pub struct RecycleResult {
    pub battery: Battery,
    /// False when the battery had already been recycled
    pub newly_recycled: bool,
}

/// Owns the household battery inventory, in insertion order
#[derive(Debug, Clone)]
pub struct BatteryManager {
    batteries: Vec<Battery>,
    next_id: BatteryId,
}

impl Default for BatteryManager {
    fn default() -> Self {
        Self::new()
    }
}

impl BatteryManager {
    pub fn new() -> Self {
        Self {
            batteries: Vec::new(),
            next_id: 1,
        }
    }

    pub fn register(
        &mut self,
        kind: BatteryKind,
        brand: &str,
        location: &str,
        expiry_date: Option<DateTime<Utc>>,
    ) -> Result<Battery> {
        self.register_at(kind, brand, location, expiry_date, Utc::now())
    }

    /// Register a battery added at `now`
    ///
    /// Fails with `Validation` if brand or location is blank; the inventory is
    /// left untouched in that case.
    pub fn register_at(
        &mut self,
        kind: BatteryKind,
        brand: &str,
        location: &str,
        expiry_date: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<Battery> {
        let brand = brand.trim();
        let location = location.trim();

        if brand.is_empty() {
            return Err(PileError::Validation("brand is required".to_string()));
        }
        if location.is_empty() {
            return Err(PileError::Validation("location is required".to_string()));
        }

        let id = self.next_id;
        self.next_id += 1;

        let battery = Battery {
            id,
            kind,
            brand: brand.to_string(),
            location: location.to_string(),
            date_added: now,
            expiry_date,
            recycled: false,
            recycled_at: None,
        };

        info!("Registered battery #{} ({} {}, {})", id, battery.brand, kind, battery.location);
        self.batteries.push(battery.clone());
        Ok(battery)
    }

    pub fn mark_recycled(&mut self, id: BatteryId) -> Result<RecycleResult> {
        self.mark_recycled_at(id, Utc::now())
    }

    /// Mark a battery recycled; re-marking is a no-op returning the unchanged battery
    pub fn mark_recycled_at(&mut self, id: BatteryId, now: DateTime<Utc>) -> Result<RecycleResult> {
        let battery = self
            .batteries
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| PileError::NotFound(format!("battery #{}", id)))?;

        let newly_recycled = battery.mark_recycled(now);
        if newly_recycled {
            info!("Battery #{} marked as recycled", id);
        } else {
            debug!("Battery #{} was already recycled", id);
        }

        Ok(RecycleResult {
            battery: battery.clone(),
            newly_recycled,
        })
    }

    /// Permanently remove a battery, recycled or not
    pub fn remove(&mut self, id: BatteryId) -> Result<()> {
        let index = self
            .batteries
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| PileError::NotFound(format!("battery #{}", id)))?;

        let removed = self.batteries.remove(index);
        info!("Removed battery #{} ({})", removed.id, removed.brand);
        Ok(())
    }

    pub fn get(&self, id: BatteryId) -> Option<&Battery> {
        self.batteries.iter().find(|b| b.id == id)
    }

    pub fn list(&self, filter: BatteryFilter) -> Vec<&Battery> {
        self.batteries.iter().filter(|b| filter.matches(b)).collect()
    }

    pub fn active(&self) -> Vec<&Battery> {
        self.list(BatteryFilter::ActiveOnly)
    }

    pub fn recycled(&self) -> Vec<&Battery> {
        self.list(BatteryFilter::RecycledOnly)
    }

    pub fn expired(&self) -> Vec<&Battery> {
        self.expired_at(Utc::now())
    }

    /// Active batteries past their expiry date at `now`
    pub fn expired_at(&self, now: DateTime<Utc>) -> Vec<&Battery> {
        self.batteries
            .iter()
            .filter(|b| !b.recycled && b.is_expired_at(now))
            .collect()
    }

    pub fn summary_at(&self, now: DateTime<Utc>) -> InventorySummary {
        InventorySummary {
            active: self.active().len(),
            expired: self.expired_at(now).len(),
            recycled: self.recycled().len(),
        }
    }

    pub fn len(&self) -> usize {
        self.batteries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batteries.is_empty()
    }
}
