use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::{
    config::Config,
    error::Result,
    inventory::{Battery, BatteryId, BatteryKind, BatteryManager},
    rewards::{AwardResult, LevelScale, PointsLedger, Reward, UserProfile},
    scan::{ScanAction, ScanClassifier, ScanOutcome},
};

/// Owns the mutable household state: battery inventory and points ledger
///
/// Every mutation goes through `&mut self`; there is exactly one owner and
/// no shared state to lock.
#[derive(Debug, Clone)]
pub struct RecyclingEngine {
    batteries: BatteryManager,
    ledger: PointsLedger,
    classifier: ScanClassifier,
}

impl RecyclingEngine {
    /// Empty inventory and a zero balance for the configured user
    pub fn new(config: &Config) -> Self {
        let profile = UserProfile::new("1", &config.profile.user_name);
        let ledger = PointsLedger::new(profile, LevelScale::from_config(&config.points));
        Self::from_parts(BatteryManager::new(), ledger, config)
    }

    pub fn from_parts(batteries: BatteryManager, ledger: PointsLedger, config: &Config) -> Self {
        Self {
            batteries,
            ledger,
            classifier: ScanClassifier::from_config(&config.scan, &config.points),
        }
    }

    pub fn with_classifier(mut self, classifier: ScanClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn batteries(&self) -> &BatteryManager {
        &self.batteries
    }

    pub fn ledger(&self) -> &PointsLedger {
        &self.ledger
    }

    pub fn classifier(&self) -> &ScanClassifier {
        &self.classifier
    }

    pub fn register_battery(
        &mut self,
        kind: BatteryKind,
        brand: &str,
        location: &str,
        expiry_date: Option<DateTime<Utc>>,
    ) -> Result<Battery> {
        self.batteries.register(kind, brand, location, expiry_date)
    }

    pub fn mark_recycled(&mut self, id: BatteryId) -> Result<Battery> {
        self.mark_recycled_at(id, Utc::now())
    }

    /// Recycle a battery; the ledger counts it only on its first transition
    pub fn mark_recycled_at(&mut self, id: BatteryId, now: DateTime<Utc>) -> Result<Battery> {
        let result = self.batteries.mark_recycled_at(id, now)?;
        if result.newly_recycled {
            self.ledger.record_recycled_at(now);
        }
        Ok(result.battery)
    }

    pub fn remove_battery(&mut self, id: BatteryId) -> Result<()> {
        self.batteries.remove(id)
    }

    pub fn award(&mut self, points: u32) -> AwardResult {
        self.ledger.award(points)
    }

    pub fn eligible_rewards<'a>(&self, catalog: &'a [Reward]) -> Vec<&'a Reward> {
        self.ledger.eligible_rewards(catalog)
    }

    pub fn redeem<'a>(&self, catalog: &'a [Reward], reward_id: &str) -> Result<&'a Reward> {
        self.ledger.redeem(catalog, reward_id)
    }

    pub fn apply_scan(&mut self, payload: &str) -> Result<ScanOutcome> {
        self.apply_scan_at(payload, Utc::now())
    }

    /// Classify `payload` and dispatch it to the inventory or the ledger
    ///
    /// An unrecognised payload is a normal outcome and changes nothing.
    pub fn apply_scan_at(&mut self, payload: &str, now: DateTime<Utc>) -> Result<ScanOutcome> {
        let Some(action) = self.classifier.classify(payload).cloned() else {
            debug!("Unrecognized scan payload: {}", payload);
            return Ok(ScanOutcome::Unrecognized);
        };

        let outcome = match action {
            ScanAction::RegisterBattery(template) => {
                let battery = self.batteries.register_at(
                    template.kind,
                    &template.brand,
                    &template.location,
                    None,
                    now,
                )?;
                ScanOutcome::BatteryRegistered {
                    battery_id: battery.id,
                }
            }
            ScanAction::ValidateCollectionPoint { points } => {
                let award = self.ledger.award(points);
                ScanOutcome::PointValidated {
                    points_awarded: points,
                    leveled_up: award.leveled_up,
                }
            }
            ScanAction::RegisterEvent { points } => {
                let award = self.ledger.award(points);
                self.ledger.record_event_at(now);
                ScanOutcome::EventRegistered {
                    points_awarded: points,
                    leveled_up: award.leveled_up,
                }
            }
        };

        info!("Scan processed: {:?}", outcome);
        Ok(outcome)
    }
}
