use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    error::{PileError, Result},
    rewards::{
        achievements::{reached_milestones, Achievement, AchievementDef, MilestoneStats},
        catalog::{eligible_rewards, Reward},
        levels::{level_title, LevelProgress, LevelScale},
    },
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub total_batteries_recycled: u32,
    pub total_points: u32,
    pub level: u32,
    pub events_attended: u32,
    pub achievements: Vec<Achievement>,
}

impl UserProfile {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            total_batteries_recycled: 0,
            total_points: 0,
            level: 0,
            events_attended: 0,
            achievements: Vec::new(),
        }
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.iter().any(|a| a.id == id)
    }
}

/// Result of awarding points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AwardResult {
    pub total_points: u32,
    pub level: u32,
    pub leveled_up: bool,
}

/// Points balance, level and achievements of one user
///
/// Points only ever increase. The stored level is recomputed from the
/// points total on every change so the two cannot drift apart.
#[derive(Debug, Clone)]
pub struct PointsLedger {
    profile: UserProfile,
    scale: LevelScale,
}

impl PointsLedger {
    pub fn new(mut profile: UserProfile, scale: LevelScale) -> Self {
        profile.level = scale.level_for(profile.total_points);
        Self { profile, scale }
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn scale(&self) -> LevelScale {
        self.scale
    }

    pub fn total_points(&self) -> u32 {
        self.profile.total_points
    }

    pub fn level(&self) -> u32 {
        self.profile.level
    }

    pub fn level_title(&self) -> &'static str {
        level_title(self.profile.level)
    }

    pub fn progress(&self) -> LevelProgress {
        self.scale.progress(self.profile.total_points)
    }

    pub fn award(&mut self, points: u32) -> AwardResult {
        let previous_level = self.profile.level;

        self.profile.total_points = self.profile.total_points.saturating_add(points);
        self.profile.level = self.scale.level_for(self.profile.total_points);

        let leveled_up = self.profile.level > previous_level;
        if leveled_up {
            info!(
                "Level up: {} -> {} ({})",
                previous_level,
                self.profile.level,
                self.level_title()
            );
        }
        debug!("Awarded {} points, total {}", points, self.profile.total_points);

        AwardResult {
            total_points: self.profile.total_points,
            level: self.profile.level,
            leveled_up,
        }
    }

    pub fn eligible_rewards<'a>(&self, catalog: &'a [Reward]) -> Vec<&'a Reward> {
        eligible_rewards(catalog, self.profile.total_points)
    }

    /// Check a redemption request against the catalog
    ///
    /// The balance is not deducted: redemption only confirms eligibility.
    pub fn redeem<'a>(&self, catalog: &'a [Reward], reward_id: &str) -> Result<&'a Reward> {
        let reward = catalog
            .iter()
            .find(|r| r.id == reward_id)
            .ok_or_else(|| PileError::NotFound(format!("reward {}", reward_id)))?;

        if !reward.available {
            return Err(PileError::NotEligible(format!("{} is not available", reward.title)));
        }
        if !reward.is_eligible(self.profile.total_points) {
            return Err(PileError::NotEligible(format!(
                "{} requires {} points, balance is {}",
                reward.title, reward.points_required, self.profile.total_points
            )));
        }

        warn!(
            "Redeemed '{}' without deducting {} points",
            reward.title, reward.points_required
        );
        Ok(reward)
    }

    pub fn unlock_achievement(&mut self, def: &AchievementDef) -> Option<Achievement> {
        self.unlock_achievement_at(def, Utc::now())
    }

    /// Append an achievement unless one with the same id is already unlocked
    pub fn unlock_achievement_at(
        &mut self,
        def: &AchievementDef,
        now: DateTime<Utc>,
    ) -> Option<Achievement> {
        if self.profile.has_achievement(&def.id) {
            return None;
        }

        let achievement = def.unlock(now);
        info!("Achievement unlocked: {}", achievement.title);
        self.profile.achievements.push(achievement.clone());
        Some(achievement)
    }

    /// Count one more recycled battery and unlock any milestone it completes
    pub fn record_recycled_at(&mut self, now: DateTime<Utc>) -> Vec<Achievement> {
        self.profile.total_batteries_recycled = self.profile.total_batteries_recycled.saturating_add(1);
        self.unlock_milestones(now)
    }

    /// Count one more attended event and unlock any milestone it completes
    pub fn record_event_at(&mut self, now: DateTime<Utc>) -> Vec<Achievement> {
        self.profile.events_attended = self.profile.events_attended.saturating_add(1);
        self.unlock_milestones(now)
    }

    fn unlock_milestones(&mut self, now: DateTime<Utc>) -> Vec<Achievement> {
        let stats = MilestoneStats {
            batteries_recycled: self.profile.total_batteries_recycled,
            events_attended: self.profile.events_attended,
        };

        reached_milestones(&stats)
            .filter_map(|milestone| self.unlock_achievement_at(&milestone.definition(), now))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewards::catalog::RewardKind;

    fn ledger() -> PointsLedger {
        PointsLedger::new(UserProfile::new("1", "Marie"), LevelScale::new(100, 6))
    }

    fn catalog() -> Vec<Reward> {
        [("drink", 50), ("bracelet", 100), ("kit", 300)]
            .iter()
            .map(|(id, points)| Reward {
                id: id.to_string(),
                kind: RewardKind::Drink,
                title: id.to_string(),
                description: String::new(),
                points_required: *points,
                available: true,
            })
            .collect()
    }

    #[test]
    fn test_award_crossing_levels() {
        let mut ledger = ledger();
        let result = ledger.award(235);
        assert_eq!(result.total_points, 235);
        assert_eq!(result.level, 2);
        assert!(result.leveled_up);
        assert_eq!(ledger.level_title(), "Écologiste");

        let result = ledger.award(10);
        assert_eq!(result.level, 2);
        assert!(!result.leveled_up);
    }

    #[test]
    fn test_award_is_additive() {
        let mut split = ledger();
        split.award(70);
        split.award(45);

        let mut single = ledger();
        single.award(115);

        assert_eq!(split.total_points(), single.total_points());
        assert_eq!(split.level(), single.level());
    }

    #[test]
    fn test_award_saturates() {
        let mut ledger = ledger();
        ledger.award(u32::MAX);
        let result = ledger.award(5);
        assert_eq!(result.total_points, u32::MAX);
        assert_eq!(result.level, 6);
    }

    #[test]
    fn test_new_recomputes_level() {
        let mut profile = UserProfile::new("1", "Marie");
        profile.total_points = 235;
        profile.level = 9;
        let ledger = PointsLedger::new(profile, LevelScale::new(100, 6));
        assert_eq!(ledger.level(), 2);
    }

    #[test]
    fn test_unlock_achievement_once() {
        let mut ledger = ledger();
        let def = AchievementDef::new("festival", "Festivalier", "Scan at a festival", "music");

        assert!(ledger.unlock_achievement(&def).is_some());
        assert!(ledger.unlock_achievement(&def).is_none());
        assert_eq!(ledger.profile().achievements.len(), 1);
    }

    #[test]
    fn test_recycling_unlocks_first_milestone_once() {
        let mut ledger = ledger();
        let now = Utc::now();

        let unlocked = ledger.record_recycled_at(now);
        assert_eq!(unlocked.len(), 1);
        assert_eq!(unlocked[0].id, "first-recycle");

        assert!(ledger.record_recycled_at(now).is_empty());
        assert_eq!(ledger.profile().total_batteries_recycled, 2);
    }

    #[test]
    fn test_third_event_unlocks_ambassador() {
        let mut ledger = ledger();
        let now = Utc::now();
        assert!(ledger.record_event_at(now).is_empty());
        assert!(ledger.record_event_at(now).is_empty());
        let unlocked = ledger.record_event_at(now);
        assert_eq!(unlocked.iter().map(|a| a.id.as_str()).collect::<Vec<_>>(), vec!["ambassador"]);
    }

    #[test]
    fn test_eligible_rewards() {
        let mut ledger = ledger();
        let rewards = catalog();
        assert!(ledger.eligible_rewards(&rewards).is_empty());

        ledger.award(120);
        let ids: Vec<_> = ledger.eligible_rewards(&rewards).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["drink", "bracelet"]);
    }

    #[test]
    fn test_redeem_does_not_deduct() {
        let mut ledger = ledger();
        let rewards = catalog();
        ledger.award(120);

        let reward = ledger.redeem(&rewards, "bracelet").unwrap();
        assert_eq!(reward.id, "bracelet");
        assert_eq!(ledger.total_points(), 120);

        assert!(matches!(ledger.redeem(&rewards, "kit"), Err(PileError::NotEligible(_))));
        assert!(matches!(ledger.redeem(&rewards, "yacht"), Err(PileError::NotFound(_))));
    }
}
