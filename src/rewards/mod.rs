pub mod achievements;
pub mod catalog;
pub mod ledger;
pub mod levels;

pub use achievements::{Achievement, AchievementDef, Milestone, MILESTONES};
pub use catalog::{eligible_rewards, Reward, RewardKind};
pub use ledger::{AwardResult, PointsLedger, UserProfile};
pub use levels::{level_title, LevelProgress, LevelScale, LEVEL_TITLES};
