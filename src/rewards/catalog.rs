use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardKind {
    Bracelet,
    Drink,
    Discount,
    Goodies,
}

impl std::fmt::Display for RewardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RewardKind::Bracelet => write!(f, "bracelet"),
            RewardKind::Drink => write!(f, "drink"),
            RewardKind::Discount => write!(f, "discount"),
            RewardKind::Goodies => write!(f, "goodies"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub id: String,
    pub kind: RewardKind,
    pub title: String,
    pub description: String,
    pub points_required: u32,
    pub available: bool,
}

impl Reward {
    pub fn is_eligible(&self, total_points: u32) -> bool {
        self.available && self.points_required <= total_points
    }
}

/// Rewards the balance can afford, in catalog order
pub fn eligible_rewards(catalog: &[Reward], total_points: u32) -> Vec<&Reward> {
    catalog
        .iter()
        .filter(|reward| reward.is_eligible(total_points))
        .collect()
}
