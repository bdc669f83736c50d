use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An unlocked achievement; immutable once recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub unlocked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AchievementDef {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
}

impl AchievementDef {
    pub fn new(id: &str, title: &str, description: &str, icon: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
        }
    }

    pub fn unlock(&self, now: DateTime<Utc>) -> Achievement {
        Achievement {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            icon: self.icon.clone(),
            unlocked_at: now,
        }
    }
}

/// Counters milestone conditions are evaluated against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MilestoneStats {
    pub batteries_recycled: u32,
    pub events_attended: u32,
}

/// An achievement unlocked automatically once its condition holds
pub struct Milestone {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub reached: fn(&MilestoneStats) -> bool,
}

impl Milestone {
    pub fn definition(&self) -> AchievementDef {
        AchievementDef::new(self.id, self.title, self.description, self.icon)
    }
}

fn first_recycle(stats: &MilestoneStats) -> bool {
    stats.batteries_recycled >= 1
}

fn confirmed_ecologist(stats: &MilestoneStats) -> bool {
    stats.batteries_recycled >= 25
}

fn ambassador(stats: &MilestoneStats) -> bool {
    stats.events_attended >= 3
}

pub static MILESTONES: [Milestone; 3] = [
    Milestone {
        id: "first-recycle",
        title: "Premier Recyclage",
        description: "Recyclez votre première pile",
        icon: "trophy",
        reached: first_recycle,
    },
    Milestone {
        id: "confirmed-ecologist",
        title: "Écologiste Confirmé",
        description: "Recyclez 25 piles",
        icon: "leaf",
        reached: confirmed_ecologist,
    },
    Milestone {
        id: "ambassador",
        title: "Ambassadeur Corepile",
        description: "Participez à 3 événements",
        icon: "star",
        reached: ambassador,
    },
];

/// Milestones whose condition holds for `stats`, in table order
pub fn reached_milestones(stats: &MilestoneStats) -> impl Iterator<Item = &'static Milestone> + '_ {
    MILESTONES.iter().filter(move |m| (m.reached)(stats))
}
