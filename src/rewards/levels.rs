use serde::Serialize;

use crate::config::PointsConfig;

/// Level titles, lowest first. Levels past the end keep the last title.
pub const LEVEL_TITLES: [&str; 7] = [
    "Débutant",
    "Novice",
    "Écologiste",
    "Expert",
    "Ambassadeur",
    "Champion",
    "Légende",
];

pub fn level_title(level: u32) -> &'static str {
    let index = (level as usize).min(LEVEL_TITLES.len() - 1);
    LEVEL_TITLES[index]
}

/// Step function from cumulative points to level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelScale {
    step: u32,
    max_level: u32,
}

impl LevelScale {
    /// A zero step is treated as 1 so the scale is always defined
    pub fn new(step: u32, max_level: u32) -> Self {
        Self {
            step: step.max(1),
            max_level,
        }
    }

    pub fn from_config(config: &PointsConfig) -> Self {
        Self::new(config.level_step, config.max_level)
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    pub fn level_for(&self, points: u32) -> u32 {
        (points / self.step).min(self.max_level)
    }

    /// Points total at which the next level starts, `None` at the top tier
    pub fn next_level_points(&self, level: u32) -> Option<u32> {
        if level >= self.max_level {
            return None;
        }
        Some((level + 1).saturating_mul(self.step))
    }

    pub fn progress(&self, points: u32) -> LevelProgress {
        let level = self.level_for(points);
        let next_level_points = self.next_level_points(level);

        let (points_to_next_level, fraction) = match next_level_points {
            Some(next) => (
                Some(next.saturating_sub(points)),
                (points as f64 / next as f64).clamp(0.0, 1.0),
            ),
            None => (None, 1.0),
        };

        LevelProgress {
            level,
            title: level_title(level),
            total_points: points,
            next_level_points,
            points_to_next_level,
            fraction,
        }
    }
}

impl Default for LevelScale {
    fn default() -> Self {
        Self::from_config(&PointsConfig::default())
    }
}

/// Progress bar figures for the profile screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelProgress {
    pub level: u32,
    pub title: &'static str,
    pub total_points: u32,
    pub next_level_points: Option<u32>,
    pub points_to_next_level: Option<u32>,
    /// `total_points / next_level_points`, clamped to [0, 1]
    pub fraction: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_steps() {
        let scale = LevelScale::new(100, 6);
        assert_eq!(scale.level_for(0), 0);
        assert_eq!(scale.level_for(99), 0);
        assert_eq!(scale.level_for(100), 1);
        assert_eq!(scale.level_for(235), 2);
        assert_eq!(scale.level_for(10_000), 6);
    }

    #[test]
    fn test_level_is_monotonic() {
        let scale = LevelScale::new(100, 6);
        let mut previous = 0;
        for points in 0..1_000 {
            let level = scale.level_for(points);
            assert!(level >= previous);
            previous = level;
        }
    }

    #[test]
    fn test_title_clamped() {
        assert_eq!(level_title(0), "Débutant");
        assert_eq!(level_title(2), "Écologiste");
        assert_eq!(level_title(6), "Légende");
        assert_eq!(level_title(42), "Légende");
        assert_eq!(level_title(u32::MAX), "Légende");
    }

    #[test]
    fn test_progress() {
        let scale = LevelScale::new(100, 6);
        let progress = scale.progress(235);
        assert_eq!(progress.level, 2);
        assert_eq!(progress.next_level_points, Some(300));
        assert_eq!(progress.points_to_next_level, Some(65));
        assert!((progress.fraction - 235.0 / 300.0).abs() < 1e-9);

        let top = scale.progress(900);
        assert_eq!(top.level, 6);
        assert_eq!(top.next_level_points, None);
        assert_eq!(top.fraction, 1.0);
    }

    #[test]
    fn test_zero_step_does_not_divide_by_zero() {
        let scale = LevelScale::new(0, 3);
        assert_eq!(scale.step(), 1);
        assert_eq!(scale.level_for(2), 2);
    }
}
