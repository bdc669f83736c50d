use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{
    error::{PileError, Result},
    geo::Coordinates,
    inventory::BatteryKind,
};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub points: PointsConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PointsConfig {
    /// Points needed per level step
    pub level_step: u32,
    /// Highest reachable level (index of the last title)
    pub max_level: u32,
    pub collection_point_award: u32,
    pub event_award: u32,
}

impl Default for PointsConfig {
    fn default() -> Self {
        Self {
            level_step: 100,
            max_level: 6,
            collection_point_award: 10,
            event_award: 20,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScanConfig {
    pub battery_marker: String,
    pub collection_point_marker: String,
    pub event_marker: String,
    pub default_kind: BatteryKind,
    pub default_brand: String,
    pub default_location: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            battery_marker: "battery-".to_string(),
            collection_point_marker: "recycling-point-".to_string(),
            event_marker: "event-".to_string(),
            default_kind: BatteryKind::Other,
            default_brand: "Inconnue".to_string(),
            default_location: "Ajoutée par scan".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DirectoryConfig {
    pub default_latitude: f64,
    pub default_longitude: f64,
    pub geolocation_timeout_ms: u64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        // Lyon centre
        Self {
            default_latitude: 45.7640,
            default_longitude: 4.8357,
            geolocation_timeout_ms: 5000,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProfileConfig {
    pub user_name: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            user_name: "Marie Dupont".to_string(),
        }
    }
}

impl Config {
    /// Load configuration: built-in defaults, then the optional file at `path`,
    /// then `PILEGO_*` environment variables (`PILEGO_POINTS__LEVEL_STEP=50`).
    pub fn load(path: &str) -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Config::try_from(&Config::default())?)
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("PILEGO")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.points.level_step == 0 {
            return Err(PileError::Config("points.level_step must be positive".to_string()));
        }

        let markers = [
            ("scan.battery_marker", &self.scan.battery_marker),
            ("scan.collection_point_marker", &self.scan.collection_point_marker),
            ("scan.event_marker", &self.scan.event_marker),
            ("scan.default_brand", &self.scan.default_brand),
            ("scan.default_location", &self.scan.default_location),
        ];
        for (key, value) in markers {
            if value.trim().is_empty() {
                return Err(PileError::Config(format!("{} must not be empty", key)));
            }
        }

        let lat = self.directory.default_latitude;
        let lng = self.directory.default_longitude;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(PileError::Config(format!(
                "default origin ({}, {}) is out of range",
                lat, lng
            )));
        }

        Ok(())
    }

    pub fn default_origin(&self) -> Coordinates {
        Coordinates::new(self.directory.default_latitude, self.directory.default_longitude)
    }

    pub fn geolocation_timeout(&self) -> Duration {
        Duration::from_millis(self.directory.geolocation_timeout_ms)
    }
}
