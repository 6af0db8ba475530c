//! Game configuration
//!
//! Every tunable property of the scene in one serde struct. Loaded from
//! JSON; missing fields fall back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::dropper::DropperConfig;
use crate::sim::launcher::LauncherConfig;
use crate::sim::motion::{PlatformConfig, PusherConfig};
use crate::sim::score::ScoreConfig;
use crate::sim::spawn::VolumeSpawnerConfig;
use crate::sim::state::SessionConfig;
use crate::sim::zone::ScoringZoneConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for every spawner RNG
    pub seed: u64,
    pub score: ScoreConfig,
    pub session: SessionConfig,
    /// Coins placed at scene start
    pub initial_coins: Vec<VolumeSpawnerConfig>,
    pub dropper: Option<DropperConfig>,
    pub launcher: Option<LauncherConfig>,
    pub scoring_zones: Vec<ScoringZoneConfig>,
    pub pushers: Vec<PusherConfig>,
    pub platforms: Vec<PlatformConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0x00c0_1beef,
            score: ScoreConfig::default(),
            session: SessionConfig::default(),
            initial_coins: Vec::new(),
            dropper: None,
            launcher: None,
            scoring_zones: Vec::new(),
            pushers: Vec::new(),
            platforms: Vec::new(),
        }
    }
}

impl GameConfig {
    /// Parse and validate
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded game config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values no component can work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        for spawner in &self.initial_coins {
            if spawner.interval < 0.0 {
                return Err(invalid(&spawner.name, "interval must be >= 0"));
            }
            if let Some(volume) = spawner.volume {
                if volume.size.min_element() < 0.0 {
                    return Err(invalid(&spawner.name, "volume size must be >= 0"));
                }
            }
        }
        if let Some(dropper) = &self.dropper {
            if dropper.min_z > dropper.max_z {
                return Err(invalid(&dropper.name, "min_z must be <= max_z"));
            }
            if dropper.min_angular_factor > dropper.max_angular_factor {
                return Err(invalid(
                    &dropper.name,
                    "min_angular_factor must be <= max_angular_factor",
                ));
            }
            if dropper.drop_delay < 0.0 {
                return Err(invalid(&dropper.name, "drop_delay must be >= 0"));
            }
        }
        if let Some(launcher) = &self.launcher {
            if launcher.min_force > launcher.max_force {
                return Err(invalid(&launcher.name, "min_force must be <= max_force"));
            }
            if launcher.charge_time < 0.0 {
                return Err(invalid(&launcher.name, "charge_time must be >= 0"));
            }
        }
        for pusher in &self.pushers {
            if pusher.move_distance <= 0.0 {
                return Err(invalid(&pusher.name, "move_distance must be > 0"));
            }
        }
        Ok(())
    }
}

fn invalid(component: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid(format!("{}: {}", component, reason))
}
