//! Timed volume spawner and shared spawn sampling
//!
//! Fills a box with coins at scene start: one coin every `interval` seconds
//! until `count` coins exist, then the spawner finishes.

use glam::{Quat, Vec3};
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::timers::Timers;
use crate::consts::{DEFAULT_VOLUME_COIN_COUNT, DEFAULT_VOLUME_INTERVAL};
use crate::error::SetupError;
use crate::platform::{
    Aabb, Activity, BodySettings, Component, EntityId, EntityTag, SpawnRequest, Transform, World,
};
use crate::{euler_degrees, lerp};

/// How spawned coins are oriented
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum RotationMode {
    /// Same Euler rotation (degrees) for every coin
    Uniform { euler_degrees: Vec3 },
    /// Independent random 0-360° per axis
    #[default]
    RandomPerAxis,
}

impl RotationMode {
    pub fn sample(&self, rng: &mut Pcg32) -> Quat {
        match self {
            RotationMode::Uniform { euler_degrees: e } => euler_degrees(e.x, e.y, e.z),
            RotationMode::RandomPerAxis => random_rotation(rng),
        }
    }
}

/// Random rotation with each Euler axis in [0, 360)
pub fn random_rotation(rng: &mut Pcg32) -> Quat {
    euler_degrees(
        rng.random::<f32>() * 360.0,
        rng.random::<f32>() * 360.0,
        rng.random::<f32>() * 360.0,
    )
}

/// Uniform point inside the box
pub fn sample_point(volume: &Aabb, rng: &mut Pcg32) -> Vec3 {
    let (min, max) = (volume.min(), volume.max());
    Vec3::new(
        lerp(min.x, max.x, rng.random::<f32>()),
        lerp(min.y, max.y, rng.random::<f32>()),
        lerp(min.z, max.z, rng.random::<f32>()),
    )
}

/// Uniform prefab choice. Callers check for an empty list at attach.
pub fn pick_prefab<'a>(prefabs: &'a [String], rng: &mut Pcg32) -> Option<&'a str> {
    if prefabs.is_empty() {
        return None;
    }
    Some(prefabs[rng.random_range(0..prefabs.len())].as_str())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeSpawnerConfig {
    pub name: String,
    pub prefabs: Vec<String>,
    /// Local-space box coins are spawned in
    pub volume: Option<Aabb>,
    /// Node transform applied to sampled points
    pub origin: Transform,
    pub count: u32,
    /// Seconds between spawns
    pub interval: f32,
    pub rotation: RotationMode,
}

impl Default for VolumeSpawnerConfig {
    fn default() -> Self {
        Self {
            name: "InitialCoinVolume".to_string(),
            prefabs: Vec::new(),
            volume: None,
            origin: Transform::default(),
            count: DEFAULT_VOLUME_COIN_COUNT,
            interval: DEFAULT_VOLUME_INTERVAL,
            rotation: RotationMode::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SpawnNext;

#[derive(Debug)]
pub struct VolumeSpawner {
    config: VolumeSpawnerConfig,
    rng: Pcg32,
    timers: Timers<SpawnNext>,
    spawned: Vec<EntityId>,
}

impl VolumeSpawner {
    pub fn new(config: VolumeSpawnerConfig, rng: Pcg32) -> Self {
        Self {
            config,
            rng,
            timers: Timers::new(),
            spawned: Vec::new(),
        }
    }

    /// Entities created so far
    pub fn spawned(&self) -> &[EntityId] {
        &self.spawned
    }

    pub fn is_done(&self) -> bool {
        self.spawned.len() as u32 >= self.config.count
    }

    fn spawn_one<W: World>(&mut self, volume: Aabb, world: &mut W) {
        let Some(prefab) = pick_prefab(&self.config.prefabs, &mut self.rng).map(str::to_owned)
        else {
            return;
        };
        let local = sample_point(&volume, &mut self.rng);
        let request = SpawnRequest {
            prefab,
            transform: Transform {
                position: self.config.origin.transform_point(local),
                rotation: self.config.rotation.sample(&mut self.rng),
            },
            body: BodySettings::dynamic(),
            tag: EntityTag::Coin,
        };
        self.spawned.push(world.spawn(&request));
    }
}

impl<W: World> Component<W> for VolumeSpawner {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn on_attach(&mut self, _world: &mut W) -> Result<(), SetupError> {
        if self.config.volume.is_none() {
            return Err(SetupError::missing(&self.config.name, "bounding volume"));
        }
        if self.config.prefabs.is_empty() {
            return Err(SetupError::missing(&self.config.name, "coin prefabs"));
        }
        if self.config.count > 0 {
            self.timers.schedule(self.config.interval, SpawnNext);
            log::info!(
                "[{}] spawning {} coins every {}s",
                self.config.name,
                self.config.count,
                self.config.interval
            );
        }
        Ok(())
    }

    fn on_tick(&mut self, dt: f32, world: &mut W) -> Activity {
        let Some(volume) = self.config.volume else {
            return Activity::Finished;
        };
        self.timers.advance(dt);
        while !self.is_done() {
            let Some(due) = self.timers.pop_due() else {
                break;
            };
            self.spawn_one(volume, world);
            if !self.is_done() {
                self.timers
                    .schedule_at(due.fire_at + f64::from(self.config.interval.max(0.0)), due.task);
            }
        }

        if self.is_done() {
            log::info!("[{}] spawned {} coins", self.config.name, self.spawned.len());
            Activity::Finished
        } else {
            Activity::Active
        }
    }

    fn on_detach(&mut self, _world: &mut W) {
        self.timers.clear();
    }
}
