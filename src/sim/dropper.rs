//! Preview-then-drop coin spawner
//!
//! Keeps one kinematic preview coin at a movable spawn point. Dropping hands
//! it to physics with a random tumble, then waits `drop_delay` seconds
//! before showing the next preview. The drop input is disabled meanwhile.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::spawn::{pick_prefab, random_rotation};
use super::state::{GameStateMachine, LaunchGate};
use super::timers::Timers;
use crate::consts::*;
use crate::error::SetupError;
use crate::lerp;
use crate::platform::{
    Activity, BodySettings, Component, EntityId, EntityTag, SpawnRequest, Transform, World,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DropperConfig {
    pub name: String,
    pub prefabs: Vec<String>,
    /// Starting spawn point (world space)
    pub spawn_point: Vec3,
    /// Z range the spawn point may move in
    pub min_z: f32,
    pub max_z: f32,
    /// Spawn point units per touch-move pixel
    pub move_sensitivity: f32,
    /// Range for the random per-axis angular factor applied on drop
    pub min_angular_factor: f32,
    pub max_angular_factor: f32,
    /// Seconds between a drop and the next preview
    pub drop_delay: f32,
}

impl Default for DropperConfig {
    fn default() -> Self {
        Self {
            name: "CoinGenerator".to_string(),
            prefabs: Vec::new(),
            spawn_point: Vec3::new(0.0, 3.0, DEFAULT_DROPPER_MAX_Z),
            min_z: DEFAULT_DROPPER_MIN_Z,
            max_z: DEFAULT_DROPPER_MAX_Z,
            move_sensitivity: DEFAULT_MOVE_SENSITIVITY,
            min_angular_factor: DEFAULT_MIN_ANGULAR_FACTOR,
            max_angular_factor: DEFAULT_MAX_ANGULAR_FACTOR,
            drop_delay: DEFAULT_DROP_DELAY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DropperTask {
    NextPreview,
}

#[derive(Debug)]
pub struct CoinDropper {
    config: DropperConfig,
    rng: Pcg32,
    session: Rc<RefCell<GameStateMachine>>,
    gate: LaunchGate,
    position: Vec3,
    preview: Option<EntityId>,
    /// A drop happened and the next preview is pending
    dropping: bool,
    timers: Timers<DropperTask>,
}

impl CoinDropper {
    pub fn new(
        config: DropperConfig,
        rng: Pcg32,
        session: Rc<RefCell<GameStateMachine>>,
        gate: LaunchGate,
    ) -> Self {
        let position = config.spawn_point;
        Self {
            config,
            rng,
            session,
            gate,
            position,
            preview: None,
            dropping: false,
            timers: Timers::new(),
        }
    }

    pub fn preview(&self) -> Option<EntityId> {
        self.preview
    }

    pub fn spawn_point(&self) -> Vec3 {
        self.position
    }

    /// Whether the drop button should be interactable
    pub fn input_enabled(&self) -> bool {
        !self.dropping && self.gate.is_open()
    }

    /// Move the spawn point along Z from a horizontal touch delta
    pub fn touch_move<W: World>(&mut self, delta_x: f32, world: &mut W) {
        let z = self.position.z + delta_x * self.config.move_sensitivity;
        self.position.z = z.clamp(self.config.min_z, self.config.max_z);
        if let Some(preview) = self.preview {
            world.set_position(preview, self.position);
        }
    }

    /// Release the preview coin into physics.
    /// Returns the dropped entity, or None if the drop was ignored.
    pub fn drop_coin<W: World>(&mut self, world: &mut W) -> Option<EntityId> {
        if self.dropping || !self.gate.is_open() {
            return None;
        }
        let coin = self.preview.take()?;
        if !world.is_alive(coin) {
            log::warn!(
                "[{}] preview coin {:?} is gone, respawning",
                self.config.name,
                coin
            );
            self.generate_next_preview(world);
            return None;
        }
        self.dropping = true;

        let (min, max) = (self.config.min_angular_factor, self.config.max_angular_factor);
        let mut factor = || lerp(min, max, self.rng.random::<f32>());
        let angular_factor = Vec3::new(factor(), factor(), factor());
        world.set_body(
            coin,
            BodySettings {
                angular_factor,
                ..BodySettings::dynamic()
            },
        );
        world.set_tag(coin, EntityTag::Coin);

        self.timers.schedule(self.config.drop_delay, DropperTask::NextPreview);
        self.session.borrow_mut().on_coin_launched();
        Some(coin)
    }

    fn generate_next_preview<W: World>(&mut self, world: &mut W) {
        let Some(prefab) = pick_prefab(&self.config.prefabs, &mut self.rng).map(str::to_owned)
        else {
            log::warn!("[{}] coin prefab list is empty", self.config.name);
            return;
        };
        let request = SpawnRequest {
            prefab,
            transform: Transform {
                position: self.position,
                rotation: random_rotation(&mut self.rng),
            },
            body: BodySettings::kinematic(),
            // Zones ignore the preview until it is dropped
            tag: EntityTag::Prop,
        };
        log::debug!("[{}] next preview coin: {}", self.config.name, request.prefab);
        self.preview = Some(world.spawn(&request));
    }
}

impl<W: World> Component<W> for CoinDropper {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn on_attach(&mut self, world: &mut W) -> Result<(), SetupError> {
        if self.config.prefabs.is_empty() {
            return Err(SetupError::missing(&self.config.name, "coin prefabs"));
        }
        self.position.z = self.position.z.clamp(self.config.min_z, self.config.max_z);
        self.generate_next_preview(world);
        Ok(())
    }

    fn on_tick(&mut self, dt: f32, world: &mut W) -> Activity {
        self.timers.advance(dt);
        while let Some(due) = self.timers.pop_due() {
            match due.task {
                DropperTask::NextPreview => {
                    self.generate_next_preview(world);
                    self.dropping = false;
                }
            }
        }
        Activity::Active
    }

    fn on_detach(&mut self, world: &mut W) {
        self.timers.clear();
        if let Some(preview) = self.preview.take() {
            world.despawn(preview);
        }
    }
}
