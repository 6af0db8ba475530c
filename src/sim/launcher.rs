//! Hold-to-charge coin launcher
//!
//! Touch start begins charging, touch end launches a coin from the launch
//! point with an impulse scaled between min and max force by the charge.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::state::{GameStateMachine, LaunchGate};
use crate::consts::*;
use crate::error::SetupError;
use crate::platform::{
    Activity, BodySettings, Component, EntityId, EntityTag, SpawnRequest, Transform, World,
};
use crate::{clamp01, lerp};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    pub name: String,
    pub prefab: Option<String>,
    /// Launch position and base orientation (forward = -Z)
    pub launch_point: Option<Transform>,
    pub min_force: f32,
    pub max_force: f32,
    /// Seconds to reach full charge
    pub charge_time: f32,
    /// Upward tilt in degrees
    pub launch_angle_y: f32,
    /// Horizontal offset in degrees, 0 = straight
    pub launch_angle_x_offset: f32,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            name: "CoinLauncher".to_string(),
            prefab: None,
            launch_point: None,
            min_force: DEFAULT_MIN_LAUNCH_FORCE,
            max_force: DEFAULT_MAX_LAUNCH_FORCE,
            charge_time: DEFAULT_CHARGE_TIME,
            launch_angle_y: DEFAULT_LAUNCH_ANGLE_Y,
            launch_angle_x_offset: 0.0,
        }
    }
}

#[derive(Debug)]
pub struct CoinLauncher {
    config: LauncherConfig,
    session: Rc<RefCell<GameStateMachine>>,
    gate: LaunchGate,
    charging: bool,
    /// 0 to 1
    charge: f32,
}

impl CoinLauncher {
    pub fn new(
        config: LauncherConfig,
        session: Rc<RefCell<GameStateMachine>>,
        gate: LaunchGate,
    ) -> Self {
        Self {
            config,
            session,
            gate,
            charging: false,
            charge: 0.0,
        }
    }

    /// Current charge for the power bar
    pub fn charge(&self) -> f32 {
        self.charge
    }

    pub fn is_charging(&self) -> bool {
        self.charging
    }

    pub fn touch_start(&mut self) {
        if !self.gate.is_open() {
            return;
        }
        self.charging = true;
        self.charge = 0.0;
    }

    /// Launch if charging. Returns the launched coin.
    pub fn touch_end<W: World>(&mut self, world: &mut W) -> Option<EntityId> {
        if !self.charging {
            return None;
        }
        if !self.gate.is_open() {
            // Paused or game over while charging
            self.charging = false;
            self.charge = 0.0;
            return None;
        }
        let launched = self.launch(world);
        self.charging = false;
        self.charge = 0.0;
        launched
    }

    /// Unit launch direction: the launch point's forward tilted up by
    /// `launch_angle_y`, then yawed by `launch_angle_x_offset`, both in the
    /// launch point's local frame
    pub fn launch_direction(&self, base: &Transform) -> Vec3 {
        let vertical = Quat::from_axis_angle(Vec3::X, self.config.launch_angle_y.to_radians());
        let horizontal =
            Quat::from_axis_angle(Vec3::Y, self.config.launch_angle_x_offset.to_radians());
        let local = horizontal * vertical * Vec3::NEG_Z;
        (base.rotation * local).normalize_or_zero()
    }

    fn launch<W: World>(&mut self, world: &mut W) -> Option<EntityId> {
        let Some(prefab) = self.config.prefab.clone() else {
            log::error!("[{}] coin prefab not assigned, cannot launch", self.config.name);
            return None;
        };
        let Some(base) = self.config.launch_point else {
            log::error!("[{}] launch point not assigned, cannot launch", self.config.name);
            return None;
        };

        let coin = world.spawn(&SpawnRequest {
            prefab,
            transform: Transform::from_position(base.position),
            body: BodySettings::dynamic(),
            tag: EntityTag::Coin,
        });
        let force = lerp(self.config.min_force, self.config.max_force, self.charge);
        world.apply_impulse(coin, self.launch_direction(&base) * force);
        log::debug!(
            "[{}] launched coin with force {:.2} (charge {:.2})",
            self.config.name,
            force,
            self.charge
        );

        self.session.borrow_mut().on_coin_launched();
        Some(coin)
    }
}

impl<W: World> Component<W> for CoinLauncher {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn on_attach(&mut self, _world: &mut W) -> Result<(), SetupError> {
        if self.config.prefab.is_none() {
            log::warn!("[{}] coin prefab not assigned", self.config.name);
        }
        if self.config.launch_point.is_none() {
            log::warn!("[{}] launch point not assigned", self.config.name);
        }
        self.charge = 0.0;
        Ok(())
    }

    fn on_tick(&mut self, dt: f32, _world: &mut W) -> Activity {
        if self.charging {
            let rate = if self.config.charge_time > 0.0 {
                dt / self.config.charge_time
            } else {
                1.0
            };
            self.charge = clamp01(self.charge + rate);
        }
        Activity::Active
    }

    fn on_detach(&mut self, _world: &mut W) {
        self.charging = false;
        self.charge = 0.0;
    }
}
