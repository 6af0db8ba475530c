//! Per-frame transform animation for scene props
//!
//! - `Pusher`: slab sliding back and forth along Z
//! - `SwingPlatform`: yaw swing around the node's initial rotation

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SetupError;
use crate::platform::{Activity, Component, EntityId, World};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PusherConfig {
    pub name: String,
    /// Node to move
    pub node: Option<EntityId>,
    /// Units per second
    pub speed: f32,
    /// Travel distance before reversing
    pub move_distance: f32,
}

impl Default for PusherConfig {
    fn default() -> Self {
        Self {
            name: "Pusher".to_string(),
            node: None,
            speed: DEFAULT_PUSHER_SPEED,
            move_distance: DEFAULT_PUSHER_DISTANCE,
        }
    }
}

#[derive(Debug)]
pub struct Pusher {
    config: PusherConfig,
    start: Vec3,
    /// 1 forward, -1 back
    direction: f32,
}

impl Pusher {
    pub fn new(config: PusherConfig) -> Self {
        Self {
            config,
            start: Vec3::ZERO,
            direction: 1.0,
        }
    }

    pub fn direction(&self) -> f32 {
        self.direction
    }
}

impl<W: World> Component<W> for Pusher {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn on_attach(&mut self, world: &mut W) -> Result<(), SetupError> {
        let transform = self
            .config
            .node
            .and_then(|node| world.transform(node))
            .ok_or_else(|| SetupError::missing(&self.config.name, "node"))?;
        self.start = transform.position;
        self.direction = 1.0;
        Ok(())
    }

    fn on_tick(&mut self, dt: f32, world: &mut W) -> Activity {
        let Some(node) = self.config.node else {
            return Activity::Finished;
        };
        let Some(transform) = world.transform(node) else {
            log::warn!("[{}] node {:?} is gone", self.config.name, node);
            return Activity::Finished;
        };

        let mut pos = transform.position;
        pos.z += self.direction * self.config.speed * dt;

        if self.start.distance(pos) >= self.config.move_distance {
            self.direction = -1.0;
        } else if pos.z <= self.start.z {
            self.direction = 1.0;
            pos = self.start;
        }
        world.set_position(node, pos);
        Activity::Active
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    pub name: String,
    pub node: Option<EntityId>,
    /// Max swing in degrees around Y
    pub swing_angle: f32,
    /// Swing cycle speed
    pub swing_speed: f32,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            name: "Platform".to_string(),
            node: None,
            swing_angle: DEFAULT_SWING_ANGLE,
            swing_speed: DEFAULT_SWING_SPEED,
        }
    }
}

#[derive(Debug)]
pub struct SwingPlatform {
    config: PlatformConfig,
    initial_rotation: Quat,
    time: f32,
}

impl SwingPlatform {
    pub fn new(config: PlatformConfig) -> Self {
        Self {
            config,
            initial_rotation: Quat::IDENTITY,
            time: 0.0,
        }
    }

    /// Current swing angle in degrees
    pub fn current_angle(&self) -> f32 {
        self.time.sin() * self.config.swing_angle
    }
}

impl<W: World> Component<W> for SwingPlatform {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn on_attach(&mut self, world: &mut W) -> Result<(), SetupError> {
        let transform = self
            .config
            .node
            .and_then(|node| world.transform(node))
            .ok_or_else(|| SetupError::missing(&self.config.name, "node"))?;
        self.initial_rotation = transform.rotation;
        self.time = 0.0;
        Ok(())
    }

    fn on_tick(&mut self, dt: f32, world: &mut W) -> Activity {
        let Some(node) = self.config.node else {
            return Activity::Finished;
        };
        self.time += dt * self.config.swing_speed;
        let swing = Quat::from_rotation_y(self.current_angle().to_radians());
        world.set_rotation(node, self.initial_rotation * swing);
        Activity::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{MemoryWorld, Transform};

    #[test]
    fn test_pusher_goes_out_and_back() {
        let mut world = MemoryWorld::new();
        let node = world.add_node("pusher", Transform::from_position(Vec3::new(0.0, 0.0, 2.0)));
        let mut pusher = Pusher::new(PusherConfig {
            node: Some(node),
            speed: 1.0,
            move_distance: 1.0,
            ..Default::default()
        });
        pusher.on_attach(&mut world).unwrap();

        let mut max_z = f32::MIN;
        let mut reversed = false;
        for _ in 0..300 {
            pusher.on_tick(0.01, &mut world);
            let z = world.transform(node).unwrap().position.z;
            max_z = max_z.max(z);
            reversed |= pusher.direction() < 0.0;
            assert!(z >= 2.0, "never goes behind the start");
        }
        assert!(reversed);
        assert!(max_z >= 3.0 && max_z < 3.02);
    }

    #[test]
    fn test_pusher_requires_node() {
        let mut pusher = Pusher::new(PusherConfig::default());
        assert!(pusher.on_attach(&mut MemoryWorld::new()).is_err());
    }

    #[test]
    fn test_platform_swings_within_angle() {
        let mut world = MemoryWorld::new();
        let node = world.add_node("platform", Transform::default());
        let mut platform = SwingPlatform::new(PlatformConfig {
            node: Some(node),
            swing_angle: 5.0,
            swing_speed: 2.0,
            ..Default::default()
        });
        platform.on_attach(&mut world).unwrap();

        for _ in 0..200 {
            platform.on_tick(0.02, &mut world);
            let rotation = world.transform(node).unwrap().rotation;
            let angle = rotation.angle_between(Quat::IDENTITY).to_degrees();
            assert!(angle <= 5.0 + 1e-3);
        }
        // sin(8) * 5
        assert!((platform.current_angle() - 8.0f32.sin() * 5.0).abs() < 1e-3);
    }
}
