//! Host engine abstraction layer
//!
//! The game never owns physics, rendering or the scene graph. It talks to
//! the host through:
//! - `World`: entity creation/removal, transforms, rigid-body settings
//! - `Component`: attach/tick/detach lifecycle driven by the scene loop

pub mod memory;

pub use memory::MemoryWorld;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::SetupError;

/// Opaque handle to a host entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// What a spawned entity represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EntityTag {
    /// Scoreable coin
    #[default]
    Coin,
    /// Anything else (pushers, decoration)
    Prop,
}

/// Position + rotation in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Local-to-world for a point
    #[inline]
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }

    /// Node forward direction (-Z)
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }
}

/// Axis-aligned box given by center and full size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec3,
    pub size: Vec3,
}

impl Aabb {
    pub fn new(center: Vec3, size: Vec3) -> Self {
        Self { center, size }
    }

    #[inline]
    pub fn min(&self) -> Vec3 {
        self.center - self.size / 2.0
    }

    #[inline]
    pub fn max(&self) -> Vec3 {
        self.center + self.size / 2.0
    }

    /// Inclusive containment test
    pub fn contains(&self, point: Vec3) -> bool {
        let (min, max) = (self.min(), self.max());
        point.cmpge(min).all() && point.cmple(max).all()
    }
}

/// Rigid-body flags the game toggles on its entities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodySettings {
    /// Moved only by code, ignores forces
    pub kinematic: bool,
    pub use_gravity: bool,
    /// Per-axis multiplier on angular velocity
    pub angular_factor: Vec3,
}

impl BodySettings {
    /// Fully simulated body
    pub fn dynamic() -> Self {
        Self {
            kinematic: false,
            use_gravity: true,
            angular_factor: Vec3::ONE,
        }
    }

    /// Code-driven body with gravity off (used for previews)
    pub fn kinematic() -> Self {
        Self {
            kinematic: true,
            use_gravity: false,
            angular_factor: Vec3::ONE,
        }
    }
}

/// One entity to create. Built by a spawner and handed straight to the host.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRequest {
    pub prefab: String,
    pub transform: Transform,
    pub body: BodySettings,
    pub tag: EntityTag,
}

/// Capabilities consumed from the host engine
pub trait World {
    /// Instantiate a prefab and register it with physics
    fn spawn(&mut self, request: &SpawnRequest) -> EntityId;
    /// Remove an entity; returns false if it was already gone
    fn despawn(&mut self, id: EntityId) -> bool;
    fn is_alive(&self, id: EntityId) -> bool;
    fn is_coin(&self, id: EntityId) -> bool;
    fn transform(&self, id: EntityId) -> Option<Transform>;
    fn set_position(&mut self, id: EntityId, position: Vec3);
    fn set_rotation(&mut self, id: EntityId, rotation: Quat);
    fn set_body(&mut self, id: EntityId, body: BodySettings);
    fn set_tag(&mut self, id: EntityId, tag: EntityTag);
    fn apply_impulse(&mut self, id: EntityId, impulse: Vec3);
}

/// Result of a component's tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    /// Keep ticking
    Active,
    /// Work is done, disable the component
    Finished,
}

/// Lifecycle hooks invoked by the scene loop
pub trait Component<W: World> {
    /// Name used in log lines
    fn name(&self) -> &str;

    /// Called once when the scene starts (or when added to a running scene).
    /// An error disables the component.
    fn on_attach(&mut self, _world: &mut W) -> Result<(), SetupError> {
        Ok(())
    }

    fn on_tick(&mut self, _dt: f32, _world: &mut W) -> Activity {
        Activity::Active
    }

    fn on_detach(&mut self, _world: &mut W) {}
}
