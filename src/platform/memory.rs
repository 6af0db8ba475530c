//! Headless in-memory world
//!
//! Stands in for the host engine in the demo binary and in tests. Physics is
//! a bare gravity integrator (unit mass, no collisions); the demo host uses
//! `entities_in` to produce trigger-enter events.

use std::collections::BTreeMap;

use glam::{Quat, Vec3};

use super::{Aabb, BodySettings, EntityId, EntityTag, SpawnRequest, Transform, World};
use crate::consts::GRAVITY;

/// An entity held by `MemoryWorld`
#[derive(Debug, Clone)]
pub struct MemoryEntity {
    pub prefab: String,
    pub tag: EntityTag,
    pub transform: Transform,
    pub body: BodySettings,
    pub velocity: Vec3,
    /// Sum of every impulse applied
    pub total_impulse: Vec3,
}

#[derive(Debug, Default)]
pub struct MemoryWorld {
    entities: BTreeMap<EntityId, MemoryEntity>,
    next_id: u32,
    spawned_total: u32,
}

impl MemoryWorld {
    pub fn new() -> Self {
        Self {
            entities: BTreeMap::new(),
            next_id: 1,
            spawned_total: 0,
        }
    }

    /// Add a non-coin node (pusher slab, platform) the host already owns
    pub fn add_node(&mut self, name: &str, transform: Transform) -> EntityId {
        self.spawn(&SpawnRequest {
            prefab: name.to_string(),
            transform,
            body: BodySettings::kinematic(),
            tag: EntityTag::Prop,
        })
    }

    pub fn get(&self, id: EntityId) -> Option<&MemoryEntity> {
        self.entities.get(&id)
    }

    /// Live entities in id order
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &MemoryEntity)> {
        self.entities.iter().map(|(id, e)| (*id, e))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Live coins
    pub fn coin_count(&self) -> usize {
        self.entities
            .values()
            .filter(|e| e.tag == EntityTag::Coin)
            .count()
    }

    /// Entities ever spawned, including despawned ones
    pub fn spawned_total(&self) -> u32 {
        self.spawned_total
    }

    /// Entities whose position lies inside `bounds`
    pub fn entities_in(&self, bounds: &Aabb) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|(_, e)| bounds.contains(e.transform.position))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Integrate dynamic bodies by one step
    pub fn step(&mut self, dt: f32) {
        for entity in self.entities.values_mut() {
            if entity.body.kinematic {
                continue;
            }
            if entity.body.use_gravity {
                entity.velocity.y += GRAVITY * dt;
            }
            entity.transform.position += entity.velocity * dt;
        }
    }
}

impl World for MemoryWorld {
    fn spawn(&mut self, request: &SpawnRequest) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.spawned_total += 1;
        self.entities.insert(
            id,
            MemoryEntity {
                prefab: request.prefab.clone(),
                tag: request.tag,
                transform: request.transform,
                body: request.body,
                velocity: Vec3::ZERO,
                total_impulse: Vec3::ZERO,
            },
        );
        id
    }

    fn despawn(&mut self, id: EntityId) -> bool {
        self.entities.remove(&id).is_some()
    }

    fn is_alive(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    fn is_coin(&self, id: EntityId) -> bool {
        self.entities
            .get(&id)
            .is_some_and(|e| e.tag == EntityTag::Coin)
    }

    fn transform(&self, id: EntityId) -> Option<Transform> {
        self.entities.get(&id).map(|e| e.transform)
    }

    fn set_position(&mut self, id: EntityId, position: Vec3) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.transform.position = position;
        }
    }

    fn set_rotation(&mut self, id: EntityId, rotation: Quat) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.transform.rotation = rotation;
        }
    }

    fn set_body(&mut self, id: EntityId, body: BodySettings) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.body = body;
        }
    }

    fn set_tag(&mut self, id: EntityId, tag: EntityTag) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.tag = tag;
        }
    }

    fn apply_impulse(&mut self, id: EntityId, impulse: Vec3) {
        if let Some(entity) = self.entities.get_mut(&id) {
            if entity.body.kinematic {
                return;
            }
            entity.velocity += impulse;
            entity.total_impulse += impulse;
        }
    }
}
