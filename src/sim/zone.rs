//! Scoring zones
//!
//! A trigger volume that turns entering coins into points.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::score::ScoreTracker;
use crate::consts::DEFAULT_ZONE_POINTS;
use crate::error::SetupError;
use crate::platform::{Aabb, Component, EntityId, World};

/// Collision volume attached to the zone node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneCollider {
    pub bounds: Aabb,
    pub is_trigger: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringZoneConfig {
    pub name: String,
    /// Points awarded per coin
    pub points: i64,
    pub collider: Option<ZoneCollider>,
}

impl Default for ScoringZoneConfig {
    fn default() -> Self {
        Self {
            name: "ScoringZone".to_string(),
            points: DEFAULT_ZONE_POINTS,
            collider: None,
        }
    }
}

#[derive(Debug)]
pub struct ScoringZone {
    config: ScoringZoneConfig,
    score: Rc<RefCell<ScoreTracker>>,
}

impl ScoringZone {
    pub fn new(config: ScoringZoneConfig, score: Rc<RefCell<ScoreTracker>>) -> Self {
        Self { config, score }
    }

    pub fn bounds(&self) -> Option<Aabb> {
        self.config.collider.map(|c| c.bounds)
    }

    pub fn points(&self) -> i64 {
        self.config.points
    }

    /// Host reported `other` entering the trigger.
    /// Returns true if a coin was scored and removed.
    pub fn on_trigger_enter<W: World>(&mut self, other: EntityId, world: &mut W) -> bool {
        // Another zone may have taken it the same frame
        if !world.is_alive(other) || !world.is_coin(other) {
            return false;
        }
        self.score.borrow_mut().add_score(self.config.points);
        world.despawn(other);
        true
    }
}

impl<W: World> Component<W> for ScoringZone {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn on_attach(&mut self, _world: &mut W) -> Result<(), SetupError> {
        let Some(collider) = self.config.collider else {
            return Err(SetupError::missing(&self.config.name, "collider"));
        };
        if !collider.is_trigger {
            log::warn!(
                "Collider on scoring zone '{}' is not a trigger; scoring may not work",
                self.config.name
            );
        }
        log::info!(
            "Scoring zone '{}' ready. Points: {}",
            self.config.name,
            self.config.points
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{BodySettings, EntityTag, MemoryWorld, SpawnRequest, Transform};
    use crate::sim::score::ScoreConfig;
    use glam::Vec3;

    fn zone(points: i64) -> (ScoringZone, Rc<RefCell<ScoreTracker>>) {
        let score = Rc::new(RefCell::new(ScoreTracker::new(&ScoreConfig::default())));
        let config = ScoringZoneConfig {
            points,
            collider: Some(ZoneCollider {
                bounds: Aabb::new(Vec3::ZERO, Vec3::ONE),
                is_trigger: true,
            }),
            ..Default::default()
        };
        (ScoringZone::new(config, Rc::clone(&score)), score)
    }

    fn spawn(world: &mut MemoryWorld, tag: EntityTag) -> EntityId {
        world.spawn(&SpawnRequest {
            prefab: "thing".into(),
            transform: Transform::default(),
            body: BodySettings::dynamic(),
            tag,
        })
    }

    #[test]
    fn test_coin_scores_and_is_removed() {
        let (mut zone, score) = zone(10);
        let mut world = MemoryWorld::new();
        zone.on_attach(&mut world).unwrap();
        let coin = spawn(&mut world, EntityTag::Coin);

        assert!(zone.on_trigger_enter(coin, &mut world));
        assert_eq!(score.borrow().score(), 10);
        assert!(!world.is_alive(coin));
    }

    #[test]
    fn test_non_coin_ignored() {
        let (mut zone, score) = zone(10);
        let mut world = MemoryWorld::new();
        let prop = spawn(&mut world, EntityTag::Prop);

        assert!(!zone.on_trigger_enter(prop, &mut world));
        assert_eq!(score.borrow().score(), 0);
        assert!(world.is_alive(prop));
    }

    #[test]
    fn test_removed_coin_scores_once() {
        let (mut zone, score) = zone(10);
        let mut world = MemoryWorld::new();
        let coin = spawn(&mut world, EntityTag::Coin);

        assert!(zone.on_trigger_enter(coin, &mut world));
        assert!(!zone.on_trigger_enter(coin, &mut world));
        assert_eq!(score.borrow().score(), 10);
    }

    #[test]
    fn test_missing_collider_fails_attach() {
        let score = Rc::new(RefCell::new(ScoreTracker::new(&ScoreConfig::default())));
        let mut zone = ScoringZone::new(ScoringZoneConfig::default(), score);
        let err = zone.on_attach(&mut MemoryWorld::new()).unwrap_err();
        assert_eq!(err, SetupError::missing("ScoringZone", "collider"));
    }
}
