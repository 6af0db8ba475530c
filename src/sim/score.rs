//! Score tracking

use serde::{Deserialize, Serialize};

use super::events::{EventBus, ScoreEvent, SubscriptionId};
use crate::consts::DEFAULT_TARGET_SCORE;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    /// Score needed to win. 0 or less = endless mode.
    pub target_score: i64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            target_score: DEFAULT_TARGET_SCORE,
        }
    }
}

/// Current and target score
#[derive(Debug)]
pub struct ScoreTracker {
    current: u64,
    target: i64,
    /// TargetReached already sent since the last reset
    target_announced: bool,
    events: EventBus<ScoreEvent>,
}

impl ScoreTracker {
    pub fn new(config: &ScoreConfig) -> Self {
        Self {
            current: 0,
            target: config.target_score,
            target_announced: false,
            events: EventBus::new(),
        }
    }

    /// Add points. Non-positive values are rejected with a warning.
    /// Returns whether the score changed.
    pub fn add_score(&mut self, points: i64) -> bool {
        if points <= 0 {
            log::warn!("Attempted to add zero or negative points ({})", points);
            return false;
        }
        let delta = points as u64;
        self.current = self.current.saturating_add(delta);
        log::debug!("Score: {} (added {})", self.current, delta);
        self.events.emit(&ScoreEvent::Updated {
            total: self.current,
            delta,
        });

        if self.target_met() && !self.target_announced {
            self.target_announced = true;
            log::info!("Target score of {} reached!", self.target);
            self.events.emit(&ScoreEvent::TargetReached {
                total: self.current,
            });
        }
        true
    }

    pub fn reset_score(&mut self) {
        self.current = 0;
        self.target_announced = false;
        log::info!("Score reset to 0");
        self.events.emit(&ScoreEvent::Updated { total: 0, delta: 0 });
    }

    pub fn score(&self) -> u64 {
        self.current
    }

    pub fn target_score(&self) -> i64 {
        self.target
    }

    pub fn is_endless(&self) -> bool {
        self.target <= 0
    }

    /// True when a positive target exists and the score is at or above it
    pub fn target_met(&self) -> bool {
        self.target > 0 && self.current >= self.target as u64
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&ScoreEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }
}
