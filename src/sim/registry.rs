//! Scene-wide manager registry
//!
//! One score tracker and one session per scene. The first registration
//! wins; later ones are rejected and dropped.

use std::cell::RefCell;
use std::rc::Rc;

use super::score::ScoreTracker;
use super::state::GameStateMachine;
use crate::error::SetupError;

/// Holds at most one shared instance of `T`
#[derive(Debug)]
pub struct SingletonSlot<T> {
    kind: &'static str,
    instance: Option<Rc<RefCell<T>>>,
}

impl<T> SingletonSlot<T> {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            instance: None,
        }
    }

    /// Take ownership of `value` unless an instance is already registered
    pub fn register(&mut self, value: T) -> Result<Rc<RefCell<T>>, SetupError> {
        if self.instance.is_some() {
            log::warn!("Duplicate {} instance detected. Destroying this one", self.kind);
            return Err(SetupError::DuplicateSingleton(self.kind));
        }
        let shared = Rc::new(RefCell::new(value));
        self.instance = Some(Rc::clone(&shared));
        Ok(shared)
    }

    pub fn get(&self) -> Option<Rc<RefCell<T>>> {
        self.instance.clone()
    }

    /// Drop the registered instance (scene teardown)
    pub fn release(&mut self) -> Option<Rc<RefCell<T>>> {
        let released = self.instance.take();
        if released.is_some() {
            log::debug!("{} instance released", self.kind);
        }
        released
    }

    pub fn is_registered(&self) -> bool {
        self.instance.is_some()
    }
}

#[derive(Debug)]
pub struct ManagerRegistry {
    pub score: SingletonSlot<ScoreTracker>,
    pub session: SingletonSlot<GameStateMachine>,
}

impl Default for ManagerRegistry {
    fn default() -> Self {
        Self {
            score: SingletonSlot::new("ScoreTracker"),
            session: SingletonSlot::new("GameStateMachine"),
        }
    }
}

impl ManagerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn release_all(&mut self) {
        self.session.release();
        self.score.release();
    }
}
