//! Session state machine
//!
//! Owns the coin count and the game phase. Win/lose is decided in one place
//! (`resolve_outcome`), checking the win condition first so the last coin
//! that also meets the target counts as a win.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::events::{EventBus, SessionEvent, SubscriptionId};
use super::score::ScoreTracker;
use crate::consts::DEFAULT_INITIAL_COIN_COUNT;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// Constructed, not started yet
    Initializing,
    /// Active gameplay
    Playing,
    /// Playing, suspended by the host
    Paused,
    /// Target score reached
    WonGame,
    /// Out of coins below target
    LostGame,
}

impl GameState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameState::WonGame | GameState::LostGame)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameState::Initializing => "Initializing",
            GameState::Playing => "Playing",
            GameState::Paused => "Paused",
            GameState::WonGame => "WonGame",
            GameState::LostGame => "LostGame",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub initial_coin_count: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_coin_count: DEFAULT_INITIAL_COIN_COUNT,
        }
    }
}

/// Shared on/off switch for every launch control.
/// The session closes it on game over and opens it on reset.
#[derive(Debug, Clone)]
pub struct LaunchGate(Rc<Cell<bool>>);

impl Default for LaunchGate {
    fn default() -> Self {
        Self(Rc::new(Cell::new(false)))
    }
}

impl LaunchGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.0.get()
    }

    pub fn open(&self) {
        self.0.set(true);
    }

    pub fn close(&self) {
        self.0.set(false);
    }
}

#[derive(Debug)]
pub struct GameStateMachine {
    initial_coin_count: u32,
    coins_remaining: u32,
    state: GameState,
    score: Rc<RefCell<ScoreTracker>>,
    gate: LaunchGate,
    events: EventBus<SessionEvent>,
}

impl GameStateMachine {
    pub fn new(config: &SessionConfig, score: Rc<RefCell<ScoreTracker>>, gate: LaunchGate) -> Self {
        Self {
            initial_coin_count: config.initial_coin_count,
            coins_remaining: config.initial_coin_count,
            state: GameState::Initializing,
            score,
            gate,
            events: EventBus::new(),
        }
    }

    /// First start from `Initializing`; afterwards the same as `reset`
    pub fn start(&mut self) {
        log::info!("Game session starting");
        self.reset();
    }

    /// Refill coins, reset the score and go back to `Playing`. Valid from any state.
    pub fn reset(&mut self) {
        self.coins_remaining = self.initial_coin_count;
        self.events.emit(&SessionEvent::CoinCountUpdated {
            remaining: self.coins_remaining,
        });

        self.score.borrow_mut().reset_score();
        self.gate.open();
        self.set_state(GameState::Playing);

        let target = self.score.borrow().target_score();
        if target > 0 {
            log::info!(
                "Game (re)started. Initial coins: {}. Target score: {}",
                self.coins_remaining,
                target
            );
        } else {
            log::info!(
                "Game (re)started. Initial coins: {}. Endless mode",
                self.coins_remaining
            );
        }
    }

    /// A coin left a launch control. Ignored outside `Playing`.
    pub fn on_coin_launched(&mut self) {
        if self.state != GameState::Playing {
            return;
        }
        self.coins_remaining = self.coins_remaining.saturating_sub(1);
        self.events.emit(&SessionEvent::CoinCountUpdated {
            remaining: self.coins_remaining,
        });
        self.resolve_outcome();
    }

    /// Score tracker announced the target. Ignored outside `Playing`.
    pub fn on_target_reached(&mut self) {
        if self.state != GameState::Playing {
            return;
        }
        log::debug!("Target score reached event");
        self.resolve_outcome();
    }

    /// Suspend play; launches are blocked until `resume`
    pub fn pause(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        self.gate.close();
        self.set_state(GameState::Paused);
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state != GameState::Paused {
            return false;
        }
        self.gate.open();
        self.set_state(GameState::Playing);
        // Coins may have scored while paused
        self.resolve_outcome();
        true
    }

    fn resolve_outcome(&mut self) {
        if self.state != GameState::Playing {
            return;
        }
        if self.score.borrow().target_met() {
            self.finish(true);
        } else if self.coins_remaining == 0 {
            log::info!("Out of coins. Target score not met");
            self.finish(false);
        }
    }

    fn finish(&mut self, won: bool) {
        self.gate.close();
        self.set_state(if won {
            GameState::WonGame
        } else {
            GameState::LostGame
        });

        let final_score = self.score.borrow().score();
        if won {
            log::info!("Game over - YOU WIN! Final score: {}", final_score);
        } else {
            log::info!(
                "Game over - YOU LOSE! Final score: {}. Coins left: {}",
                final_score,
                self.coins_remaining
            );
        }
    }

    fn set_state(&mut self, new: GameState) {
        if self.state == new {
            return;
        }
        let old = self.state;
        self.state = new;
        log::info!("Game state changed from {} to {}", old.as_str(), new.as_str());
        self.events.emit(&SessionEvent::StateChanged { new, old });
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn coins_remaining(&self) -> u32 {
        self.coins_remaining
    }

    pub fn initial_coin_count(&self) -> u32 {
        self.initial_coin_count
    }

    pub fn gate(&self) -> &LaunchGate {
        &self.gate
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&SessionEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }
}
