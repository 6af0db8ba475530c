//! HUD model and presenter
//!
//! The presenter only reacts: it turns score/session events into HUD text
//! and panel visibility, and forwards the restart button to the session.
//! Rendering the `Hud` is up to the host.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::SetupError;
use crate::platform::{Activity, Component, World};
use crate::sim::events::{GameEvent, ScoreEvent, SessionEvent};
use crate::sim::score::ScoreTracker;
use crate::sim::state::{GameState, GameStateMachine};
use crate::sim::timers::Timers;

/// Everything the host draws
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub score_text: String,
    pub coin_count_text: String,
    pub game_over_visible: bool,
    pub game_over_status: String,
    pub game_over_score: String,
    pub power_bar_visible: bool,
    /// 0 to 1
    pub power_bar_progress: f32,
    pub drop_button_interactable: bool,
}

impl Default for Hud {
    fn default() -> Self {
        Self {
            score_text: "Score: N/A".to_string(),
            coin_count_text: "Coins: N/A".to_string(),
            game_over_visible: false,
            game_over_status: String::new(),
            game_over_score: String::new(),
            power_bar_visible: true,
            power_bar_progress: 0.0,
            drop_button_interactable: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PresenterTask {
    InitialSync,
}

#[derive(Debug)]
pub struct Presenter {
    hud: Hud,
    score: Rc<RefCell<ScoreTracker>>,
    session: Rc<RefCell<GameStateMachine>>,
    timers: Timers<PresenterTask>,
    synced: bool,
}

impl Presenter {
    pub fn new(score: Rc<RefCell<ScoreTracker>>, session: Rc<RefCell<GameStateMachine>>) -> Self {
        Self {
            hud: Hud::default(),
            score,
            session,
            timers: Timers::new(),
            synced: false,
        }
    }

    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    /// Initial sync already ran
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    pub fn handle(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::Score(ScoreEvent::Updated { total, .. }) => self.on_score_updated(total),
            GameEvent::Score(ScoreEvent::TargetReached { .. }) => {}
            GameEvent::Session(SessionEvent::CoinCountUpdated { remaining }) => {
                self.on_coin_count_updated(remaining)
            }
            GameEvent::Session(SessionEvent::StateChanged { new, .. }) => {
                self.on_state_changed(new)
            }
        }
    }

    /// Restart button
    pub fn restart(&mut self) {
        log::info!("Restart button clicked");
        self.session.borrow_mut().reset();
    }

    pub fn set_power_bar(&mut self, progress: f32) {
        self.hud.power_bar_progress = crate::clamp01(progress);
    }

    pub fn set_drop_button(&mut self, interactable: bool) {
        self.hud.drop_button_interactable = interactable;
    }

    fn initial_sync(&mut self) {
        log::debug!("Performing initial UI sync");
        let score = self.score.borrow().score();
        let (coins, state) = {
            let session = self.session.borrow();
            (session.coins_remaining(), session.state())
        };
        self.on_score_updated(score);
        self.on_coin_count_updated(coins);
        self.on_state_changed(state);
        self.synced = true;
    }

    fn on_score_updated(&mut self, total: u64) {
        self.hud.score_text = format!("Score: {}", total);
    }

    fn on_coin_count_updated(&mut self, remaining: u32) {
        self.hud.coin_count_text = format!("Coins: {}", remaining);
    }

    fn on_state_changed(&mut self, new: GameState) {
        match new {
            GameState::WonGame | GameState::LostGame => {
                let final_score = self.score.borrow().score();
                self.show_game_over(new == GameState::WonGame, final_score);
                self.hud.power_bar_visible = false;
            }
            GameState::Playing | GameState::Initializing => {
                self.hud.game_over_visible = false;
                self.hud.power_bar_visible = true;
            }
            GameState::Paused => {
                self.hud.power_bar_visible = false;
            }
        }
    }

    fn show_game_over(&mut self, won: bool, final_score: u64) {
        self.hud.game_over_status = if won { "YOU WIN!" } else { "GAME OVER!" }.to_string();
        self.hud.game_over_score = format!("Final Score: {}", final_score);
        self.hud.game_over_visible = true;
        log::info!("Game over screen shown. Win: {}, Score: {}", won, final_score);
    }
}

impl<W: World> Component<W> for Presenter {
    fn name(&self) -> &str {
        "Presenter"
    }

    fn on_attach(&mut self, _world: &mut W) -> Result<(), SetupError> {
        self.hud.game_over_visible = false;
        // Other components attached this frame may have already emitted
        self.timers.schedule(0.0, PresenterTask::InitialSync);
        Ok(())
    }

    fn on_tick(&mut self, dt: f32, _world: &mut W) -> Activity {
        self.timers.advance(dt);
        while let Some(due) = self.timers.pop_due() {
            match due.task {
                PresenterTask::InitialSync => self.initial_sync(),
            }
        }
        Activity::Active
    }

    fn on_detach(&mut self, _world: &mut W) {
        self.timers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryWorld;
    use crate::sim::score::ScoreConfig;
    use crate::sim::state::{LaunchGate, SessionConfig};

    fn presenter(
        coins: u32,
        target: i64,
    ) -> (
        Presenter,
        Rc<RefCell<ScoreTracker>>,
        Rc<RefCell<GameStateMachine>>,
    ) {
        let score = Rc::new(RefCell::new(ScoreTracker::new(&ScoreConfig {
            target_score: target,
        })));
        let session = Rc::new(RefCell::new(GameStateMachine::new(
            &SessionConfig {
                initial_coin_count: coins,
            },
            Rc::clone(&score),
            LaunchGate::new(),
        )));
        (
            Presenter::new(Rc::clone(&score), Rc::clone(&session)),
            score,
            session,
        )
    }

    #[test]
    fn test_initial_sync_runs_on_first_tick() {
        let (mut ui, score, session) = presenter(20, 100);
        let mut world = MemoryWorld::new();
        ui.on_attach(&mut world).unwrap();
        session.borrow_mut().start();
        score.borrow_mut().add_score(30);

        assert_eq!(ui.hud().score_text, "Score: N/A");
        ui.on_tick(1.0 / 60.0, &mut world);

        assert!(ui.is_synced());
        assert_eq!(ui.hud().score_text, "Score: 30");
        assert_eq!(ui.hud().coin_count_text, "Coins: 20");
        assert!(!ui.hud().game_over_visible);
    }

    #[test]
    fn test_game_over_panel() {
        let (mut ui, score, _) = presenter(1, 10);
        score.borrow_mut().add_score(40);
        ui.handle(&GameEvent::Session(SessionEvent::StateChanged {
            new: GameState::WonGame,
            old: GameState::Playing,
        }));

        let hud = ui.hud();
        assert!(hud.game_over_visible);
        assert_eq!(hud.game_over_status, "YOU WIN!");
        assert_eq!(hud.game_over_score, "Final Score: 40");
        assert!(!hud.power_bar_visible);
    }

    #[test]
    fn test_lose_then_restart_hides_panel() {
        let (mut ui, _, session) = presenter(1, 10);
        session.borrow_mut().start();
        ui.handle(&GameEvent::Session(SessionEvent::StateChanged {
            new: GameState::LostGame,
            old: GameState::Playing,
        }));
        assert_eq!(ui.hud().game_over_status, "GAME OVER!");

        ui.restart();
        assert_eq!(session.borrow().state(), GameState::Playing);
        ui.handle(&GameEvent::Session(SessionEvent::StateChanged {
            new: GameState::Playing,
            old: GameState::LostGame,
        }));
        assert!(!ui.hud().game_over_visible);
        assert!(ui.hud().power_bar_visible);
    }

    #[test]
    fn test_text_updates() {
        let (mut ui, _, _) = presenter(5, 10);
        ui.handle(&GameEvent::Score(ScoreEvent::Updated { total: 70, delta: 10 }));
        ui.handle(&GameEvent::Session(SessionEvent::CoinCountUpdated { remaining: 3 }));
        assert_eq!(ui.hud().score_text, "Score: 70");
        assert_eq!(ui.hud().coin_count_text, "Coins: 3");
    }
}
