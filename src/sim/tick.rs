//! Scene loop
//!
//! The scene owns the host world handle, the manager registry and every
//! component. The host calls `tick` once per frame and forwards input and
//! trigger events; the scene drives component lifecycles and routes queued
//! events after every call.

use std::cell::RefCell;
use std::rc::Rc;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::dropper::{CoinDropper, DropperConfig};
use super::events::{EventBus, EventQueue, GameEvent, ScoreEvent, SubscriptionId};
use super::launcher::{CoinLauncher, LauncherConfig};
use super::motion::{PlatformConfig, Pusher, PusherConfig, SwingPlatform};
use super::registry::ManagerRegistry;
use super::score::ScoreTracker;
use super::spawn::{VolumeSpawner, VolumeSpawnerConfig};
use super::state::{GameState, GameStateMachine, LaunchGate};
use super::zone::{ScoringZone, ScoringZoneConfig};
use crate::error::SetupError;
use crate::platform::{Aabb, Activity, Component, EntityId, World};
use crate::settings::GameConfig;
use crate::ui::{Hud, Presenter};

/// Index of a scoring zone in its scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZoneId(pub usize);

/// A component plus the scene's bookkeeping for it
#[derive(Debug)]
struct Attached<C> {
    component: C,
    enabled: bool,
    attached: bool,
}

impl<C> Attached<C> {
    fn new(component: C) -> Self {
        Self {
            component,
            enabled: true,
            attached: false,
        }
    }

    fn is_active(&self) -> bool {
        self.enabled && self.attached
    }

    fn attach<W: World>(&mut self, world: &mut W)
    where
        C: Component<W>,
    {
        if self.attached {
            return;
        }
        self.attached = true;
        if let Err(err) = self.component.on_attach(world) {
            log::error!("{}. Disabling component", err);
            self.enabled = false;
        }
    }

    fn tick<W: World>(&mut self, dt: f32, world: &mut W)
    where
        C: Component<W>,
    {
        if !self.is_active() {
            return;
        }
        if self.component.on_tick(dt, world) == Activity::Finished {
            log::debug!("{} finished, disabling", self.component.name());
            self.enabled = false;
        }
    }

    fn detach<W: World>(&mut self, world: &mut W)
    where
        C: Component<W>,
    {
        if !self.attached {
            return;
        }
        self.component.on_detach(world);
        self.attached = false;
        self.enabled = false;
    }
}

pub struct Scene<W: World> {
    world: W,
    registry: ManagerRegistry,
    score: Rc<RefCell<ScoreTracker>>,
    session: Rc<RefCell<GameStateMachine>>,
    gate: LaunchGate,
    inbox: EventQueue<GameEvent>,
    forwarders: (SubscriptionId, SubscriptionId),
    observers: EventBus<GameEvent>,
    rng: Pcg32,
    spawners: Vec<Attached<VolumeSpawner>>,
    dropper: Option<Attached<CoinDropper>>,
    launcher: Option<Attached<CoinLauncher>>,
    zones: Vec<Attached<ScoringZone>>,
    pushers: Vec<Attached<Pusher>>,
    platforms: Vec<Attached<SwingPlatform>>,
    presenter: Attached<Presenter>,
    started: bool,
}

impl<W: World> Scene<W> {
    /// Build the managers and every component listed in `config`.
    /// Nothing is attached until `start`.
    pub fn new(world: W, config: &GameConfig) -> Result<Self, SetupError> {
        let mut registry = ManagerRegistry::new();
        let gate = LaunchGate::new();
        let score = registry.score.register(ScoreTracker::new(&config.score))?;
        let session = registry.session.register(GameStateMachine::new(
            &config.session,
            Rc::clone(&score),
            gate.clone(),
        ))?;

        // Listeners only enqueue; routing happens in `dispatch`
        let inbox = EventQueue::new();
        let queue = inbox.clone();
        let score_sub = score
            .borrow_mut()
            .subscribe(move |e| queue.push(GameEvent::Score(*e)));
        let queue = inbox.clone();
        let session_sub = session
            .borrow_mut()
            .subscribe(move |e| queue.push(GameEvent::Session(*e)));

        let presenter = Attached::new(Presenter::new(Rc::clone(&score), Rc::clone(&session)));

        let mut scene = Self {
            world,
            registry,
            score,
            session,
            gate,
            inbox,
            forwarders: (score_sub, session_sub),
            observers: EventBus::new(),
            rng: Pcg32::seed_from_u64(config.seed),
            spawners: Vec::new(),
            dropper: None,
            launcher: None,
            zones: Vec::new(),
            pushers: Vec::new(),
            platforms: Vec::new(),
            presenter,
            started: false,
        };

        for spawner in &config.initial_coins {
            scene.add_volume_spawner(spawner.clone());
        }
        if let Some(dropper) = &config.dropper {
            scene.set_dropper(dropper.clone());
        }
        if let Some(launcher) = &config.launcher {
            scene.set_launcher(launcher.clone());
        }
        for zone in &config.scoring_zones {
            scene.add_scoring_zone(zone.clone());
        }
        for pusher in &config.pushers {
            scene.add_pusher(pusher.clone());
        }
        for platform in &config.platforms {
            scene.add_platform(platform.clone());
        }
        Ok(scene)
    }

    fn component_rng(&mut self) -> Pcg32 {
        Pcg32::seed_from_u64(self.rng.random::<u64>())
    }

    pub fn add_volume_spawner(&mut self, config: VolumeSpawnerConfig) -> usize {
        let rng = self.component_rng();
        let mut slot = Attached::new(VolumeSpawner::new(config, rng));
        if self.started {
            slot.attach(&mut self.world);
        }
        self.spawners.push(slot);
        self.spawners.len() - 1
    }

    /// Install the preview-then-drop spawner (replaces any previous one)
    pub fn set_dropper(&mut self, config: DropperConfig) {
        let rng = self.component_rng();
        let dropper = CoinDropper::new(config, rng, Rc::clone(&self.session), self.gate.clone());
        if let Some(mut old) = self.dropper.take() {
            old.detach(&mut self.world);
        }
        let mut slot = Attached::new(dropper);
        if self.started {
            slot.attach(&mut self.world);
        }
        self.dropper = Some(slot);
    }

    /// Install the charge-and-release launcher (replaces any previous one)
    pub fn set_launcher(&mut self, config: LauncherConfig) {
        let launcher = CoinLauncher::new(config, Rc::clone(&self.session), self.gate.clone());
        if let Some(mut old) = self.launcher.take() {
            old.detach(&mut self.world);
        }
        let mut slot = Attached::new(launcher);
        if self.started {
            slot.attach(&mut self.world);
        }
        self.launcher = Some(slot);
    }

    pub fn add_scoring_zone(&mut self, config: ScoringZoneConfig) -> ZoneId {
        let mut slot = Attached::new(ScoringZone::new(config, Rc::clone(&self.score)));
        if self.started {
            slot.attach(&mut self.world);
        }
        self.zones.push(slot);
        ZoneId(self.zones.len() - 1)
    }

    pub fn add_pusher(&mut self, config: PusherConfig) {
        let mut slot = Attached::new(Pusher::new(config));
        if self.started {
            slot.attach(&mut self.world);
        }
        self.pushers.push(slot);
    }

    pub fn add_platform(&mut self, config: PlatformConfig) {
        let mut slot = Attached::new(SwingPlatform::new(config));
        if self.started {
            slot.attach(&mut self.world);
        }
        self.platforms.push(slot);
    }

    /// Start the session and attach every component
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.session.borrow_mut().start();

        let world = &mut self.world;
        for slot in &mut self.spawners {
            slot.attach(world);
        }
        if let Some(slot) = &mut self.dropper {
            slot.attach(world);
        }
        if let Some(slot) = &mut self.launcher {
            slot.attach(world);
        }
        for slot in &mut self.zones {
            slot.attach(world);
        }
        for slot in &mut self.pushers {
            slot.attach(world);
        }
        for slot in &mut self.platforms {
            slot.attach(world);
        }
        self.presenter.attach(world);

        self.dispatch();
    }

    /// Advance one frame
    pub fn tick(&mut self, dt: f32) {
        if !self.started {
            return;
        }
        let world = &mut self.world;
        for slot in &mut self.spawners {
            slot.tick(dt, world);
        }
        if let Some(slot) = &mut self.dropper {
            slot.tick(dt, world);
        }
        if let Some(slot) = &mut self.launcher {
            slot.tick(dt, world);
        }
        for slot in &mut self.zones {
            slot.tick(dt, world);
        }
        for slot in &mut self.pushers {
            slot.tick(dt, world);
        }
        for slot in &mut self.platforms {
            slot.tick(dt, world);
        }
        self.presenter.tick(dt, world);

        if let Some(launcher) = &self.launcher {
            self.presenter
                .component
                .set_power_bar(launcher.component.charge());
        }
        if let Some(dropper) = &self.dropper {
            self.presenter
                .component
                .set_drop_button(dropper.is_active() && dropper.component.input_enabled());
        }

        self.dispatch();
    }

    /// Host physics reported `other` entering a zone's trigger
    pub fn trigger_enter(&mut self, zone: ZoneId, other: EntityId) -> bool {
        let Some(slot) = self.zones.get_mut(zone.0) else {
            log::warn!("Trigger event for unknown zone {:?}", zone);
            return false;
        };
        if !slot.is_active() {
            return false;
        }
        let scored = slot.component.on_trigger_enter(other, &mut self.world);
        self.dispatch();
        scored
    }

    pub fn touch_start(&mut self) {
        if let Some(slot) = self.launcher.as_mut().filter(|s| s.is_active()) {
            slot.component.touch_start();
        }
    }

    /// Release a charging launch. Returns the launched coin.
    pub fn touch_end(&mut self) -> Option<EntityId> {
        let slot = self.launcher.as_mut().filter(|s| s.is_active())?;
        let launched = slot.component.touch_end(&mut self.world);
        self.presenter.component.set_power_bar(0.0);
        self.dispatch();
        launched
    }

    /// Horizontal drag moves the dropper's spawn point
    pub fn touch_move(&mut self, delta_x: f32) {
        if let Some(slot) = self.dropper.as_mut().filter(|s| s.is_active()) {
            slot.component.touch_move(delta_x, &mut self.world);
        }
    }

    /// Drop button. Returns the dropped coin.
    pub fn press_drop(&mut self) -> Option<EntityId> {
        let slot = self.dropper.as_mut().filter(|s| s.is_active())?;
        let dropped = slot.component.drop_coin(&mut self.world);
        let interactable = slot.component.input_enabled();
        self.presenter.component.set_drop_button(interactable);
        self.dispatch();
        dropped
    }

    /// Restart button on the game over panel
    pub fn press_restart(&mut self) {
        if !self.started {
            return;
        }
        self.presenter.component.restart();
        self.dispatch();
    }

    pub fn pause(&mut self) -> bool {
        let paused = self.session.borrow_mut().pause();
        self.dispatch();
        paused
    }

    pub fn resume(&mut self) -> bool {
        let resumed = self.session.borrow_mut().resume();
        self.dispatch();
        resumed
    }

    /// Detach everything and release the managers
    pub fn shutdown(&mut self) {
        if !self.started {
            return;
        }
        let world = &mut self.world;
        self.presenter.detach(world);
        for slot in &mut self.platforms {
            slot.detach(world);
        }
        for slot in &mut self.pushers {
            slot.detach(world);
        }
        for slot in &mut self.zones {
            slot.detach(world);
        }
        if let Some(slot) = &mut self.launcher {
            slot.detach(world);
        }
        if let Some(slot) = &mut self.dropper {
            slot.detach(world);
        }
        for slot in &mut self.spawners {
            slot.detach(world);
        }

        self.dispatch();
        let (score_sub, session_sub) = self.forwarders;
        self.score.borrow_mut().unsubscribe(score_sub);
        self.session.borrow_mut().unsubscribe(session_sub);
        self.observers.clear();
        self.registry.release_all();
        self.started = false;
        log::info!("Scene shut down");
    }

    /// Route queued events until the inbox is empty
    fn dispatch(&mut self) {
        while let Some(event) = self.inbox.pop() {
            if let GameEvent::Score(ScoreEvent::TargetReached { .. }) = event {
                self.session.borrow_mut().on_target_reached();
            }
            if self.presenter.is_active() {
                self.presenter.component.handle(&event);
            }
            self.observers.emit(&event);
        }
    }

    /// Observe every routed event. Listeners must not hold scene references.
    pub fn subscribe(&mut self, listener: impl FnMut(&GameEvent) + 'static) -> SubscriptionId {
        self.observers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Try to register another score tracker. Always rejected while the
    /// scene's own tracker is registered.
    pub fn register_score_tracker(
        &mut self,
        tracker: ScoreTracker,
    ) -> Result<Rc<RefCell<ScoreTracker>>, SetupError> {
        self.registry.score.register(tracker)
    }

    pub fn register_session(
        &mut self,
        session: GameStateMachine,
    ) -> Result<Rc<RefCell<GameStateMachine>>, SetupError> {
        self.registry.session.register(session)
    }

    pub fn registry(&self) -> &ManagerRegistry {
        &self.registry
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn hud(&self) -> &Hud {
        self.presenter.component.hud()
    }

    pub fn score_tracker(&self) -> &Rc<RefCell<ScoreTracker>> {
        &self.score
    }

    pub fn session(&self) -> &Rc<RefCell<GameStateMachine>> {
        &self.session
    }

    pub fn score(&self) -> u64 {
        self.score.borrow().score()
    }

    pub fn state(&self) -> GameState {
        self.session.borrow().state()
    }

    pub fn coins_remaining(&self) -> u32 {
        self.session.borrow().coins_remaining()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn zone_ids(&self) -> impl Iterator<Item = ZoneId> + '_ {
        (0..self.zones.len()).map(ZoneId)
    }

    /// Trigger bounds of an active zone
    pub fn zone_bounds(&self, zone: ZoneId) -> Option<Aabb> {
        self.zones
            .get(zone.0)
            .filter(|s| s.is_active())
            .and_then(|s| s.component.bounds())
    }

    pub fn is_zone_active(&self, zone: ZoneId) -> bool {
        self.zones.get(zone.0).is_some_and(|s| s.is_active())
    }

    pub fn is_spawner_active(&self, index: usize) -> bool {
        self.spawners.get(index).is_some_and(|s| s.is_active())
    }

    pub fn spawner(&self, index: usize) -> Option<&VolumeSpawner> {
        self.spawners.get(index).map(|s| &s.component)
    }

    pub fn dropper(&self) -> Option<&CoinDropper> {
        self.dropper.as_ref().map(|s| &s.component)
    }

    pub fn launcher(&self) -> Option<&CoinLauncher> {
        self.launcher.as_ref().map(|s| &s.component)
    }

    pub fn active_pushers(&self) -> usize {
        self.pushers.iter().filter(|s| s.is_active()).count()
    }

    pub fn active_platforms(&self) -> usize {
        self.platforms.iter().filter(|s| s.is_active()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::platform::{MemoryWorld, Transform};
    use crate::sim::events::SessionEvent;
    use crate::sim::score::ScoreConfig;
    use crate::sim::state::SessionConfig;
    use crate::sim::zone::ZoneCollider;
    use glam::Vec3;

    fn zone_config(points: i64) -> ScoringZoneConfig {
        ScoringZoneConfig {
            points,
            collider: Some(ZoneCollider {
                bounds: Aabb::new(Vec3::new(0.0, -5.0, 0.0), Vec3::new(10.0, 2.0, 10.0)),
                is_trigger: true,
            }),
            ..Default::default()
        }
    }

    fn base_config(coins: u32, target: i64) -> GameConfig {
        GameConfig {
            score: ScoreConfig {
                target_score: target,
            },
            session: SessionConfig {
                initial_coin_count: coins,
            },
            dropper: Some(DropperConfig {
                prefabs: vec!["coin".into()],
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn recorded(scene: &mut Scene<MemoryWorld>) -> Rc<RefCell<Vec<GameEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        scene.subscribe(move |e| sink.borrow_mut().push(*e));
        events
    }

    fn spawn_coin(scene: &mut Scene<MemoryWorld>) -> EntityId {
        use crate::platform::{BodySettings, EntityTag, SpawnRequest};
        scene.world_mut().spawn(&SpawnRequest {
            prefab: "coin".into(),
            transform: Transform::default(),
            body: BodySettings::dynamic(),
            tag: EntityTag::Coin,
        })
    }

    fn state_changes(events: &[GameEvent]) -> Vec<GameState> {
        events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Session(SessionEvent::StateChanged { new, .. }) => Some(*new),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_start_enters_playing_and_syncs_hud() {
        let mut scene = Scene::new(MemoryWorld::new(), &base_config(20, 100)).unwrap();
        scene.start();
        assert_eq!(scene.state(), GameState::Playing);

        scene.tick(SIM_DT);
        assert_eq!(scene.hud().score_text, "Score: 0");
        assert_eq!(scene.hud().coin_count_text, "Coins: 20");
        assert!(!scene.hud().game_over_visible);
    }

    #[test]
    fn test_two_zones_reach_target_once() {
        let mut config = base_config(20, 100);
        config.scoring_zones = vec![zone_config(60), zone_config(40)];
        let mut scene = Scene::new(MemoryWorld::new(), &config).unwrap();
        scene.start();
        let events = recorded(&mut scene);

        let a = spawn_coin(&mut scene);
        let b = spawn_coin(&mut scene);
        assert!(scene.trigger_enter(ZoneId(0), a));
        assert!(scene.trigger_enter(ZoneId(1), b));

        assert_eq!(scene.score(), 100);
        let hits: Vec<_> = events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                GameEvent::Score(ScoreEvent::TargetReached { total }) => Some(*total),
                _ => None,
            })
            .collect();
        assert_eq!(hits, vec![100]);
        assert_eq!(scene.state(), GameState::WonGame);
        assert_eq!(scene.hud().game_over_status, "YOU WIN!");
        assert_eq!(scene.hud().game_over_score, "Final Score: 100");
    }

    #[test]
    fn test_last_coin_below_target_loses() {
        let mut scene = Scene::new(MemoryWorld::new(), &base_config(1, 100)).unwrap();
        scene.start();

        assert!(scene.press_drop().is_some());
        assert_eq!(scene.state(), GameState::LostGame);
        assert!(scene.hud().game_over_visible);
        assert_eq!(scene.hud().game_over_status, "GAME OVER!");
        assert!(!scene.hud().power_bar_visible);
    }

    #[test]
    fn test_last_coin_meeting_target_wins_once() {
        let mut scene = Scene::new(MemoryWorld::new(), &base_config(1, 100)).unwrap();
        scene.start();
        let events = recorded(&mut scene);

        // Score lands without a routing pass before the last drop
        scene.score_tracker().borrow_mut().add_score(100);
        scene.press_drop();

        assert_eq!(scene.state(), GameState::WonGame);
        assert_eq!(state_changes(&events.borrow()), vec![GameState::WonGame]);
    }

    #[test]
    fn test_terminal_state_ignores_input_until_restart() {
        let mut config = base_config(1, 100);
        config.scoring_zones = vec![zone_config(500)];
        let mut scene = Scene::new(MemoryWorld::new(), &config).unwrap();
        scene.start();
        scene.press_drop();
        assert_eq!(scene.state(), GameState::LostGame);

        // Late coin still scores but cannot flip the result
        let coin = spawn_coin(&mut scene);
        scene.trigger_enter(ZoneId(0), coin);
        scene.tick(1.0);
        assert!(scene.press_drop().is_none());
        assert_eq!(scene.state(), GameState::LostGame);

        scene.press_restart();
        assert_eq!(scene.state(), GameState::Playing);
        assert_eq!(scene.coins_remaining(), 1);
        assert_eq!(scene.score(), 0);
        assert!(!scene.hud().game_over_visible);
        assert_eq!(scene.hud().coin_count_text, "Coins: 1");
    }

    #[test]
    fn test_volume_spawner_in_scene() {
        let mut config = base_config(20, 100);
        config.dropper = None;
        config.initial_coins = vec![VolumeSpawnerConfig {
            prefabs: vec!["coin".into()],
            volume: Some(Aabb::new(Vec3::new(0.0, 3.0, 0.0), Vec3::new(2.0, 1.0, 2.0))),
            count: 3,
            interval: 0.01,
            ..Default::default()
        }];
        let mut scene = Scene::new(MemoryWorld::new(), &config).unwrap();
        scene.start();

        for _ in 0..10 {
            scene.tick(0.01);
        }

        assert_eq!(scene.world().spawned_total(), 3);
        assert_eq!(scene.spawner(0).unwrap().spawned().len(), 3);
        assert!(!scene.is_spawner_active(0));
        let volume = config.initial_coins[0].volume.unwrap();
        assert!(scene
            .world()
            .entities()
            .all(|(_, e)| volume.contains(e.transform.position)));
    }

    #[test]
    fn test_zone_without_collider_is_disabled() {
        let mut config = base_config(5, 100);
        config.scoring_zones = vec![ScoringZoneConfig::default()];
        let mut scene = Scene::new(MemoryWorld::new(), &config).unwrap();
        scene.start();

        assert!(!scene.is_zone_active(ZoneId(0)));
        let coin = spawn_coin(&mut scene);
        assert!(!scene.trigger_enter(ZoneId(0), coin));
        assert!(scene.world().is_alive(coin));
        assert_eq!(scene.score(), 0);
    }

    #[test]
    fn test_duplicate_managers_rejected() {
        let mut scene = Scene::new(MemoryWorld::new(), &base_config(5, 100)).unwrap();
        let err = scene
            .register_score_tracker(ScoreTracker::new(&ScoreConfig::default()))
            .unwrap_err();
        assert_eq!(err, SetupError::DuplicateSingleton("ScoreTracker"));

        let other = GameStateMachine::new(
            &SessionConfig::default(),
            Rc::clone(scene.score_tracker()),
            LaunchGate::new(),
        );
        assert!(scene.register_session(other).is_err());
        let registered = scene.registry().session.get().unwrap();
        assert!(Rc::ptr_eq(&registered, scene.session()));
    }

    #[test]
    fn test_launcher_power_bar_and_launch() {
        let mut config = base_config(3, 100);
        config.launcher = Some(LauncherConfig {
            prefab: Some("coin".into()),
            launch_point: Some(Transform::from_position(Vec3::new(0.0, 1.0, 4.0))),
            charge_time: 1.0,
            ..Default::default()
        });
        let mut scene = Scene::new(MemoryWorld::new(), &config).unwrap();
        scene.start();

        scene.touch_start();
        scene.tick(0.5);
        assert!((scene.hud().power_bar_progress - 0.5).abs() < 1e-5);

        let coin = scene.touch_end().unwrap();
        assert!(scene.world().is_alive(coin));
        assert_eq!(scene.hud().power_bar_progress, 0.0);
        assert_eq!(scene.coins_remaining(), 2);
        assert_eq!(scene.hud().coin_count_text, "Coins: 2");
    }

    #[test]
    fn test_charge_released_after_pause_or_win_launches_nothing() {
        let mut config = base_config(5, 100);
        config.scoring_zones = vec![zone_config(100)];
        config.launcher = Some(LauncherConfig {
            prefab: Some("coin".into()),
            launch_point: Some(Transform::from_position(Vec3::new(0.0, 1.0, 4.0))),
            ..Default::default()
        });
        let mut scene = Scene::new(MemoryWorld::new(), &config).unwrap();
        scene.start();
        let before = scene.world().spawned_total();

        scene.touch_start();
        scene.tick(0.5);
        scene.pause();
        assert!(scene.touch_end().is_none());
        assert_eq!(scene.world().spawned_total(), before);
        assert_eq!(scene.coins_remaining(), 5);

        scene.resume();
        scene.touch_start();
        let coin = spawn_coin(&mut scene);
        scene.trigger_enter(ZoneId(0), coin);
        assert_eq!(scene.state(), GameState::WonGame);
        let spawned = scene.world().spawned_total();
        assert!(scene.touch_end().is_none());
        assert_eq!(scene.world().spawned_total(), spawned);
        assert_eq!(scene.coins_remaining(), 5);
    }

    #[test]
    fn test_preview_in_zone_is_not_scored() {
        let mut config = base_config(5, 100);
        config.scoring_zones = vec![zone_config(10)];
        let mut scene = Scene::new(MemoryWorld::new(), &config).unwrap();
        scene.start();
        let preview = scene.dropper().unwrap().preview().unwrap();

        assert!(!scene.trigger_enter(ZoneId(0), preview));
        assert_eq!(scene.score(), 0);
        assert_eq!(scene.press_drop(), Some(preview));
        assert_eq!(scene.coins_remaining(), 4);

        assert!(scene.trigger_enter(ZoneId(0), preview));
        assert_eq!(scene.score(), 10);
    }

    #[test]
    fn test_drop_button_disabled_during_delay() {
        let mut scene = Scene::new(MemoryWorld::new(), &base_config(5, 100)).unwrap();
        scene.start();
        scene.tick(SIM_DT);
        assert!(scene.hud().drop_button_interactable);

        scene.press_drop();
        assert!(!scene.hud().drop_button_interactable);
        scene.tick(0.7);
        assert!(scene.hud().drop_button_interactable);
        assert!(scene.dropper().unwrap().preview().is_some());
    }

    #[test]
    fn test_touch_move_shifts_preview() {
        let mut scene = Scene::new(MemoryWorld::new(), &base_config(5, 100)).unwrap();
        scene.start();
        let preview = scene.dropper().unwrap().preview().unwrap();
        let before = scene.world().transform(preview).unwrap().position.z;

        scene.touch_move(-50.0);
        let after = scene.world().transform(preview).unwrap().position.z;
        assert!((before - after - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_pause_blocks_drop_and_resume_restores() {
        let mut scene = Scene::new(MemoryWorld::new(), &base_config(5, 100)).unwrap();
        scene.start();
        assert!(scene.pause());
        assert!(scene.press_drop().is_none());
        assert!(!scene.hud().power_bar_visible);

        assert!(scene.resume());
        assert!(scene.press_drop().is_some());
        assert_eq!(scene.coins_remaining(), 4);
    }

    #[test]
    fn test_movers_attach_to_nodes() {
        let mut world = MemoryWorld::new();
        let slab = world.add_node("pusher", Transform::default());
        let deck = world.add_node("platform", Transform::default());
        let mut config = base_config(5, 100);
        config.pushers = vec![PusherConfig {
            node: Some(slab),
            ..Default::default()
        }];
        config.platforms = vec![
            PlatformConfig {
                node: Some(deck),
                ..Default::default()
            },
            PlatformConfig::default(),
        ];
        let mut scene = Scene::new(world, &config).unwrap();
        scene.start();

        assert_eq!(scene.active_pushers(), 1);
        assert_eq!(scene.active_platforms(), 1);
        scene.tick(0.5);
        assert!(scene.world().transform(slab).unwrap().position.z > 0.0);
    }

    #[test]
    fn test_shutdown_releases_everything() {
        let mut scene = Scene::new(MemoryWorld::new(), &base_config(5, 100)).unwrap();
        scene.start();
        assert_eq!(scene.world().len(), 1);

        scene.shutdown();
        assert!(scene.world().is_empty());
        assert!(!scene.registry().score.is_registered());
        assert!(!scene.registry().session.is_registered());
        assert!(!scene.is_started());
    }

    #[test]
    fn test_same_seed_same_scene() {
        let layout = || {
            let mut config = base_config(5, 100);
            config.seed = 99;
            config.initial_coins = vec![VolumeSpawnerConfig {
                prefabs: vec!["a".into(), "b".into(), "c".into()],
                volume: Some(Aabb::new(Vec3::ZERO, Vec3::splat(4.0))),
                count: 12,
                ..Default::default()
            }];
            let mut scene = Scene::new(MemoryWorld::new(), &config).unwrap();
            scene.start();
            scene.tick(SIM_DT);
            scene
                .world()
                .entities()
                .map(|(_, e)| (e.prefab.clone(), e.transform.position))
                .collect::<Vec<_>>()
        };
        assert_eq!(layout(), layout());
    }
}
