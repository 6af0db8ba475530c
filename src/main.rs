//! Coin Pusher headless runner
//!
//! Plays one session against the in-memory world at a fixed timestep and
//! logs the result. Pass a JSON config path to override the demo layout.

#[cfg(not(target_arch = "wasm32"))]
use coin_pusher::{
    GameConfig,
    consts::SIM_DT,
    platform::{Aabb, EntityId, MemoryWorld, Transform},
    sim::{
        DropperConfig, LauncherConfig, PlatformConfig, PusherConfig, Scene, ScoringZoneConfig,
        VolumeSpawnerConfig, ZoneCollider,
    },
};
#[cfg(not(target_arch = "wasm32"))]
use glam::Vec3;

/// Give up after this many simulated seconds
#[cfg(not(target_arch = "wasm32"))]
const MAX_SECONDS: f32 = 120.0;
/// Frames between player actions
#[cfg(not(target_arch = "wasm32"))]
const ACTION_FRAMES: u32 = 45;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Coin Pusher (headless) starting...");

    let mut world = MemoryWorld::new();
    let pusher = world.add_node("Pusher", Transform::from_position(Vec3::new(0.0, 0.5, -4.0)));
    let platform = world.add_node("Platform", Transform::from_position(Vec3::new(0.0, 0.0, -2.0)));

    let config = match std::env::args().nth(1) {
        Some(path) => GameConfig::load(&path).unwrap_or_else(|e| {
            log::error!("{}. Falling back to the demo layout", e);
            demo_config(pusher, platform)
        }),
        None => demo_config(pusher, platform),
    };
    log::info!("Game initialized with seed: {}", config.seed);

    let mut scene = match Scene::new(world, &config) {
        Ok(scene) => scene,
        Err(e) => {
            log::error!("Failed to build scene: {}", e);
            return;
        }
    };
    scene.start();
    run(&mut scene);

    let hud = scene.hud().clone();
    log::info!("{} | {}", hud.score_text, hud.coin_count_text);
    if hud.game_over_visible {
        log::info!("{} {}", hud.game_over_status, hud.game_over_score);
    }
    log::info!("Final state: {}", scene.state().as_str());
    scene.shutdown();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser host; the library is driven by the embedding engine
}

/// Step physics, report trigger entries and alternate drop/launch input
#[cfg(not(target_arch = "wasm32"))]
fn run(scene: &mut Scene<MemoryWorld>) {
    let zones: Vec<_> = scene.zone_ids().collect();
    let max_frames = (MAX_SECONDS / SIM_DT) as u32;
    let mut charging = false;

    for frame in 0..max_frames {
        scene.world_mut().step(SIM_DT);
        for &zone in &zones {
            let Some(bounds) = scene.zone_bounds(zone) else {
                continue;
            };
            for entity in scene.world().entities_in(&bounds) {
                scene.trigger_enter(zone, entity);
            }
        }

        if frame > 0 && frame % ACTION_FRAMES == 0 {
            let action = frame / ACTION_FRAMES;
            if charging {
                scene.touch_end();
                charging = false;
            } else if action % 3 == 0 && scene.launcher().is_some() {
                scene.touch_start();
                charging = true;
            } else {
                scene.touch_move(if action % 2 == 0 { -40.0 } else { 40.0 });
                scene.press_drop();
            }
        }

        scene.tick(SIM_DT);

        if scene.state().is_terminal() && scene.world().coin_count() == 0 {
            log::info!("Session settled after {:.1}s", frame as f32 * SIM_DT);
            return;
        }
    }
    log::warn!("Stopped after {}s without settling", MAX_SECONDS);
}

#[cfg(not(target_arch = "wasm32"))]
fn demo_config(pusher: EntityId, platform: EntityId) -> GameConfig {
    let coins = vec!["CoinGold".to_string(), "CoinSilver".to_string()];
    GameConfig {
        initial_coins: vec![VolumeSpawnerConfig {
            prefabs: coins.clone(),
            volume: Some(Aabb::new(Vec3::new(0.0, 1.0, -3.0), Vec3::new(3.0, 0.5, 2.0))),
            count: 5,
            interval: 0.05,
            ..Default::default()
        }],
        dropper: Some(DropperConfig {
            prefabs: coins.clone(),
            ..Default::default()
        }),
        launcher: Some(LauncherConfig {
            prefab: Some(coins[0].clone()),
            launch_point: Some(Transform::from_position(Vec3::new(0.0, 1.0, 3.0))),
            ..Default::default()
        }),
        scoring_zones: vec![ScoringZoneConfig {
            collider: Some(ZoneCollider {
                bounds: Aabb::new(Vec3::new(0.0, -6.0, 0.0), Vec3::new(200.0, 2.0, 200.0)),
                is_trigger: true,
            }),
            ..Default::default()
        }],
        pushers: vec![PusherConfig {
            node: Some(pusher),
            ..Default::default()
        }],
        platforms: vec![PlatformConfig {
            node: Some(platform),
            ..Default::default()
        }],
        ..Default::default()
    }
}
