//! Coin Pusher - gameplay core for a coin pusher arcade game
//!
//! Core modules:
//! - `sim`: Score, session state machine, spawners, scoring zones, scene loop
//! - `platform`: Host engine abstraction (world access, component lifecycle)
//! - `ui`: HUD model and presenter
//! - `settings`: Data-driven game configuration
//! - `error`: Setup and configuration errors

pub mod error;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod ui;

pub use error::{ConfigError, SetupError};
pub use settings::GameConfig;

use glam::{EulerRot, Quat};

/// Game configuration constants
pub mod consts {
    /// Fixed frame step used by the headless runner (seconds)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Score needed to win (0 or less = endless)
    pub const DEFAULT_TARGET_SCORE: i64 = 100;
    /// Coins the player starts each session with
    pub const DEFAULT_INITIAL_COIN_COUNT: u32 = 20;
    /// Points a scoring zone awards per coin
    pub const DEFAULT_ZONE_POINTS: i64 = 10;

    /// Initial coin volume defaults
    pub const DEFAULT_VOLUME_COIN_COUNT: u32 = 100;
    pub const DEFAULT_VOLUME_INTERVAL: f32 = 0.0;

    /// Coin dropper defaults
    pub const DEFAULT_DROPPER_MIN_Z: f32 = -5.019;
    pub const DEFAULT_DROPPER_MAX_Z: f32 = -2.003;
    pub const DEFAULT_MOVE_SENSITIVITY: f32 = 0.01;
    pub const DEFAULT_MIN_ANGULAR_FACTOR: f32 = 1.0;
    pub const DEFAULT_MAX_ANGULAR_FACTOR: f32 = 5.0;
    /// Delay between a drop and the next preview (seconds)
    pub const DEFAULT_DROP_DELAY: f32 = 0.6;

    /// Coin launcher defaults
    pub const DEFAULT_MIN_LAUNCH_FORCE: f32 = 5.0;
    pub const DEFAULT_MAX_LAUNCH_FORCE: f32 = 20.0;
    /// Seconds of holding to reach max force
    pub const DEFAULT_CHARGE_TIME: f32 = 1.5;
    /// Upward tilt in degrees
    pub const DEFAULT_LAUNCH_ANGLE_Y: f32 = 30.0;

    /// Pusher defaults
    pub const DEFAULT_PUSHER_SPEED: f32 = 0.5;
    pub const DEFAULT_PUSHER_DISTANCE: f32 = 1.0;

    /// Swinging platform defaults
    pub const DEFAULT_SWING_ANGLE: f32 = 5.0;
    pub const DEFAULT_SWING_SPEED: f32 = 1.0;

    /// Gravity used by the headless world (units/s²)
    pub const GRAVITY: f32 = -9.81;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Clamp to [0, 1]
#[inline]
pub fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

/// Build a rotation from Euler angles in degrees (x, y, z)
#[inline]
pub fn euler_degrees(x: f32, y: f32, z: f32) -> Quat {
    Quat::from_euler(
        EulerRot::XYZ,
        x.to_radians(),
        y.to_radians(),
        z.to_radians(),
    )
}
