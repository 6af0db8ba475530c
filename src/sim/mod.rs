//! Gameplay simulation
//!
//! Everything that decides the outcome of a session lives here:
//! - Score tracking and the session state machine
//! - Coin spawners (initial volume, dropper, launcher)
//! - Scoring zones and moving props
//! - The scene that owns them and routes their events
//!
//! Randomness comes from seeded `Pcg32` streams, so a scene built from the
//! same config replays the same layout.

pub mod dropper;
pub mod events;
pub mod launcher;
pub mod motion;
pub mod registry;
pub mod score;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timers;
pub mod zone;

pub use dropper::{CoinDropper, DropperConfig};
pub use events::{EventBus, EventQueue, GameEvent, ScoreEvent, SessionEvent, SubscriptionId};
pub use launcher::{CoinLauncher, LauncherConfig};
pub use motion::{PlatformConfig, Pusher, PusherConfig, SwingPlatform};
pub use registry::{ManagerRegistry, SingletonSlot};
pub use score::{ScoreConfig, ScoreTracker};
pub use spawn::{RotationMode, VolumeSpawner, VolumeSpawnerConfig};
pub use state::{GameState, GameStateMachine, LaunchGate, SessionConfig};
pub use tick::{Scene, ZoneId};
pub use timers::{TimerToken, Timers};
pub use zone::{ScoringZone, ScoringZoneConfig, ZoneCollider};
