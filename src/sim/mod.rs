//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied simulated time only (no wall clock)
//! - Seeded RNG only
//! - Stable iteration order (vector order, removals applied after detection)
//! - Drawing only through the backend-agnostic `DrawContext`

pub mod camera;
pub mod collision;
pub mod effects;
pub mod entities;
pub mod progression;
pub mod resolve;
pub mod snapshot;
pub mod spawner;
pub mod starfield;
pub mod state;
pub mod tick;

pub use camera::Camera;
pub use collision::{Collider, check_collision, circles_overlap, wrap_position};
pub use effects::{
    DeathExplosion, DeathPhase, Effect, HyperspaceJumpEffect, HyperspacePhase, LevelUpEffect, Respawn,
    StageClearEffect, StageClearPhase, StageStart,
};
pub use entities::{Asteroid, AsteroidSize, Bullet, Pickup, PickupKind, PickupStatus, Ship};
pub use progression::{DropTable, Drops, Progression, xp_required};
pub use resolve::{resolve_bullet_hits, resolve_ship_hit, update_stage_progress};
pub use snapshot::{AsteroidCounts, CameraView, FinalStats, ProgressSnapshot, RenderSnapshot};
pub use spawner::SurvivalSpawner;
pub use starfield::{Star, Starfield};
pub use state::{Countdown, GameMode, GameState};
pub use tick::{DebugTrigger, TickInput, tick};
