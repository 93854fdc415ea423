//! Astro Drift - simulation and effects core for a wrapped-world asteroid shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, progression, effects)
//! - `render`: Backend-agnostic draw contract and a recording draw list
//! - `tuning`: Data-driven game balance

pub mod render;
pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
///
/// These are the authoritative defaults; `Tuning::default()` mirrors them.
pub mod consts {
    /// Nominal frame duration (60 Hz animation frames)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;

    /// World dimensions (wrap-around)
    pub const WORLD_WIDTH: f32 = 8000.0;
    pub const WORLD_HEIGHT: f32 = 5500.0;
    /// Default viewport (canvas) size
    pub const VIEWPORT_WIDTH: f32 = 1200.0;
    pub const VIEWPORT_HEIGHT: f32 = 900.0;

    /// Ship
    pub const SHIP_RADIUS: f32 = 10.0;
    pub const SHIP_THRUST: f32 = 0.12;
    pub const SHIP_FRICTION: f32 = 0.99;
    pub const SHIP_BRAKE: f32 = 0.92;
    pub const SHIP_INVULNERABILITY_MS: f64 = 2000.0;
    pub const DEATH_PAUSE_MS: f64 = 1000.0;
    pub const INITIAL_LIVES: u32 = 3;

    /// Weapons
    pub const FIRE_RATE_MS: f64 = 250.0; // 4 shots per second
    pub const MAX_BULLETS: usize = 5;
    pub const BULLET_SPEED: f32 = 20.0;
    pub const BULLET_LIFETIME: u32 = 100; // frames
    pub const BULLET_RANGE: f32 = VIEWPORT_WIDTH * 2.0;
    pub const BULLET_RADIUS: f32 = 2.0;

    /// Asteroids
    pub const ASTEROID_SPEED: f32 = 2.0;
    pub const ASTEROID_RADIUS_LARGE: f32 = 40.0;
    pub const ASTEROID_RADIUS_MEDIUM: f32 = 20.0;
    pub const ASTEROID_RADIUS_SMALL: f32 = 10.0;
    pub const ASTEROID_SPLIT_SPEED_VARIANCE: f32 = 0.4;
    pub const ASTEROID_ROTATION_VARIANCE: f32 = 0.1;
    pub const ASTEROID_BASE_POINTS: u32 = 8;
    pub const ASTEROID_POINT_RANGE: u32 = 4; // 8-11 vertices
    pub const INITIAL_ASTEROID_COUNT: u32 = 5;
    /// Stage spawns keep at least this far from the ship
    pub const ASTEROID_SPAWN_CLEARANCE: f32 = 300.0;
    pub const STAGE_ASTEROID_GROWTH: f64 = 1.2;

    /// Scoring and progression
    pub const SCORE_PER_ASTEROID: u64 = 10;
    pub const XP_PER_ASTEROID: u64 = 5;
    pub const XP_LEVEL_BASE: f64 = 300.0;
    pub const XP_LEVEL_GROWTH: f64 = 1.25;

    /// Pickups
    pub const XP_PICKUP_VALUE: u64 = 5;
    pub const CURRENCY_DROP_CHANCE: f64 = 0.4;
    pub const PICKUP_POP_SPEED: f32 = 1.4;
    pub const PICKUP_DRAG: f32 = 0.92;
    pub const PICKUP_ATTRACT_RADIUS: f32 = 220.0;
    pub const PICKUP_ATTRACT_STRENGTH: f32 = 0.12;
    pub const PICKUP_COLLECT_RADIUS: f32 = 26.0;
    pub const PICKUP_MAX_SPEED: f32 = 6.0;
    pub const PICKUP_LIFETIME: u32 = 60 * 15; // frames
    pub const PICKUP_HYPER_SPEED: f32 = 40.0;
    pub const PICKUP_HYPER_ACCEL: f32 = 1.08;
    pub const PICKUP_HYPER_DURATION: u32 = 45; // frames

    /// Stage flow
    pub const HYPER_JUMP_COUNTDOWN_MS: f64 = 5000.0;

    /// Survival mode
    pub const SURVIVAL_SPAWN_INTERVAL_MS: f64 = 2000.0;
    pub const SURVIVAL_SPEED_CEILING: f32 = 3.0;
    pub const SURVIVAL_RAMP_RATE: f32 = 0.05;

    /// Camera
    pub const MIN_ZOOM: f32 = 1.0;
    pub const MAX_ZOOM_OUT: f32 = 3.0;
    pub const ZOOM_STEP: f32 = 0.1;
    pub const ZOOM_INTERPOLATION: f32 = 0.1;
    pub const ZOOM_SNAP: f32 = 0.01;
    pub const VISIBILITY_MARGIN: f32 = 50.0;

    /// Starfield
    pub const STAR_COUNT: usize = 2000;
    /// Field is this many times denser than `STAR_COUNT` to cover the larger world
    pub const STAR_FIELD_MULTIPLIER: usize = 3;
    pub const STAR_FIELD_SPREAD: f32 = 1.5;
    pub const STAR_MIN_BRIGHTNESS: f32 = 0.2;
    pub const STAR_MAX_BRIGHTNESS: f32 = 1.0;
    pub const STAR_LARGE_THRESHOLD: f32 = 0.7;
    pub const STAR_MEDIUM_THRESHOLD: f32 = 0.4;
    pub const MIN_PARALLAX: f32 = 0.3;
    pub const MAX_PARALLAX: f32 = 0.7;

    /// Level-up effect (frames)
    pub const LEVELUP_PARTICLES: usize = 225;
    pub const LEVELUP_PARTICLE_SPEED: f32 = 12.0;
    pub const LEVELUP_PARTICLE_LIFE: u32 = 40;
    pub const LEVELUP_FLASH: f32 = 0.7;
    pub const LEVELUP_FLASH_DECAY: f32 = 0.02;
    pub const LEVELUP_FLASH_HOLD: u32 = 12;
    pub const LEVELUP_TEXT_TIME: u32 = 120;

    /// Stage-clear banner (frames)
    pub const STAGE_CLEAR_SLIDE_TIME: u32 = 30;
    pub const STAGE_CLEAR_POP_TIME: u32 = 15;
    pub const STAGE_CLEAR_HOLD_TIME: u32 = 45;
    pub const STAGE_CLEAR_FADE_TIME: u32 = 20;
    pub const STAGE_CLEAR_SLIDE_DISTANCE: f32 = 400.0;

    /// Hyperspace jump (frames)
    pub const HYPERSPACE_BRIGHTEN_TIME: u32 = 20;
    pub const HYPERSPACE_STREAK_TIME: u32 = 80;
    pub const HYPERSPACE_FLASH_TIME: u32 = 8;
    pub const HYPERSPACE_FADE_TIME: u32 = 20;
    pub const HYPERSPACE_SHIP_FADE_IN_TIME: u32 = 30;
    pub const HYPERSPACE_ASTEROIDS_FADE_IN_TIME: u32 = 30;
    pub const HYPERSPACE_TEXT_TIME: u32 = 30;
    pub const HYPERSPACE_EXTRA_STAR_FACTOR: f32 = 3.0;

    /// Death explosion (frames)
    pub const DEATH_EXPLOSION_TIME: u32 = 45;
    pub const DEATH_FADE_TIME: u32 = 30;
    pub const DEATH_TEXT_TIME: u32 = 30;
    pub const DEATH_RADIAL_PARTICLES: usize = 80;
    pub const DEATH_SCATTER_PARTICLES: usize = 40;
}

/// Floor for divisions and logarithms that could otherwise produce NaN/Inf
pub const EPSILON: f32 = 1e-4;

/// Unit vector for an angle (radians)
#[inline]
pub fn from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Angle from `from` toward `to`, or `fallback` when the points coincide
#[inline]
pub fn heading_to(from: Vec2, to: Vec2, fallback: f32) -> f32 {
    let d = to - from;
    if d.length_squared() < EPSILON * EPSILON {
        fallback
    } else {
        d.y.atan2(d.x)
    }
}

/// Format milliseconds as `HH:MM:SS`
pub fn format_time(ms: f64) -> String {
    let total = (ms.max(0.0) / 1000.0).floor() as u64;
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_to() {
        let h = heading_to(Vec2::ZERO, Vec2::new(0.0, 10.0), 0.0);
        assert!((h - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        // Coincident points keep the fallback heading
        assert_eq!(heading_to(Vec2::ONE, Vec2::ONE, 1.25), 1.25);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "00:00:00");
        assert_eq!(format_time(61_500.0), "00:01:01");
        assert_eq!(format_time(3_725_000.0), "01:02:05");
        assert_eq!(format_time(-5.0), "00:00:00");
    }
}
