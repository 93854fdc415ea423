//! Data-driven game balance
//!
//! [`Tuning`] mirrors the gameplay, world and camera constants in
//! [`crate::consts`]; effect animation timings stay compile-time. Load a partial JSON
//! document with [`Tuning::from_json`]; keys that are missing fall back to the
//! compile-time defaults, so a tuning file only needs the values it changes.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors produced while loading or validating a tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning field `{field}` is invalid: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// One row of a weighted drop table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropWeight {
    pub amount: u32,
    pub weight: f64,
}

/// Bell-shaped 1-5 table used for both XP orb count and currency amount
pub fn bell_drop_table() -> Vec<DropWeight> {
    [(1, 0.1), (2, 0.25), (3, 0.3), (4, 0.25), (5, 0.1)]
        .into_iter()
        .map(|(amount, weight)| DropWeight { amount, weight })
        .collect()
}

/// Runtime-tunable gameplay and effect configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World / viewport ===
    pub world_width: f32,
    pub world_height: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,

    // === Ship ===
    pub ship_radius: f32,
    pub ship_thrust: f32,
    pub ship_friction: f32,
    pub ship_brake: f32,
    pub ship_invulnerability_ms: f64,
    pub death_pause_ms: f64,
    pub initial_lives: u32,

    // === Weapons ===
    pub fire_rate_ms: f64,
    pub max_bullets: usize,
    pub bullet_speed: f32,
    pub bullet_lifetime: u32,
    pub bullet_range: f32,
    pub bullet_radius: f32,

    // === Asteroids ===
    pub asteroid_speed: f32,
    pub asteroid_radius_large: f32,
    pub asteroid_radius_medium: f32,
    pub asteroid_radius_small: f32,
    pub asteroid_split_speed_variance: f32,
    pub asteroid_rotation_variance: f32,
    pub asteroid_base_points: u32,
    pub asteroid_point_range: u32,
    pub initial_asteroid_count: u32,
    pub stage_asteroid_growth: f64,

    // === Scoring / progression ===
    pub score_per_asteroid: u64,
    pub xp_per_asteroid: u64,
    pub xp_level_base: f64,
    pub xp_level_growth: f64,

    // === Pickups ===
    pub xp_pickup_value: u64,
    pub xp_drop_weights: Vec<DropWeight>,
    pub currency_drop_chance: f64,
    pub currency_drop_weights: Vec<DropWeight>,
    pub pickup_pop_speed: f32,
    pub pickup_drag: f32,
    pub pickup_attract_radius: f32,
    pub pickup_attract_strength: f32,
    pub pickup_collect_radius: f32,
    pub pickup_max_speed: f32,
    pub pickup_lifetime: u32,
    pub pickup_hyper_speed: f32,
    pub pickup_hyper_accel: f32,
    pub pickup_hyper_duration: u32,

    // === Stage flow ===
    pub hyper_jump_countdown_ms: f64,

    // === Survival ===
    pub survival_spawn_interval_ms: f64,
    pub survival_speed_ceiling: f32,
    pub survival_ramp_rate: f32,

    // === Camera ===
    pub min_zoom: f32,
    pub max_zoom_out: f32,
    pub zoom_step: f32,
    pub zoom_interpolation: f32,
    pub zoom_snap: f32,
    pub visibility_margin: f32,

    // === Starfield ===
    pub star_count: usize,
    pub star_field_spread: f32,
    pub min_parallax: f32,
    pub max_parallax: f32,

    // === Effects ===
    pub levelup_particles: usize,
    pub hyperspace_extra_star_factor: f32,
    pub death_radial_particles: usize,
    pub death_scatter_particles: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,

            ship_radius: SHIP_RADIUS,
            ship_thrust: SHIP_THRUST,
            ship_friction: SHIP_FRICTION,
            ship_brake: SHIP_BRAKE,
            ship_invulnerability_ms: SHIP_INVULNERABILITY_MS,
            death_pause_ms: DEATH_PAUSE_MS,
            initial_lives: INITIAL_LIVES,

            fire_rate_ms: FIRE_RATE_MS,
            max_bullets: MAX_BULLETS,
            bullet_speed: BULLET_SPEED,
            bullet_lifetime: BULLET_LIFETIME,
            bullet_range: BULLET_RANGE,
            bullet_radius: BULLET_RADIUS,

            asteroid_speed: ASTEROID_SPEED,
            asteroid_radius_large: ASTEROID_RADIUS_LARGE,
            asteroid_radius_medium: ASTEROID_RADIUS_MEDIUM,
            asteroid_radius_small: ASTEROID_RADIUS_SMALL,
            asteroid_split_speed_variance: ASTEROID_SPLIT_SPEED_VARIANCE,
            asteroid_rotation_variance: ASTEROID_ROTATION_VARIANCE,
            asteroid_base_points: ASTEROID_BASE_POINTS,
            asteroid_point_range: ASTEROID_POINT_RANGE,
            initial_asteroid_count: INITIAL_ASTEROID_COUNT,
            stage_asteroid_growth: STAGE_ASTEROID_GROWTH,

            score_per_asteroid: SCORE_PER_ASTEROID,
            xp_per_asteroid: XP_PER_ASTEROID,
            xp_level_base: XP_LEVEL_BASE,
            xp_level_growth: XP_LEVEL_GROWTH,

            xp_pickup_value: XP_PICKUP_VALUE,
            xp_drop_weights: bell_drop_table(),
            currency_drop_chance: CURRENCY_DROP_CHANCE,
            currency_drop_weights: bell_drop_table(),
            pickup_pop_speed: PICKUP_POP_SPEED,
            pickup_drag: PICKUP_DRAG,
            pickup_attract_radius: PICKUP_ATTRACT_RADIUS,
            pickup_attract_strength: PICKUP_ATTRACT_STRENGTH,
            pickup_collect_radius: PICKUP_COLLECT_RADIUS,
            pickup_max_speed: PICKUP_MAX_SPEED,
            pickup_lifetime: PICKUP_LIFETIME,
            pickup_hyper_speed: PICKUP_HYPER_SPEED,
            pickup_hyper_accel: PICKUP_HYPER_ACCEL,
            pickup_hyper_duration: PICKUP_HYPER_DURATION,

            hyper_jump_countdown_ms: HYPER_JUMP_COUNTDOWN_MS,

            survival_spawn_interval_ms: SURVIVAL_SPAWN_INTERVAL_MS,
            survival_speed_ceiling: SURVIVAL_SPEED_CEILING,
            survival_ramp_rate: SURVIVAL_RAMP_RATE,

            min_zoom: MIN_ZOOM,
            max_zoom_out: MAX_ZOOM_OUT,
            zoom_step: ZOOM_STEP,
            zoom_interpolation: ZOOM_INTERPOLATION,
            zoom_snap: ZOOM_SNAP,
            visibility_margin: VISIBILITY_MARGIN,

            star_count: STAR_COUNT * STAR_FIELD_MULTIPLIER,
            star_field_spread: STAR_FIELD_SPREAD,
            min_parallax: MIN_PARALLAX,
            max_parallax: MAX_PARALLAX,

            levelup_particles: LEVELUP_PARTICLES,
            hyperspace_extra_star_factor: HYPERSPACE_EXTRA_STAR_FACTOR,
            death_radial_particles: DEATH_RADIAL_PARTICLES,
            death_scatter_particles: DEATH_SCATTER_PARTICLES,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON tuning document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning ({} asteroids/stage, {} bullets)", tuning.initial_asteroid_count, tuning.max_bullets);
        Ok(tuning)
    }

    pub fn world_center(&self) -> Vec2 {
        Vec2::new(self.world_width, self.world_height) / 2.0
    }

    /// Serialize to pretty JSON (for writing a template tuning file)
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        if self.world_width <= 0.0 || self.world_height <= 0.0 {
            return invalid("world_width/world_height", "world extent must be positive");
        }
        if self.viewport_width <= 0.0 || self.viewport_height <= 0.0 {
            return invalid("viewport_width/viewport_height", "viewport extent must be positive");
        }
        if self.min_zoom <= 0.0 || self.min_zoom > self.max_zoom_out {
            return invalid("min_zoom", "must be positive and not exceed max_zoom_out");
        }
        if self.min_parallax < 0.0 || self.min_parallax > self.max_parallax {
            return invalid("min_parallax", "must be non-negative and not exceed max_parallax");
        }
        if self.max_bullets == 0 {
            return invalid("max_bullets", "must allow at least one bullet");
        }
        if self.fire_rate_ms <= 0.0 {
            return invalid("fire_rate_ms", "must be positive");
        }
        if self.xp_level_base < 1.0 {
            return invalid("xp_level_base", "must be at least 1");
        }
        if self.xp_level_growth <= 1.0 {
            return invalid("xp_level_growth", "must be greater than 1 so requirements increase");
        }
        if self.stage_asteroid_growth < 1.0 {
            return invalid("stage_asteroid_growth", "stages must not shrink");
        }
        if self.xp_drop_weights.is_empty() || self.xp_drop_weights.iter().all(|w| w.weight <= 0.0) {
            return invalid("xp_drop_weights", "needs at least one positive weight");
        }
        if self.currency_drop_weights.is_empty()
            || self.currency_drop_weights.iter().all(|w| w.weight <= 0.0)
        {
            return invalid("currency_drop_weights", "needs at least one positive weight");
        }
        if !(0.0..=1.0).contains(&self.currency_drop_chance) {
            return invalid("currency_drop_chance", "must be a probability");
        }
        if self.pickup_collect_radius > self.pickup_attract_radius {
            return invalid("pickup_collect_radius", "must not exceed pickup_attract_radius");
        }
        if self.survival_speed_ceiling < 1.0 {
            return invalid("survival_speed_ceiling", "must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.star_count, 6000);
        assert_eq!(tuning.zoom_step, ZOOM_STEP);
    }

    #[test]
    fn test_partial_json_overrides() {
        let tuning = Tuning::from_json(r#"{ "max_bullets": 8, "world_width": 4000.0 }"#).unwrap();
        assert_eq!(tuning.max_bullets, 8);
        assert_eq!(tuning.world_width, 4000.0);
        // Untouched keys keep defaults
        assert_eq!(tuning.initial_lives, INITIAL_LIVES);
        assert_eq!(tuning.xp_drop_weights.len(), 5);
    }

    #[test]
    fn test_rejects_bad_zoom() {
        let err = Tuning::from_json(r#"{ "min_zoom": 4.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "min_zoom", .. }));
    }

    #[test]
    fn test_rejects_inverted_parallax() {
        let err = Tuning::from_json(r#"{"min_parallax": 0.9, "max_parallax": 0.2}"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "min_parallax", .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_round_trip_template() {
        let json = Tuning::default().to_json();
        let back = Tuning::from_json(&json).unwrap();
        assert_eq!(back.fire_rate_ms, FIRE_RATE_MS);
    }
}
