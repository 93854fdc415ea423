//! Game state and session control
//!
//! Everything a run owns lives here: entities, progression, effects, the
//! simulated clock and the single seeded RNG. Session entry points fully
//! reset or freeze this data.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::collision::wrap_position;
use super::effects::{
    DeathExplosion, Effect, HyperspaceJumpEffect, LevelUpEffect, Respawn, StageClearEffect, StageStart,
};
use super::entities::{Asteroid, AsteroidSize, Bullet, Pickup, Ship};
use super::progression::{Drops, Progression};
use super::snapshot::{AsteroidCounts, FinalStats};
use super::spawner::SurvivalSpawner;
use super::starfield::Starfield;
use crate::consts::ASTEROID_SPAWN_CLEARANCE;
use crate::tuning::Tuning;

/// Session mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Discrete stages cleared by destroying every asteroid
    #[default]
    Waves,
    /// Continuous timed spawning with a speed ramp
    Survival,
}

/// Cancelable simulated-time countdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    remaining_ms: Option<f64>,
}

impl Countdown {
    pub fn arm(&mut self, ms: f64) {
        self.remaining_ms = Some(ms.max(0.0));
    }

    pub fn cancel(&mut self) {
        self.remaining_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.remaining_ms.is_some()
    }

    /// Remaining time, 0 when not armed
    pub fn remaining_ms(&self) -> f64 {
        self.remaining_ms.unwrap_or(0.0)
    }

    /// Run down by `dt_ms`. Returns true exactly once, on expiry.
    pub fn advance(&mut self, dt_ms: f64) -> bool {
        match self.remaining_ms {
            Some(left) if left - dt_ms <= 0.0 => {
                self.remaining_ms = None;
                true
            }
            Some(left) => {
                self.remaining_ms = Some(left - dt_ms);
                false
            }
            None => false,
        }
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub(crate) drops: Drops,

    pub mode: GameMode,
    pub started: bool,
    pub paused: bool,
    pub game_over: bool,
    pub final_stats: Option<FinalStats>,

    /// Simulated clock (ms), advances while a run is unpaused
    pub time_ms: f64,
    /// Active gameplay time only (run timer)
    pub elapsed_ms: f64,

    pub ship: Ship,
    pub asteroids: Vec<Asteroid>,
    pub bullets: Vec<Bullet>,
    pub pickups: Vec<Pickup>,
    pub camera: Camera,
    pub starfield: Starfield,
    /// Aim target in world space
    pub crosshair: Vec2,

    pub score: u64,
    pub lives: u32,
    pub progression: Progression,
    pub stage: u32,
    /// Asteroid quota the current stage started with
    pub stage_asteroid_count: u32,
    pub stage_cleared: bool,
    pub asteroid_counts: AsteroidCounts,
    pub hyper_countdown: Countdown,
    pub death_pause_until_ms: f64,
    pub last_shot_ms: Option<f64>,
    pub survival: SurvivalSpawner,

    pub level_up: LevelUpEffect,
    pub stage_clear: StageClearEffect,
    pub hyperspace: HyperspaceJumpEffect,
    pub death: DeathExplosion,
}

impl GameState {
    /// Fresh state with default tuning; no run is started
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        debug_assert!(tuning.validate().is_ok(), "tuning must be validated before use");
        let camera = Camera::new(&tuning);
        let center = tuning.world_center();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            drops: Drops::new(&tuning),
            mode: GameMode::Waves,
            started: false,
            paused: false,
            game_over: false,
            final_stats: None,
            time_ms: 0.0,
            elapsed_ms: 0.0,
            ship: Ship::new(center, &tuning),
            asteroids: Vec::new(),
            bullets: Vec::new(),
            pickups: Vec::new(),
            crosshair: center,
            camera,
            starfield: Starfield::default(),
            score: 0,
            lives: tuning.initial_lives,
            progression: Progression::new(&tuning),
            stage: 1,
            stage_asteroid_count: tuning.initial_asteroid_count,
            stage_cleared: false,
            asteroid_counts: AsteroidCounts::default(),
            hyper_countdown: Countdown::default(),
            death_pause_until_ms: 0.0,
            last_shot_ms: None,
            survival: SurvivalSpawner::default(),
            level_up: LevelUpEffect::new(),
            stage_clear: StageClearEffect::new(),
            hyperspace: HyperspaceJumpEffect::new(),
            death: DeathExplosion::new(),
            tuning,
        }
    }

    #[inline]
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.tuning.world_width, self.tuning.world_height)
    }

    // ---------------------------------------------------------------
    // Session control
    // ---------------------------------------------------------------

    /// Begin a new run from scratch
    pub fn start_run(&mut self, mode: GameMode) {
        self.reset_session();
        self.mode = mode;
        self.started = true;
        self.survival = SurvivalSpawner::new(self.time_ms, &self.tuning);

        // Seed the crosshair just right of screen center
        let aim_screen = self.camera.viewport / 2.0 + Vec2::new(50.0, 0.0);
        self.crosshair = self.camera.screen_to_world(aim_screen);

        let count = self.tuning.initial_asteroid_count;
        self.spawn_stage_asteroids(count);
        self.starfield = Starfield::generate(&self.tuning, &mut self.rng);
        self.asteroid_counts = AsteroidCounts::tally(&self.asteroids);
        log::info!("Run started ({mode:?}, seed {}, {count} asteroids)", self.seed);
    }

    /// Leave the run: clear entities, effects and timers
    pub fn exit_to_menu(&mut self) {
        self.reset_session();
        log::info!("Exited to menu");
    }

    pub fn set_paused(&mut self, paused: bool) {
        if !self.started || self.game_over || self.paused == paused {
            return;
        }
        self.paused = paused;
        log::debug!("{}", if paused { "Paused" } else { "Resumed" });
    }

    pub fn toggle_pause(&mut self) {
        self.set_paused(!self.paused);
    }

    fn reset_session(&mut self) {
        let tuning = &self.tuning;
        let center = tuning.world_center();
        self.started = false;
        self.paused = false;
        self.game_over = false;
        self.final_stats = None;
        self.elapsed_ms = 0.0;
        self.ship = Ship::new(center, tuning);
        self.asteroids.clear();
        self.bullets.clear();
        self.pickups.clear();
        self.camera.reset();
        self.crosshair = center;
        self.score = 0;
        self.lives = tuning.initial_lives;
        self.progression = Progression::new(tuning);
        self.stage = 1;
        self.stage_asteroid_count = tuning.initial_asteroid_count;
        self.stage_cleared = false;
        self.asteroid_counts = AsteroidCounts::default();
        self.hyper_countdown.cancel();
        self.death_pause_until_ms = 0.0;
        self.last_shot_ms = None;
        self.survival = SurvivalSpawner::default();
        self.level_up.reset();
        self.stage_clear.reset();
        self.hyperspace.reset();
        self.death.reset();
    }

    /// Enter a stage: fresh asteroids and stars, ship recentred at rest
    pub fn start_stage(&mut self, next: StageStart) {
        self.stage = next.stage;
        self.stage_asteroid_count = next.asteroid_count;
        self.bullets.clear();
        self.pickups.clear();
        let center = self.tuning.world_center();
        self.ship.reset_kinematics(center);
        self.camera.follow_ship(center);
        self.spawn_stage_asteroids(next.asteroid_count);
        self.starfield = Starfield::generate(&self.tuning, &mut self.rng);
        self.stage_cleared = false;
        self.hyper_countdown.cancel();
        self.asteroid_counts = AsteroidCounts::tally(&self.asteroids);
        log::info!("Stage {} started with {} asteroids", next.stage, next.asteroid_count);
    }

    /// Put the ship back at world center with a fresh invulnerability window
    pub fn respawn_ship(&mut self, _respawn: Respawn) {
        let center = self.tuning.world_center();
        self.ship.reset_kinematics(center);
        self.ship
            .grant_invulnerability(self.time_ms, self.tuning.ship_invulnerability_ms);
        self.camera.follow_ship(center);
        log::info!("Ship respawned ({} lives left)", self.lives);
    }

    /// Spawn `count` large asteroids anywhere outside the ship's clearance
    fn spawn_stage_asteroids(&mut self, count: u32) {
        let world = self.world_size();
        let ship = self.ship.pos;
        self.asteroids.clear();
        for _ in 0..count {
            let mut pos = ship;
            for _ in 0..16 {
                pos = Vec2::new(
                    self.rng.random::<f32>() * world.x,
                    self.rng.random::<f32>() * world.y,
                );
                if pos.distance(ship) >= ASTEROID_SPAWN_CLEARANCE {
                    break;
                }
            }
            let asteroid = Asteroid::new(pos, AsteroidSize::Large, None, &self.tuning, &mut self.rng);
            self.asteroids.push(asteroid);
        }
    }

    // ---------------------------------------------------------------
    // Gameplay helpers used by the tick
    // ---------------------------------------------------------------

    /// Death pause still running or the explosion not yet confirmed
    pub fn in_death_sequence(&self) -> bool {
        self.time_ms < self.death_pause_until_ms || self.death.is_active()
    }

    pub fn can_fire(&self) -> bool {
        let cooled = self
            .last_shot_ms
            .is_none_or(|last| self.time_ms - last >= self.tuning.fire_rate_ms);
        cooled && self.bullets.len() < self.tuning.max_bullets
    }

    pub(crate) fn fire(&mut self) {
        self.bullets
            .push(Bullet::new(self.ship.pos, self.ship.angle, &self.tuning));
        self.last_shot_ms = Some(self.time_ms);
    }

    /// Grant XP and play the level-up burst if a level was reached
    pub fn grant_xp(&mut self, amount: u64) {
        if self.progression.add_xp(amount) > 0 {
            self.level_up.trigger(
                self.ship.pos,
                self.progression.level,
                self.tuning.levelup_particles,
                &mut self.rng,
            );
        }
    }

    pub fn grant_currency(&mut self, amount: u64) {
        self.progression.add_currency(amount);
    }

    /// Start the hyperspace jump out of the current stage
    pub fn trigger_hyperspace(&mut self) {
        self.hyperspace.trigger(
            self.ship.angle,
            self.stage,
            self.stage_asteroid_count,
            self.tuning.stage_asteroid_growth,
        );
        self.hyperspace.seed_stars(
            &self.starfield.stars,
            &self.camera,
            &self.tuning,
            &mut self.rng,
        );
        for pickup in &mut self.pickups {
            pickup.start_hyper_streak(self.ship.angle, &self.tuning);
        }
        log::info!("Hyperspace jump from stage {}", self.stage);
    }

    /// Blow up the ship. Lives are only spent when `lose_life` is set.
    pub(crate) fn destroy_ship(&mut self, lose_life: bool) {
        if lose_life {
            debug_assert!(self.lives > 0, "ship destroyed with no lives left");
            self.lives = self.lives.saturating_sub(1);
        }
        let terminal = lose_life && self.lives == 0;
        self.death_pause_until_ms = self.time_ms + self.tuning.death_pause_ms;
        self.ship.destroyed = true;
        self.death.trigger(
            self.ship.pos,
            terminal,
            self.tuning.death_radial_particles,
            self.tuning.death_scatter_particles,
            &mut self.rng,
        );
        if terminal {
            self.game_over = true;
            let stats = FinalStats {
                stage: self.stage,
                level: self.progression.level,
                score: self.score,
                time_ms: self.elapsed_ms,
            };
            self.final_stats = Some(stats);
            log::info!(
                "Game over: stage {}, level {}, score {}, time {}",
                stats.stage,
                stats.level,
                stats.score,
                stats.time_string()
            );
        } else {
            log::info!("Ship destroyed ({} lives left)", self.lives);
        }
    }

    /// Keep an entity position inside the world
    #[inline]
    pub(crate) fn wrap(&self, pos: Vec2) -> Vec2 {
        wrap_position(pos, self.world_size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle() {
        let state = GameState::new(1);
        assert!(!state.started);
        assert!(state.asteroids.is_empty());
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn test_start_run_spawns_stage_one() {
        let mut state = GameState::new(42);
        state.start_run(GameMode::Waves);
        assert!(state.started);
        assert_eq!(state.asteroids.len(), 5);
        assert!(state.asteroids.iter().all(|a| a.size == AsteroidSize::Large));
        assert_eq!(state.asteroid_counts.large, 5);
        assert_eq!(state.starfield.len(), state.tuning.star_count);
        for a in &state.asteroids {
            assert!(a.pos.distance(state.ship.pos) >= ASTEROID_SPAWN_CLEARANCE);
        }
    }

    #[test]
    fn test_exit_to_menu_clears_everything() {
        let mut state = GameState::new(42);
        state.start_run(GameMode::Waves);
        state.destroy_ship(true);
        state.stage_clear.trigger();
        state.hyper_countdown.arm(5000.0);
        state.exit_to_menu();

        assert!(!state.started);
        assert!(state.asteroids.is_empty());
        assert!(!state.death.is_active());
        assert!(!state.stage_clear.is_active());
        assert!(!state.hyper_countdown.is_armed());
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn test_pause_requires_running_game() {
        let mut state = GameState::new(1);
        state.toggle_pause();
        assert!(!state.paused);
        state.start_run(GameMode::Waves);
        state.toggle_pause();
        assert!(state.paused);
        state.set_paused(false);
        assert!(!state.paused);
    }

    #[test]
    fn test_countdown_fires_once() {
        let mut c = Countdown::default();
        assert!(!c.advance(100.0));
        c.arm(250.0);
        assert!(!c.advance(100.0));
        assert_eq!(c.remaining_ms(), 150.0);
        assert!(c.advance(150.0));
        assert!(!c.is_armed());
        assert!(!c.advance(100.0));
    }

    #[test]
    fn test_fire_rate_and_cap() {
        let mut state = GameState::new(1);
        state.start_run(GameMode::Waves);
        assert!(state.can_fire());
        state.fire();
        assert!(!state.can_fire());
        state.time_ms += state.tuning.fire_rate_ms;
        assert!(state.can_fire());

        for _ in 0..state.tuning.max_bullets {
            state.fire();
        }
        state.time_ms += 10_000.0;
        assert!(!state.can_fire());
    }

    #[test]
    fn test_terminal_death_captures_stats() {
        let mut state = GameState::new(1);
        state.start_run(GameMode::Waves);
        state.lives = 1;
        state.score = 70;
        state.destroy_ship(true);
        assert!(state.game_over);
        assert!(state.death.is_game_over());
        assert_eq!(state.final_stats.map(|s| s.score), Some(70));
    }

    #[test]
    fn test_grant_xp_triggers_level_up() {
        let mut state = GameState::new(1);
        state.start_run(GameMode::Waves);
        state.grant_xp(299);
        assert!(!state.level_up.is_active());
        state.grant_xp(1);
        assert!(state.level_up.is_active());
        assert_eq!(state.level_up.level(), 2);
    }

    #[test]
    fn test_start_stage_resets_stage_state() {
        let mut state = GameState::new(3);
        state.start_run(GameMode::Waves);
        state.asteroids.clear();
        state.stage_cleared = true;
        state.hyper_countdown.arm(1000.0);
        state.ship.vel = Vec2::new(3.0, 1.0);
        state.start_stage(StageStart {
            stage: 2,
            asteroid_count: 6,
        });
        assert_eq!(state.stage, 2);
        assert_eq!(state.asteroids.len(), 6);
        assert!(!state.stage_cleared);
        assert!(!state.hyper_countdown.is_armed());
        assert_eq!(state.ship.vel, Vec2::ZERO);
        assert_eq!(state.ship.pos, state.tuning.world_center());
    }
}
