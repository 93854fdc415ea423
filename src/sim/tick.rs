//! Frame tick
//!
//! One call per animation frame. The order inside an active tick is fixed:
//! zoom, survival spawn, ship, asteroids, bullets and firing, collisions,
//! effects, pickups, stage-clear check.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::wrap_position;
use super::effects::Effect;
use super::entities::{PickupKind, PickupStatus};
use super::resolve::{resolve_bullet_hits, resolve_ship_hit, update_stage_progress};
use super::state::{GameMode, GameState};

/// Testing hooks that force an effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebugTrigger {
    /// Blow up the ship without spending a life
    DeathExplosion,
    /// Replay the level-up burst for the current level
    LevelUp,
    /// Jump to the next stage immediately
    Hyperspace,
}

/// Input intents for a single tick
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickInput {
    pub thrust: bool,
    pub brake: bool,
    pub fire_held: bool,
    /// Aim target in world space; `None` keeps the previous crosshair
    pub aim: Option<Vec2>,
    /// One-shot pause toggle
    pub pause_toggle: bool,
    /// One-shot confirm (advance a waiting effect / respawn)
    pub confirm: bool,
    /// Zoom notches this tick, each worth `Tuning::zoom_step` (positive zooms out)
    pub zoom_steps: f32,
    pub debug: Option<DebugTrigger>,
}

/// Advance the game by one frame of `dt_ms` simulated milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f64) {
    if !state.started {
        return;
    }

    if input.pause_toggle {
        state.toggle_pause();
    }
    if state.paused {
        return;
    }

    state.time_ms += dt_ms;

    // Death pause / explosion: only the explosion advances
    if state.game_over || state.in_death_sequence() {
        state.death.update();
        if input.confirm && !state.game_over && state.time_ms >= state.death_pause_until_ms {
            if let Some(respawn) = state.death.confirm() {
                state.respawn_ship(respawn);
            }
        }
        return;
    }

    state.elapsed_ms += dt_ms;

    if let Some(trigger) = input.debug {
        apply_debug(state, trigger);
        if trigger == DebugTrigger::DeathExplosion {
            return;
        }
    }

    // Camera zoom
    if input.zoom_steps != 0.0 {
        let target = state.camera.target_zoom + input.zoom_steps * state.tuning.zoom_step;
        state.camera.set_zoom(target);
    }
    state.camera.update_zoom();

    // Survival spawner
    if state.mode == GameMode::Survival {
        let ship = state.ship.pos;
        if let Some(asteroid) = state
            .survival
            .poll(state.time_ms, ship, &state.tuning, &mut state.rng)
        {
            state.asteroids.push(asteroid);
        }
    }

    update_ship(state, input);
    update_asteroids(state);
    update_bullets(state, input);

    // Collisions
    resolve_bullet_hits(state);
    if resolve_ship_hit(state) {
        // Frozen from here until the explosion is confirmed
        return;
    }

    update_effects(state, input);
    update_pickups(state);
    update_stage_progress(state, dt_ms);
}

fn apply_debug(state: &mut GameState, trigger: DebugTrigger) {
    log::debug!("Debug trigger: {trigger:?}");
    match trigger {
        DebugTrigger::DeathExplosion => state.destroy_ship(false),
        DebugTrigger::LevelUp => {
            let origin = state.ship.pos;
            let level = state.progression.level;
            let count = state.tuning.levelup_particles;
            state.level_up.trigger(origin, level, count, &mut state.rng);
        }
        DebugTrigger::Hyperspace => {
            if !state.hyperspace.is_active() {
                state.hyper_countdown.cancel();
                state.trigger_hyperspace();
            }
        }
    }
}

fn update_ship(state: &mut GameState, input: &TickInput) {
    if let Some(aim) = input.aim {
        state.crosshair = aim;
    }

    // Steering is locked while the jump plays
    let (thrust, brake) = if state.hyperspace.blocks_input() {
        (false, false)
    } else {
        state.ship.aim_at(state.crosshair);
        (input.thrust, input.brake)
    };
    state.ship.update(thrust, brake, &state.tuning);
    state.ship.pos = state.wrap(state.ship.pos);
    state.camera.follow_ship(state.ship.pos);
}

fn update_asteroids(state: &mut GameState) {
    let world = state.world_size();
    for asteroid in &mut state.asteroids {
        asteroid.update();
        asteroid.pos = wrap_position(asteroid.pos, world);
    }
}

fn update_bullets(state: &mut GameState, input: &TickInput) {
    let world = state.world_size();
    for bullet in &mut state.bullets {
        bullet.update();
        bullet.pos = wrap_position(bullet.pos, world);
    }
    state.bullets.retain(|b| !b.is_expired());

    if input.fire_held && !state.hyperspace.blocks_input() && state.can_fire() {
        state.fire();
    }
}

fn update_effects(state: &mut GameState, input: &TickInput) {
    state.level_up.update();
    state.stage_clear.update();
    state.hyperspace.update();
    state.hyperspace.update_stars(&mut state.starfield.stars);
    state.death.update();

    if input.confirm {
        if let Some(next) = state.hyperspace.confirm() {
            state.start_stage(next);
        }
    }
}

fn update_pickups(state: &mut GameState) {
    let ship = (!state.ship.destroyed).then_some(state.ship.pos);
    let world = state.world_size();
    let mut xp = 0;
    let mut currency = 0;

    state.pickups.retain_mut(|pickup| match pickup.update(ship, &state.tuning) {
        PickupStatus::Collected => {
            match pickup.kind {
                PickupKind::Xp => xp += pickup.value,
                PickupKind::Currency => currency += pickup.value,
            }
            false
        }
        PickupStatus::Expired => false,
        PickupStatus::Active => {
            if !pickup.hyper {
                pickup.pos = wrap_position(pickup.pos, world);
            }
            true
        }
    });

    if currency > 0 {
        state.grant_currency(currency);
    }
    if xp > 0 {
        log::debug!("Collected {xp} xp");
        state.grant_xp(xp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_MS;
    use crate::sim::entities::{Asteroid, AsteroidSize};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn running(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.start_run(GameMode::Waves);
        state
    }

    fn rock_on_ship(state: &GameState) -> Asteroid {
        let mut rng = Pcg32::seed_from_u64(0);
        let mut a = Asteroid::new(state.ship.pos, AsteroidSize::Large, None, &state.tuning, &mut rng);
        a.vel = Vec2::ZERO;
        a
    }

    #[test]
    fn test_tick_before_start_is_noop() {
        let mut state = GameState::new(1);
        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.time_ms, 0.0);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = running(12345);
        let toggle = TickInput {
            pause_toggle: true,
            ..Default::default()
        };
        tick(&mut state, &toggle, FRAME_MS);
        assert!(state.paused);

        let frozen: Vec<Vec2> = state.asteroids.iter().map(|a| a.pos).collect();
        let time = state.time_ms;
        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.time_ms, time);
        assert_eq!(state.asteroids.iter().map(|a| a.pos).collect::<Vec<_>>(), frozen);

        tick(&mut state, &toggle, FRAME_MS);
        assert!(!state.paused);
        assert!(state.time_ms > time);
    }

    #[test]
    fn test_thrust_moves_ship_toward_aim() {
        let mut state = running(7);
        let start = state.ship.pos;
        let input = TickInput {
            thrust: true,
            aim: Some(start + Vec2::new(0.0, -500.0)),
            ..Default::default()
        };
        for _ in 0..10 {
            tick(&mut state, &input, FRAME_MS);
        }
        assert!(state.ship.pos.y < start.y);
        assert!((state.ship.pos.x - start.x).abs() < 1e-3);
    }

    #[test]
    fn test_fire_held_respects_rate() {
        let mut state = running(7);
        state.asteroids.clear();
        let input = TickInput {
            fire_held: true,
            ..Default::default()
        };
        tick(&mut state, &input, FRAME_MS);
        assert_eq!(state.bullets.len(), 1);
        // 250 ms cooldown = 15 frames at 60 Hz
        for _ in 0..10 {
            tick(&mut state, &input, FRAME_MS);
        }
        assert_eq!(state.bullets.len(), 1);
    }

    #[test]
    fn test_invulnerability_gate() {
        let mut state = running(9);
        state.asteroids.clear();
        state.ship.grant_invulnerability(state.time_ms, FRAME_MS * 2.0);
        state.asteroids.push(rock_on_ship(&state));

        // Still inside the window: no damage
        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.lives, 3);
        assert!(!state.death.is_active());

        // One tick after it lapses: hit lands
        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.lives, 2);
        assert!(state.death.is_active());
    }

    #[test]
    fn test_death_pause_freezes_world_until_respawn() {
        let mut state = running(11);
        state.asteroids.push(rock_on_ship(&state));
        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.lives, 2);

        let frozen: Vec<Vec2> = state.asteroids.iter().map(|a| a.pos).collect();
        let confirm = TickInput {
            confirm: true,
            ..Default::default()
        };
        // Confirm is ignored until the explosion reaches its waiting phase
        for _ in 0..60 {
            tick(&mut state, &confirm, FRAME_MS);
        }
        assert!(state.death.is_active());
        assert_eq!(state.asteroids.iter().map(|a| a.pos).collect::<Vec<_>>(), frozen);

        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), FRAME_MS);
        }
        assert!(state.death.is_waiting());
        tick(&mut state, &confirm, FRAME_MS);
        assert!(!state.death.is_active());
        assert!(!state.ship.destroyed);
        assert!(state.ship.is_invulnerable(state.time_ms));
        assert_eq!(state.ship.pos, state.tuning.world_center());
    }

    #[test]
    fn test_last_life_ends_run_without_respawn() {
        let mut state = running(13);
        state.lives = 1;
        state.asteroids.push(rock_on_ship(&state));
        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert!(state.game_over);
        assert!(state.final_stats.is_some());

        let confirm = TickInput {
            confirm: true,
            ..Default::default()
        };
        for _ in 0..200 {
            tick(&mut state, &confirm, FRAME_MS);
        }
        // Explosion still plays to its end, but there is no respawn
        assert!(state.death.is_waiting());
        assert!(state.ship.destroyed);
        assert_eq!(state.lives, 0);
    }

    #[test]
    fn test_debug_death_keeps_lives() {
        let mut state = running(15);
        let input = TickInput {
            debug: Some(DebugTrigger::DeathExplosion),
            ..Default::default()
        };
        tick(&mut state, &input, FRAME_MS);
        assert!(state.death.is_active());
        assert_eq!(state.lives, 3);
        assert!(!state.game_over);
    }

    #[test]
    fn test_zoom_steps_scale_and_clamp() {
        let mut state = running(1);
        let out = TickInput {
            zoom_steps: 3.0,
            ..Default::default()
        };
        tick(&mut state, &out, FRAME_MS);
        let expected = 1.0 + 3.0 * state.tuning.zoom_step;
        assert!((state.camera.target_zoom - expected).abs() < 1e-6);
        assert!(state.camera.zoom > 1.0);

        let far_out = TickInput {
            zoom_steps: 100.0,
            ..Default::default()
        };
        tick(&mut state, &far_out, FRAME_MS);
        assert_eq!(state.camera.target_zoom, state.tuning.max_zoom_out);
    }

    #[test]
    fn test_survival_spawns_over_time() {
        let mut state = GameState::new(3);
        state.start_run(GameMode::Survival);
        state.ship.grant_invulnerability(0.0, 1.0e9);
        let before = state.asteroids.len();
        let frames = (state.tuning.survival_spawn_interval_ms / FRAME_MS).ceil() as usize + 1;
        for _ in 0..frames {
            tick(&mut state, &TickInput::default(), FRAME_MS);
        }
        assert_eq!(state.survival.spawn_count, 1);
        assert!(state.asteroids.len() > before);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);
        state1.start_run(GameMode::Waves);
        state2.start_run(GameMode::Waves);

        let inputs = [
            TickInput {
                aim: Some(Vec2::new(100.0, 100.0)),
                thrust: true,
                ..Default::default()
            },
            TickInput {
                fire_held: true,
                ..Default::default()
            },
            TickInput {
                brake: true,
                fire_held: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..50 {
            for input in &inputs {
                tick(&mut state1, input, FRAME_MS);
                tick(&mut state2, input, FRAME_MS);
            }
        }

        assert_eq!(state1.time_ms, state2.time_ms);
        assert_eq!(state1.asteroids.len(), state2.asteroids.len());
        assert_eq!(state1.ship.pos, state2.ship.pos);
        assert_eq!(state1.score, state2.score);
    }
}
