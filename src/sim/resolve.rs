//! Collision resolution and stage-clear bookkeeping
//!
//! Detection passes only collect indices; all removals happen afterwards in
//! descending index order, and split children are appended last. Nothing is
//! spliced while it is being iterated.

use super::collision::check_collision;
use super::effects::Effect;
use super::entities::{Asteroid, Bullet, Ship};
use super::snapshot::AsteroidCounts;
use super::state::{GameMode, GameState};

/// Indices hit during one bullet pass, each listed once, in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulletHits {
    pub bullets: Vec<usize>,
    pub asteroids: Vec<usize>,
}

impl BulletHits {
    pub fn is_empty(&self) -> bool {
        self.asteroids.is_empty()
    }
}

/// Pairwise bullet/asteroid overlap test. A bullet may take out several
/// asteroids it overlaps this tick; each asteroid is reported once.
pub fn find_bullet_hits(bullets: &[Bullet], asteroids: &[Asteroid]) -> BulletHits {
    let mut hits = BulletHits::default();
    for (bi, bullet) in bullets.iter().enumerate() {
        for (ai, asteroid) in asteroids.iter().enumerate() {
            if !check_collision(bullet, asteroid) {
                continue;
            }
            if !hits.bullets.contains(&bi) {
                hits.bullets.push(bi);
            }
            if !hits.asteroids.contains(&ai) {
                hits.asteroids.push(ai);
            }
        }
    }
    hits
}

/// First asteroid overlapping the ship, if any
pub fn first_ship_hit(ship: &Ship, asteroids: &[Asteroid]) -> Option<usize> {
    asteroids.iter().position(|a| check_collision(ship, a))
}

/// Remove `indices` from `items`, highest index first
pub fn remove_indices<T>(items: &mut Vec<T>, indices: &[usize]) {
    let mut sorted = indices.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted.dedup();
    for i in sorted {
        if i < items.len() {
            items.remove(i);
        }
    }
}

/// Bullet-vs-asteroid pass: split, score, drop pickups. Returns how many
/// asteroids were destroyed.
pub fn resolve_bullet_hits(state: &mut GameState) -> usize {
    let hits = find_bullet_hits(&state.bullets, &state.asteroids);
    if hits.is_empty() {
        return 0;
    }

    let mut children = Vec::new();
    for &ai in &hits.asteroids {
        let asteroid = &state.asteroids[ai];
        let pos = asteroid.pos;
        let size = asteroid.size;
        children.extend(asteroid.split(&state.tuning, &mut state.rng));
        let drops = state.drops.spawn_pickups(pos, &state.tuning, &mut state.rng);
        state.pickups.extend(drops);
        state.score += state.tuning.score_per_asteroid;
        log::debug!("Asteroid {size:?} destroyed at {pos}");
    }
    let destroyed = hits.asteroids.len();
    let xp = state.tuning.xp_per_asteroid * destroyed as u64;

    remove_indices(&mut state.bullets, &hits.bullets);
    remove_indices(&mut state.asteroids, &hits.asteroids);
    state.asteroids.extend(children);

    state.grant_xp(xp);
    destroyed
}

/// Ship-vs-asteroid pass. Ignored while invulnerable; stops at the first
/// hit. The struck asteroid is removed without splitting.
pub fn resolve_ship_hit(state: &mut GameState) -> bool {
    if state.ship.destroyed || state.ship.is_invulnerable(state.time_ms) {
        return false;
    }
    let Some(index) = first_ship_hit(&state.ship, &state.asteroids) else {
        return false;
    };
    state.asteroids.remove(index);
    state.destroy_ship(true);
    true
}

/// Recount asteroids; in waves mode a fresh clear starts the banner and
/// arms the hyperspace countdown, whose expiry starts the jump.
pub fn update_stage_progress(state: &mut GameState, dt_ms: f64) {
    state.asteroid_counts = AsteroidCounts::tally(&state.asteroids);

    if state.mode == GameMode::Survival {
        state.stage_cleared = false;
        return;
    }

    if state.asteroid_counts.total() == 0 && !state.stage_cleared {
        state.stage_cleared = true;
        state.stage_clear.trigger();
        state.hyper_countdown.arm(state.tuning.hyper_jump_countdown_ms);
        log::info!("Stage {} cleared", state.stage);
    }

    if state.hyper_countdown.advance(dt_ms) && !state.hyperspace.is_active() {
        state.trigger_hyperspace();
    }
}
