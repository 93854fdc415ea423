//! Survival-mode asteroid spawner
//!
//! One large asteroid every interval, entering from a random world edge and
//! aimed at the ship. Speed ramps smoothly toward a ceiling:
//! `1 + (ceiling - 1) * (1 - e^(-ramp * spawn_count))`.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entities::{Asteroid, AsteroidSize};
use crate::{from_angle, heading_to};
use crate::tuning::Tuning;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurvivalSpawner {
    pub spawn_count: u32,
    /// Simulation time of the next spawn
    pub next_spawn_ms: f64,
}

/// Exponential-approach speed multiplier after `spawn_count` spawns
pub fn speed_multiplier(spawn_count: u32, ceiling: f32, ramp_rate: f32) -> f32 {
    1.0 + (ceiling - 1.0) * (1.0 - (-ramp_rate * spawn_count as f32).exp())
}

/// Random point on the world border
pub fn random_edge_point<R: Rng + ?Sized>(world: Vec2, rng: &mut R) -> Vec2 {
    let along = rng.random::<f32>();
    match rng.random_range(0..4) {
        0 => Vec2::new(along * world.x, 0.0),
        1 => Vec2::new(world.x, along * world.y),
        2 => Vec2::new(along * world.x, world.y),
        _ => Vec2::new(0.0, along * world.y),
    }
}

impl SurvivalSpawner {
    /// First spawn one interval after `now_ms`
    pub fn new(now_ms: f64, tuning: &Tuning) -> Self {
        Self {
            spawn_count: 0,
            next_spawn_ms: now_ms + tuning.survival_spawn_interval_ms,
        }
    }

    pub fn current_multiplier(&self, tuning: &Tuning) -> f32 {
        speed_multiplier(self.spawn_count, tuning.survival_speed_ceiling, tuning.survival_ramp_rate)
    }

    /// Spawn an asteroid if the interval has elapsed
    pub fn poll<R: Rng + ?Sized>(
        &mut self,
        now_ms: f64,
        ship_pos: Vec2,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Option<Asteroid> {
        if now_ms < self.next_spawn_ms {
            return None;
        }
        let world = Vec2::new(tuning.world_width, tuning.world_height);
        let pos = random_edge_point(world, rng);
        let multiplier = self.current_multiplier(tuning);

        let mut asteroid = Asteroid::new(pos, AsteroidSize::Large, None, tuning, rng);
        let heading = heading_to(pos, ship_pos, 0.0);
        asteroid.vel = from_angle(heading) * tuning.asteroid_speed * multiplier;

        self.spawn_count += 1;
        self.next_spawn_ms = now_ms + tuning.survival_spawn_interval_ms;
        log::debug!("Survival spawn #{} at {pos} (x{multiplier:.2})", self.spawn_count);
        Some(asteroid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_multiplier_starts_at_one_and_approaches_ceiling() {
        assert_eq!(speed_multiplier(0, 3.0, 0.05), 1.0);
        let late = speed_multiplier(500, 3.0, 0.05);
        assert!((late - 3.0).abs() < 1e-3);
    }

    #[test]
    fn test_spawns_on_interval_aimed_at_ship() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(21);
        let mut spawner = SurvivalSpawner::new(0.0, &tuning);
        let ship = Vec2::new(4000.0, 2750.0);

        assert!(spawner.poll(1999.0, ship, &tuning, &mut rng).is_none());
        let a = spawner.poll(2000.0, ship, &tuning, &mut rng);
        let Some(a) = a else {
            panic!("expected a spawn at the interval");
        };
        assert_eq!(a.size, AsteroidSize::Large);
        let to_ship = (ship - a.pos).normalize();
        assert!(a.vel.normalize().dot(to_ship) > 0.999);
        assert_eq!(spawner.spawn_count, 1);
        assert!(spawner.poll(2001.0, ship, &tuning, &mut rng).is_none());
    }

    #[test]
    fn test_edge_points_lie_on_border() {
        let world = Vec2::new(100.0, 50.0);
        let mut rng = Pcg32::seed_from_u64(2);
        for _ in 0..100 {
            let p = random_edge_point(world, &mut rng);
            assert!(p.x == 0.0 || p.x == world.x || p.y == 0.0 || p.y == world.y);
        }
    }

    proptest! {
        #[test]
        fn prop_multiplier_is_monotonic_and_bounded(n in 0u32..1000) {
            let a = speed_multiplier(n, 3.0, 0.05);
            let b = speed_multiplier(n + 1, 3.0, 0.05);
            prop_assert!(b >= a);
            prop_assert!((1.0..=3.0).contains(&a));
        }
    }
}
