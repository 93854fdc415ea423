//! Ship, asteroids, bullets and pickups
//!
//! Each entity advances its own kinematics in `update()`. World wrapping is
//! applied afterwards by the tick, so entities stay physics-pure.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

use super::camera::Camera;
use super::collision::Collider;
use crate::render::{DrawContext, colors, with_alpha};
use crate::tuning::Tuning;
use crate::{EPSILON, from_angle, heading_to};

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading (radians), recomputed from the aim target every tick
    pub angle: f32,
    pub radius: f32,
    /// Simulation time (ms) until which collisions are ignored
    pub invulnerable_until_ms: f64,
    /// Hidden while the death explosion plays
    pub destroyed: bool,
}

impl Ship {
    pub fn new(pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            angle: 0.0,
            radius: tuning.ship_radius,
            invulnerable_until_ms: 0.0,
            destroyed: false,
        }
    }

    /// Point the ship at a world-space aim target
    pub fn aim_at(&mut self, target: Vec2) {
        self.angle = heading_to(self.pos, target, self.angle);
    }

    /// Thrust along heading, integrate, then brake or apply ambient friction
    pub fn update(&mut self, thrust: bool, brake: bool, tuning: &Tuning) -> &mut Self {
        if thrust {
            self.vel += from_angle(self.angle) * tuning.ship_thrust;
        }
        self.pos += self.vel;
        if brake {
            self.vel *= tuning.ship_brake;
        } else {
            self.vel *= tuning.ship_friction;
        }
        self
    }

    #[inline]
    pub fn is_invulnerable(&self, now_ms: f64) -> bool {
        now_ms < self.invulnerable_until_ms
    }

    pub fn grant_invulnerability(&mut self, now_ms: f64, duration_ms: f64) {
        self.invulnerable_until_ms = now_ms + duration_ms;
    }

    /// Put the ship back at `pos`, at rest
    pub fn reset_kinematics(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.destroyed = false;
    }

    /// Triangle outline in world space
    pub fn outline(&self) -> [Vec2; 3] {
        let s = self.radius;
        let rot = from_angle(self.angle);
        [
            Vec2::new(s, 0.0),
            Vec2::new(-s / 2.0, -s / 2.0),
            Vec2::new(-s / 2.0, s / 2.0),
        ]
        .map(|p| self.pos + rot.rotate(p))
    }

    pub fn draw(&self, ctx: &mut dyn DrawContext, camera: &Camera, now_ms: f64, opacity: f32) {
        if self.destroyed || !camera.is_visible(self.pos, self.radius) {
            return;
        }
        // Blink while invulnerable
        let blink = if self.is_invulnerable(now_ms) && now_ms.rem_euclid(200.0) < 100.0 {
            0.3
        } else {
            1.0
        };
        let points = self.outline().map(|p| camera.world_to_screen(p));
        ctx.polygon(&points, with_alpha(colors::SHIP, opacity * blink));
    }
}

impl Collider for Ship {
    fn position(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

/// Asteroid size class; strictly decreases on split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AsteroidSize {
    Large,
    Medium,
    Small,
}

impl AsteroidSize {
    pub fn radius(self, tuning: &Tuning) -> f32 {
        match self {
            AsteroidSize::Large => tuning.asteroid_radius_large,
            AsteroidSize::Medium => tuning.asteroid_radius_medium,
            AsteroidSize::Small => tuning.asteroid_radius_small,
        }
    }

    /// Size of the two children produced by a split, if any
    pub fn child(self) -> Option<AsteroidSize> {
        match self {
            AsteroidSize::Large => Some(AsteroidSize::Medium),
            AsteroidSize::Medium => Some(AsteroidSize::Small),
            AsteroidSize::Small => None,
        }
    }
}

/// A tumbling rock with a fixed random silhouette
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: AsteroidSize,
    pub radius: f32,
    pub angle: f32,
    pub rotation_speed: f32,
    /// Per-vertex radius multipliers (0.7..1.3), generated once
    pub shape: Vec<f32>,
}

impl Asteroid {
    /// Create an asteroid. With a parent velocity, the child keeps the
    /// parent's heading within +/-90 degrees and its speed within the split
    /// variance band; otherwise velocity is random.
    pub fn new<R: Rng + ?Sized>(
        pos: Vec2,
        size: AsteroidSize,
        parent_vel: Option<Vec2>,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Self {
        let vel = match parent_vel {
            Some(parent) => {
                let variance = tuning.asteroid_split_speed_variance;
                let speed_scale = 1.0 - variance / 2.0 + rng.random::<f32>() * variance;
                let angle_variation = (rng.random::<f32>() - 0.5) * PI;
                let parent_angle = parent.y.atan2(parent.x);
                from_angle(parent_angle + angle_variation) * parent.length() * speed_scale
            }
            None => Vec2::new(
                (rng.random::<f32>() - 0.5) * tuning.asteroid_speed * 2.0,
                (rng.random::<f32>() - 0.5) * tuning.asteroid_speed * 2.0,
            ),
        };

        let points = tuning.asteroid_base_points + rng.random_range(0..tuning.asteroid_point_range.max(1));
        let shape = (0..points).map(|_| 0.7 + rng.random::<f32>() * 0.6).collect();

        Self {
            pos,
            vel,
            size,
            radius: size.radius(tuning),
            angle: rng.random::<f32>() * TAU,
            rotation_speed: (rng.random::<f32>() - 0.5) * tuning.asteroid_rotation_variance,
            shape,
        }
    }

    pub fn update(&mut self) -> &mut Self {
        self.pos += self.vel;
        self.angle += self.rotation_speed;
        self
    }

    /// Two children one size down, or nothing for small rocks
    pub fn split<R: Rng + ?Sized>(&self, tuning: &Tuning, rng: &mut R) -> Vec<Asteroid> {
        match self.size.child() {
            Some(child) => (0..2)
                .map(|_| Asteroid::new(self.pos, child, Some(self.vel), tuning, rng))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Polygon outline in world space
    pub fn outline(&self) -> impl Iterator<Item = Vec2> + '_ {
        let n = self.shape.len() as f32;
        self.shape.iter().enumerate().map(move |(i, k)| {
            let theta = self.angle + (i as f32 / n) * TAU;
            self.pos + from_angle(theta) * self.radius * k
        })
    }

    pub fn draw(&self, ctx: &mut dyn DrawContext, camera: &Camera, opacity: f32) {
        if !camera.is_visible(self.pos, self.radius) {
            return;
        }
        let points: Vec<Vec2> = self.outline().map(|p| camera.world_to_screen(p)).collect();
        ctx.polygon(&points, with_alpha(colors::ASTEROID, opacity));
    }
}

impl Collider for Asteroid {
    fn position(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

/// A projectile bounded by both lifetime and range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Frames left before expiry
    pub lifetime: u32,
    pub distance_traveled: f32,
    pub range: f32,
}

impl Bullet {
    /// Fire from `pos` along heading `angle`
    pub fn new(pos: Vec2, angle: f32, tuning: &Tuning) -> Self {
        Self {
            pos,
            vel: from_angle(angle) * tuning.bullet_speed,
            radius: tuning.bullet_radius,
            lifetime: tuning.bullet_lifetime,
            distance_traveled: 0.0,
            range: tuning.bullet_range,
        }
    }

    pub fn update(&mut self) -> &mut Self {
        self.pos += self.vel;
        self.distance_traveled += self.vel.length();
        self.lifetime = self.lifetime.saturating_sub(1);
        self
    }

    /// Out of frames OR out of range
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.lifetime == 0 || self.distance_traveled >= self.range
    }

    pub fn draw(&self, ctx: &mut dyn DrawContext, camera: &Camera) {
        if !camera.is_visible(self.pos, self.radius) {
            return;
        }
        let r = self.radius / camera.zoom.max(EPSILON);
        ctx.circle(camera.world_to_screen(self.pos), r, colors::BULLET);
    }
}

impl Collider for Bullet {
    fn position(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    Xp,
    Currency,
}

/// Result of advancing a pickup one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupStatus {
    Active,
    Collected,
    Expired,
}

/// A collectible orb dropped by a destroyed asteroid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub kind: PickupKind,
    pub value: u64,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Frames alive
    pub age: u32,
    pub collected: bool,
    /// Streaking away during a hyperspace jump (ignores wrap)
    pub hyper: bool,
    pub hyper_ticks: u32,
    pub radius: f32,
}

impl Pickup {
    /// Spawn with a small outward pop in a random direction
    pub fn new<R: Rng + ?Sized>(kind: PickupKind, value: u64, pos: Vec2, tuning: &Tuning, rng: &mut R) -> Self {
        let angle = rng.random::<f32>() * TAU;
        let speed = (0.5 + rng.random::<f32>() * 0.5) * tuning.pickup_pop_speed;
        Self {
            kind,
            value,
            pos,
            vel: from_angle(angle) * speed,
            age: 0,
            collected: false,
            hyper: false,
            hyper_ticks: 0,
            radius: match kind {
                PickupKind::Xp => 8.0,
                PickupKind::Currency => 9.0,
            },
        }
    }

    /// Drift with drag; home toward the ship inside the attraction radius;
    /// collect inside the collection radius.
    pub fn update(&mut self, ship: Option<Vec2>, tuning: &Tuning) -> PickupStatus {
        self.age += 1;
        self.pos += self.vel;

        if self.hyper {
            self.hyper_ticks += 1;
            self.vel *= tuning.pickup_hyper_accel;
            if self.hyper_ticks > tuning.pickup_hyper_duration {
                return PickupStatus::Expired;
            }
        } else {
            self.vel *= tuning.pickup_drag;
        }

        if let Some(ship) = ship {
            let delta = ship - self.pos;
            let dist = delta.length().max(EPSILON);

            if dist < tuning.pickup_attract_radius {
                let strength = tuning.pickup_attract_strength * (1.0 - dist / tuning.pickup_attract_radius);
                self.vel += delta / dist * strength;
                let speed = self.vel.length();
                if speed > tuning.pickup_max_speed {
                    self.vel *= tuning.pickup_max_speed / speed;
                }
            }

            if dist < tuning.pickup_collect_radius {
                self.collected = true;
                return PickupStatus::Collected;
            }
        }

        if self.age > tuning.pickup_lifetime {
            return PickupStatus::Expired;
        }
        PickupStatus::Active
    }

    /// Blast opposite the ship heading so the orb streaks off-screen
    pub fn start_hyper_streak(&mut self, ship_angle: f32, tuning: &Tuning) {
        self.hyper = true;
        self.hyper_ticks = 0;
        self.vel = -from_angle(ship_angle) * tuning.pickup_hyper_speed;
    }

    pub fn draw(&self, ctx: &mut dyn DrawContext, camera: &Camera) {
        if !camera.is_visible(self.pos, self.radius) {
            return;
        }
        let pulse = 1.0 + (self.age as f32 * 0.2).sin() * 0.15;
        let r = self.radius * pulse / camera.zoom.max(EPSILON);
        let color = match self.kind {
            PickupKind::Xp => colors::PICKUP_XP,
            PickupKind::Currency => colors::PICKUP_CURRENCY,
        };
        let center = camera.world_to_screen(self.pos);
        ctx.circle(center, r, with_alpha(color, 0.35));
        ctx.circle(center, r * 0.45, color);
    }
}

impl Collider for Pickup {
    fn position(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}
