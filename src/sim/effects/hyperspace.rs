//! Hyperspace jump between stages
//!
//! brighten -> streaking -> flash -> fading -> ship fade-in -> asteroids
//! fade-in -> text -> waiting. The waiting phase holds until [`confirm`],
//! which hands back the next stage to start.
//!
//! [`confirm`]: HyperspaceJumpEffect::confirm

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Effect, progress};
use crate::consts::*;
use crate::render::{DrawContext, colors, with_alpha};
use crate::sim::camera::Camera;
use crate::sim::starfield::{Star, star_size};
use crate::tuning::Tuning;
use crate::{EPSILON, from_angle};

/// Peak streak speed multiplier at the end of the streaking phase
const MAX_STREAK_SPEED: f32 = 50.0;
/// Star brightness multiplier reached at the end of the brighten phase
const MAX_STAR_BRIGHTNESS: f32 = 4.0;
/// Frames the flash stays fully white before decaying
const FLASH_PEAK_FRAMES: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HyperspacePhase {
    #[default]
    Inactive,
    Brighten,
    Streaking,
    Flash,
    Fading,
    ShipFadeIn,
    AsteroidsFadeIn,
    Text,
    Waiting,
}

impl HyperspacePhase {
    fn duration(self) -> u32 {
        match self {
            HyperspacePhase::Brighten => HYPERSPACE_BRIGHTEN_TIME,
            HyperspacePhase::Streaking => HYPERSPACE_STREAK_TIME,
            HyperspacePhase::Flash => HYPERSPACE_FLASH_TIME,
            HyperspacePhase::Fading => HYPERSPACE_FADE_TIME,
            HyperspacePhase::ShipFadeIn => HYPERSPACE_SHIP_FADE_IN_TIME,
            HyperspacePhase::AsteroidsFadeIn => HYPERSPACE_ASTEROIDS_FADE_IN_TIME,
            HyperspacePhase::Text => HYPERSPACE_TEXT_TIME,
            HyperspacePhase::Inactive | HyperspacePhase::Waiting => 0,
        }
    }

    fn next(self) -> Self {
        match self {
            HyperspacePhase::Brighten => HyperspacePhase::Streaking,
            HyperspacePhase::Streaking => HyperspacePhase::Flash,
            HyperspacePhase::Flash => HyperspacePhase::Fading,
            HyperspacePhase::Fading => HyperspacePhase::ShipFadeIn,
            HyperspacePhase::ShipFadeIn => HyperspacePhase::AsteroidsFadeIn,
            HyperspacePhase::AsteroidsFadeIn => HyperspacePhase::Text,
            HyperspacePhase::Text => HyperspacePhase::Waiting,
            other => other,
        }
    }
}

/// The stage to begin once the jump is confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageStart {
    pub stage: u32,
    pub asteroid_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HyperspaceJumpEffect {
    phase: HyperspacePhase,
    timer: u32,
    ship_angle: f32,
    next: StageStart,
    star_brightness: f32,
    streak_speed: f32,
    ship_opacity: f32,
    asteroid_opacity: f32,
    flash_opacity: f32,
    /// Black overlay, ramped in during fading and held until confirm
    fade_opacity: f32,
    text_opacity: f32,
    text_scale: f32,
    /// Base speed per starfield star (indexed like the field)
    star_speeds: Vec<f32>,
    /// Transient stars owned by the jump, with their base speeds
    extra_stars: Vec<(Star, f32)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HyperspaceVisuals {
    pub phase: HyperspacePhase,
    pub next_stage: u32,
    pub star_brightness: f32,
    pub streak_speed: f32,
    pub ship_opacity: f32,
    pub asteroid_opacity: f32,
    pub flash_opacity: f32,
    pub fade_opacity: f32,
    pub text_opacity: f32,
    pub text_scale: f32,
    pub extra_stars: usize,
}

impl Default for HyperspaceJumpEffect {
    fn default() -> Self {
        Self {
            phase: HyperspacePhase::Inactive,
            timer: 0,
            ship_angle: 0.0,
            next: StageStart {
                stage: 1,
                asteroid_count: INITIAL_ASTEROID_COUNT,
            },
            star_brightness: 1.0,
            streak_speed: 0.0,
            ship_opacity: 1.0,
            asteroid_opacity: 1.0,
            flash_opacity: 0.0,
            fade_opacity: 0.0,
            text_opacity: 0.0,
            text_scale: 0.0,
            star_speeds: Vec::new(),
            extra_stars: Vec::new(),
        }
    }
}

/// Next stage's asteroid quota: `ceil(count * growth)`
pub fn next_asteroid_count(count: u32, growth: f64) -> u32 {
    (count as f64 * growth).ceil() as u32
}

impl HyperspaceJumpEffect {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a jump away from `ship_angle`, leaving `stage` with a quota of
    /// `asteroid_count`. Call [`seed_stars`](Self::seed_stars) afterwards so
    /// the field has streak speeds.
    pub fn trigger(&mut self, ship_angle: f32, stage: u32, asteroid_count: u32, growth: f64) {
        *self = Self {
            phase: HyperspacePhase::Brighten,
            ship_angle,
            next: StageStart {
                stage: stage + 1,
                asteroid_count: next_asteroid_count(asteroid_count, growth),
            },
            ..Self::default()
        };
    }

    /// Assign per-star base speeds for the live field and scatter
    /// `hyperspace_extra_star_factor * stars.len()` transient stars across
    /// the current view.
    pub fn seed_stars<R: Rng + ?Sized>(&mut self, stars: &[Star], camera: &Camera, tuning: &Tuning, rng: &mut R) {
        self.star_speeds = stars.iter().map(|_| 2.0 + rng.random::<f32>() * 5.0).collect();

        let count = (stars.len() as f32 * tuning.hyperspace_extra_star_factor.max(0.0)) as usize;
        let (min_parallax, max_parallax) = (tuning.min_parallax, tuning.max_parallax);
        let view = camera.effective_viewport() * 1.5;
        self.extra_stars = (0..count)
            .map(|_| {
                let brightness = 0.4 + rng.random::<f32>() * 0.6;
                let parallax = min_parallax + rng.random::<f32>() * (max_parallax - min_parallax);
                let offset = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * view;
                // Place so the apparent (parallax) position lands in view
                let pos = camera.pos + offset + camera.pos * parallax;
                let star = Star {
                    pos,
                    brightness,
                    size: star_size(brightness),
                    parallax,
                };
                (star, 2.0 + rng.random::<f32>() * 5.0)
            })
            .collect();
    }

    /// Move the live starfield along the streak direction
    pub fn update_stars(&self, stars: &mut [Star]) {
        if self.phase != HyperspacePhase::Streaking {
            return;
        }
        for (star, speed) in stars.iter_mut().zip(&self.star_speeds) {
            star.pos += self.star_velocity(star, *speed);
        }
    }

    fn star_velocity(&self, star: &Star, base_speed: f32) -> Vec2 {
        -from_angle(self.ship_angle) * base_speed * self.streak_speed * (1.0 - star.parallax * 0.5)
    }

    /// Resolve the waiting phase: deactivate and return the stage to start
    pub fn confirm(&mut self) -> Option<StageStart> {
        if self.phase != HyperspacePhase::Waiting {
            return None;
        }
        let next = self.next;
        self.reset();
        log::info!("Hyperspace confirmed -> stage {}", next.stage);
        Some(next)
    }

    /// [`confirm`](Self::confirm), handing the stage to `on_stage_start`
    pub fn confirm_with<F: FnOnce(StageStart)>(&mut self, on_stage_start: F) -> bool {
        match self.confirm() {
            Some(next) => {
                on_stage_start(next);
                true
            }
            None => false,
        }
    }

    pub fn phase(&self) -> HyperspacePhase {
        self.phase
    }

    pub fn is_waiting(&self) -> bool {
        self.phase == HyperspacePhase::Waiting
    }

    /// Ship input is suppressed while the jump plays
    pub fn blocks_input(&self) -> bool {
        self.is_active() && !self.is_waiting()
    }

    pub fn is_streaking(&self) -> bool {
        self.phase == HyperspacePhase::Streaking
    }

    pub fn next_stage(&self) -> StageStart {
        self.next
    }

    pub fn star_brightness(&self) -> f32 {
        self.star_brightness
    }

    pub fn ship_opacity(&self) -> f32 {
        if self.is_active() { self.ship_opacity } else { 1.0 }
    }

    pub fn asteroid_opacity(&self) -> f32 {
        if self.is_active() { self.asteroid_opacity } else { 1.0 }
    }

    pub fn extra_star_count(&self) -> usize {
        self.extra_stars.len()
    }

    pub fn visuals(&self) -> Option<HyperspaceVisuals> {
        self.is_active().then_some(HyperspaceVisuals {
            phase: self.phase,
            next_stage: self.next.stage,
            star_brightness: self.star_brightness,
            streak_speed: self.streak_speed,
            ship_opacity: self.ship_opacity,
            asteroid_opacity: self.asteroid_opacity,
            flash_opacity: self.flash_opacity,
            fade_opacity: self.fade_opacity,
            text_opacity: self.text_opacity,
            text_scale: self.text_scale,
            extra_stars: self.extra_stars.len(),
        })
    }

    /// Draw stars as streaks trailing their motion
    pub fn draw_streaks(&self, ctx: &mut dyn DrawContext, camera: &Camera, stars: &[Star]) {
        if !self.is_streaking() {
            return;
        }
        let speeds = self.star_speeds.iter().copied();
        let field = stars.iter().zip(speeds);
        let extras = self.extra_stars.iter().map(|(s, v)| (s, *v));
        for (star, speed) in field.chain(extras) {
            let world = star.apparent_position(camera.pos);
            let vel = self.star_velocity(star, speed);
            let tail = vel * 2.0;
            if !camera.is_visible(world, tail.length()) {
                continue;
            }
            let zoom = camera.zoom.max(EPSILON);
            let head = camera.world_to_screen(world);
            let alpha = (star.brightness * self.star_brightness).min(1.0);
            ctx.line(
                head,
                head - tail / zoom,
                star.size / zoom,
                with_alpha(colors::STAR_STREAK, alpha),
            );
        }
    }

    fn enter(&mut self, phase: HyperspacePhase) {
        self.phase = phase;
        self.timer = 0;
    }
}

impl Effect for HyperspaceJumpEffect {
    fn is_active(&self) -> bool {
        self.phase != HyperspacePhase::Inactive
    }

    fn update(&mut self) {
        if !self.is_active() || self.is_waiting() {
            return;
        }
        self.timer += 1;
        let t = progress(self.timer, self.phase.duration());

        match self.phase {
            HyperspacePhase::Brighten => {
                self.star_brightness = 1.0 + (MAX_STAR_BRIGHTNESS - 1.0) * t;
            }
            HyperspacePhase::Streaking => {
                self.streak_speed = t * t * MAX_STREAK_SPEED;
                // Ship and asteroids fade out over the second half
                let half = HYPERSPACE_STREAK_TIME / 2;
                let fade = 1.0 - progress(self.timer.saturating_sub(half), HYPERSPACE_STREAK_TIME - half);
                self.ship_opacity = fade;
                self.asteroid_opacity = fade;
                for (star, speed) in self.extra_stars.iter_mut() {
                    let vel = -from_angle(self.ship_angle)
                        * *speed
                        * self.streak_speed
                        * (1.0 - star.parallax * 0.5);
                    star.pos += vel;
                }
            }
            HyperspacePhase::Flash => {
                self.streak_speed = 0.0;
                self.ship_opacity = 0.0;
                self.asteroid_opacity = 0.0;
                self.flash_opacity = if self.timer <= FLASH_PEAK_FRAMES {
                    1.0
                } else {
                    1.0 - progress(
                        self.timer - FLASH_PEAK_FRAMES,
                        HYPERSPACE_FLASH_TIME - FLASH_PEAK_FRAMES,
                    )
                };
            }
            HyperspacePhase::Fading => {
                self.flash_opacity = 0.0;
                self.fade_opacity = t;
                self.extra_stars.clear();
                self.star_brightness = MAX_STAR_BRIGHTNESS - (MAX_STAR_BRIGHTNESS - 1.0) * t;
            }
            HyperspacePhase::ShipFadeIn => {
                self.star_brightness = 1.0;
                self.ship_opacity = t;
            }
            HyperspacePhase::AsteroidsFadeIn => {
                self.asteroid_opacity = t;
            }
            HyperspacePhase::Text => {
                self.text_opacity = t;
                self.text_scale = if t < 0.5 {
                    0.5 + t
                } else {
                    1.0 + 0.2 * (1.0 - (t - 0.5) * 2.0)
                };
            }
            HyperspacePhase::Inactive | HyperspacePhase::Waiting => {}
        }

        if self.timer >= self.phase.duration() {
            if self.phase == HyperspacePhase::Text {
                self.text_scale = 1.0;
            }
            let next = self.phase.next();
            log::debug!("Hyperspace {:?} -> {:?}", self.phase, next);
            self.enter(next);
        }
    }

    fn draw(&self, ctx: &mut dyn DrawContext, _camera: &Camera) {
        if !self.is_active() {
            return;
        }
        if self.flash_opacity > 0.0 {
            ctx.fill_screen(with_alpha(colors::WHITE, self.flash_opacity));
        }
        if self.fade_opacity > 0.0 {
            ctx.fill_screen(with_alpha(colors::BLACK, self.fade_opacity));
        }
        if matches!(self.phase, HyperspacePhase::Text | HyperspacePhase::Waiting) && self.text_opacity > 0.0 {
            let center = ctx.viewport() / 2.0;
            let title = format!("STAGE {}", self.next.stage);
            let size = 72.0 * self.text_scale;
            ctx.text(&title, center - Vec2::new(0.0, 20.0), size, with_alpha(colors::HYPERSPACE_CYAN, self.text_opacity));
            ctx.text(&title, center - Vec2::new(0.0, 20.0), size, with_alpha(colors::WHITE, self.text_opacity));
            ctx.text("click to start", center + Vec2::new(0.0, 40.0), 28.0, with_alpha(colors::SUBTITLE, self.text_opacity));
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
