//! Level-up burst: white flash, radial multicolor particles, pulsing text

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

use super::particle::{Particle, advance_all};
use super::{Effect, progress};
use crate::consts::*;
use crate::from_angle;
use crate::render::{DrawContext, colors, with_alpha};
use crate::sim::camera::Camera;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelUpEffect {
    active: bool,
    flash: f32,
    flash_hold: u32,
    text_timer: u32,
    particles: Vec<Particle>,
    origin: Vec2,
    level: u32,
}

/// What a renderer needs to show the level-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelUpVisuals {
    pub level: u32,
    pub flash: f32,
    pub text: String,
    pub text_opacity: f32,
    pub particles: Vec<Particle>,
}

impl LevelUpEffect {
    pub fn new() -> Self {
        Self::default()
    }

    /// Burst `count` particles from `origin` for reaching `level`
    pub fn trigger<R: Rng + ?Sized>(&mut self, origin: Vec2, level: u32, count: usize, rng: &mut R) {
        self.particles = (0..count)
            .map(|_| {
                let angle = rng.random::<f32>() * TAU;
                let speed = (0.5 + rng.random::<f32>()) * LEVELUP_PARTICLE_SPEED;
                let size = 1.5 + rng.random::<f32>() * 2.5;
                let color = colors::LEVELUP_PALETTE[rng.random_range(0..colors::LEVELUP_PALETTE.len())];
                Particle::dot(origin, from_angle(angle) * speed, LEVELUP_PARTICLE_LIFE as f32, size, color)
            })
            .collect();
        self.active = true;
        self.flash = LEVELUP_FLASH;
        self.flash_hold = LEVELUP_FLASH_HOLD;
        self.text_timer = LEVELUP_TEXT_TIME;
        self.origin = origin;
        self.level = level;
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn flash(&self) -> f32 {
        self.flash
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Text fades over its lifetime while pulsing
    pub fn text_opacity(&self) -> f32 {
        if self.text_timer == 0 {
            return 0.0;
        }
        let base = 1.0 - progress(LEVELUP_TEXT_TIME - self.text_timer.min(LEVELUP_TEXT_TIME), LEVELUP_TEXT_TIME);
        let pulse = 0.6 + 0.4 * ((1.0 - base) * PI * 6.0).sin().abs();
        base * pulse
    }

    pub fn visuals(&self) -> Option<LevelUpVisuals> {
        self.active.then(|| LevelUpVisuals {
            level: self.level,
            flash: self.flash,
            text: format!("LEVEL {}", self.level),
            text_opacity: self.text_opacity(),
            particles: self.particles.clone(),
        })
    }
}

impl Effect for LevelUpEffect {
    fn is_active(&self) -> bool {
        self.active
    }

    fn update(&mut self) {
        if !self.active {
            return;
        }
        advance_all(&mut self.particles, 0.98);

        if self.flash_hold > 0 {
            self.flash_hold -= 1;
        } else {
            self.flash = (self.flash - LEVELUP_FLASH_DECAY).max(0.0);
        }
        self.text_timer = self.text_timer.saturating_sub(1);

        if self.particles.is_empty() && self.flash <= 0.0 && self.text_timer == 0 {
            self.active = false;
        }
    }

    fn draw(&self, ctx: &mut dyn DrawContext, camera: &Camera) {
        if !self.active {
            return;
        }
        for p in &self.particles {
            p.draw(ctx, camera);
        }
        if self.flash > 0.0 {
            ctx.fill_screen(with_alpha(colors::WHITE, self.flash));
        }
        if self.text_timer > 0 {
            let center = ctx.viewport() / 2.0;
            ctx.text(
                &format!("LEVEL {}", self.level),
                center,
                64.0,
                with_alpha(colors::WHITE, self.text_opacity()),
            );
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::DrawList;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn triggered() -> LevelUpEffect {
        let mut fx = LevelUpEffect::new();
        let mut rng = Pcg32::seed_from_u64(1);
        fx.trigger(Vec2::new(100.0, 100.0), 2, LEVELUP_PARTICLES, &mut rng);
        fx
    }

    #[test]
    fn test_trigger_spawns_burst() {
        let fx = triggered();
        assert!(fx.is_active());
        assert_eq!(fx.particle_count(), LEVELUP_PARTICLES);
        assert_eq!(fx.flash(), LEVELUP_FLASH);
        assert_eq!(fx.visuals().map(|v| v.text), Some("LEVEL 2".to_string()));
    }

    #[test]
    fn test_flash_holds_then_decays() {
        let mut fx = triggered();
        fx.step(LEVELUP_FLASH_HOLD);
        assert_eq!(fx.flash(), LEVELUP_FLASH);
        fx.update();
        assert!((fx.flash() - (LEVELUP_FLASH - LEVELUP_FLASH_DECAY)).abs() < 1e-6);
    }

    #[test]
    fn test_deactivates_by_itself() {
        let mut fx = triggered();
        fx.step(LEVELUP_PARTICLE_LIFE);
        assert_eq!(fx.particle_count(), 0);
        assert!(fx.is_active());
        fx.step(LEVELUP_TEXT_TIME);
        assert!(!fx.is_active());
        assert!(fx.visuals().is_none());
    }

    #[test]
    fn test_inactive_is_noop() {
        let mut fx = LevelUpEffect::new();
        fx.update();
        let mut list = DrawList::new(Vec2::new(800.0, 600.0));
        fx.draw(&mut list, &Camera::new(&crate::Tuning::default()));
        assert!(list.is_empty());
        assert!(!fx.is_active());
    }

    #[test]
    fn test_retrigger_restarts() {
        let mut fx = triggered();
        fx.step(30);
        let mut rng = Pcg32::seed_from_u64(2);
        fx.trigger(Vec2::ZERO, 3, 10, &mut rng);
        assert_eq!(fx.particle_count(), 10);
        assert_eq!(fx.flash(), LEVELUP_FLASH);
        assert_eq!(fx.level(), 3);
    }
}
