//! Parallax starfield
//!
//! Brightness follows a bell curve (Box-Muller), so most stars are dim and a
//! few stand out. Stars sit on a field larger than the world and scroll at a
//! fraction of the camera motion.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::camera::Camera;
use crate::EPSILON;
use crate::consts::*;
use crate::render::{DrawContext, colors, with_alpha};
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    pub brightness: f32,
    pub size: f32,
    /// Fraction of camera motion this star follows (0.3..0.7)
    pub parallax: f32,
}

impl Star {
    /// Where the star appears in world space for a given camera center
    #[inline]
    pub fn apparent_position(&self, camera_pos: Vec2) -> Vec2 {
        self.pos - camera_pos * self.parallax
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Starfield {
    pub stars: Vec<Star>,
}

/// Standard normal sample. `u1` is floored so `ln(0)` never happens.
pub fn gaussian<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    let u1 = rng.random::<f32>().max(EPSILON);
    let u2 = rng.random::<f32>();
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

/// Size tier for a brightness
pub fn star_size(brightness: f32) -> f32 {
    if brightness > STAR_LARGE_THRESHOLD {
        2.0
    } else if brightness > STAR_MEDIUM_THRESHOLD {
        1.5
    } else {
        1.0
    }
}

impl Starfield {
    pub fn generate<R: Rng + ?Sized>(tuning: &Tuning, rng: &mut R) -> Self {
        let extent = Vec2::new(tuning.world_width, tuning.world_height) * tuning.star_field_spread;
        let stars = (0..tuning.star_count)
            .map(|_| {
                let brightness =
                    (0.5 + gaussian(rng) * 0.15).clamp(STAR_MIN_BRIGHTNESS, STAR_MAX_BRIGHTNESS);
                Star {
                    pos: Vec2::new(rng.random::<f32>() * extent.x, rng.random::<f32>() * extent.y),
                    brightness,
                    size: star_size(brightness),
                    parallax: tuning.min_parallax
                        + rng.random::<f32>() * (tuning.max_parallax - tuning.min_parallax),
                }
            })
            .collect();
        log::debug!("Generated starfield ({} stars)", tuning.star_count);
        Self { stars }
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// Draw visible stars as small squares. `brightness_scale` lets the
    /// hyperspace jump over-brighten the field.
    pub fn draw(&self, ctx: &mut dyn DrawContext, camera: &Camera, brightness_scale: f32) {
        let zoom = camera.zoom.max(EPSILON);
        for star in &self.stars {
            let world = star.apparent_position(camera.pos);
            if !camera.is_visible(world, star.size) {
                continue;
            }
            let s = star.size / zoom;
            let p = camera.world_to_screen(world);
            let quad = [p, p + Vec2::new(s, 0.0), p + Vec2::splat(s), p + Vec2::new(0.0, s)];
            let alpha = (star.brightness * 1.2 * brightness_scale).min(1.0);
            ctx.polygon(&quad, with_alpha(colors::STAR, alpha));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_generate_respects_ranges() {
        let tuning = Tuning {
            star_count: 500,
            ..Tuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(3);
        let field = Starfield::generate(&tuning, &mut rng);
        assert_eq!(field.len(), 500);
        for s in &field.stars {
            assert!((STAR_MIN_BRIGHTNESS..=STAR_MAX_BRIGHTNESS).contains(&s.brightness));
            assert!((tuning.min_parallax..=tuning.max_parallax).contains(&s.parallax));
            assert!(s.pos.x >= 0.0 && s.pos.x <= tuning.world_width * tuning.star_field_spread);
            assert_eq!(s.size, star_size(s.brightness));
        }
    }

    #[test]
    fn test_brightness_is_bell_shaped() {
        let tuning = Tuning {
            star_count: 2000,
            ..Tuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(11);
        let field = Starfield::generate(&tuning, &mut rng);
        let mean: f32 = field.stars.iter().map(|s| s.brightness).sum::<f32>() / field.len() as f32;
        assert!((mean - 0.5).abs() < 0.03, "mean brightness {mean}");
    }

    #[test]
    fn test_gaussian_is_finite() {
        let mut rng = Pcg32::seed_from_u64(0);
        assert!((0..10_000).all(|_| gaussian(&mut rng).is_finite()));
    }

    #[test]
    fn test_size_tiers() {
        assert_eq!(star_size(0.9), 2.0);
        assert_eq!(star_size(0.5), 1.5);
        assert_eq!(star_size(0.3), 1.0);
    }
}
