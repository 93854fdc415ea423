//! Backend-agnostic drawing
//!
//! The simulation never talks to a GPU or canvas. Entities and effects draw
//! through [`DrawContext`], in screen space, after projecting through the
//! [`Camera`](crate::sim::Camera). [`DrawList`] records the calls so any
//! backend (or a test) can replay them.

pub mod draw_list;
mod scene;

pub use draw_list::{DrawCommand, DrawList};

use glam::Vec2;

/// Linear RGBA color, components in 0..=1
pub type Rgba = [f32; 4];

/// Screen-space drawing sink
pub trait DrawContext {
    /// Size of the render target in pixels
    fn viewport(&self) -> Vec2;
    /// Closed outline through `points`
    fn polygon(&mut self, points: &[Vec2], color: Rgba);
    /// Filled circle
    fn circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    /// Line segment
    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);
    /// Centered text
    fn text(&mut self, text: &str, at: Vec2, size: f32, color: Rgba);
    /// Full-screen overlay
    fn fill_screen(&mut self, color: Rgba);
}

/// Multiply a color's alpha
#[inline]
pub fn with_alpha(color: Rgba, alpha: f32) -> Rgba {
    [color[0], color[1], color[2], color[3] * alpha.clamp(0.0, 1.0)]
}

/// Colors for game elements
pub mod colors {
    use super::Rgba;

    pub const WHITE: Rgba = [1.0, 1.0, 1.0, 1.0];
    pub const BLACK: Rgba = [0.0, 0.0, 0.0, 1.0];
    pub const SHIP: Rgba = WHITE;
    pub const ASTEROID: Rgba = WHITE;
    pub const BULLET: Rgba = WHITE;
    pub const STAR: Rgba = WHITE;
    pub const STAR_STREAK: Rgba = [0.78, 0.9, 1.0, 1.0];
    pub const CROSSHAIR: Rgba = [1.0, 1.0, 1.0, 0.8];
    pub const PICKUP_XP: Rgba = [0.61, 0.94, 0.43, 0.95];
    pub const PICKUP_CURRENCY: Rgba = [0.47, 0.78, 1.0, 0.95];
    pub const STAGE_CLEAR_GOLD: Rgba = [1.0, 0.84, 0.0, 1.0];
    pub const HYPERSPACE_CYAN: Rgba = [0.0, 1.0, 1.0, 1.0];
    pub const SUBTITLE: Rgba = [1.0, 1.0, 1.0, 0.8];

    /// Level-up burst palette (gold, red, green, sky, white)
    pub const LEVELUP_PALETTE: [Rgba; 5] = [
        [1.0, 0.85, 0.4, 1.0],
        [1.0, 0.23, 0.19, 1.0],
        [0.22, 0.78, 0.22, 1.0],
        [0.4, 0.8, 1.0, 1.0],
        WHITE,
    ];

    /// Death explosion palette (red through yellow to white)
    pub const EXPLOSION_PALETTE: [Rgba; 5] = [
        [1.0, 0.19, 0.19, 1.0],
        [1.0, 0.38, 0.19, 1.0],
        [1.0, 0.56, 0.19, 1.0],
        [1.0, 1.0, 0.19, 1.0],
        WHITE,
    ];
}
