//! Viewport camera
//!
//! World <-> screen transform, ship follow with edge clamping, smoothed zoom
//! and visibility culling. `zoom > 1` means zoomed OUT (more world visible).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::EPSILON;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// World-space center of view
    pub pos: Vec2,
    pub zoom: f32,
    pub target_zoom: f32,
    /// Render target size in pixels
    pub viewport: Vec2,
    world: Vec2,
    min_zoom: f32,
    max_zoom: f32,
    interpolation: f32,
    snap: f32,
    margin: f32,
}

impl Camera {
    pub fn new(tuning: &Tuning) -> Self {
        let world = Vec2::new(tuning.world_width, tuning.world_height);
        Self {
            pos: world / 2.0,
            zoom: 1.0,
            target_zoom: 1.0,
            viewport: Vec2::new(tuning.viewport_width, tuning.viewport_height),
            world,
            min_zoom: tuning.min_zoom,
            max_zoom: tuning.max_zoom_out,
            interpolation: tuning.zoom_interpolation,
            snap: tuning.zoom_snap,
            margin: tuning.visibility_margin,
        }
    }

    /// Recenter on the world and reset zoom
    pub fn reset(&mut self) {
        self.pos = self.world / 2.0;
        self.zoom = 1.0;
        self.target_zoom = 1.0;
    }

    /// Track a resized render target
    pub fn set_viewport(&mut self, viewport: Vec2) {
        if viewport.x > 0.0 && viewport.y > 0.0 {
            self.viewport = viewport;
        }
    }

    /// Size of the world rectangle currently in view
    #[inline]
    pub fn effective_viewport(&self) -> Vec2 {
        self.viewport * self.zoom.max(EPSILON)
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        let scale = self.viewport / self.effective_viewport();
        (world - self.pos) * scale + self.viewport / 2.0
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let scale = self.effective_viewport() / self.viewport.max(Vec2::splat(EPSILON));
        self.pos + (screen - self.viewport / 2.0) * scale
    }

    /// Center on the ship, but never show space outside the world
    pub fn follow_ship(&mut self, ship_pos: Vec2) {
        let half = self.effective_viewport() / 2.0;
        self.pos = Vec2::new(
            clamp_axis(ship_pos.x, half.x, self.world.x),
            clamp_axis(ship_pos.y, half.y, self.world.y),
        );
    }

    /// Move zoom geometrically toward the target, snapping when close
    pub fn update_zoom(&mut self) {
        let gap = self.target_zoom - self.zoom;
        if gap.abs() > self.snap {
            self.zoom += gap * self.interpolation;
        } else {
            self.zoom = self.target_zoom;
        }
    }

    /// Set the target zoom, clamped into `[min_zoom, max_zoom_out]`
    pub fn set_zoom(&mut self, zoom: f32) {
        self.target_zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Does a circle at `world` (plus the culling margin) touch the view?
    pub fn is_visible(&self, world: Vec2, radius: f32) -> bool {
        let half = self.effective_viewport() / 2.0 + Vec2::splat(radius + self.margin);
        (world.x - self.pos.x).abs() <= half.x && (world.y - self.pos.y).abs() <= half.y
    }
}

/// Clamp a camera center so `[c - half, c + half]` stays inside `[0, extent]`
fn clamp_axis(target: f32, half: f32, extent: f32) -> f32 {
    if half * 2.0 >= extent {
        extent / 2.0
    } else {
        target.clamp(half, extent - half)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(&Tuning::default())
    }

    #[test]
    fn test_transforms_are_inverse() {
        let mut cam = camera();
        cam.pos = Vec2::new(3000.0, 2000.0);
        cam.zoom = 2.0;
        let world = Vec2::new(3100.0, 1950.0);
        let back = cam.screen_to_world(cam.world_to_screen(world));
        assert!((back - world).length() < 1e-2);
    }

    #[test]
    fn test_center_maps_to_screen_center() {
        let cam = camera();
        assert_eq!(cam.world_to_screen(cam.pos), cam.viewport / 2.0);
    }

    #[test]
    fn test_follow_clamps_at_edges() {
        let mut cam = camera();
        cam.follow_ship(Vec2::new(10.0, 10.0));
        assert_eq!(cam.pos, Vec2::new(600.0, 450.0));

        cam.follow_ship(Vec2::new(7990.0, 5490.0));
        assert_eq!(cam.pos, Vec2::new(8000.0 - 600.0, 5500.0 - 450.0));

        cam.follow_ship(Vec2::new(4000.0, 3000.0));
        assert_eq!(cam.pos, Vec2::new(4000.0, 3000.0));
    }

    #[test]
    fn test_zoom_interpolates_then_snaps() {
        let mut cam = camera();
        cam.set_zoom(2.0);
        cam.update_zoom();
        assert!((cam.zoom - 1.1).abs() < 1e-5);
        for _ in 0..200 {
            cam.update_zoom();
        }
        assert_eq!(cam.zoom, 2.0);
    }

    #[test]
    fn test_set_zoom_clamps() {
        let mut cam = camera();
        cam.set_zoom(10.0);
        assert_eq!(cam.target_zoom, 3.0);
        cam.set_zoom(0.1);
        assert_eq!(cam.target_zoom, 1.0);
    }

    #[test]
    fn test_visibility_uses_radius_and_margin() {
        let cam = camera();
        let edge = cam.pos + Vec2::new(600.0 + 50.0 + 40.0, 0.0);
        assert!(cam.is_visible(edge, 40.0));
        assert!(!cam.is_visible(edge + Vec2::new(1.0, 0.0), 40.0));
    }
}
