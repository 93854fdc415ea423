//! Recorded draw commands
//!
//! A [`DrawList`] is a [`DrawContext`] that just remembers what it was asked
//! to draw. Backends replay it; tests inspect it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::{DrawContext, Rgba};

/// One recorded primitive (screen space)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    Polygon { points: Vec<Vec2>, color: Rgba },
    Circle { center: Vec2, radius: f32, color: Rgba },
    Line { from: Vec2, to: Vec2, width: f32, color: Rgba },
    Text { text: String, at: Vec2, size: f32, color: Rgba },
    FillScreen { color: Rgba },
}

/// Draw context that records commands in submission order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DrawList {
    pub viewport: Vec2,
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            viewport,
            commands: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All text strings drawn, in order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl DrawContext for DrawList {
    fn viewport(&self) -> Vec2 {
        self.viewport
    }

    fn polygon(&mut self, points: &[Vec2], color: Rgba) {
        if points.len() < 2 {
            return;
        }
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::Circle { center, radius, color });
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::Line { from, to, width, color });
    }

    fn text(&mut self, text: &str, at: Vec2, size: f32, color: Rgba) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            at,
            size,
            color,
        });
    }

    fn fill_screen(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::FillScreen { color });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::colors;

    #[test]
    fn test_records_in_order() {
        let mut list = DrawList::new(Vec2::new(100.0, 100.0));
        list.fill_screen(colors::BLACK);
        list.text("HELLO", Vec2::splat(50.0), 12.0, colors::WHITE);
        assert_eq!(list.len(), 2);
        assert!(matches!(list.commands[0], DrawCommand::FillScreen { .. }));
        assert_eq!(list.texts().collect::<Vec<_>>(), vec!["HELLO"]);
    }

    #[test]
    fn test_degenerate_polygon_is_skipped() {
        let mut list = DrawList::new(Vec2::ONE);
        list.polygon(&[Vec2::ZERO], colors::WHITE);
        assert!(list.is_empty());
    }
}
