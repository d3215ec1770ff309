//! Rendering collaborators
//!
//! The simulation never draws pixels itself. It issues world-space draw calls
//! through `Renderer`, together with the camera offset to subtract.

use serde::Serialize;

use crate::util::color::Color;
use crate::util::vec2::Vec2;

/// Drawing surface used by `WorldState::render` and `Creature::render`
pub trait Renderer {
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color, offset: Vec2);
    fn draw_text(&mut self, text: &str, at: Vec2, color: Color, offset: Vec2);
    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color, offset: Vec2);
}

/// Camera: top-left corner of the viewport in world space
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Camera {
    pub position: Vec2,
}

impl Camera {
    /// Center the viewport on `target`
    pub fn follow(&mut self, target: Vec2, viewport: Vec2) {
        self.position = target - viewport * 0.5;
    }

    /// Offset subtracted from world coordinates when drawing
    #[inline]
    pub fn offset(&self) -> Vec2 {
        self.position
    }
}

/// Screen-space draw command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCommand {
    Line { from: Vec2, to: Vec2, color: Color },
    Text { text: String, at: Vec2, color: Color },
    Circle { center: Vec2, radius: f32, color: Color },
}

/// Renderer that records commands instead of drawing (headless runs, tests)
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    pub fn texts(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(|c| matches!(c, DrawCommand::Text { .. }))
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(|c| matches!(c, DrawCommand::Circle { .. }))
    }
}

impl Renderer for DrawList {
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color, offset: Vec2) {
        self.commands.push(DrawCommand::Line {
            from: from - offset,
            to: to - offset,
            color,
        });
    }

    fn draw_text(&mut self, text: &str, at: Vec2, color: Color, offset: Vec2) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            at: at - offset,
            color,
        });
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color, offset: Vec2) {
        self.commands.push(DrawCommand::Circle {
            center: center - offset,
            radius,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_follow_centers_target() {
        let mut camera = Camera::default();
        camera.follow(Vec2::new(500.0, 400.0), Vec2::new(800.0, 600.0));
        assert_eq!(camera.offset(), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_draw_list_applies_offset() {
        let mut list = DrawList::new();
        let offset = Vec2::new(10.0, 20.0);
        list.draw_line(Vec2::new(10.0, 20.0), Vec2::new(20.0, 20.0), Color::RED, offset);
        list.draw_circle(Vec2::new(15.0, 25.0), 3.0, Color::WHITE, offset);
        list.draw_text("7", Vec2::new(10.0, 20.0), Color::WHITE, offset);

        assert_eq!(list.len(), 3);
        assert_eq!(
            list.commands()[0],
            DrawCommand::Line {
                from: Vec2::ZERO,
                to: Vec2::new(10.0, 0.0),
                color: Color::RED
            }
        );
        assert_eq!(list.circles().count(), 1);
        assert_eq!(list.texts().count(), 1);
        assert_eq!(list.lines().count(), 1);

        list.clear();
        assert!(list.is_empty());
    }
}
