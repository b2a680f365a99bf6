//! Render boundary
//!
//! Paint behaviors draw onto a `Surface`. The crate ships a recording
//! surface (`DrawList`) plus CPU tessellation of its commands into colored
//! triangles, ready to upload to whatever graphics backend a front end uses.

pub mod shapes;
pub mod vertex;

use glam::Vec2;

use crate::sim::Color;

pub use shapes::tessellate;
pub use vertex::Vertex;

/// Opaque drawing surface handed to paint behaviors
pub trait Surface: Send {
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Color);
    fn draw_text(&mut self, pos: Vec2, text: &str, color: Color);
}

/// A recorded drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Circle { center: Vec2, radius: f32, color: Color },
    Rect { min: Vec2, size: Vec2, color: Color },
    Text { pos: Vec2, text: String, color: Color },
}

/// Surface that records every drawing operation in order
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

    /// Drop all commands, keeping the allocation for the next frame
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Surface for DrawList {
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Color) {
        self.commands.push(DrawCommand::Rect { min, size, color });
    }

    fn draw_text(&mut self, pos: Vec2, text: &str, color: Color) {
        self.commands.push(DrawCommand::Text {
            pos,
            text: text.to_string(),
            color,
        });
    }
}
