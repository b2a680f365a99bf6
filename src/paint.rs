//! Paint behaviors
//!
//! How an agent is drawn. Painting receives a snapshot of the agent's body
//! and a surface; it never touches physical state.

use glam::Vec2;

use crate::renderer::Surface;
use crate::sim::{Agent, Body, Color};

/// Per-agent drawing policy
pub trait PaintBehavior: Send {
    /// Called once when attached to an agent
    fn init(&mut self, _agent: &Agent) {}

    fn paint(&self, surface: &mut dyn Surface, body: &Body);
}

/// Draws nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPaint;

impl PaintBehavior for NullPaint {
    fn paint(&self, _surface: &mut dyn Surface, _body: &Body) {}
}

/// Filled circle in the agent's color
#[derive(Debug, Clone, Copy, Default)]
pub struct BallPaint;

impl PaintBehavior for BallPaint {
    fn paint(&self, surface: &mut dyn Surface, body: &Body) {
        surface.fill_circle(body.pos, body.radius, body.color);
    }
}

/// Filled square with half-side equal to the radius
#[derive(Debug, Clone, Copy, Default)]
pub struct SquarePaint;

impl PaintBehavior for SquarePaint {
    fn paint(&self, surface: &mut dyn Surface, body: &Body) {
        let half = Vec2::splat(body.radius);
        surface.fill_rect(body.pos - half, half * 2.0, body.color);
    }
}

/// Paints the decoree with a fixed color instead of the agent's
pub struct FixedColorPaint {
    inner: Box<dyn PaintBehavior>,
    color: Color,
}

impl FixedColorPaint {
    pub fn new(inner: Box<dyn PaintBehavior>, color: Color) -> Self {
        Self { inner, color }
    }
}

impl PaintBehavior for FixedColorPaint {
    fn init(&mut self, agent: &Agent) {
        self.inner.init(agent);
    }

    fn paint(&self, surface: &mut dyn Surface, body: &Body) {
        let recolored = Body {
            color: self.color,
            ..*body
        };
        self.inner.paint(surface, &recolored);
    }
}

/// Paints each child in order
#[derive(Default)]
pub struct MultiPaint {
    layers: Vec<Box<dyn PaintBehavior>>,
}

impl MultiPaint {
    pub fn new(layers: Vec<Box<dyn PaintBehavior>>) -> Self {
        Self { layers }
    }
}

impl PaintBehavior for MultiPaint {
    fn init(&mut self, agent: &Agent) {
        for layer in &mut self.layers {
            layer.init(agent);
        }
    }

    fn paint(&self, surface: &mut dyn Surface, body: &Body) {
        for layer in &self.layers {
            layer.paint(surface, body);
        }
    }
}

/// Sentinel for an unresolvable paint behavior: a visible error marker
#[derive(Debug, Clone, Copy, Default)]
pub struct InvalidPaint;

impl InvalidPaint {
    pub const MESSAGE: &'static str = "INVALID PAINT STRATEGY!";
}

impl PaintBehavior for InvalidPaint {
    fn paint(&self, surface: &mut dyn Surface, _body: &Body) {
        surface.draw_text(Vec2::ZERO, Self::MESSAGE, Color::RED);
    }
}
