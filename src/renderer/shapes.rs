//! Tessellation of recorded draw commands into triangles
//!
//! Text has no geometry here; front ends render it themselves.

use glam::Vec2;
use std::f32::consts::TAU;

use super::DrawCommand;
use super::vertex::Vertex;

/// Triangle fan segments for a circle
pub const CIRCLE_SEGMENTS: usize = 24;

/// Generate vertices for a filled circle (triangle list)
pub fn circle(center: Vec2, radius: f32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(CIRCLE_SEGMENTS * 3);
    for i in 0..CIRCLE_SEGMENTS {
        let a1 = i as f32 / CIRCLE_SEGMENTS as f32 * TAU;
        let a2 = (i + 1) as f32 / CIRCLE_SEGMENTS as f32 * TAU;
        let p1 = center + Vec2::new(a1.cos(), a1.sin()) * radius;
        let p2 = center + Vec2::new(a2.cos(), a2.sin()) * radius;
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(p1.x, p1.y, color));
        vertices.push(Vertex::new(p2.x, p2.y, color));
    }
    vertices
}

/// Generate vertices for an axis-aligned filled rectangle
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let max = min + size;
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, max.y, color),
        Vertex::new(min.x, max.y, color),
    ]
}

/// Flatten a frame's commands into one triangle list
pub fn tessellate(commands: &[DrawCommand]) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    for command in commands {
        match command {
            DrawCommand::Circle {
                center,
                radius,
                color,
            } => vertices.extend(circle(*center, *radius, color.to_rgba())),
            DrawCommand::Rect { min, size, color } => {
                vertices.extend(rect(*min, *size, color.to_rgba()))
            }
            DrawCommand::Text { .. } => {}
        }
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Color;

    #[test]
    fn test_circle_vertices_on_rim() {
        let vertices = circle(Vec2::new(10.0, 10.0), 5.0, [1.0; 4]);
        assert_eq!(vertices.len(), CIRCLE_SEGMENTS * 3);
        for tri in vertices.chunks(3) {
            let rim = Vec2::from(tri[1].position);
            assert!((rim.distance(Vec2::new(10.0, 10.0)) - 5.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_tessellate_skips_text() {
        let commands = vec![
            DrawCommand::Rect {
                min: Vec2::ZERO,
                size: Vec2::ONE,
                color: Color::RED,
            },
            DrawCommand::Text {
                pos: Vec2::ZERO,
                text: "hi".into(),
                color: Color::RED,
            },
        ];
        let vertices = tessellate(&commands);
        assert_eq!(vertices.len(), 6);
        assert_eq!(vertices[0].color, [1.0, 0.0, 0.0, 1.0]);
    }
}
