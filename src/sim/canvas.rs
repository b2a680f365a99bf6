//! Canvas bounds accessor
//!
//! Agents reflect off the canvas edges. The bounds may change over the
//! lifetime of a simulation (window resize), so they are read fresh on
//! every bounce rather than cached on the agent.

use std::sync::RwLock;

use glam::Vec2;

/// Source of the current canvas size
pub trait Canvas: Send + Sync {
    /// Current (width, height)
    fn size(&self) -> Vec2;
}

/// A canvas whose size never changes
#[derive(Debug, Clone, Copy)]
pub struct FixedCanvas(pub Vec2);

impl FixedCanvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self(Vec2::new(width, height))
    }
}

impl Canvas for FixedCanvas {
    fn size(&self) -> Vec2 {
        self.0
    }
}

/// A canvas that front ends resize at runtime
#[derive(Debug)]
pub struct ResizableCanvas {
    size: RwLock<Vec2>,
}

impl ResizableCanvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: RwLock::new(Vec2::new(width, height)),
        }
    }

    pub fn resize(&self, width: f32, height: f32) {
        let mut size = self.size.write().unwrap_or_else(|e| e.into_inner());
        *size = Vec2::new(width, height);
        log::debug!("Canvas resized to {}x{}", width, height);
    }
}

impl Canvas for ResizableCanvas {
    fn size(&self) -> Vec2 {
        *self.size.read().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resizable_canvas_reads_fresh() {
        let canvas = ResizableCanvas::new(100.0, 50.0);
        assert_eq!(canvas.size(), Vec2::new(100.0, 50.0));
        canvas.resize(300.0, 200.0);
        assert_eq!(canvas.size(), Vec2::new(300.0, 200.0));
    }
}
