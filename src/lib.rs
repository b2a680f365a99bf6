//! Boid World - a discrete-time ball world with pluggable behaviors
//!
//! Core modules:
//! - `sim`: Agents, the broadcast dispatcher, collision math and tick commands
//! - `behavior`: Per-tick update behaviors and pairwise interact behaviors
//! - `paint`: Paint behaviors (render boundary, never mutate physical state)
//! - `renderer`: Drawing surface abstraction and CPU tessellation
//! - `model`: The world model owning the agent population
//! - `driver`: Fixed-cadence update and paint scheduling
//! - `control`: Behavior factories and the name catalog used by front ends
//! - `settings`: Data-driven configuration

pub mod behavior;
pub mod control;
pub mod driver;
pub mod model;
pub mod paint;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use driver::{Cadence, Driver};
pub use model::World;
pub use settings::{Settings, SettingsError};

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Update tick interval (milliseconds)
    pub const UPDATE_INTERVAL_MS: u64 = 30;
    /// Paint tick interval (milliseconds)
    pub const PAINT_INTERVAL_MS: u64 = 40;
    /// Maximum catch-up ticks per driver advance to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default canvas dimensions
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Spawn ranges for new agents
    pub const MIN_RADIUS: f32 = 8.0;
    pub const MAX_RADIUS: f32 = 16.0;
    pub const MIN_SPEED: f32 = 5.0;
    pub const MAX_SPEED: f32 = 15.0;

    /// Curve rotation per tick (degrees)
    pub const CURVE_MIN_DEGREES: f32 = 2.0;
    pub const CURVE_MAX_DEGREES: f32 = 6.0;

    /// Breathing scale bounds and angular step per tick (degrees)
    pub const BREATH_MIN_SCALE: f32 = 0.8;
    pub const BREATH_MAX_SCALE: f32 = 1.2;
    pub const BREATH_MIN_STEP_DEGREES: i32 = 1;
    pub const BREATH_MAX_STEP_DEGREES: i32 = 9;

    /// Flocking: every boid is forced to this radius
    pub const BOID_RADIUS: f32 = 10.0;
    /// Flocking: maximum speed after steering
    pub const BOID_MAX_SPEED: f32 = 8.0;
    /// Flocking: neighbors closer than this are sensed
    pub const BOID_SENSE_RANGE: f32 = BOID_RADIUS * 20.0;
    /// Flocking: flockmates closer than this repel
    pub const BOID_BOUNCE_RANGE: f32 = BOID_RADIUS * 4.0;

    /// Contact window for time-of-impact checks, in ticks: [-1.0, 0.0)
    pub const CONTACT_WINDOW: f32 = 1.0;
    /// CollideAccurate: maximum contacts resolved per agent per tick
    pub const MAX_CONTACTS_PER_TICK: u32 = 4;

    /// Faulty behavior: updates between error signals
    pub const FAULT_SIGNAL_PERIOD: u32 = 25;
}

/// Rotate a vector by an angle given as its cosine and sine
///
/// x' = x·cosθ − y·sinθ, y' = y·cosθ + x·sinθ
#[inline]
pub fn rotate(v: Vec2, cos_a: f32, sin_a: f32) -> Vec2 {
    Vec2::new(v.x * cos_a - v.y * sin_a, v.y * cos_a + v.x * sin_a)
}

/// Scale a vector down to `max` length if it is longer, preserving direction
#[inline]
pub fn limit_length(v: Vec2, max: f32) -> Vec2 {
    let sq = v.length_squared();
    if sq > max * max {
        v * (max / sq.sqrt())
    } else {
        v
    }
}

/// Convert degrees to radians
#[inline]
pub fn degrees_to_radians(deg: f32) -> f32 {
    deg * std::f32::consts::PI / 180.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_quarter_turn() {
        let v = rotate(Vec2::new(1.0, 0.0), 0.0, 1.0);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_limit_length() {
        let v = limit_length(Vec2::new(30.0, 40.0), 5.0);
        assert!((v.length() - 5.0).abs() < 1e-4);
        assert!((v.x - 3.0).abs() < 1e-4);

        let short = Vec2::new(1.0, 1.0);
        assert_eq!(limit_length(short, 5.0), short);
    }
}
