//! Seedable random source shared by factories and behaviors
//!
//! Replaces a global randomizer: every behavior that needs randomness is
//! handed a `Randomizer` clone. Clones share one `Pcg32` stream, so a world
//! built from a fixed seed with a sequential dispatcher is reproducible.

use std::sync::{Arc, Mutex, MutexGuard};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::Color;

/// Cloneable handle to a shared random stream
#[derive(Debug, Clone)]
pub struct Randomizer {
    rng: Arc<Mutex<Pcg32>>,
}

impl Randomizer {
    /// Deterministic stream for tests and replays of a run
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Arc::new(Mutex::new(Pcg32::seed_from_u64(seed))),
        }
    }

    /// Stream seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: Arc::new(Mutex::new(Pcg32::from_os_rng())),
        }
    }

    /// Seeded when a seed is given, entropy otherwise
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Pcg32> {
        self.rng.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Uniform float in [lo, hi]
    pub fn range(&self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        self.lock().random_range(lo..=hi)
    }

    /// Uniform integer in [lo, hi]
    pub fn range_i32(&self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.lock().random_range(lo..=hi)
    }

    /// True with probability `p`
    pub fn chance(&self, p: f64) -> bool {
        self.lock().random_bool(p.clamp(0.0, 1.0))
    }

    /// +1.0 or -1.0 with equal probability
    pub fn sign(&self) -> f32 {
        if self.chance(0.5) { 1.0 } else { -1.0 }
    }

    /// Random opaque color
    pub fn color(&self) -> Color {
        let mut rng = self.lock();
        Color::rgb(rng.random(), rng.random(), rng.random())
    }

    /// Velocity whose components have magnitude in [min, max] and a random sign
    pub fn velocity(&self, min: f32, max: f32) -> Vec2 {
        let vx = self.range(min, max) * self.sign();
        let vy = self.range(min, max) * self.sign();
        Vec2::new(vx, vy)
    }

    /// Location keeping a circle of `radius` inside `canvas`
    ///
    /// Falls back to the canvas center on an axis too small for the circle.
    pub fn location(&self, radius: f32, canvas: Vec2) -> Vec2 {
        let axis = |extent: f32| {
            if extent >= 2.0 * radius {
                self.range(radius, extent - radius)
            } else {
                extent / 2.0
            }
        };
        Vec2::new(axis(canvas.x), axis(canvas.y))
    }
}
