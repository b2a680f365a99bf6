//! Self-contained motion behaviors
//!
//! These only touch the owning agent.

use crate::consts::*;
use crate::sim::{Agent, Dispatcher, Randomizer};
use crate::{degrees_to_radians, rotate};

use super::UpdateBehavior;

/// Keeps moving in a straight line
#[derive(Debug, Clone, Copy, Default)]
pub struct Straight;

impl Straight {
    pub const NAME: &'static str = "Straight";
}

impl UpdateBehavior for Straight {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn update(&mut self, _agent: &Agent, _dispatcher: &Dispatcher) {}
}

/// Takes a fresh random color every tick
#[derive(Debug, Clone)]
pub struct Recolor {
    rand: Randomizer,
}

impl Recolor {
    pub const NAME: &'static str = "Color";

    pub fn new(rand: Randomizer) -> Self {
        Self { rand }
    }

    pub fn apply(&self, agent: &Agent) {
        agent.set_color(self.rand.color());
    }
}

impl UpdateBehavior for Recolor {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn update(&mut self, agent: &Agent, _dispatcher: &Dispatcher) {
        self.apply(agent);
    }
}

/// Turns the velocity by a fixed angle every tick
#[derive(Debug, Clone, Copy)]
pub struct Curve {
    angle: f32,
    cos_a: f32,
    sin_a: f32,
}

impl Curve {
    pub const NAME: &'static str = "Curve";

    /// Rotation of `angle` radians per tick (positive is counter-clockwise in y-up)
    pub fn with_angle(angle: f32) -> Self {
        Self {
            angle,
            cos_a: angle.cos(),
            sin_a: angle.sin(),
        }
    }

    /// Angle magnitude in [2°, 6°], direction picked once
    pub fn random(rand: &Randomizer) -> Self {
        let sign = rand.sign();
        let degrees = rand.range(CURVE_MIN_DEGREES, CURVE_MAX_DEGREES);
        Self::with_angle(sign * degrees_to_radians(degrees))
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn apply(&self, agent: &Agent) {
        agent.with_body(|body| body.vel = rotate(body.vel, self.cos_a, self.sin_a));
    }
}

impl UpdateBehavior for Curve {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn update(&mut self, agent: &Agent, _dispatcher: &Dispatcher) {
        self.apply(agent);
    }
}

/// Sinusoid oscillating between `min` and `max`, advancing `step` radians per sample
#[derive(Debug, Clone, Copy)]
pub struct SineWave {
    min: f32,
    max: f32,
    step: f32,
    theta: f32,
}

impl SineWave {
    pub fn new(min: f32, max: f32, step: f32) -> Self {
        Self {
            min,
            max,
            step,
            theta: 0.0,
        }
    }

    /// Current value, then advance the phase
    pub fn next_value(&mut self) -> f32 {
        let value = self.min + (self.max - self.min) * (self.theta.sin() + 1.0) / 2.0;
        self.theta = (self.theta + self.step) % std::f32::consts::TAU;
        value
    }
}

/// Radius oscillates around the agent's initial radius
#[derive(Debug, Clone, Copy)]
pub struct Breathing {
    wave: SineWave,
}

impl Breathing {
    pub const NAME: &'static str = "Breathing";

    /// Phase advancing `step` radians per tick
    pub fn with_step(step: f32) -> Self {
        Self {
            wave: SineWave::new(BREATH_MIN_SCALE, BREATH_MAX_SCALE, step),
        }
    }

    /// Step picked from [1°, 9°]
    pub fn random(rand: &Randomizer) -> Self {
        let degrees = rand.range_i32(BREATH_MIN_STEP_DEGREES, BREATH_MAX_STEP_DEGREES);
        Self::with_step(degrees_to_radians(degrees as f32))
    }

    pub fn apply(&mut self, agent: &Agent) {
        let scale = self.wave.next_value();
        agent.set_radius((agent.initial_radius() * scale).round());
    }
}

impl UpdateBehavior for Breathing {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn update(&mut self, agent: &Agent, _dispatcher: &Dispatcher) {
        self.apply(agent);
    }
}

/// A freshly randomized curve every tick
#[derive(Debug, Clone)]
pub struct Wander {
    rand: Randomizer,
}

impl Wander {
    pub const NAME: &'static str = "Wander";

    pub fn new(rand: Randomizer) -> Self {
        Self { rand }
    }
}

impl UpdateBehavior for Wander {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn update(&mut self, agent: &Agent, _dispatcher: &Dispatcher) {
        Curve::random(&self.rand).apply(agent);
    }
}

/// Curve or recolor (coin flip) every tick, always followed by breathing
#[derive(Debug, Clone)]
pub struct Drunken {
    rand: Randomizer,
    breathing: Breathing,
}

impl Drunken {
    pub const NAME: &'static str = "Drunken";

    pub fn new(rand: Randomizer) -> Self {
        let breathing = Breathing::random(&rand);
        Self { rand, breathing }
    }
}

impl UpdateBehavior for Drunken {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn update(&mut self, agent: &Agent, _dispatcher: &Dispatcher) {
        if self.rand.chance(0.5) {
            Curve::random(&self.rand).apply(agent);
        } else {
            agent.set_color(self.rand.color());
        }
        self.breathing.apply(agent);
    }
}

/// Cancels the tick's displacement: moves back by the velocity it just moved by
#[derive(Debug, Clone, Copy, Default)]
pub struct Hold;

impl Hold {
    pub const NAME: &'static str = "Hold";
}

impl UpdateBehavior for Hold {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn update(&mut self, agent: &Agent, _dispatcher: &Dispatcher) {
        let vel = agent.velocity();
        agent.set_velocity(-vel);
        agent.move_once();
        agent.set_velocity(vel);
    }
}
