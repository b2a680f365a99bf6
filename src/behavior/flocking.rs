//! Boids flocking with pursuit of the nearest stranger
//!
//! Neighbors within `BOID_SENSE_RANGE` are split by kind: agents running the
//! same update behavior are flockmates (cohesion, alignment, separation),
//! anything else is prey (pursuit of the nearest one).

use glam::Vec2;

use crate::consts::{BOID_BOUNCE_RANGE, BOID_MAX_SPEED, BOID_RADIUS, BOID_SENSE_RANGE};
use crate::limit_length;
use crate::sim::{Agent, Dispatcher};

use super::UpdateBehavior;

/// Separations below this have no usable repulsion direction
const MIN_SEPARATION: f32 = 1.0e-6;

/// A sensed neighbor, as seen by a steering boid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Same kind as the steering boid
    pub flockmate: bool,
}

/// New velocity of a boid at `pos` moving at `vel`
///
/// Weighted accelerations are added to the current velocity and the sum is
/// clamped to `BOID_MAX_SPEED`. With no neighbors the velocity is only clamped.
pub fn steer(pos: Vec2, vel: Vec2, neighbors: &[Neighbor]) -> Vec2 {
    let mut chase = Vec2::ZERO;
    let mut nearest = f32::MAX;
    let mut loc_sum = Vec2::ZERO;
    let mut vel_sum = Vec2::ZERO;
    let mut mates = 0u32;
    let mut separation = Vec2::ZERO;

    for n in neighbors {
        let offset = n.pos - pos;
        let dist = offset.length();
        if !n.flockmate {
            if dist < nearest {
                nearest = dist;
                chase = offset;
            }
            continue;
        }
        mates += 1;
        loc_sum += n.pos;
        vel_sum += n.vel;
        if dist < BOID_BOUNCE_RANGE && dist > MIN_SEPARATION {
            // The nearer the stronger
            separation += (-offset / dist) / dist;
        }
    }

    let (cohesion, alignment) = if mates > 0 {
        let n = mates as f32;
        (loc_sum / n - pos, vel_sum / n - vel)
    } else {
        (Vec2::ZERO, Vec2::ZERO)
    };

    let far = BOID_SENSE_RANGE / 2.0;
    let near = BOID_BOUNCE_RANGE / 2.0;
    let steered = vel + chase / far + cohesion / far + alignment / far + separation * near;
    limit_length(steered, BOID_MAX_SPEED)
}

/// Boids rule set plus pursuit; forces the agent's radius to `BOID_RADIUS`
#[derive(Debug, Clone, Copy, Default)]
pub struct Flocking;

impl Flocking {
    pub const NAME: &'static str = "Flocking";

    pub fn new() -> Self {
        Self
    }

    /// Every other member within sense range
    fn sense(agent: &Agent, dispatcher: &Dispatcher) -> Vec<Neighbor> {
        let here = agent.position();
        let kind = agent.update_kind();
        dispatcher
            .snapshot()
            .into_iter()
            .filter(|other| other.id() != agent.id())
            .filter_map(|other| {
                let body = other.body();
                (body.pos.distance(here) < BOID_SENSE_RANGE).then(|| Neighbor {
                    pos: body.pos,
                    vel: body.vel,
                    flockmate: other.update_kind() == kind,
                })
            })
            .collect()
    }
}

impl UpdateBehavior for Flocking {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn init(&mut self, agent: &Agent) {
        agent.set_radius(BOID_RADIUS);
    }

    fn update(&mut self, agent: &Agent, dispatcher: &Dispatcher) {
        let neighbors = Self::sense(agent, dispatcher);
        if neighbors.is_empty() {
            return;
        }
        let body = agent.body();
        agent.set_velocity(steer(body.pos, body.vel, &neighbors));
    }
}
