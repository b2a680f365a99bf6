//! Contact behaviors: overlap sensing and elastic collision
//!
//! Each behavior scans the current members from the owning agent's point
//! of view. Pair state is read and written with both bodies locked in id
//! order; interact behaviors run after the locks are released.

use crate::consts::{CONTACT_WINDOW, MAX_CONTACTS_PER_TICK};
use crate::sim::collision::{self, NEVER};
use crate::sim::{Agent, AgentRef, Body, Dispatcher};

use super::UpdateBehavior;

/// Interacts with every agent whose circle overlaps this one
#[derive(Debug, Clone, Copy, Default)]
pub struct Overlap;

impl Overlap {
    pub const NAME: &'static str = "Overlap";
}

impl UpdateBehavior for Overlap {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn update(&mut self, agent: &Agent, dispatcher: &Dispatcher) {
        for other in dispatcher.snapshot() {
            let touching = Agent::with_pair(agent, &other, |me, them| {
                me.pos.distance(them.pos) < me.radius + them.radius
            });
            if touching == Some(true) {
                agent.interact_with(&other, dispatcher);
            }
        }
    }
}

fn contact_time(me: &Body, them: &Body) -> f32 {
    collision::time_of_impact(me.pos, them.pos, me.vel, them.vel, me.radius + them.radius)
}

fn contact_time_additive(me: &Body, them: &Body) -> f32 {
    collision::time_of_impact_additive(me.pos, them.pos, me.vel, them.vel, me.radius + them.radius)
}

fn closing(me: &Body, them: &Body) -> bool {
    (them.vel - me.vel).dot(them.pos - me.pos) < 0.0
}

/// Both sides of a resolved contact react, source first
fn react(agent: &Agent, other: &Agent, dispatcher: &Dispatcher) {
    agent.interact_with(other, dispatcher);
    other.interact_with(agent, dispatcher);
}

/// Resolves every contact that happened during the last tick
///
/// Any pair whose time of impact is in [-1.0, 0.0) gets an elastic impulse
/// and a position rebuild from the contact point, then both agents'
/// interact behaviors run.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollideExact;

impl CollideExact {
    pub const NAME: &'static str = "CollideExact";
}

impl UpdateBehavior for CollideExact {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn update(&mut self, agent: &Agent, dispatcher: &Dispatcher) {
        for other in dispatcher.snapshot() {
            let contact = Agent::with_pair(agent, &other, |me, them| {
                let t = contact_time(me, them);
                if collision::in_contact_window(t) {
                    collision::resolve(me, them, t)
                } else {
                    None
                }
            })
            .flatten();
            if contact.is_some() {
                react(agent, &other, dispatcher);
            }
        }
    }
}

/// Resolves contacts earliest first, repeatedly, within one tick
///
/// Each pass finds the partner with the earliest closing contact that
/// happened after the previous one, resolves it and shrinks the remaining
/// time budget to what is left after that contact. Stops when nothing is
/// left to resolve or after `max_contacts` resolutions; leftover overlap is
/// picked up on later ticks.
///
/// Uses [`collision::time_of_impact_additive`], which keeps an additive
/// cross term in the contact-time equation.
#[derive(Debug, Clone, Copy)]
pub struct CollideAccurate {
    max_contacts: u32,
}

impl Default for CollideAccurate {
    fn default() -> Self {
        Self::new()
    }
}

impl CollideAccurate {
    pub const NAME: &'static str = "CollideAccurate";

    pub fn new() -> Self {
        Self {
            max_contacts: MAX_CONTACTS_PER_TICK,
        }
    }

    pub fn with_max_contacts(max_contacts: u32) -> Self {
        Self { max_contacts }
    }

    /// Earliest admissible contact (time, partner) after `floor`
    fn earliest(agent: &Agent, others: &[AgentRef], floor: f32, inclusive: bool) -> Option<(f32, AgentRef)> {
        let mut best: Option<(f32, AgentRef)> = None;
        for other in others {
            let t = Agent::with_pair(agent, other, |me, them| {
                if closing(me, them) {
                    contact_time_additive(me, them)
                } else {
                    NEVER
                }
            })
            .unwrap_or(NEVER);
            let after_floor = if inclusive { t >= floor } else { t > floor };
            if after_floor && t < 0.0 && best.as_ref().is_none_or(|(best_t, _)| t < *best_t) {
                best = Some((t, other.clone()));
            }
        }
        best
    }
}

impl UpdateBehavior for CollideAccurate {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn update(&mut self, agent: &Agent, dispatcher: &Dispatcher) {
        let others = dispatcher.snapshot();
        // Remaining time budget is -floor ticks
        let mut floor = -CONTACT_WINDOW;
        let mut inclusive = true;
        for _ in 0..self.max_contacts {
            let Some((t, other)) = Self::earliest(agent, &others, floor, inclusive) else {
                return;
            };
            let resolved = Agent::with_pair(agent, &other, |me, them| collision::resolve(me, them, t)).flatten();
            if resolved.is_none() {
                return;
            }
            floor = t;
            inclusive = false;
            react(agent, &other, dispatcher);
        }
        log::debug!(
            "Agent {} hit the contact cap ({}) this tick",
            agent.id(),
            self.max_contacts
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use glam::Vec2;

    use super::*;
    use crate::behavior::testing::agent_with;
    use crate::behavior::{InteractBehavior, Kill, Straight};

    struct Count(Arc<Mutex<u32>>);

    impl InteractBehavior for Count {
        fn interact(&self, _agent: &Agent, _target: &Agent, _dispatcher: &Dispatcher) {
            *self.0.lock().unwrap() += 1;
        }
    }

    #[test]
    fn test_overlap_interacts_with_each_overlapping_neighbor() {
        let disp = Dispatcher::sequential();
        let hits = Arc::new(Mutex::new(0));
        let me = agent_with(Vec2::new(100.0, 100.0), Vec2::ZERO, 10.0, Box::new(Overlap));
        me.set_interact_behavior(Arc::new(Count(hits.clone())));
        disp.add(me.clone());
        disp.add(agent_with(Vec2::new(115.0, 100.0), Vec2::ZERO, 10.0, Box::new(Straight)));
        disp.add(agent_with(Vec2::new(100.0, 88.0), Vec2::ZERO, 5.0, Box::new(Straight)));
        // Exactly touching is not overlapping
        disp.add(agent_with(Vec2::new(80.0, 100.0), Vec2::ZERO, 10.0, Box::new(Straight)));
        disp.add(agent_with(Vec2::new(150.0, 150.0), Vec2::ZERO, 10.0, Box::new(Straight)));

        me.update(&disp);
        assert_eq!(*hits.lock().unwrap(), 2);
    }

    #[test]
    fn test_overlap_with_kill_removes_neighbors() {
        let disp = Dispatcher::sequential();
        let killer = agent_with(
            Vec2::new(100.0, 100.0),
            Vec2::ZERO,
            10.0,
            Box::new(crate::behavior::Multi::new(Box::new(Kill), Box::new(Overlap))),
        );
        let prey = agent_with(Vec2::new(110.0, 100.0), Vec2::ZERO, 10.0, Box::new(Straight));
        let bystander = agent_with(Vec2::new(180.0, 180.0), Vec2::ZERO, 10.0, Box::new(Straight));
        disp.add(killer.clone());
        disp.add(prey.clone());
        disp.add(bystander.clone());
        killer.update(&disp);
        assert!(!disp.contains(&prey));
        assert!(disp.contains(&bystander));
        assert!(disp.contains(&killer));
    }

    #[test]
    fn test_collide_exact_swaps_equal_mass_velocities() {
        let disp = Dispatcher::sequential();
        let a = agent_with(Vec2::new(95.0, 50.0), Vec2::new(5.0, 0.0), 10.0, Box::new(CollideExact));
        let b = agent_with(Vec2::new(108.0, 50.0), Vec2::new(-5.0, 0.0), 10.0, Box::new(CollideExact));
        disp.add(a.clone());
        disp.add(b.clone());
        a.update(&disp);
        assert!((a.velocity() - Vec2::new(-5.0, 0.0)).length() < 1e-4);
        assert!((b.velocity() - Vec2::new(5.0, 0.0)).length() < 1e-4);
        // Second scan from b's side sees a separating pair
        b.update(&disp);
        assert!((a.velocity() - Vec2::new(-5.0, 0.0)).length() < 1e-4);
        assert!((b.velocity() - Vec2::new(5.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_collide_exact_ignores_old_contacts() {
        let disp = Dispatcher::sequential();
        // Contact 1.5 ticks ago is outside the window
        let a = agent_with(Vec2::new(95.0, 50.0), Vec2::new(5.0, 0.0), 10.0, Box::new(CollideExact));
        let b = agent_with(Vec2::new(100.0, 50.0), Vec2::new(-5.0, 0.0), 10.0, Box::new(Straight));
        disp.add(a.clone());
        disp.add(b.clone());
        a.update(&disp);
        assert_eq!(a.velocity(), Vec2::new(5.0, 0.0));
        assert_eq!(b.velocity(), Vec2::new(-5.0, 0.0));
    }

    #[test]
    fn test_collide_exact_runs_both_interactions() {
        let disp = Dispatcher::sequential();
        let hits = Arc::new(Mutex::new(0));
        let a = agent_with(Vec2::new(95.0, 50.0), Vec2::new(5.0, 0.0), 10.0, Box::new(CollideExact));
        let b = agent_with(Vec2::new(108.0, 50.0), Vec2::new(-5.0, 0.0), 10.0, Box::new(Straight));
        a.set_interact_behavior(Arc::new(Count(hits.clone())));
        b.set_interact_behavior(Arc::new(Count(hits.clone())));
        disp.add(a.clone());
        disp.add(b.clone());
        a.update(&disp);
        assert_eq!(*hits.lock().unwrap(), 2);
    }

    #[test]
    fn test_collide_exact_coincident_agents_skipped() {
        let disp = Dispatcher::sequential();
        let a = agent_with(Vec2::new(50.0, 50.0), Vec2::new(5.0, 0.0), 10.0, Box::new(CollideExact));
        let b = agent_with(Vec2::new(50.0, 50.0), Vec2::new(-5.0, 0.0), 10.0, Box::new(Straight));
        disp.add(a.clone());
        disp.add(b.clone());
        a.update(&disp);
        assert!(a.velocity().is_finite());
        assert!(b.velocity().is_finite());
    }

    #[test]
    fn test_collide_accurate_resolves_contacts_in_time_order() {
        let disp = Dispatcher::sequential();
        // Resting agent touched from the left 0.6 ticks ago, from the right 0.4 ago
        let mid = agent_with(Vec2::new(100.0, 50.0), Vec2::ZERO, 10.0, Box::new(CollideAccurate::new()));
        let left = agent_with(Vec2::new(83.0, 50.0), Vec2::new(5.0, 0.0), 10.0, Box::new(Straight));
        let right = agent_with(Vec2::new(118.0, 50.0), Vec2::new(-5.0, 0.0), 10.0, Box::new(Straight));
        disp.add(mid.clone());
        disp.add(left.clone());
        disp.add(right.clone());
        mid.update(&disp);
        // left -> mid, mid -> right, right's push sends mid back into left
        assert!((left.velocity().x + 5.0).abs() < 1e-4);
        assert!((right.velocity().x - 5.0).abs() < 1e-4);
        assert!(mid.velocity().x.abs() < 1e-4);
    }

    #[test]
    fn test_collide_accurate_cap() {
        let disp = Dispatcher::sequential();
        let mid = agent_with(
            Vec2::new(100.0, 50.0),
            Vec2::ZERO,
            10.0,
            Box::new(CollideAccurate::with_max_contacts(1)),
        );
        let left = agent_with(Vec2::new(83.0, 50.0), Vec2::new(5.0, 0.0), 10.0, Box::new(Straight));
        let right = agent_with(Vec2::new(118.0, 50.0), Vec2::new(-5.0, 0.0), 10.0, Box::new(Straight));
        disp.add(mid.clone());
        disp.add(left.clone());
        disp.add(right.clone());
        mid.update(&disp);
        // Only the earliest contact is resolved
        assert!(left.velocity().x.abs() < 1e-4);
        assert!((mid.velocity().x - 5.0).abs() < 1e-4);
        assert_eq!(right.velocity(), Vec2::new(-5.0, 0.0));
    }
}
