//! Agent behaviors
//!
//! Two families:
//! - `UpdateBehavior`: runs once per tick after the agent moved and bounced.
//!   It may read or adjust other agents and add/remove agents through the
//!   dispatcher it is handed.
//! - `InteractBehavior`: reacts once per ordered pair when an update
//!   behavior decides two agents touch.
//!
//! Composition (`Multi`, `MultiInteract`) holds child behaviors rather than
//! layering types.

pub mod compose;
pub mod contact;
pub mod flocking;
pub mod motion;

use std::sync::Arc;

use crate::sim::{Agent, Dispatcher};

pub use compose::{Faulty, Kill, Multi, Switcher, SwitcherCell};
pub use contact::{CollideAccurate, CollideExact, Overlap};
pub use flocking::Flocking;
pub use motion::{Breathing, Curve, Drunken, Hold, Recolor, SineWave, Straight, Wander};

/// Per-tick behavior of an agent
pub trait UpdateBehavior: Send {
    /// Kind name; agents with equal names count as the same kind
    fn name(&self) -> &'static str;

    /// Called once when attached to an agent
    fn init(&mut self, _agent: &Agent) {}

    /// Called once per tick
    fn update(&mut self, agent: &Agent, dispatcher: &Dispatcher);
}

/// Reaction of an agent to contact with a target
pub trait InteractBehavior: Send + Sync {
    fn interact(&self, agent: &Agent, target: &Agent, dispatcher: &Dispatcher);
}

/// No reaction
#[derive(Debug, Clone, Copy, Default)]
pub struct NullInteract;

impl InteractBehavior for NullInteract {
    fn interact(&self, _agent: &Agent, _target: &Agent, _dispatcher: &Dispatcher) {}
}

/// Applies two interact behaviors in order
pub struct MultiInteract {
    first: Arc<dyn InteractBehavior>,
    second: Arc<dyn InteractBehavior>,
}

impl MultiInteract {
    pub fn new(first: Arc<dyn InteractBehavior>, second: Arc<dyn InteractBehavior>) -> Self {
        Self { first, second }
    }
}

impl InteractBehavior for MultiInteract {
    fn interact(&self, agent: &Agent, target: &Agent, dispatcher: &Dispatcher) {
        self.first.interact(agent, target, dispatcher);
        self.second.interact(agent, target, dispatcher);
    }
}

/// Removes the target from the dispatcher
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveTarget;

impl InteractBehavior for RemoveTarget {
    fn interact(&self, agent: &Agent, target: &Agent, dispatcher: &Dispatcher) {
        if dispatcher.remove(target) {
            log::info!("Agent {} removed agent {}", agent.id(), target.id());
        }
    }
}


#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use glam::Vec2;

    use super::testing::agent_with;
    use super::*;

    struct Record(Arc<Mutex<Vec<&'static str>>>, &'static str);

    impl InteractBehavior for Record {
        fn interact(&self, _agent: &Agent, _target: &Agent, _dispatcher: &Dispatcher) {
            self.0.lock().unwrap().push(self.1);
        }
    }

    #[test]
    fn test_multi_interact_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let multi = MultiInteract::new(
            Arc::new(Record(log.clone(), "first")),
            Arc::new(Record(log.clone(), "second")),
        );
        let disp = Dispatcher::sequential();
        let a = agent_with(Vec2::ZERO, Vec2::ZERO, 5.0, Box::new(Straight));
        let b = agent_with(Vec2::ZERO, Vec2::ZERO, 5.0, Box::new(Straight));
        multi.interact(&a, &b, &disp);
        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_remove_target() {
        let disp = Dispatcher::sequential();
        let a = agent_with(Vec2::ZERO, Vec2::ZERO, 5.0, Box::new(Straight));
        let b = agent_with(Vec2::ZERO, Vec2::ZERO, 5.0, Box::new(Straight));
        disp.add(a.clone());
        disp.add(b.clone());
        RemoveTarget.interact(&a, &b, &disp);
        assert!(disp.contains(&a));
        assert!(!disp.contains(&b));
    }
}
