//! Broadcast dispatcher owning the agent population
//!
//! Membership is a set keyed by agent id (iteration order is id order, so
//! sequential passes are deterministic). A pass works on a snapshot taken at
//! dispatch start; `add`/`remove` take the membership write lock briefly and
//! may be called from any command, sequential or parallel, without external
//! locking. Changes requested mid-pass show up in the next pass.

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::RwLock;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::state::{Agent, AgentId, AgentRef};

/// How a pass visits its snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionPolicy {
    /// One agent at a time, in id order
    #[default]
    Sequential,
    /// Agents spread over the rayon pool, no ordering guarantee
    Parallel,
}

impl ExecutionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionPolicy::Sequential => "sequential",
            ExecutionPolicy::Parallel => "parallel",
        }
    }
}

/// Owner and broadcaster of the agent population
#[derive(Debug, Default)]
pub struct Dispatcher {
    members: RwLock<BTreeMap<AgentId, AgentRef>>,
    policy: ExecutionPolicy,
}

impl Dispatcher {
    pub fn new(policy: ExecutionPolicy) -> Self {
        Self {
            members: RwLock::new(BTreeMap::new()),
            policy,
        }
    }

    pub fn sequential() -> Self {
        Self::new(ExecutionPolicy::Sequential)
    }

    pub fn parallel() -> Self {
        Self::new(ExecutionPolicy::Parallel)
    }

    pub fn policy(&self) -> ExecutionPolicy {
        self.policy
    }

    /// Add an agent; adding a present agent is a no-op
    pub fn add(&self, agent: AgentRef) {
        let mut members = self.members.write().unwrap_or_else(|e| e.into_inner());
        members.entry(agent.id()).or_insert(agent);
    }

    /// Remove an agent; removing an absent agent is a no-op
    pub fn remove(&self, agent: &Agent) -> bool {
        let mut members = self.members.write().unwrap_or_else(|e| e.into_inner());
        let removed = members.remove(&agent.id()).is_some();
        if removed {
            log::debug!("Agent {} removed", agent.id());
        }
        removed
    }

    /// Remove every agent
    pub fn clear(&self) {
        let mut members = self.members.write().unwrap_or_else(|e| e.into_inner());
        let count = members.len();
        members.clear();
        log::info!("Cleared {} agents", count);
    }

    pub fn contains(&self, agent: &Agent) -> bool {
        let members = self.members.read().unwrap_or_else(|e| e.into_inner());
        members.contains_key(&agent.id())
    }

    pub fn len(&self) -> usize {
        self.members.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current members, in id order
    pub fn snapshot(&self) -> Vec<AgentRef> {
        let members = self.members.read().unwrap_or_else(|e| e.into_inner());
        members.values().cloned().collect()
    }

    /// Apply `command(agent, self)` to every agent present at pass start
    ///
    /// A command that panics is logged and skipped; the pass carries on with
    /// the remaining agents.
    pub fn dispatch<F>(&self, command: F)
    where
        F: Fn(&Agent, &Dispatcher) + Sync,
    {
        let snapshot = self.snapshot();
        let run = |agent: &AgentRef| {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| command(agent.as_ref(), self)));
            if outcome.is_err() {
                log::error!("Command panicked for agent {}; continuing pass", agent.id());
            }
        };
        match self.policy {
            ExecutionPolicy::Sequential => snapshot.iter().for_each(run),
            ExecutionPolicy::Parallel => snapshot.par_iter().for_each(run),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use glam::Vec2;

    use super::*;
    use crate::behavior::Straight;
    use crate::paint::NullPaint;
    use crate::sim::canvas::FixedCanvas;
    use crate::sim::state::{Body, Color};

    fn make_agent() -> AgentRef {
        Agent::new(
            Body::new(Vec2::new(50.0, 50.0), Vec2::ZERO, 10.0, Color::WHITE),
            Arc::new(FixedCanvas::new(200.0, 200.0)),
            Box::new(Straight),
            Box::new(NullPaint),
        )
    }

    #[test]
    fn test_add_is_idempotent() {
        let disp = Dispatcher::sequential();
        let agent = make_agent();
        disp.add(agent.clone());
        disp.add(agent.clone());
        assert_eq!(disp.len(), 1);
        assert!(disp.remove(&agent));
        assert!(!disp.remove(&agent));
        assert!(disp.is_empty());
    }

    #[test]
    fn test_dispatch_visits_snapshot_despite_mutation() {
        let disp = Dispatcher::sequential();
        for _ in 0..5 {
            disp.add(make_agent());
        }
        let visits = AtomicUsize::new(0);
        disp.dispatch(|agent, d| {
            visits.fetch_add(1, Ordering::SeqCst);
            // Each visited agent removes itself and spawns a newcomer
            d.remove(agent);
            d.add(make_agent());
        });
        assert_eq!(visits.load(Ordering::SeqCst), 5);
        assert_eq!(disp.len(), 5);
    }

    #[test]
    fn test_parallel_dispatch_mutation_is_safe() {
        let disp = Dispatcher::parallel();
        for _ in 0..64 {
            disp.add(make_agent());
        }
        let visits = AtomicUsize::new(0);
        let added = AtomicUsize::new(0);
        disp.dispatch(|agent, d| {
            visits.fetch_add(1, Ordering::SeqCst);
            if agent.id() % 2 == 0 {
                d.remove(agent);
            } else {
                d.add(make_agent());
                added.fetch_add(1, Ordering::SeqCst);
            }
        });
        let added = added.load(Ordering::SeqCst);
        let removed = 64 - added;
        assert_eq!(visits.load(Ordering::SeqCst), 64);
        assert_eq!(disp.len(), 64 - removed + added);
    }

    #[test]
    fn test_panicking_command_does_not_halt_pass() {
        let disp = Dispatcher::sequential();
        let agents: Vec<_> = (0..3).map(|_| make_agent()).collect();
        for a in &agents {
            disp.add(a.clone());
        }
        let bad = agents[0].id();
        let visits = AtomicUsize::new(0);
        disp.dispatch(|agent, _| {
            visits.fetch_add(1, Ordering::SeqCst);
            if agent.id() == bad {
                panic!("faulty behavior");
            }
        });
        assert_eq!(visits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_clear() {
        let disp = Dispatcher::sequential();
        disp.add(make_agent());
        disp.add(make_agent());
        disp.clear();
        assert!(disp.is_empty());
    }
}
