//! Behavior composition, runtime switching and sentinels

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use crate::consts::FAULT_SIGNAL_PERIOD;
use crate::sim::{Agent, Color, Dispatcher};

use super::{MultiInteract, RemoveTarget, Straight, UpdateBehavior};

/// Runs two behaviors in fixed order; nest on the right to build chains
pub struct Multi {
    first: Box<dyn UpdateBehavior>,
    second: Box<dyn UpdateBehavior>,
}

impl Multi {
    pub const NAME: &'static str = "Multi";

    pub fn new(first: Box<dyn UpdateBehavior>, second: Box<dyn UpdateBehavior>) -> Self {
        Self { first, second }
    }
}

impl UpdateBehavior for Multi {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn init(&mut self, agent: &Agent) {
        self.first.init(agent);
        self.second.init(agent);
    }

    fn update(&mut self, agent: &Agent, dispatcher: &Dispatcher) {
        self.first.update(agent, dispatcher);
        self.second.update(agent, dispatcher);
    }
}

type SharedBehavior = Arc<Mutex<Box<dyn UpdateBehavior>>>;

/// Swappable delegate shared by every `Switcher` made from it
///
/// Swapping only replaces the reference, so it never waits on a delegate
/// that is currently running (including from inside that delegate).
#[derive(Clone)]
pub struct SwitcherCell {
    current: Arc<RwLock<(u64, SharedBehavior)>>,
    generations: Arc<AtomicU64>,
}

impl Default for SwitcherCell {
    fn default() -> Self {
        Self::new()
    }
}

impl SwitcherCell {
    /// A cell delegating to `Straight`
    pub fn new() -> Self {
        Self {
            current: Arc::new(RwLock::new((0, Arc::new(Mutex::new(Box::new(Straight)))))),
            generations: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Redirect every switcher sharing this cell
    pub fn set_delegate(&self, delegate: Box<dyn UpdateBehavior>) {
        let generation = self.generations.fetch_add(1, Ordering::Relaxed) + 1;
        log::info!("Switchers now delegate to {}", delegate.name());
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        *current = (generation, Arc::new(Mutex::new(delegate)));
    }

    /// Name of the current delegate
    pub fn delegate_name(&self) -> &'static str {
        let (_, delegate) = self.current();
        let delegate = delegate.lock().unwrap_or_else(|e| e.into_inner());
        delegate.name()
    }

    fn current(&self) -> (u64, SharedBehavior) {
        let current = self.current.read().unwrap_or_else(|e| e.into_inner());
        (current.0, current.1.clone())
    }

    /// A new switcher behavior bound to this cell
    pub fn switcher(&self) -> Switcher {
        Switcher {
            cell: self.clone(),
            seen: None,
        }
    }
}

/// Forwards each tick to the cell's current delegate
///
/// A delegate is initialized against the agent the first time this
/// switcher runs it.
pub struct Switcher {
    cell: SwitcherCell,
    seen: Option<u64>,
}

impl Default for Switcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Switcher {
    pub const NAME: &'static str = "Switcher";

    /// A switcher with its own cell, delegating to `Straight`
    pub fn new() -> Self {
        SwitcherCell::new().switcher()
    }

    pub fn set_strategy(&self, delegate: Box<dyn UpdateBehavior>) {
        self.cell.set_delegate(delegate);
    }
}

impl UpdateBehavior for Switcher {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn update(&mut self, agent: &Agent, dispatcher: &Dispatcher) {
        let (generation, delegate) = self.cell.current();
        let mut delegate = delegate.lock().unwrap_or_else(|e| e.into_inner());
        if self.seen != Some(generation) {
            delegate.init(agent);
            self.seen = Some(generation);
        }
        delegate.update(agent, dispatcher);
    }
}

/// Turns the agent black and makes it remove whatever it interacts with
///
/// The removal is layered on top of the agent's existing interact
/// behavior; `update` itself does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Kill;

impl Kill {
    pub const NAME: &'static str = "Kill";
}

impl UpdateBehavior for Kill {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn init(&mut self, agent: &Agent) {
        agent.set_color(Color::BLACK);
        let existing = agent.interact_behavior();
        agent.set_interact_behavior(Arc::new(MultiInteract::new(existing, Arc::new(RemoveTarget))));
    }

    fn update(&mut self, _agent: &Agent, _dispatcher: &Dispatcher) {}
}

/// Sentinel for an unresolvable update behavior
///
/// Leaves the agent alone but raises an error signal every
/// `FAULT_SIGNAL_PERIOD` updates so the broken agent is noticed.
#[derive(Debug, Clone, Default)]
pub struct Faulty {
    requested: String,
    count: u32,
    signals: u32,
}

impl Faulty {
    pub const NAME: &'static str = "Faulty";

    pub fn new(requested: impl Into<String>) -> Self {
        Self {
            requested: requested.into(),
            count: 0,
            signals: 0,
        }
    }

    /// Number of error signals raised so far
    pub fn signals(&self) -> u32 {
        self.signals
    }
}

impl UpdateBehavior for Faulty {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn update(&mut self, agent: &Agent, _dispatcher: &Dispatcher) {
        self.count += 1;
        if self.count > FAULT_SIGNAL_PERIOD {
            self.count = 0;
            self.signals += 1;
            log::error!(
                "Agent {} runs an invalid update behavior {:?}",
                agent.id(),
                self.requested
            );
        }
    }
}
