//! The world model
//!
//! Owns the agent population (through the dispatcher), the canvas bounds,
//! the random source and the switcher cell shared by every switcher agent.
//! Front ends drive it through this type and never touch the dispatcher's
//! internals.

use std::sync::Arc;

use crate::behavior::{SwitcherCell, UpdateBehavior};
use crate::paint::PaintBehavior;
use crate::renderer::Surface;
use crate::settings::Settings;
use crate::sim::{self, Agent, AgentRef, Body, Canvas, Dispatcher, Randomizer, ResizableCanvas};

/// Ranges new agents are drawn from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRanges {
    pub min_radius: f32,
    pub max_radius: f32,
    pub min_speed: f32,
    pub max_speed: f32,
}

impl From<&Settings> for SpawnRanges {
    fn from(settings: &Settings) -> Self {
        Self {
            min_radius: settings.min_radius,
            max_radius: settings.max_radius,
            min_speed: settings.min_speed,
            max_speed: settings.max_speed,
        }
    }
}

/// Agent population plus everything needed to spawn and drive it
pub struct World {
    dispatcher: Dispatcher,
    canvas: Arc<ResizableCanvas>,
    rand: Randomizer,
    switcher: SwitcherCell,
    spawn: SpawnRanges,
}

impl World {
    pub fn new(settings: &Settings) -> Self {
        Self::with_randomizer(settings, Randomizer::from_seed(settings.seed))
    }

    /// World drawing from an existing random stream
    pub fn with_randomizer(settings: &Settings, rand: Randomizer) -> Self {
        log::info!(
            "World {}x{} with {} dispatch",
            settings.canvas_width,
            settings.canvas_height,
            settings.policy.as_str()
        );
        Self {
            dispatcher: Dispatcher::new(settings.policy),
            canvas: Arc::new(ResizableCanvas::new(settings.canvas_width, settings.canvas_height)),
            rand,
            switcher: SwitcherCell::new(),
            spawn: SpawnRanges::from(settings),
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn canvas(&self) -> &Arc<ResizableCanvas> {
        &self.canvas
    }

    /// Resize the canvas; agents see the new bounds on their next bounce
    pub fn resize(&self, width: f32, height: f32) {
        self.canvas.resize(width, height);
    }

    pub fn randomizer(&self) -> &Randomizer {
        &self.rand
    }

    pub fn switcher_cell(&self) -> &SwitcherCell {
        &self.switcher
    }

    pub fn len(&self) -> usize {
        self.dispatcher.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dispatcher.is_empty()
    }

    /// Spawn an agent with a random radius, color, velocity and location
    pub fn make_agent(&self, update: Box<dyn UpdateBehavior>, paint: Box<dyn PaintBehavior>) -> AgentRef {
        let spawn = &self.spawn;
        let radius = self
            .rand
            .range(spawn.min_radius, spawn.max_radius)
            .round()
            .clamp(spawn.min_radius, spawn.max_radius);
        let body = Body::new(
            self.rand.location(radius, self.canvas.size()),
            self.rand.velocity(spawn.min_speed, spawn.max_speed),
            radius,
            self.rand.color(),
        );
        let canvas: Arc<dyn Canvas> = self.canvas.clone();
        let agent = Agent::new(body, canvas, update, paint);
        log::debug!("Spawned agent {} ({})", agent.id(), agent.update_kind());
        self.dispatcher.add(agent.clone());
        agent
    }

    /// Spawn an agent steered by the shared switcher cell
    ///
    /// The cell delegates to `Straight` until `switch_all` is called.
    pub fn make_switcher_agent(&self, paint: Box<dyn PaintBehavior>) -> AgentRef {
        self.make_agent(Box::new(self.switcher.switcher()), paint)
    }

    /// Redirect every switcher agent, present and future, to `update`
    pub fn switch_all(&self, update: Box<dyn UpdateBehavior>) {
        self.switcher.set_delegate(update);
    }

    /// Remove every agent
    pub fn clear(&self) {
        self.dispatcher.clear();
    }

    /// One update tick
    pub fn update(&self) {
        sim::tick(&self.dispatcher);
    }

    /// One paint pass onto `surface`
    pub fn paint(&self, surface: &mut dyn Surface) {
        sim::paint(&self.dispatcher, surface);
    }
}
