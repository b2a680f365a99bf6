//! Per-tick broadcast commands
//!
//! The update tick moves every agent, reflects it off the canvas edges and
//! then runs its update behavior. The paint tick only reads agent state.

use std::sync::Mutex;

use super::dispatcher::Dispatcher;
use super::state::Agent;
use crate::renderer::Surface;

/// The update command applied to each agent
pub fn update_agent(agent: &Agent, dispatcher: &Dispatcher) {
    agent.move_once();
    agent.bounce();
    agent.update(dispatcher);
}

/// Advance the population by one tick
pub fn tick(dispatcher: &Dispatcher) {
    dispatcher.dispatch(update_agent);
}

/// Paint every agent onto `surface`
///
/// Agents are painted in dispatch order; under the parallel policy the
/// surface is shared behind a lock.
pub fn paint(dispatcher: &Dispatcher, surface: &mut dyn Surface) {
    let surface = Mutex::new(surface);
    dispatcher.dispatch(|agent, _| {
        let mut surface = surface.lock().unwrap_or_else(|e| e.into_inner());
        agent.paint(&mut **surface);
    });
}
