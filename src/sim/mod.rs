//! Simulation core
//!
//! Agents, the dispatcher that owns and broadcasts to them, and the
//! collision math shared by the contact behaviors:
//! - Fixed ticks only; rendering runs on its own cadence and never mutates
//! - Seeded randomness only (via `Randomizer`)
//! - Sequential dispatch iterates in id order

pub mod canvas;
pub mod collision;
pub mod dispatcher;
pub mod rng;
pub mod state;
pub mod tick;

pub use canvas::{Canvas, FixedCanvas, ResizableCanvas};
pub use collision::{Contact, in_contact_window, reduced_mass, time_of_impact, time_of_impact_additive};
pub use dispatcher::{Dispatcher, ExecutionPolicy};
pub use rng::Randomizer;
pub use state::{Agent, AgentId, AgentRef, Body, Color};
pub use tick::{paint, tick, update_agent};
