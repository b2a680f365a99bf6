//! Agent state and core simulation types
//!
//! An agent is a moving circle. Its physical state (`Body`) and each of its
//! behaviors sit behind their own lock so that, during a broadcast, one
//! agent's update can read or adjust another agent without ever holding
//! more than two body locks at once (always taken in id order).

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::canvas::Canvas;
use super::dispatcher::Dispatcher;
use crate::behavior::{InteractBehavior, NullInteract, Straight, UpdateBehavior};
use crate::paint::{NullPaint, PaintBehavior};
use crate::renderer::Surface;

/// Unique agent identity (set membership and lock ordering key)
pub type AgentId = u32;

/// Shared handle to an agent
pub type AgentRef = Arc<Agent>;

static NEXT_AGENT_ID: AtomicU32 = AtomicU32::new(1);

/// Allocate a new agent id
pub fn next_agent_id() -> AgentId {
    NEXT_AGENT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Cosmetic agent color, opaque to the physics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Normalized RGBA for vertex colors
    pub fn to_rgba(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            1.0,
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// Physical state of an agent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
}

impl Body {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, color: Color) -> Self {
        Self {
            pos,
            vel,
            radius,
            color,
        }
    }

    /// Mass stand-in used by collision response
    #[inline]
    pub fn mass(&self) -> f32 {
        self.radius * self.radius
    }

    /// Translate position by velocity
    #[inline]
    pub fn advance(&mut self) {
        self.pos += self.vel;
    }

    /// Reflect off the canvas edges, each axis independently
    pub fn bounce(&mut self, canvas: Vec2) {
        if let Some(x) = bounce_axis(self.pos.x, self.radius, canvas.x) {
            self.pos.x = x;
            self.vel.x = -self.vel.x;
        }
        if let Some(y) = bounce_axis(self.pos.y, self.radius, canvas.y) {
            self.pos.y = y;
            self.vel.y = -self.vel.y;
        }
    }
}

/// Reflected position on one axis, or None when already inside [0, max]
///
/// A circle poking out by `d` on one side ends up `d` inside that side.
pub fn bounce_axis(pos: f32, radius: f32, max: f32) -> Option<f32> {
    if pos - radius < 0.0 {
        Some(pos + 2.0 * (0.0 - pos + radius))
    } else if pos + radius > max {
        Some(pos - 2.0 * (pos - max + radius))
    } else {
        None
    }
}

pub(crate) fn lock<T: ?Sized>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

/// A moving circular simulation entity
pub struct Agent {
    id: AgentId,
    /// Radius at construction, baseline for breathing
    initial_radius: f32,
    canvas: Arc<dyn Canvas>,
    body: Mutex<Body>,
    /// Taken out of the slot while it runs so it may be replaced mid-update
    update: Mutex<Option<Box<dyn UpdateBehavior>>>,
    update_kind: RwLock<&'static str>,
    interact: RwLock<Arc<dyn InteractBehavior>>,
    paint: Mutex<Box<dyn PaintBehavior>>,
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("id", &self.id)
            .field("kind", &self.update_kind())
            .field("body", &self.body())
            .finish()
    }
}

impl Agent {
    /// Create an agent and attach its behaviors
    ///
    /// Both behaviors are initialized against the agent, so an update
    /// behavior may adjust the body (e.g. force a radius) before the first tick.
    pub fn new(
        body: Body,
        canvas: Arc<dyn Canvas>,
        update: Box<dyn UpdateBehavior>,
        paint: Box<dyn PaintBehavior>,
    ) -> AgentRef {
        let agent = Arc::new(Self {
            id: next_agent_id(),
            initial_radius: body.radius,
            canvas,
            body: Mutex::new(body),
            update: Mutex::new(Some(Box::new(Straight))),
            update_kind: RwLock::new(Straight::NAME),
            interact: RwLock::new(Arc::new(NullInteract)),
            paint: Mutex::new(Box::new(NullPaint)),
        });
        agent.set_update_behavior(update);
        agent.set_paint_behavior(paint);
        agent
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn initial_radius(&self) -> f32 {
        self.initial_radius
    }

    /// Current canvas size (read fresh every call)
    pub fn canvas_size(&self) -> Vec2 {
        self.canvas.size()
    }

    /// Snapshot of the physical state
    pub fn body(&self) -> Body {
        *lock(&self.body)
    }

    /// Mutate the physical state under its lock
    pub fn with_body<R>(&self, f: impl FnOnce(&mut Body) -> R) -> R {
        f(&mut lock(&self.body))
    }

    /// Lock two distinct agents' bodies in id order and run `f`
    ///
    /// Returns None when `a` and `b` are the same agent.
    pub fn with_pair<R>(a: &Agent, b: &Agent, f: impl FnOnce(&mut Body, &mut Body) -> R) -> Option<R> {
        if a.id == b.id {
            return None;
        }
        if a.id < b.id {
            let mut ba = lock(&a.body);
            let mut bb = lock(&b.body);
            Some(f(&mut ba, &mut bb))
        } else {
            let mut bb = lock(&b.body);
            let mut ba = lock(&a.body);
            Some(f(&mut ba, &mut bb))
        }
    }

    pub fn position(&self) -> Vec2 {
        lock(&self.body).pos
    }

    pub fn set_position(&self, pos: Vec2) {
        lock(&self.body).pos = pos;
    }

    pub fn velocity(&self) -> Vec2 {
        lock(&self.body).vel
    }

    /// Non-finite velocities are rejected and the old velocity kept
    pub fn set_velocity(&self, vel: Vec2) {
        if vel.is_finite() {
            lock(&self.body).vel = vel;
        } else {
            log::warn!("Agent {} rejected non-finite velocity {:?}", self.id, vel);
        }
    }

    pub fn radius(&self) -> f32 {
        lock(&self.body).radius
    }

    /// Radius is clamped to stay positive
    pub fn set_radius(&self, radius: f32) {
        lock(&self.body).radius = radius.max(1.0);
    }

    pub fn color(&self) -> Color {
        lock(&self.body).color
    }

    pub fn set_color(&self, color: Color) {
        lock(&self.body).color = color;
    }

    /// position += velocity
    pub fn move_once(&self) {
        lock(&self.body).advance();
    }

    /// Reflect off the current canvas edges
    pub fn bounce(&self) {
        let canvas = self.canvas.size();
        lock(&self.body).bounce(canvas);
    }

    /// Euclidean distance between centers
    pub fn distance(&self, other: &Agent) -> f32 {
        let here = self.position();
        if self.id == other.id {
            return 0.0;
        }
        here.distance(other.position())
    }

    /// Name of the attached update behavior (its "kind")
    pub fn update_kind(&self) -> &'static str {
        *self.update_kind.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Replace the update behavior, initializing it against this agent
    ///
    /// Safe to call while the current behavior is running: the running one
    /// is dropped when it finishes.
    pub fn set_update_behavior(&self, mut behavior: Box<dyn UpdateBehavior>) {
        behavior.init(self);
        let kind = behavior.name();
        *lock(&self.update) = Some(behavior);
        *self.update_kind.write().unwrap_or_else(|e| e.into_inner()) = kind;
    }

    /// Run the update behavior once
    pub fn update(&self, dispatcher: &Dispatcher) {
        let Some(mut behavior) = lock(&self.update).take() else {
            // Already running (re-entrant update of the same agent)
            return;
        };
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| behavior.update(self, dispatcher)));
        {
            // Put it back unless it was replaced while running, panic or not
            let mut slot = lock(&self.update);
            if slot.is_none() {
                *slot = Some(behavior);
            }
        }
        if let Err(payload) = outcome {
            panic::resume_unwind(payload);
        }
    }

    pub fn interact_behavior(&self) -> Arc<dyn InteractBehavior> {
        self.interact.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn set_interact_behavior(&self, behavior: Arc<dyn InteractBehavior>) {
        *self.interact.write().unwrap_or_else(|e| e.into_inner()) = behavior;
    }

    /// Let this agent's interact behavior react to contact with `target`
    pub fn interact_with(&self, target: &Agent, dispatcher: &Dispatcher) {
        let behavior = self.interact_behavior();
        behavior.interact(self, target, dispatcher);
    }

    pub fn set_paint_behavior(&self, mut behavior: Box<dyn PaintBehavior>) {
        behavior.init(self);
        *lock(&self.paint) = behavior;
    }

    /// Paint onto `surface` from a body snapshot
    pub fn paint(&self, surface: &mut dyn Surface) {
        let body = self.body();
        lock(&self.paint).paint(surface, &body);
    }
}
