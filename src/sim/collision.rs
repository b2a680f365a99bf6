//! Elastic two-body collision between moving circles
//!
//! Collisions are detected after the fact: each tick, the time at which two
//! circles' separation equalled the sum of their radii is solved for. A
//! negative time means the contact already happened; only contacts within
//! the last tick, i.e. t in [-1.0, 0.0), are resolved. Mass is the radius
//! squared (area stand-in).

use glam::Vec2;

use super::state::Body;

/// Time of impact meaning "never" (parallel paths or no real root)
pub const NEVER: f32 = f32::MAX;

/// Separations below this have no usable normal
const MIN_SEPARATION: f32 = 1.0e-6;

/// First contact time (ticks) of two circles with contact distance `min_separation`
///
/// Solves |Δp + Δv·t| = R for the earlier root. Returns [`NEVER`] when the
/// circles never touch or share a velocity.
pub fn time_of_impact(p1: Vec2, p2: Vec2, v1: Vec2, v2: Vec2, min_separation: f32) -> f32 {
    let dp = p2 - p1;
    let dv = v2 - v1;
    solve_contact(dp, dv, dv.dot(dp), min_separation)
}

/// Time of impact with the additive cross term kept by CollideAccurate
///
/// The cross term is `dv.x·dp.x + dv.y + dp.y` instead of the dot product.
/// It agrees with [`time_of_impact`] when both y components are zero and
/// drifts for any other geometry.
pub fn time_of_impact_additive(p1: Vec2, p2: Vec2, v1: Vec2, v2: Vec2, min_separation: f32) -> f32 {
    let dp = p2 - p1;
    let dv = v2 - v1;
    solve_contact(dp, dv, dv.x * dp.x + dv.y + dp.y, min_separation)
}

fn solve_contact(dp: Vec2, dv: Vec2, cross: f32, min_separation: f32) -> f32 {
    let dv2 = dv.length_squared();
    if dv2 <= f32::EPSILON {
        return NEVER;
    }
    let r2 = min_separation * min_separation;
    let root2 = cross * cross - dv2 * (dp.length_squared() - r2);
    if root2 < 0.0 {
        return NEVER;
    }
    let t = (-cross - root2.sqrt()) / dv2;
    if t.is_finite() { t } else { NEVER }
}

/// Whether a contact time falls inside the last tick
#[inline]
pub fn in_contact_window(t: f32) -> bool {
    (-crate::consts::CONTACT_WINDOW..0.0).contains(&t)
}

/// Reduced mass m1·m2/(m1+m2); an infinite mass yields the other mass
pub fn reduced_mass(m1: f32, m2: f32) -> f32 {
    if m1 == f32::INFINITY {
        m2
    } else if m2 == f32::INFINITY {
        m1
    } else {
        (m1 * m2) / (m1 + m2)
    }
}

/// Impulse on the source body, directed from source to target
///
/// The target receives the negated impulse. Returns None when the centers
/// coincide (no normal) or the bodies are already separating along the
/// line of centers.
pub fn impulse(
    source_pos: Vec2,
    source_vel: Vec2,
    target_pos: Vec2,
    target_vel: Vec2,
    reduced_mass: f32,
) -> Option<Vec2> {
    let offset = target_pos - source_pos;
    let distance = offset.length();
    if distance < MIN_SEPARATION {
        return None;
    }
    let normal = offset / distance;
    // Relative speed along the normal, negative when closing
    let dvn = (target_vel - source_vel).dot(normal);
    if dvn >= 0.0 {
        return None;
    }
    Some(2.0 * reduced_mass * dvn * normal)
}

/// Apply an impulse to a body and rebuild its position as of `t_contact`
///
/// The drift accumulated with the old velocity since contact is undone and
/// re-applied with the new one.
pub fn apply_impulse(body: &mut Body, impulse: Vec2, t_contact: f32) {
    let mass = body.mass();
    let new_vel = body.vel + impulse / mass;
    if !new_vel.is_finite() {
        return;
    }
    let correction = body.vel * t_contact - new_vel * t_contact;
    body.vel = new_vel;
    body.pos += correction;
}

/// Result of a resolved contact between two bodies
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    /// Contact time in ticks (negative, within the last tick)
    pub time: f32,
    /// Impulse applied to the source body
    pub impulse: Vec2,
}

/// Resolve an elastic contact at `t_contact` between two bodies
///
/// Returns None (and leaves both bodies untouched) for degenerate or
/// separating configurations.
pub fn resolve(source: &mut Body, target: &mut Body, t_contact: f32) -> Option<Contact> {
    let mu = reduced_mass(source.mass(), target.mass());
    let imp = impulse(source.pos, source.vel, target.pos, target.vel, mu)?;
    apply_impulse(source, imp, t_contact);
    apply_impulse(target, -imp, t_contact);
    Some(Contact {
        time: t_contact,
        impulse: imp,
    })
}
