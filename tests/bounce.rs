//! Wall reflection keeps agents inside the canvas

use std::sync::Arc;

use glam::Vec2;
use proptest::prelude::*;

use boid_world::behavior::Straight;
use boid_world::paint::NullPaint;
use boid_world::sim::{self, Agent, Body, Color, Dispatcher, FixedCanvas};

const EPS: f32 = 1e-3;

/// (extent, radius, start, velocity) on one axis, with the step no longer than
/// half the free space so a single reflection lands back inside
fn axis() -> impl Strategy<Value = (f32, f32, f32, f32)> {
    (40.0f32..600.0)
        .prop_flat_map(|extent| (Just(extent), 1.0f32..extent / 4.0))
        .prop_flat_map(|(extent, radius)| {
            let reach = extent / 2.0 - radius;
            (Just(extent), Just(radius), radius..extent - radius, -reach..reach)
        })
}

proptest! {
    #[test]
    fn prop_bounce_keeps_agent_inside(
        (w, rx, x, vx) in axis(),
        (h, ry, y, vy) in axis(),
    ) {
        // One radius for both axes: the smaller keeps both strategies valid
        let radius = rx.min(ry);
        let x = x.clamp(radius, w - radius);
        let y = y.clamp(radius, h - radius);
        let disp = Dispatcher::sequential();
        let agent = Agent::new(
            Body::new(Vec2::new(x, y), Vec2::new(vx, vy), radius, Color::WHITE),
            Arc::new(FixedCanvas::new(w, h)),
            Box::new(Straight),
            Box::new(NullPaint),
        );
        disp.add(agent.clone());

        let moved = Vec2::new(x + vx, y + vy);
        sim::tick(&disp);
        let body = agent.body();

        prop_assert!(body.pos.x >= radius - EPS && body.pos.x <= w - radius + EPS);
        prop_assert!(body.pos.y >= radius - EPS && body.pos.y <= h - radius + EPS);

        let hit_x = moved.x - radius < 0.0 || moved.x + radius > w;
        let hit_y = moved.y - radius < 0.0 || moved.y + radius > h;
        prop_assert_eq!(body.vel.x == -vx, hit_x || vx == 0.0);
        prop_assert_eq!(body.vel.y == -vy, hit_y || vy == 0.0);
    }
}

#[test]
fn test_inside_position_unchanged_by_bounce() {
    let disp = Dispatcher::sequential();
    let agent = Agent::new(
        Body::new(Vec2::new(50.0, 60.0), Vec2::new(3.0, -4.0), 10.0, Color::WHITE),
        Arc::new(FixedCanvas::new(200.0, 200.0)),
        Box::new(Straight),
        Box::new(NullPaint),
    );
    disp.add(agent.clone());
    sim::tick(&disp);
    assert_eq!(agent.position(), Vec2::new(53.0, 56.0));
    assert_eq!(agent.velocity(), Vec2::new(3.0, -4.0));
}
