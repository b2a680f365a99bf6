//! Boid World headless runner
//!
//! Usage: `boid-world [settings.json] [frames]`
//!
//! Spawns a mixed population, drives it in real time for a number of paint
//! frames and logs what happened. Painting goes into a recorded draw list
//! which is tessellated the way a GPU front end would consume it.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use env_logger::Env;

use boid_world::control::{Catalog, combine};
use boid_world::renderer::{DrawList, Vertex, tessellate};
use boid_world::{Driver, Settings, World};

const DEFAULT_FRAMES: u32 = 250;
const SWITCHERS: usize = 4;

/// Population mix spawned at startup: (update, paint, count)
const POPULATION: &[(&str, &str, usize)] = &[
    ("Straight", "Ball", 4),
    ("Curve", "Ball", 3),
    ("Wander", "Square", 2),
    ("Drunken", "Ball", 2),
    ("Flocking", "Ball", 8),
    ("CollideExact", "Ball", 4),
    ("CollideAccurate", "Square", 3),
];

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    log::info!("Boid World starting...");

    let mut args = std::env::args().skip(1);
    let settings_path = args.next().map(PathBuf::from);
    let frames = args
        .next()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(DEFAULT_FRAMES);

    let settings = Settings::load_or_default(settings_path.as_deref());
    let world = World::new(&settings);
    let catalog = Catalog::new(world.randomizer().clone());

    for (update, paint, count) in POPULATION {
        let update = catalog.update_factory(update);
        let paint = catalog.paint_factory(paint);
        for _ in 0..*count {
            world.make_agent(update.make(), paint.make());
        }
    }
    // A predator that eats whatever it overlaps
    let predator = combine(catalog.update_factory("Kill"), catalog.update_factory("Overlap"));
    world.make_agent(predator.make(), catalog.paint_factory("Ball").make());
    for _ in 0..SWITCHERS {
        world.make_switcher_agent(catalog.paint_factory("Square").make());
    }
    log::info!("Spawned {} agents", world.len());

    let mut driver = Driver::new(&settings);
    let mut surface = DrawList::new();
    let mut vertices: Vec<Vertex> = Vec::new();
    let mut ticks = 0u64;
    let frame_time = Duration::from_millis(settings.paint_interval_ms);

    driver.start();
    let mut last = Instant::now();
    for frame in 0..frames {
        std::thread::sleep(frame_time);
        let now = Instant::now();
        let elapsed = now - last;
        last = now;

        surface.clear();
        let step = driver.advance(&world, elapsed, &mut surface);
        ticks += u64::from(step.updates);
        if step.painted {
            vertices = tessellate(surface.commands());
        }

        if frame == frames / 2 {
            world.switch_all(catalog.update_factory("Breathing").make());
        }
        if frame % 50 == 0 {
            log::info!(
                "frame {}: {} ticks, {} agents, {} vertices",
                frame,
                ticks,
                world.len(),
                vertices.len()
            );
        }
    }
    driver.stop();

    log::info!(
        "Finished after {} ticks with {} agents, switchers on {}",
        ticks,
        world.len(),
        world.switcher_cell().delegate_name()
    );
}
