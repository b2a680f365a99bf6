//! Control boundary used by front ends
//!
//! Front ends pick behaviors by short name. Resolution goes through a
//! static table here; the simulation core only ever sees constructed
//! behaviors. An unknown name never fails: it resolves to a sentinel
//! factory whose behaviors make the broken agent visible (`Faulty` update,
//! `InvalidPaint`).

use std::sync::Arc;

use crate::behavior::{
    Breathing, CollideAccurate, CollideExact, Curve, Drunken, Faulty, Flocking, Hold, Kill, Multi,
    Overlap, Recolor, Straight, UpdateBehavior, Wander,
};
use crate::paint::{BallPaint, InvalidPaint, NullPaint, PaintBehavior, SquarePaint};
use crate::sim::Randomizer;

/// Makes fresh update behaviors of one kind
pub trait UpdateFactory: Send + Sync {
    fn make(&self) -> Box<dyn UpdateBehavior>;

    /// Display name, also used to combine factories
    fn name(&self) -> &str;
}

/// Makes fresh paint behaviors of one kind
pub trait PaintFactory: Send + Sync {
    fn make(&self) -> Box<dyn PaintBehavior>;

    fn name(&self) -> &str;
}

/// Update behavior names the catalog resolves
pub const UPDATE_NAMES: &[&str] = &[
    Straight::NAME,
    Recolor::NAME,
    Curve::NAME,
    Breathing::NAME,
    Wander::NAME,
    Drunken::NAME,
    Hold::NAME,
    Overlap::NAME,
    Kill::NAME,
    CollideExact::NAME,
    CollideAccurate::NAME,
    Flocking::NAME,
];

/// Paint behavior names the catalog resolves
pub const PAINT_NAMES: &[&str] = &["Ball", "Square", "Null"];

/// A named entry of the update table
struct NamedUpdate {
    name: String,
    rand: Randomizer,
}

impl UpdateFactory for NamedUpdate {
    fn make(&self) -> Box<dyn UpdateBehavior> {
        let rand = &self.rand;
        match self.name.as_str() {
            Straight::NAME => Box::new(Straight),
            Recolor::NAME => Box::new(Recolor::new(rand.clone())),
            Curve::NAME => Box::new(Curve::random(rand)),
            Breathing::NAME => Box::new(Breathing::random(rand)),
            Wander::NAME => Box::new(Wander::new(rand.clone())),
            Drunken::NAME => Box::new(Drunken::new(rand.clone())),
            Hold::NAME => Box::new(Hold),
            Overlap::NAME => Box::new(Overlap),
            Kill::NAME => Box::new(Kill),
            CollideExact::NAME => Box::new(CollideExact),
            CollideAccurate::NAME => Box::new(CollideAccurate::new()),
            Flocking::NAME => Box::new(Flocking::new()),
            other => Box::new(Faulty::new(other)),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Sentinel for an unresolvable update name
struct FaultyUpdate {
    requested: String,
}

impl UpdateFactory for FaultyUpdate {
    fn make(&self) -> Box<dyn UpdateBehavior> {
        Box::new(Faulty::new(self.requested.clone()))
    }

    fn name(&self) -> &str {
        Faulty::NAME
    }
}

/// `Multi` over two factories' products
struct Combined {
    name: String,
    first: Arc<dyn UpdateFactory>,
    second: Arc<dyn UpdateFactory>,
}

impl UpdateFactory for Combined {
    fn make(&self) -> Box<dyn UpdateBehavior> {
        Box::new(Multi::new(self.first.make(), self.second.make()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Factory making `Multi(first.make(), second.make())`, named "first-second"
pub fn combine(first: Arc<dyn UpdateFactory>, second: Arc<dyn UpdateFactory>) -> Arc<dyn UpdateFactory> {
    Arc::new(Combined {
        name: format!("{}-{}", first.name(), second.name()),
        first,
        second,
    })
}

struct NamedPaint {
    name: &'static str,
}

impl PaintFactory for NamedPaint {
    fn make(&self) -> Box<dyn PaintBehavior> {
        match self.name {
            "Ball" => Box::new(BallPaint),
            "Square" => Box::new(SquarePaint),
            "Null" => Box::new(NullPaint),
            _ => Box::new(InvalidPaint),
        }
    }

    fn name(&self) -> &str {
        self.name
    }
}

struct InvalidPaintFactory;

impl PaintFactory for InvalidPaintFactory {
    fn make(&self) -> Box<dyn PaintBehavior> {
        Box::new(InvalidPaint)
    }

    fn name(&self) -> &str {
        "Invalid"
    }
}

/// Name-to-factory resolution
#[derive(Debug, Clone)]
pub struct Catalog {
    rand: Randomizer,
}

impl Catalog {
    /// Randomized behaviors draw from `rand`
    pub fn new(rand: Randomizer) -> Self {
        Self { rand }
    }

    /// Factory for an update behavior name, or the `Faulty` sentinel
    pub fn update_factory(&self, name: &str) -> Arc<dyn UpdateFactory> {
        let name = name.trim();
        if UPDATE_NAMES.contains(&name) {
            Arc::new(NamedUpdate {
                name: name.to_string(),
                rand: self.rand.clone(),
            })
        } else {
            log::warn!("Unknown update behavior {:?}, using the faulty sentinel", name);
            Arc::new(FaultyUpdate {
                requested: name.to_string(),
            })
        }
    }

    /// Factory for a paint behavior name, or the `InvalidPaint` sentinel
    pub fn paint_factory(&self, name: &str) -> Arc<dyn PaintFactory> {
        let name = name.trim();
        match PAINT_NAMES.iter().find(|known| **known == name) {
            Some(known) => Arc::new(NamedPaint { name: known }),
            None => {
                log::warn!("Unknown paint behavior {:?}, using the invalid sentinel", name);
                Arc::new(InvalidPaintFactory)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::behavior::testing::agent_with;
    use crate::renderer::{DrawCommand, DrawList};
    use crate::sim::{Body, Color, Dispatcher};

    fn catalog() -> Catalog {
        Catalog::new(Randomizer::seeded(23))
    }

    #[test]
    fn test_every_listed_name_resolves() {
        let catalog = catalog();
        for name in UPDATE_NAMES {
            let factory = catalog.update_factory(name);
            assert_eq!(factory.name(), *name);
            assert_eq!(factory.make().name(), *name);
        }
        for name in PAINT_NAMES {
            assert_eq!(catalog.paint_factory(name).name(), *name);
        }
    }

    #[test]
    fn test_unknown_update_name_gives_sentinel() {
        let catalog = catalog();
        for name in ["Teleport", ""] {
            let factory = catalog.update_factory(name);
            assert_eq!(factory.name(), Faulty::NAME);
            assert_eq!(factory.make().name(), Faulty::NAME);
        }
    }

    #[test]
    fn test_unknown_paint_name_gives_sentinel() {
        let paint = catalog().paint_factory("Mario").make();
        let mut list = DrawList::new();
        paint.paint(&mut list, &Body::new(Vec2::new(5.0, 5.0), Vec2::ZERO, 3.0, Color::WHITE));
        assert!(matches!(
            &list.commands()[0],
            DrawCommand::Text { text, .. } if text == InvalidPaint::MESSAGE
        ));
    }

    #[test]
    fn test_combine_names_and_composes() {
        let catalog = catalog();
        let combined = combine(catalog.update_factory("Curve"), catalog.update_factory("Breathing"));
        assert_eq!(combined.name(), "Curve-Breathing");
        assert_eq!(combined.make().name(), Multi::NAME);

        let nested = combine(combined, catalog.update_factory("Kill"));
        assert_eq!(nested.name(), "Curve-Breathing-Kill");
    }

    #[test]
    fn test_factories_make_fresh_instances() {
        let disp = Dispatcher::sequential();
        let factory = catalog().update_factory("Breathing");
        let a = agent_with(Vec2::new(50.0, 50.0), Vec2::ZERO, 10.0, factory.make());
        let b = agent_with(Vec2::new(90.0, 50.0), Vec2::ZERO, 10.0, factory.make());
        for _ in 0..3 {
            a.update(&disp);
        }
        b.update(&disp);
        // b starts its own wave at the baseline
        assert_eq!(b.radius(), 10.0);
    }
}
