//! Fixed-cadence scheduling of the update and paint broadcasts
//!
//! Front ends feed wall-clock time into `Driver::advance`; each cadence
//! accumulates it and fires a whole number of steps. Updates catch up on a
//! backlog (up to `max_substeps` per advance) while painting fires at most
//! once. Ticks never overlap: an advance runs its updates one after another.

use std::time::Duration;

use crate::model::World;
use crate::renderer::Surface;
use crate::settings::Settings;

/// Fixed-timestep accumulator
#[derive(Debug, Clone)]
pub struct Cadence {
    interval: Duration,
    max_steps: u32,
    accumulator: Duration,
    running: bool,
}

impl Cadence {
    /// A stopped cadence firing every `interval`, at most `max_steps` per advance
    pub fn new(interval: Duration, max_steps: u32) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            max_steps: max_steps.max(1),
            accumulator: Duration::ZERO,
            running: false,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start firing; time that passed while stopped is not owed
    pub fn start(&mut self) {
        if !self.running {
            self.accumulator = Duration::ZERO;
            self.running = true;
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Accumulate `elapsed` and return how many steps are due
    ///
    /// A backlog beyond `max_steps` is dropped rather than carried over.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if !self.running {
            return 0;
        }
        self.accumulator += elapsed;
        let mut steps = 0;
        while self.accumulator >= self.interval && steps < self.max_steps {
            self.accumulator -= self.interval;
            steps += 1;
        }
        if self.accumulator >= self.interval {
            log::debug!(
                "Dropping {:?} of backlog after {} steps",
                self.accumulator,
                steps
            );
            self.accumulator = Duration::from_nanos(
                (self.accumulator.as_nanos() % self.interval.as_nanos()) as u64,
            );
        }
        steps
    }
}

/// What one `Driver::advance` did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Frame {
    pub updates: u32,
    pub painted: bool,
}

/// Independent update and paint cadences over a world
#[derive(Debug, Clone)]
pub struct Driver {
    update: Cadence,
    paint: Cadence,
}

impl Driver {
    pub fn new(settings: &Settings) -> Self {
        Self {
            update: Cadence::new(
                Duration::from_millis(settings.update_interval_ms),
                settings.max_substeps,
            ),
            paint: Cadence::new(Duration::from_millis(settings.paint_interval_ms), 1),
        }
    }

    /// Start both cadences
    pub fn start(&mut self) {
        self.update.start();
        self.paint.start();
        log::info!(
            "Driver started (update every {:?}, paint every {:?})",
            self.update.interval(),
            self.paint.interval()
        );
    }

    /// Stop both cadences
    pub fn stop(&mut self) {
        self.update.stop();
        self.paint.stop();
        log::info!("Driver stopped");
    }

    /// Whether update ticks are firing
    pub fn is_running(&self) -> bool {
        self.update.is_running()
    }

    pub fn start_update(&mut self) {
        self.update.start();
        log::info!("Update ticks resumed");
    }

    /// Pause the simulation; painting keeps going
    pub fn stop_update(&mut self) {
        self.update.stop();
        log::info!("Update ticks paused");
    }

    /// Run whatever update ticks and paint pass are due after `elapsed`
    pub fn advance(&mut self, world: &World, elapsed: Duration, surface: &mut dyn Surface) -> Frame {
        let updates = self.update.advance(elapsed);
        for _ in 0..updates {
            world.update();
        }
        let painted = self.paint.advance(elapsed) > 0;
        if painted {
            world.paint(surface);
        }
        Frame { updates, painted }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_cadence_fires_whole_steps() {
        let mut cadence = Cadence::new(ms(30), 8);
        cadence.start();
        assert_eq!(cadence.advance(ms(20)), 0);
        assert_eq!(cadence.advance(ms(20)), 1);
        // 10ms carried over
        assert_eq!(cadence.advance(ms(50)), 2);
    }

    #[test]
    fn test_cadence_stopped_accumulates_nothing() {
        let mut cadence = Cadence::new(ms(30), 8);
        assert_eq!(cadence.advance(ms(100)), 0);
        cadence.start();
        assert_eq!(cadence.advance(ms(10)), 0);
        cadence.stop();
        assert_eq!(cadence.advance(ms(100)), 0);
        cadence.start();
        assert_eq!(cadence.advance(ms(29)), 0);
    }

    #[test]
    fn test_cadence_caps_backlog() {
        let mut cadence = Cadence::new(ms(10), 4);
        cadence.start();
        assert_eq!(cadence.advance(ms(1_000)), 4);
        // The rest of the backlog was dropped
        assert_eq!(cadence.advance(ms(5)), 0);
        assert_eq!(cadence.advance(ms(5)), 1);
    }

    #[test]
    fn test_driver_start_stop_query() {
        let mut driver = Driver::new(&Settings::default());
        assert!(!driver.is_running());
        driver.start();
        assert!(driver.is_running());
        driver.stop_update();
        assert!(!driver.is_running());
        driver.start_update();
        assert!(driver.is_running());
        driver.stop();
        assert!(!driver.is_running());
    }
}
