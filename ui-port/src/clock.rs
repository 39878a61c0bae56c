use core::cell::Cell;
use core::time::Duration;

/// Time the main loop adds to the clock on every iteration
pub const TICK_PERIOD: Duration = Duration::from_millis(5);

/// Virtual clock behind Slint's timers and animations.
///
/// Only moves when [`TickClock::advance`] is called, wall-clock time spent
/// rendering or sleeping is not counted.
#[derive(Debug, Default)]
pub struct TickClock {
    elapsed: Cell<Duration>,
}

impl TickClock {
    pub const fn new() -> Self {
        Self {
            elapsed: Cell::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, quantum: Duration) {
        self.elapsed.set(self.elapsed.get() + quantum);
    }

    /// One main loop tick
    pub fn tick(&self) {
        self.advance(TICK_PERIOD);
    }

    pub fn now(&self) -> Duration {
        self.elapsed.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        assert_eq!(TickClock::new().now(), Duration::ZERO);
    }

    #[test]
    fn test_tick_advances_by_exactly_one_period() {
        let clock = TickClock::new();
        for i in 1..=200u32 {
            clock.tick();
            assert_eq!(clock.now(), TICK_PERIOD * i);
        }
        assert_eq!(clock.now(), Duration::from_secs(1));
    }

    #[test]
    fn test_advance_ignores_wall_clock() {
        let clock = TickClock::new();
        clock.advance(Duration::from_millis(3));
        clock.advance(Duration::from_micros(500));
        assert_eq!(clock.now(), Duration::from_micros(3500));
    }
}
