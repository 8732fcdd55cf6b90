//! Simulation clock
//!
//! The colony never samples wall-clock time. The caller supplies a delta each
//! tick and every timer in the state machine reads `SimClock::now`, so a run
//! is reproducible and timers can be tested without real delays.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::types::{Millis, Tick};

/// Monotonic clock advanced only by explicit deltas
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimClock {
    elapsed: Duration,
    tick: Tick,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one tick of length `dt`
    pub fn advance(&mut self, dt: Duration) {
        self.elapsed += dt;
        self.tick += 1;
    }

    /// Milliseconds since the clock started (sub-millisecond remainder truncated)
    pub fn now(&self) -> Millis {
        self.elapsed.as_millis() as Millis
    }

    pub fn current_tick(&self) -> Tick {
        self.tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_starts_at_zero() {
        let clock = SimClock::new();
        assert_eq!(clock.now(), 0);
        assert_eq!(clock.current_tick(), 0);
    }

    #[test]
    fn test_clock_accumulates_fractional_deltas() {
        let mut clock = SimClock::new();
        // 60 ticks of 16.666ms land on 999ms, not 960ms
        for _ in 0..60 {
            clock.advance(Duration::from_micros(16_666));
        }
        assert_eq!(clock.now(), 999);
        assert_eq!(clock.current_tick(), 60);
    }
}
