//! Fixed-timestep accumulator.
//!
//! Wall-clock time goes in, a whole number of simulation ticks comes out.
//! The simulation itself only ever sees `tick_ms` steps.

use crate::types::TICK_MS;

/// Upper bound on ticks run for a single frame.
pub const DEFAULT_MAX_STEPS: u32 = 8;

#[derive(Debug, Clone)]
pub struct FixedTimestep {
    tick_ms: u32,
    accumulator_ms: u32,
    max_steps: u32,
    dropped_ms: u64,
}

impl FixedTimestep {
    pub fn new(tick_ms: u32) -> Self {
        Self::with_max_steps(tick_ms, DEFAULT_MAX_STEPS)
    }

    pub fn with_max_steps(tick_ms: u32, max_steps: u32) -> Self {
        Self {
            tick_ms: tick_ms.max(1),
            accumulator_ms: 0,
            max_steps: max_steps.max(1),
            dropped_ms: 0,
        }
    }

    pub fn tick_ms(&self) -> u32 {
        self.tick_ms
    }

    /// Time banked toward the next tick.
    pub fn pending_ms(&self) -> u32 {
        self.accumulator_ms
    }

    /// Time discarded because a frame fell more than `max_steps` behind.
    pub fn dropped_ms(&self) -> u64 {
        self.dropped_ms
    }

    /// Bank `elapsed_ms` and return how many ticks to simulate now.
    ///
    /// At most `max_steps` ticks are returned; anything beyond that is
    /// dropped rather than carried into the next frame, so a long stall
    /// cannot snowball into ever longer catch-up frames.
    pub fn advance(&mut self, elapsed_ms: u32) -> u32 {
        self.accumulator_ms = self.accumulator_ms.saturating_add(elapsed_ms);

        let steps = self.accumulator_ms / self.tick_ms;
        if steps > self.max_steps {
            let kept = self.max_steps * self.tick_ms;
            let excess = self.accumulator_ms - kept;
            // Keep the sub-tick remainder so pacing stays smooth.
            let remainder = self.accumulator_ms % self.tick_ms;
            self.dropped_ms += (excess - remainder) as u64;
            self.accumulator_ms = remainder;
            log::debug!("timestep fell behind, dropped {}ms", excess - remainder);
            return self.max_steps;
        }

        self.accumulator_ms -= steps * self.tick_ms;
        steps
    }

    /// Forget banked time (e.g. after unpausing).
    pub fn reset(&mut self) {
        self.accumulator_ms = 0;
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(TICK_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_partial_ticks() {
        let mut ts = FixedTimestep::new(16);
        assert_eq!(ts.advance(10), 0);
        assert_eq!(ts.pending_ms(), 10);
        assert_eq!(ts.advance(10), 1);
        assert_eq!(ts.pending_ms(), 4);
    }

    #[test]
    fn runs_several_ticks_for_a_slow_frame() {
        let mut ts = FixedTimestep::new(16);
        assert_eq!(ts.advance(50), 3);
        assert_eq!(ts.pending_ms(), 2);
    }

    #[test]
    fn caps_catch_up_and_drops_the_rest() {
        let mut ts = FixedTimestep::with_max_steps(16, 4);
        assert_eq!(ts.advance(1000), 4);
        assert_eq!(ts.pending_ms(), 1000 % 16);
        assert_eq!(ts.dropped_ms(), (1000 - 64 - 1000 % 16) as u64);

        // Next frame is back to normal pacing.
        assert_eq!(ts.advance(16), 1);
    }

    #[test]
    fn reset_clears_bank() {
        let mut ts = FixedTimestep::default();
        ts.advance(TICK_MS - 1);
        ts.reset();
        assert_eq!(ts.pending_ms(), 0);
        assert_eq!(ts.advance(TICK_MS - 1), 0);
    }
}
