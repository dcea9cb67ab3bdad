//! Clock module - fixed-timestep accumulator
//!
//! Frames feed elapsed milliseconds in; whole steps come out. A step is only
//! due once the accumulated time strictly exceeds the interval, so a frame of
//! exactly one interval leaves the debt in place for the next frame.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepAccumulator {
    step_ms: u32,
    accumulated_ms: u64,
}

impl StepAccumulator {
    pub fn new(step_ms: u32) -> Self {
        Self {
            step_ms: step_ms.max(1),
            accumulated_ms: 0,
        }
    }

    pub fn step_ms(&self) -> u32 {
        self.step_ms
    }

    pub fn accumulated_ms(&self) -> u64 {
        self.accumulated_ms
    }

    pub fn add(&mut self, elapsed_ms: u32) {
        self.accumulated_ms += elapsed_ms as u64;
    }

    /// Consume one step if enough time has accumulated
    pub fn pop_step(&mut self) -> bool {
        if self.accumulated_ms > self.step_ms as u64 {
            self.accumulated_ms -= self.step_ms as u64;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.accumulated_ms = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_interval_does_not_step() {
        let mut clock = StepAccumulator::new(1000);
        clock.add(1000);
        assert!(!clock.pop_step());
        clock.add(1);
        assert!(clock.pop_step());
        assert_eq!(clock.accumulated_ms(), 1);
    }

    #[test]
    fn flushes_accumulated_debt() {
        let mut clock = StepAccumulator::new(100);
        clock.add(350);
        let mut steps = 0;
        while clock.pop_step() {
            steps += 1;
        }
        assert_eq!(steps, 3);
        assert_eq!(clock.accumulated_ms(), 50);
    }

    #[test]
    fn zero_interval_is_clamped() {
        let mut clock = StepAccumulator::new(0);
        assert_eq!(clock.step_ms(), 1);
        clock.add(2);
        assert!(clock.pop_step());
        assert!(!clock.pop_step());
    }
}
