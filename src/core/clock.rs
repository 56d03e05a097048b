use super::errors::SimError;
use super::types::SimTime;

/// The simulated clock. Holds the current model time, which only the run
/// loop advances and which never decreases.
#[derive(Debug, Clone)]
pub struct Clock {
    time: SimTime,
}

impl Clock {
    /// Create a clock starting at `start`. Negative start times are a
    /// configuration error.
    pub fn new(start: SimTime) -> Result<Self, SimError> {
        if start < 0.0 || !start.is_finite() {
            return Err(SimError::NegativeStartTime { start });
        }
        Ok(Self { time: start })
    }

    /// Current simulated time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Advance to `time`. The scheduler guarantees popped events are
    /// non-decreasing in time, so this never moves backwards.
    pub(crate) fn advance_to(&mut self, time: SimTime) {
        debug_assert!(time >= self.time, "clock moved backwards");
        self.time = time;
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self { time: 0.0 }
    }
}
