use thiserror::Error;

use super::types::SimTime;

/// Errors that terminate a simulation run.
///
/// Two families: configuration errors are raised at registration time,
/// before `run()` ever starts; invariant violations are raised while the
/// run loop is executing and carry the simulated time at which they
/// occurred, so a failing run can be reproduced from the deterministic
/// event order. Contention outcomes (a full queue, a busy resource) are
/// ordinary return values, never errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A resource was registered with a capacity of zero.
    #[error("resource '{name}' must have positive capacity")]
    InvalidCapacity { name: String },

    /// A queue was registered with a bounded capacity of zero.
    #[error("queue '{name}' capacity bound must be at least 1")]
    InvalidQueueBound { name: String },

    /// A transport was registered with a non-positive length or tick.
    #[error("transport '{name}': {field} must be positive, got {value}")]
    InvalidTransport {
        name: String,
        field: &'static str,
        value: f64,
    },

    /// A variate generator was constructed with invalid parameters.
    #[error("variate: {reason}")]
    InvalidVariate { reason: String },

    /// The model was constructed with a negative start time.
    #[error("start time {start} must be non-negative")]
    NegativeStartTime { start: SimTime },

    /// An event was scheduled before the current clock time.
    #[error("cannot schedule event at t={requested} before current t={now}")]
    SchedulePast { requested: SimTime, now: SimTime },

    /// `Release` was requested on a resource with no units held.
    #[error("release on resource '{name}' with no units held (t={at})")]
    ResourceUnderflow { name: String, at: SimTime },

    /// A transport's speed profile produced a non-positive speed.
    #[error("transport '{name}' sampled non-positive speed {speed} (t={at})")]
    NonPositiveSpeed {
        name: String,
        speed: f64,
        at: SimTime,
    },

    /// A step referenced a handle this model never issued.
    #[error("unknown {kind} handle #{index} (t={at})")]
    UnknownHandle {
        kind: &'static str,
        index: usize,
        at: SimTime,
    },
}
