pub mod core;

// Re-export commonly used types
pub use crate::core::errors::SimError;
pub use crate::core::model::{Model, RunReport};
pub use crate::core::process::{ActorState, Outcome, Process, ScriptedProcess, Step};
pub use crate::core::sink::Completion;
pub use crate::core::statistic::Statistic;
pub use crate::core::transport::{Motion, SpeedProfile};
pub use crate::core::trials::run_trials;
pub use crate::core::types::{ActorId, QueueId, ResourceId, SimTime, SinkId, SourceId, TransportId};
pub use crate::core::variate::{Constant, Exponential, Sequence, UniformRange, Variate};
pub use crate::core::wait_queue::Discipline;
