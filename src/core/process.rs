use super::types::{ActorId, QueueId, ResourceId, SimTime, SinkId, TransportId};

/// Lifecycle state of an actor, tracked by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorState {
    /// Allocated but not yet run.
    Created,
    /// Executing a slice between suspension points.
    Active,
    /// Blocked on a hold, a busy resource, or a wait queue.
    Waiting,
    /// Held by a transport until its exit condition fires.
    InTransit,
    /// Absorbed by a sink or stopped; the process body has been dropped.
    Done,
}

/// A suspension-point request returned from [`Process::resume`].
///
/// The run loop interprets the step: steps that complete without
/// contention feed their [`Outcome`] straight back into `resume`, so an
/// actor runs to completion between genuine suspensions. Contended steps
/// park the actor on the collaborator, which schedules the resumption
/// when the blocking condition resolves.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Resume unconditionally after `0` time units have elapsed.
    /// Always yields, even for a zero duration.
    Hold(SimTime),
    /// Take one unit of the resource, queueing if none is free.
    Acquire(ResourceId),
    /// Give back one unit, waking the next waiter if any.
    Release(ResourceId),
    /// Park in the queue until pulled out by another actor's `Leave`,
    /// or continue immediately with [`Outcome::Barred`] if it is full.
    WaitIn(QueueId),
    /// Pull the next actor out of the queue per its discipline.
    Leave(QueueId),
    /// Travel the transport's path; resumes when the far end is reached.
    /// `speed` overrides the transport's speed profile for this entrant.
    Enter {
        transport: TransportId,
        speed: Option<f64>,
    },
    /// End at a sink, recording turnaround statistics.
    Finish(SinkId),
    /// End without statistics. For driver-style actors whose completion
    /// is not an observation of interest.
    Stop,
}

/// What an actor learns when it resumes: the result of the step it was
/// suspended on (or that completed synchronously).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// First activation after creation.
    Started,
    /// A `Hold` duration has elapsed.
    Elapsed,
    /// A resource unit was granted.
    Acquired(ResourceId),
    /// A resource unit was given back.
    Released(ResourceId),
    /// A `WaitIn` was refused because the queue was full. The actor never
    /// entered; this is the balk branch.
    Barred(QueueId),
    /// The actor was pulled out of a queue it was parked in.
    Pulled(QueueId),
    /// Result of a `Leave`: the dequeued actor, or `None` if the queue
    /// was empty (non-fatal sentinel).
    Dequeued(Option<ActorId>),
    /// A transport traversal completed.
    Arrived(TransportId),
}

/// A unit of independent simulated behavior: a customer, vehicle, part.
///
/// Implementations are explicit state machines keyed by a resume label:
/// each call to `resume` receives the current time and the outcome of the
/// previous step, and answers with the next suspension-point request. The
/// model dispatches polymorphically through this trait; between two
/// `resume` calls nothing else touches kernel state on the actor's
/// behalf.
pub trait Process: Send {
    fn resume(&mut self, now: SimTime, outcome: Outcome) -> Step;
}

/// A process that plays a fixed sequence of steps, ignoring outcomes,
/// then stops. Enough for linear actor bodies (acquire, hold, release,
/// finish) and for driving the kernel through known schedules in tests.
pub struct ScriptedProcess {
    steps: Vec<Step>,
    cursor: usize,
}

impl ScriptedProcess {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps, cursor: 0 }
    }
}

impl Process for ScriptedProcess {
    fn resume(&mut self, _now: SimTime, _outcome: Outcome) -> Step {
        let step = self.steps.get(self.cursor).cloned().unwrap_or(Step::Stop);
        self.cursor += 1;
        step
    }
}
