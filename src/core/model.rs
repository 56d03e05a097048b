use log::{debug, trace, warn};

use super::clock::Clock;
use super::errors::SimError;
use super::event_scheduler::{EventScheduler, EventTarget, ScheduledEvent};
use super::process::{ActorState, Outcome, Process, Step};
use super::resource::Resource;
use super::sink::Sink;
use super::source::{ProcessFactory, Source};
use super::transport::{Motion, SpeedProfile, Transport};
use super::types::{ActorId, QueueId, ResourceId, SimTime, SinkId, SourceId, TransportId};
use super::variate::Variate;
use super::wait_queue::{Discipline, EnterResult, WaitQueue};

/// One actor slot in the model's arena. The process box is taken out for
/// the duration of an execution slice and put back on suspension, so the
/// slice can mutate kernel state without aliasing the arena.
struct ActorSlot {
    state: ActorState,
    arrival_time: SimTime,
    process: Option<Box<dyn Process>>,
}

/// Summary of a completed (or paused) run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunReport {
    /// Clock time when the loop stopped.
    pub end_time: SimTime,
    /// Events dispatched over the model's lifetime.
    pub events_dispatched: u64,
}

/// What interpreting one step did with the actor.
enum Applied {
    /// The step completed synchronously; feed this outcome back in.
    Continue(Outcome),
    /// The actor yielded; a collaborator will schedule its resumption.
    Suspended(ActorState),
    /// The actor reached a sink or stopped.
    Finished,
}

/// Composition root for one simulation run: owns the clock, the event
/// scheduler, the actor arena, and every named collaborator. Collaborators
/// are registered before `run()`; registration fails fast on invalid
/// configuration. A model is built, run once, and torn down; repeated
/// trials build fresh models (see [`run_trials`](crate::core::trials::run_trials)).
pub struct Model {
    clock: Clock,
    scheduler: EventScheduler,
    actors: Vec<ActorSlot>,
    resources: Vec<Resource>,
    queues: Vec<WaitQueue>,
    sources: Vec<Source>,
    sinks: Vec<Sink>,
    transports: Vec<Transport>,
    events_dispatched: u64,
}

impl Model {
    /// A model whose clock starts at zero.
    pub fn new() -> Self {
        Self {
            clock: Clock::default(),
            scheduler: EventScheduler::new(),
            actors: Vec::new(),
            resources: Vec::new(),
            queues: Vec::new(),
            sources: Vec::new(),
            sinks: Vec::new(),
            transports: Vec::new(),
            events_dispatched: 0,
        }
    }

    /// A model whose clock starts at `start`. Negative start times are a
    /// configuration error.
    pub fn with_start_time(start: SimTime) -> Result<Self, SimError> {
        let clock = Clock::new(start)?;
        let mut model = Self::new();
        model.clock = clock;
        Ok(model)
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Register a pool of `capacity` interchangeable servers with an FCFS
    /// waiting line.
    pub fn add_resource(&mut self, name: &str, capacity: u32) -> Result<ResourceId, SimError> {
        self.add_resource_with_discipline(name, capacity, Discipline::Fcfs)
    }

    /// Register a resource whose waiting line releases in the given
    /// discipline.
    pub fn add_resource_with_discipline(
        &mut self,
        name: &str,
        capacity: u32,
        discipline: Discipline,
    ) -> Result<ResourceId, SimError> {
        if capacity == 0 {
            return Err(SimError::InvalidCapacity {
                name: name.to_string(),
            });
        }
        self.resources.push(Resource::new(name, capacity, discipline));
        Ok(ResourceId(self.resources.len() - 1))
    }

    /// Register a standalone wait queue. `capacity: None` is unbounded;
    /// a bounded capacity must be at least 1.
    pub fn add_queue(
        &mut self,
        name: &str,
        discipline: Discipline,
        capacity: Option<usize>,
    ) -> Result<QueueId, SimError> {
        if capacity == Some(0) {
            return Err(SimError::InvalidQueueBound {
                name: name.to_string(),
            });
        }
        self.queues.push(WaitQueue::new(name, discipline, capacity));
        Ok(QueueId(self.queues.len() - 1))
    }

    /// Register a sink.
    pub fn add_sink(&mut self, name: &str) -> SinkId {
        self.sinks.push(Sink::new(name));
        SinkId(self.sinks.len() - 1)
    }

    /// Register a source whose first arrival fires at the current clock
    /// time. `units: None` generates an unbounded stream.
    pub fn add_source(
        &mut self,
        name: &str,
        units: Option<u64>,
        inter_arrival: Box<dyn Variate>,
        factory: ProcessFactory,
    ) -> Result<SourceId, SimError> {
        let start_at = self.clock.time();
        self.add_source_starting_at(name, units, inter_arrival, factory, start_at)
    }

    /// Register a source whose first arrival fires at `start_at`.
    pub fn add_source_starting_at(
        &mut self,
        name: &str,
        units: Option<u64>,
        inter_arrival: Box<dyn Variate>,
        factory: ProcessFactory,
        start_at: SimTime,
    ) -> Result<SourceId, SimError> {
        let source = Source::new(name, units, inter_arrival, factory, start_at);
        self.sources.push(source);
        let id = SourceId(self.sources.len() - 1);
        if units != Some(0) {
            self.schedule_at(start_at, EventTarget::SourceArrival(id))?;
        }
        Ok(id)
    }

    /// Register a transport of the given length and motion model.
    pub fn add_transport(
        &mut self,
        name: &str,
        length: f64,
        motion: Motion,
        profile: SpeedProfile,
    ) -> Result<TransportId, SimError> {
        if length <= 0.0 || !length.is_finite() {
            return Err(SimError::InvalidTransport {
                name: name.to_string(),
                field: "length",
                value: length,
            });
        }
        if let Motion::Stepped { tick } = motion {
            if tick <= 0.0 || !tick.is_finite() {
                return Err(SimError::InvalidTransport {
                    name: name.to_string(),
                    field: "tick",
                    value: tick,
                });
            }
        }
        self.transports
            .push(Transport::new(name, length, motion, profile));
        Ok(TransportId(self.transports.len() - 1))
    }

    /// Instantiate an actor directly (outside any source) and schedule
    /// its first activation at `at`.
    pub fn activate(
        &mut self,
        process: Box<dyn Process>,
        at: SimTime,
    ) -> Result<ActorId, SimError> {
        let id = self.insert_actor(at, process);
        self.schedule_at(
            at,
            EventTarget::Resume {
                actor: id,
                outcome: Outcome::Started,
            },
        )?;
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Run loop
    // ------------------------------------------------------------------

    /// Drain the event scheduler, advancing the clock to each event's
    /// time and dispatching it. Stops when no events remain. Calling this
    /// on an exhausted model is a no-op that leaves the clock unchanged.
    pub fn run(&mut self) -> Result<RunReport, SimError> {
        while let Some(event) = self.scheduler.pop_next() {
            self.dispatch(event)?;
        }
        Ok(self.report())
    }

    /// Like [`run`](Self::run), but only dispatches events with
    /// `time <= horizon`; later events stay pending for a further call.
    pub fn run_until(&mut self, horizon: SimTime) -> Result<RunReport, SimError> {
        while let Some(time) = self.scheduler.peek_next_time() {
            if time > horizon {
                break;
            }
            let event = match self.scheduler.pop_next() {
                Some(event) => event,
                None => break,
            };
            self.dispatch(event)?;
        }
        Ok(self.report())
    }

    fn dispatch(&mut self, event: ScheduledEvent) -> Result<(), SimError> {
        self.clock.advance_to(event.time);
        self.events_dispatched += 1;
        trace!(
            "t={} seq={} dispatch {:?}",
            event.time,
            event.sequence,
            event.target
        );
        match event.target {
            EventTarget::Resume { actor, outcome } => {
                if let Outcome::Arrived(tid) = outcome {
                    if let Some(transport) = self.transports.get_mut(tid.0) {
                        if matches!(transport.motion(), Motion::Duration) {
                            transport.complete_exit(actor);
                        }
                    }
                }
                self.run_actor_slice(actor, outcome)
            }
            EventTarget::SourceArrival(id) => self.source_arrival(id),
            EventTarget::TransportTick(id) => self.transport_tick(id),
        }
    }

    /// Resume an actor and keep feeding synchronous outcomes back into it
    /// until it suspends or finishes. The process box is taken out of the
    /// arena for the slice, so step interpretation can borrow the model
    /// freely.
    fn run_actor_slice(&mut self, id: ActorId, first: Outcome) -> Result<(), SimError> {
        let slot = match self.actors.get_mut(id.0) {
            Some(slot) => slot,
            None => {
                return Err(SimError::UnknownHandle {
                    kind: "actor",
                    index: id.0,
                    at: self.clock.time(),
                })
            }
        };
        let mut process = match slot.process.take() {
            Some(process) => process,
            None => {
                warn!("{} resumed after completion; ignoring", id);
                return Ok(());
            }
        };
        slot.state = ActorState::Active;

        let mut outcome = first;
        let verdict = loop {
            let step = process.resume(self.clock.time(), outcome);
            match self.apply_step(id, step)? {
                Applied::Continue(next) => outcome = next,
                Applied::Suspended(state) => break Some(state),
                Applied::Finished => break None,
            }
        };

        let slot = &mut self.actors[id.0];
        match verdict {
            Some(state) => {
                slot.state = state;
                slot.process = Some(process);
            }
            None => {
                slot.state = ActorState::Done;
            }
        }
        Ok(())
    }

    fn apply_step(&mut self, actor: ActorId, step: Step) -> Result<Applied, SimError> {
        let now = self.clock.time();
        match step {
            Step::Hold(duration) => {
                self.schedule_at(
                    now + duration,
                    EventTarget::Resume {
                        actor,
                        outcome: Outcome::Elapsed,
                    },
                )?;
                Ok(Applied::Suspended(ActorState::Waiting))
            }

            Step::Acquire(id) => {
                let resource = match self.resources.get_mut(id.0) {
                    Some(resource) => resource,
                    None => return Err(unknown_handle("resource", id.0, now)),
                };
                if resource.acquire_or_park(actor) {
                    Ok(Applied::Continue(Outcome::Acquired(id)))
                } else {
                    debug!("t={} {} waits for resource '{}'", now, actor, resource.name());
                    Ok(Applied::Suspended(ActorState::Waiting))
                }
            }

            Step::Release(id) => {
                let resource = match self.resources.get_mut(id.0) {
                    Some(resource) => resource,
                    None => return Err(unknown_handle("resource", id.0, now)),
                };
                if resource.busy() == 0 {
                    return Err(SimError::ResourceUnderflow {
                        name: resource.name().to_string(),
                        at: now,
                    });
                }
                let woken = resource.release_unit();
                if let Some(next) = woken {
                    self.schedule_at(
                        now,
                        EventTarget::Resume {
                            actor: next,
                            outcome: Outcome::Acquired(id),
                        },
                    )?;
                }
                Ok(Applied::Continue(Outcome::Released(id)))
            }

            Step::WaitIn(id) => {
                let queue = match self.queues.get_mut(id.0) {
                    Some(queue) => queue,
                    None => return Err(unknown_handle("queue", id.0, now)),
                };
                match queue.try_enter(actor) {
                    EnterResult::Entered => Ok(Applied::Suspended(ActorState::Waiting)),
                    EnterResult::Barred => {
                        debug!("t={} {} barred from queue '{}'", now, actor, queue.name());
                        Ok(Applied::Continue(Outcome::Barred(id)))
                    }
                }
            }

            Step::Leave(id) => {
                let queue = match self.queues.get_mut(id.0) {
                    Some(queue) => queue,
                    None => return Err(unknown_handle("queue", id.0, now)),
                };
                let pulled = queue.pop_next();
                if let Some(other) = pulled {
                    self.schedule_at(
                        now,
                        EventTarget::Resume {
                            actor: other,
                            outcome: Outcome::Pulled(id),
                        },
                    )?;
                }
                Ok(Applied::Continue(Outcome::Dequeued(pulled)))
            }

            Step::Enter { transport, speed } => {
                let entry = match self.transports.get_mut(transport.0) {
                    Some(entry) => entry,
                    None => return Err(unknown_handle("transport", transport.0, now)),
                };
                match entry.motion() {
                    Motion::Duration => {
                        let exit = entry.enter_duration(actor, speed, now)?;
                        self.schedule_at(
                            exit,
                            EventTarget::Resume {
                                actor,
                                outcome: Outcome::Arrived(transport),
                            },
                        )?;
                    }
                    Motion::Stepped { tick } => {
                        if entry.enter_stepped(actor, speed) {
                            self.schedule_at(now + tick, EventTarget::TransportTick(transport))?;
                        }
                    }
                }
                Ok(Applied::Suspended(ActorState::InTransit))
            }

            Step::Finish(id) => {
                let arrived = self.actors[actor.0].arrival_time;
                let sink = match self.sinks.get_mut(id.0) {
                    Some(sink) => sink,
                    None => return Err(unknown_handle("sink", id.0, now)),
                };
                sink.absorb(actor, arrived, now);
                trace!("t={} {} absorbed by sink '{}'", now, actor, sink.name());
                Ok(Applied::Finished)
            }

            Step::Stop => Ok(Applied::Finished),
        }
    }

    fn source_arrival(&mut self, id: SourceId) -> Result<(), SimError> {
        let now = self.clock.time();
        let process = {
            let source = match self.sources.get_mut(id.0) {
                Some(source) => source,
                None => return Err(unknown_handle("source", id.0, now)),
            };
            source.spawn_process()
        };
        let actor = self.insert_actor(now, process);
        debug!(
            "t={} source '{}' generated {}",
            now,
            self.sources[id.0].name(),
            actor
        );

        // Immediate activation at the current clock time, then draw the
        // next inter-arrival delay and self-schedule.
        self.run_actor_slice(actor, Outcome::Started)?;

        let next_delay = {
            let source = &mut self.sources[id.0];
            if source.has_more() {
                Some(source.next_delay())
            } else {
                debug!("t={} source '{}' exhausted", now, source.name());
                None
            }
        };
        if let Some(delay) = next_delay {
            self.schedule_at(now + delay, EventTarget::SourceArrival(id))?;
        }
        Ok(())
    }

    fn transport_tick(&mut self, id: TransportId) -> Result<(), SimError> {
        let now = self.clock.time();
        let (exits, more, tick) = {
            let transport = match self.transports.get_mut(id.0) {
                Some(transport) => transport,
                None => return Err(unknown_handle("transport", id.0, now)),
            };
            let tick = match transport.motion() {
                Motion::Stepped { tick } => tick,
                Motion::Duration => {
                    warn!("tick event on duration transport '{}'", transport.name());
                    return Ok(());
                }
            };
            let (exits, more) = transport.advance_tick(tick, now)?;
            (exits, more, tick)
        };
        for actor in exits {
            self.schedule_at(
                now,
                EventTarget::Resume {
                    actor,
                    outcome: Outcome::Arrived(id),
                },
            )?;
        }
        if more {
            self.schedule_at(now + tick, EventTarget::TransportTick(id))?;
        }
        Ok(())
    }

    fn insert_actor(&mut self, arrival_time: SimTime, process: Box<dyn Process>) -> ActorId {
        self.actors.push(ActorSlot {
            state: ActorState::Created,
            arrival_time,
            process: Some(process),
        });
        ActorId(self.actors.len() - 1)
    }

    fn schedule_at(&mut self, time: SimTime, target: EventTarget) -> Result<(), SimError> {
        if !time.is_finite() || time < self.clock.time() {
            return Err(SimError::SchedulePast {
                requested: time,
                now: self.clock.time(),
            });
        }
        self.scheduler.schedule(time, target);
        Ok(())
    }

    fn report(&self) -> RunReport {
        RunReport {
            end_time: self.clock.time(),
            events_dispatched: self.events_dispatched,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Current simulated time.
    pub fn now(&self) -> SimTime {
        self.clock.time()
    }

    /// True when no pending events remain.
    pub fn is_finished(&self) -> bool {
        self.scheduler.is_empty()
    }

    /// Events dispatched over the model's lifetime.
    pub fn events_dispatched(&self) -> u64 {
        self.events_dispatched
    }

    /// Pending events not yet dispatched.
    pub fn pending_events(&self) -> usize {
        self.scheduler.len()
    }

    pub fn resource(&self, id: ResourceId) -> Option<&Resource> {
        self.resources.get(id.0)
    }

    pub fn queue(&self, id: QueueId) -> Option<&WaitQueue> {
        self.queues.get(id.0)
    }

    pub fn source(&self, id: SourceId) -> Option<&Source> {
        self.sources.get(id.0)
    }

    pub fn sink(&self, id: SinkId) -> Option<&Sink> {
        self.sinks.get(id.0)
    }

    pub fn transport(&self, id: TransportId) -> Option<&Transport> {
        self.transports.get(id.0)
    }

    /// Lifecycle state of an actor, or `None` for a handle this model
    /// never issued.
    pub fn actor_state(&self, id: ActorId) -> Option<ActorState> {
        self.actors.get(id.0).map(|slot| slot.state)
    }

    pub fn resource_named(&self, name: &str) -> Option<ResourceId> {
        self.resources
            .iter()
            .position(|r| r.name() == name)
            .map(ResourceId)
    }

    pub fn queue_named(&self, name: &str) -> Option<QueueId> {
        self.queues
            .iter()
            .position(|q| q.name() == name)
            .map(QueueId)
    }

    pub fn sink_named(&self, name: &str) -> Option<SinkId> {
        self.sinks
            .iter()
            .position(|s| s.name() == name)
            .map(SinkId)
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

fn unknown_handle(kind: &'static str, index: usize, at: SimTime) -> SimError {
    SimError::UnknownHandle { kind, index, at }
}
