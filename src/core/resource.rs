use super::types::ActorId;
use super::wait_queue::{Discipline, EnterResult, WaitQueue};

/// Named pool of `capacity` interchangeable servers. Actors take and give
/// back single units; contended acquisitions park in the internal wait
/// queue and are woken in discipline order as units free up.
///
/// Invariant: `0 <= busy <= capacity`, maintained solely by the run loop.
#[derive(Debug)]
pub struct Resource {
    name: String,
    capacity: u32,
    busy: u32,
    queue: WaitQueue,
}

impl Resource {
    pub(crate) fn new(name: impl Into<String>, capacity: u32, discipline: Discipline) -> Self {
        let name = name.into();
        // Internal waiting line is unbounded; balking belongs to
        // standalone queues placed in front of the resource.
        let queue = WaitQueue::new(format!("{}.queue", name), discipline, None);
        Self {
            name,
            capacity,
            busy: 0,
            queue,
        }
    }

    /// Grant a unit immediately if one is free. Returns `true` when the
    /// caller got a unit, `false` when it was parked in the waiting line.
    pub(crate) fn acquire_or_park(&mut self, actor: ActorId) -> bool {
        if self.busy < self.capacity {
            self.busy += 1;
            true
        } else {
            let entered = self.queue.try_enter(actor);
            debug_assert_eq!(entered, EnterResult::Entered);
            false
        }
    }

    /// Give back one unit and, if anyone is waiting, hand it straight to
    /// the next waiter per discipline. Returns the woken actor, if any.
    /// The caller has already verified `busy > 0`.
    pub(crate) fn release_unit(&mut self) -> Option<ActorId> {
        debug_assert!(self.busy > 0);
        self.busy -= 1;
        let next = self.queue.pop_next();
        if next.is_some() {
            // The unit never actually goes idle: it transfers to the
            // dequeued actor, which resumes at the current time.
            self.busy += 1;
        }
        next
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Units currently held.
    pub fn busy(&self) -> u32 {
        self.busy
    }

    /// Actors parked waiting for a unit.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn queue(&self) -> &WaitQueue {
        &self.queue
    }
}
