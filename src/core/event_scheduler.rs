use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::process::Outcome;
use super::types::{ActorId, SimTime, SourceId, TransportId};

/// What the run loop does when an event fires.
#[derive(Debug, Clone, PartialEq)]
pub enum EventTarget {
    /// Resume a suspended actor, delivering the outcome of whatever it
    /// was blocked on.
    Resume { actor: ActorId, outcome: Outcome },
    /// A source's next arrival is due.
    SourceArrival(SourceId),
    /// A stepped-motion transport advances its occupants one tick.
    TransportTick(TransportId),
}

#[derive(Debug)]
pub struct ScheduledEvent {
    pub time: SimTime,
    pub sequence: u64,
    pub target: EventTarget,
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.sequence == other.sequence
    }
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default).
        // Ties on time fall back to sequence, so insertion order wins.
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Time-ordered pending-event structure. Events pop in ascending
/// `(time, sequence)` order; the sequence counter is assigned at enqueue
/// time, which makes equal-time dispatch reproducible.
pub struct EventScheduler {
    event_queue: BinaryHeap<ScheduledEvent>,
    sequence_counter: u64,
}

impl EventScheduler {
    pub fn new() -> Self {
        Self {
            event_queue: BinaryHeap::new(),
            sequence_counter: 0,
        }
    }

    /// Insert an event at an absolute time. Time validity against the
    /// clock is checked by the model before calling this.
    pub fn schedule(&mut self, time: SimTime, target: EventTarget) {
        let scheduled_event = ScheduledEvent {
            time,
            sequence: self.sequence_counter,
            target,
        };

        self.event_queue.push(scheduled_event);
        self.sequence_counter += 1;
    }

    /// Remove and return the earliest pending event.
    pub fn pop_next(&mut self) -> Option<ScheduledEvent> {
        self.event_queue.pop()
    }

    /// Time of the earliest pending event without removing it.
    pub fn peek_next_time(&self) -> Option<SimTime> {
        self.event_queue.peek().map(|event| event.time)
    }

    pub fn has_events(&self) -> bool {
        !self.event_queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.event_queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.event_queue.is_empty()
    }
}

impl Default for EventScheduler {
    fn default() -> Self {
        Self::new()
    }
}
