use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::types::ActorId;

/// The order in which a wait queue releases held actors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Discipline {
    /// First come, first served: enter at the tail, leave from the head.
    Fcfs,
    /// Last come, first served: enter at the head, leave from the head.
    Lcfs,
}

/// Result of attempting to enter a wait queue. A refusal is an expected
/// contention outcome the caller branches on, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterResult {
    Entered,
    Barred,
}

/// Ordered holding area with a discipline and an optional capacity bound.
/// Used standalone (actors park via `WaitIn`, others pull via `Leave`)
/// and as the waiting line inside a `Resource`.
#[derive(Debug)]
pub struct WaitQueue {
    name: String,
    discipline: Discipline,
    capacity: Option<usize>,
    contents: VecDeque<ActorId>,
    barred: u64,
    entered: u64,
}

impl WaitQueue {
    /// `capacity: None` means unbounded. A bounded capacity of zero is
    /// rejected at registration, before this is constructed.
    pub(crate) fn new(name: impl Into<String>, discipline: Discipline, capacity: Option<usize>) -> Self {
        Self {
            name: name.into(),
            discipline,
            capacity,
            contents: VecDeque::new(),
            barred: 0,
            entered: 0,
        }
    }

    /// Insert an actor, or refuse it if the queue is at its bound. The
    /// refused actor is never enqueued; the caller routes it to its balk
    /// path.
    pub(crate) fn try_enter(&mut self, actor: ActorId) -> EnterResult {
        if let Some(cap) = self.capacity {
            if self.contents.len() >= cap {
                self.barred += 1;
                return EnterResult::Barred;
            }
        }
        match self.discipline {
            Discipline::Fcfs => self.contents.push_back(actor),
            Discipline::Lcfs => self.contents.push_front(actor),
        }
        self.entered += 1;
        EnterResult::Entered
    }

    /// Remove and return the next actor per the discipline, or `None` if
    /// the queue is empty. Both disciplines pop from the head: FCFS
    /// entered at the tail (oldest first), LCFS entered at the head
    /// (most recent first).
    pub(crate) fn pop_next(&mut self) -> Option<ActorId> {
        self.contents.pop_front()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn discipline(&self) -> Discipline {
        self.discipline
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Number of actors currently held.
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// How many actors were refused entry. Only ever increases.
    pub fn barred_count(&self) -> u64 {
        self.barred
    }

    /// How many actors were accepted over the queue's lifetime.
    pub fn entered_count(&self) -> u64 {
        self.entered
    }
}
