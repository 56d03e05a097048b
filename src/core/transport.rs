use std::collections::VecDeque;

use super::errors::SimError;
use super::types::{ActorId, SimTime};

/// Speed of the path at a given simulated time, in length units per time
/// unit. Sampled at entry under duration motion, at every tick under
/// stepped motion.
pub type SpeedProfile = Box<dyn Fn(SimTime) -> f64 + Send>;

/// How occupants move along the path.
///
/// `Duration` computes a single traversal time at entry and enforces
/// strict FIFO exits: an exit is never scheduled earlier than the
/// previously scheduled one, so a faster later entrant cannot overtake.
/// `Stepped` advances positions by `speed * tick` on every tick event and
/// removes an occupant exactly when its position reaches the length;
/// heterogeneous speeds can overtake under this model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    Duration,
    Stepped { tick: SimTime },
}

#[derive(Debug)]
struct Occupant {
    actor: ActorId,
    position: f64,
    speed_override: Option<f64>,
    // Entrants that board while a tick is already pending joined partway
    // through that tick's interval; they start moving at the next one.
    hold_first: bool,
}

/// Finite-length path carrying actors between two topology endpoints at
/// possibly time-varying speed.
pub struct Transport {
    name: String,
    length: f64,
    motion: Motion,
    profile: SpeedProfile,
    occupants: VecDeque<Occupant>,
    last_exit: SimTime,
    tick_pending: bool,
    exited: u64,
}

impl Transport {
    pub(crate) fn new(
        name: impl Into<String>,
        length: f64,
        motion: Motion,
        profile: SpeedProfile,
    ) -> Self {
        Self {
            name: name.into(),
            length,
            motion,
            profile,
            occupants: VecDeque::new(),
            last_exit: 0.0,
            tick_pending: false,
            exited: 0,
        }
    }

    fn speed_for(&self, speed_override: Option<f64>, now: SimTime) -> Result<f64, SimError> {
        let speed = speed_override.unwrap_or_else(|| (self.profile)(now));
        if speed <= 0.0 || !speed.is_finite() {
            return Err(SimError::NonPositiveSpeed {
                name: self.name.clone(),
                speed,
                at: now,
            });
        }
        Ok(speed)
    }

    /// Admit an entrant under duration motion and return its exit time:
    /// `now + length / speed`, clamped to no earlier than the previously
    /// scheduled exit so entry order is preserved.
    pub(crate) fn enter_duration(
        &mut self,
        actor: ActorId,
        speed_override: Option<f64>,
        now: SimTime,
    ) -> Result<SimTime, SimError> {
        let speed = self.speed_for(speed_override, now)?;
        let exit = (now + self.length / speed).max(self.last_exit);
        self.last_exit = exit;
        self.occupants.push_back(Occupant {
            actor,
            position: 0.0,
            speed_override,
            hold_first: false,
        });
        Ok(exit)
    }

    /// Admit an entrant under stepped motion. Returns `true` when the
    /// caller must schedule the first tick (none was pending).
    pub(crate) fn enter_stepped(&mut self, actor: ActorId, speed_override: Option<f64>) -> bool {
        let mid_interval = self.tick_pending;
        self.occupants.push_back(Occupant {
            actor,
            position: 0.0,
            speed_override,
            hold_first: mid_interval,
        });
        if self.tick_pending {
            false
        } else {
            self.tick_pending = true;
            true
        }
    }

    /// Advance every occupant one tick and drain those that reached the
    /// far end, in traversal order. Returns the exiting actors; the
    /// caller schedules their resumptions and, when `true` comes back in
    /// the second slot, the next tick.
    pub(crate) fn advance_tick(
        &mut self,
        tick: SimTime,
        now: SimTime,
    ) -> Result<(Vec<ActorId>, bool), SimError> {
        let profile = &self.profile;
        let name = &self.name;
        for occupant in self.occupants.iter_mut() {
            if occupant.hold_first {
                occupant.hold_first = false;
                continue;
            }
            let speed = occupant.speed_override.unwrap_or_else(|| profile(now));
            if speed <= 0.0 || !speed.is_finite() {
                return Err(SimError::NonPositiveSpeed {
                    name: name.clone(),
                    speed,
                    at: now,
                });
            }
            occupant.position += speed * tick;
        }

        let mut exits = Vec::new();
        let mut index = 0;
        while index < self.occupants.len() {
            if self.occupants[index].position >= self.length {
                if let Some(occupant) = self.occupants.remove(index) {
                    exits.push(occupant.actor);
                    self.exited += 1;
                }
            } else {
                index += 1;
            }
        }

        self.tick_pending = !self.occupants.is_empty();
        Ok((exits, self.tick_pending))
    }

    /// Remove a duration-motion occupant whose exit event fired. Exits
    /// are FIFO under duration motion, so it is always the head.
    pub(crate) fn complete_exit(&mut self, actor: ActorId) {
        debug_assert_eq!(self.occupants.front().map(|o| o.actor), Some(actor));
        self.occupants.pop_front();
        self.exited += 1;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn motion(&self) -> Motion {
        self.motion
    }

    /// Actors currently in transit.
    pub fn occupant_count(&self) -> usize {
        self.occupants.len()
    }

    /// Actors that have completed traversal.
    pub fn exited(&self) -> u64 {
        self.exited
    }
}
