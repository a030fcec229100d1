//! Single-threaded timer queue.
//!
//! Everything runs on one loop: the owner feeds the queue its clock via
//! [`TimerQueue::pop_due`] and dispatches each timer as it comes out.
//! Handles are never reused, so a cancelled or fired id can't alias a
//! later timer.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    /// Passive decay step.
    Decay,
    /// The current activity directive has played out.
    DirectiveExpired,
    /// Next animation frame.
    FrameAdvance,
}

/// "Call me back after N" with cancellation.
pub trait Scheduler {
    fn schedule(&mut self, delay: Duration, event: TimerEvent) -> TimerId;

    /// Returns `false` if the timer already fired or was cancelled before.
    fn cancel(&mut self, id: TimerId) -> bool;
}

pub struct TimerQueue {
    now: Duration,
    next_id: u64,
    pending: BTreeMap<(Duration, TimerId), TimerEvent>,
    deadlines: HashMap<TimerId, Duration>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id)
    }

    /// Pops the earliest timer due at or before `until`, moving the clock to
    /// its deadline so anything the caller reschedules while handling it
    /// stays on cadence. Once nothing else is due the clock settles on
    /// `until` and `None` is returned.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerId, TimerEvent)> {
        let next = self.pending.first_key_value().map(|(&key, _)| key);
        match next {
            Some((deadline, id)) if deadline <= until => {
                self.now = self.now.max(deadline);
                self.deadlines.remove(&id);
                let event = self.pending.remove(&(deadline, id))?;
                trace!(?id, ?event, "timer fired");
                Some((id, event))
            }
            _ => {
                self.now = self.now.max(until);
                None
            }
        }
    }

    /// Collects everything due by `until` without interleaving dispatch.
    pub fn drain_due(&mut self, until: Duration) -> Vec<(TimerId, TimerEvent)> {
        std::iter::from_fn(|| self.pop_due(until)).collect()
    }
}

impl Default for TimerQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&mut self, delay: Duration, event: TimerEvent) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let deadline = self.now + delay;
        self.pending.insert((deadline, id), event);
        self.deadlines.insert(id, deadline);
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        match self.deadlines.remove(&id) {
            Some(deadline) => {
                self.pending.remove(&(deadline, id));
                trace!(?id, "timer cancelled");
                true
            }
            None => false,
        }
    }
}
