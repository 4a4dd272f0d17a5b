//! Platform abstraction layer
//!
//! The serve delay is the only work scheduled outside the frame loop. The
//! session talks to it through `ServeTimer` so the browser can back it with
//! `setTimeout` while tests and the native demo use a virtual clock.

use std::time::Duration;

/// Handle for one scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

impl TimerId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Cancelable one-shot timers
///
/// When a timer expires the platform reports its id back to
/// `Session::serve_timer_fired`.
pub trait ServeTimer {
    /// Schedule a one-shot timer
    fn start(&mut self, delay: Duration) -> TimerId;
    /// Cancel a timer; ids that already fired or were cancelled are ignored
    fn cancel(&mut self, id: TimerId);
}

/// Deadline timers on a manually advanced clock
#[derive(Debug, Default)]
pub struct DeadlineTimers {
    now: Duration,
    next_id: u64,
    pending: Vec<(TimerId, Duration)>,
}

impl DeadlineTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on this clock
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of timers still waiting
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Move the clock forward; returns the timers that expired, earliest first
    pub fn advance(&mut self, elapsed: Duration) -> Vec<TimerId> {
        self.now += elapsed;
        let now = self.now;

        let mut expired: Vec<(TimerId, Duration)> = Vec::new();
        self.pending.retain(|&(id, deadline)| {
            if deadline <= now {
                expired.push((id, deadline));
                false
            } else {
                true
            }
        });
        expired.sort_by_key(|&(id, deadline)| (deadline, id.raw()));
        expired.into_iter().map(|(id, _)| id).collect()
    }
}

impl ServeTimer for DeadlineTimers {
    fn start(&mut self, delay: Duration) -> TimerId {
        let id = TimerId::new(self.next_id);
        self.next_id += 1;
        self.pending.push((id, self.now + delay));
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.pending.retain(|&(pending, _)| pending != id);
    }
}
