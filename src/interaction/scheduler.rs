//! Timer capability used for the press delay and edge navigation.
//!
//! Timers never run callbacks themselves: when one fires the host feeds its
//! handle back through `InteractionController::timer_fired`, keeping every
//! transition on the host's single input thread.

use chrono::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

pub trait TimerScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerHandle;

    /// Cancelling an unknown or already fired handle is a no-op.
    fn cancel(&mut self, handle: TimerHandle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingTimer {
    handle: TimerHandle,
    deadline: Duration,
}

/// Scheduler driven by an explicit virtual clock.
///
/// Useful for hosts that poll (advance once per frame) and for tests.
#[derive(Debug)]
pub struct ManualScheduler {
    elapsed: Duration,
    next_handle: u64,
    pending: Vec<PendingTimer>,
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self {
            elapsed: Duration::zero(),
            next_handle: 0,
            pending: Vec::new(),
        }
    }

    /// Time advanced so far.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|timer| timer.handle == handle)
    }

    /// Advance the clock and return the handles that fired, in deadline order.
    pub fn advance(&mut self, by: Duration) -> Vec<TimerHandle> {
        self.elapsed += by;
        let now = self.elapsed;

        let mut due: Vec<PendingTimer> = Vec::new();
        self.pending.retain(|timer| {
            if timer.deadline <= now {
                due.push(*timer);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|timer| (timer.deadline, timer.handle));
        due.into_iter().map(|timer| timer.handle).collect()
    }
}

impl TimerScheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.push(PendingTimer {
            handle,
            deadline: self.elapsed + delay.max(Duration::zero()),
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.pending.retain(|timer| timer.handle != handle);
    }
}
