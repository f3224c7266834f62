//! Debounced rebuild scheduling.
//!
//! The host drives the scheduler with its own clock: it calls
//! [`UpdateScheduler::request_rebuild`] whenever data changes and
//! [`UpdateScheduler::begin_rebuild`] from its event loop. Nothing here
//! sleeps or spawns.

use std::time::{Duration, Instant};

/// Idle delay used by the viewer.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No rebuild pending.
    Idle,
    /// A rebuild will run once `due` has passed.
    Pending { due: Instant },
}

/// Coalesces bursts of rebuild requests into one deferred rebuild.
#[derive(Debug, Clone)]
pub struct UpdateScheduler {
    delay: Duration,
    state: SchedulerState,
}

impl Default for UpdateScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl UpdateScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: SchedulerState::Idle,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, SchedulerState::Pending { .. })
    }

    /// When the pending rebuild becomes due, if one is pending.
    pub fn due_at(&self) -> Option<Instant> {
        match self.state {
            SchedulerState::Pending { due } => Some(due),
            SchedulerState::Idle => None,
        }
    }

    /// Arm a rebuild `delay` after `now`.
    ///
    /// Returns `false` without moving the deadline when one is already
    /// pending.
    pub fn request_rebuild(&mut self, now: Instant) -> bool {
        if self.is_pending() {
            tracing::trace!("rebuild already pending, coalescing request");
            return false;
        }
        let due = now + self.delay;
        self.state = SchedulerState::Pending { due };
        tracing::trace!(delay_ms = self.delay.as_millis() as u64, "rebuild scheduled");
        true
    }

    /// Claim a due rebuild.
    ///
    /// Returns `true` if a pending rebuild is due at `now`; the scheduler is
    /// back to idle before the caller starts rebuilding, so requests made
    /// during the rebuild arm a fresh cycle.
    pub fn begin_rebuild(&mut self, now: Instant) -> bool {
        match self.state {
            SchedulerState::Pending { due } if now >= due => {
                self.state = SchedulerState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Drop any pending rebuild.
    pub fn cancel(&mut self) {
        self.state = SchedulerState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_never_fires() {
        let mut scheduler = UpdateScheduler::default();
        assert!(!scheduler.begin_rebuild(Instant::now() + Duration::from_secs(10)));
    }

    #[test]
    fn test_requests_coalesce() {
        let t0 = Instant::now();
        let mut scheduler = UpdateScheduler::new(Duration::from_millis(500));

        assert!(scheduler.request_rebuild(t0));
        assert!(!scheduler.request_rebuild(t0 + Duration::from_millis(100)));
        assert!(!scheduler.request_rebuild(t0 + Duration::from_millis(400)));
        // deadline is not pushed back by later requests
        assert_eq!(scheduler.due_at(), Some(t0 + Duration::from_millis(500)));

        assert!(!scheduler.begin_rebuild(t0 + Duration::from_millis(499)));
        assert!(scheduler.begin_rebuild(t0 + Duration::from_millis(500)));
        assert!(!scheduler.begin_rebuild(t0 + Duration::from_millis(900)));
    }

    #[test]
    fn test_request_during_rebuild_starts_new_cycle() {
        let t0 = Instant::now();
        let mut scheduler = UpdateScheduler::new(Duration::from_millis(50));

        scheduler.request_rebuild(t0);
        let fire = t0 + Duration::from_millis(50);
        assert!(scheduler.begin_rebuild(fire));
        assert_eq!(scheduler.state(), SchedulerState::Idle);

        assert!(scheduler.request_rebuild(fire));
        assert_eq!(scheduler.due_at(), Some(fire + Duration::from_millis(50)));
    }

    #[test]
    fn test_cancel_clears_pending() {
        let t0 = Instant::now();
        let mut scheduler = UpdateScheduler::new(Duration::ZERO);
        scheduler.request_rebuild(t0);
        scheduler.cancel();
        assert!(!scheduler.is_pending());
        assert!(!scheduler.begin_rebuild(t0));
    }
}
