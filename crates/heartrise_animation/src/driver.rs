//! Fixed-cadence tick driver
//!
//! The driver is a small state machine (`Idle`, `Running`, `Paused`) that
//! owns one recurring tick. Each run of the tick gets a [`CancelToken`];
//! pausing cancels it, so a tick a host already queued turns into a no-op
//! instead of touching state after the pause.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Driver lifecycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DriverState {
    /// No tick scheduled
    #[default]
    Idle,
    /// A tick is scheduled
    Running,
    /// Suspended by the host; spawns are ignored until resumed
    Paused,
}

/// Shared cancellation flag for one run of the tick loop
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// A tick waiting to run
#[derive(Clone, Debug)]
pub struct ScheduledTick {
    pub due: Duration,
    pub token: CancelToken,
}

/// Result of running (or trying to run) a tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing scheduled
    Idle,
    /// The scheduled tick is not due yet
    NotDue { due: Duration },
    /// The tick belonged to a cancelled run and did nothing
    Cancelled,
    /// Hearts remain; another tick is scheduled
    Continue { next_due: Duration },
    /// The set drained; the driver went idle
    Finished,
}

impl TickOutcome {
    /// Whether the tick changed what is on screen
    pub fn needs_redraw(&self) -> bool {
        matches!(self, TickOutcome::Continue { .. } | TickOutcome::Finished)
    }
}

/// Drives the recurring tick
#[derive(Debug)]
pub struct AnimationDriver {
    state: DriverState,
    interval: Duration,
    pending: Option<ScheduledTick>,
    token: CancelToken,
    ticks: u64,
}

impl AnimationDriver {
    pub fn new(interval: Duration) -> Self {
        Self {
            state: DriverState::Idle,
            interval,
            pending: None,
            token: CancelToken::new(),
            ticks: 0,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == DriverState::Paused
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Total ticks executed
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// The currently scheduled tick, for hosts with their own task queue
    pub fn pending(&self) -> Option<&ScheduledTick> {
        self.pending.as_ref()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.pending.as_ref().map(|tick| tick.due)
    }

    /// Start ticking if idle
    ///
    /// The first tick is due immediately. Returns `false` when already
    /// running or paused.
    pub fn start(&mut self, now: Duration) -> bool {
        if self.state != DriverState::Idle {
            return false;
        }

        self.token = CancelToken::new();
        self.pending = Some(ScheduledTick {
            due: now,
            token: self.token.clone(),
        });
        self.state = DriverState::Running;
        tracing::debug!("AnimationDriver: Idle -> Running");
        true
    }

    /// Run the pending tick if it is due
    ///
    /// `step` advances every heart, prunes finished ones and reports whether
    /// any remain.
    pub fn poll<F>(&mut self, now: Duration, step: F) -> TickOutcome
    where
        F: FnOnce() -> bool,
    {
        let Some(tick) = self.pending.clone() else {
            return TickOutcome::Idle;
        };
        if now < tick.due && !tick.token.is_cancelled() {
            return TickOutcome::NotDue { due: tick.due };
        }
        self.run(&tick, now, step)
    }

    /// Run a specific scheduled tick
    ///
    /// Ticks from a cancelled run, or ticks that are no longer the pending
    /// one, are discarded.
    pub fn run<F>(&mut self, tick: &ScheduledTick, now: Duration, step: F) -> TickOutcome
    where
        F: FnOnce() -> bool,
    {
        let current = self
            .pending
            .as_ref()
            .is_some_and(|pending| Arc::ptr_eq(&pending.token.cancelled, &tick.token.cancelled));

        if tick.token.is_cancelled() || !current || self.state != DriverState::Running {
            if current {
                self.pending = None;
            }
            tracing::trace!("AnimationDriver: discarded stale tick");
            return TickOutcome::Cancelled;
        }

        self.ticks += 1;
        let remaining = step();

        if remaining {
            let next_due = now + self.interval;
            self.pending = Some(ScheduledTick {
                due: next_due,
                token: self.token.clone(),
            });
            tracing::trace!("AnimationDriver: tick {} -> next at {:?}", self.ticks, next_due);
            TickOutcome::Continue { next_due }
        } else {
            self.pending = None;
            self.state = DriverState::Idle;
            tracing::debug!("AnimationDriver: Running -> Idle after {} ticks", self.ticks);
            TickOutcome::Finished
        }
    }

    /// Suspend ticking and cancel any scheduled tick
    pub fn pause(&mut self) {
        self.token.cancel();
        self.pending = None;
        if self.state != DriverState::Paused {
            tracing::debug!("AnimationDriver: {:?} -> Paused", self.state);
        }
        self.state = DriverState::Paused;
    }

    /// Leave the paused state
    ///
    /// Ticking does not restart by itself; the next spawn starts it.
    pub fn resume(&mut self) {
        if self.state == DriverState::Paused {
            self.state = DriverState::Idle;
            tracing::debug!("AnimationDriver: Paused -> Idle");
        }
    }
}

impl Default for AnimationDriver {
    fn default() -> Self {
        Self::new(Duration::from_millis(32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_start_schedules_immediate_tick() {
        let mut driver = AnimationDriver::default();
        assert_eq!(driver.state(), DriverState::Idle);
        assert_eq!(driver.poll(ms(0), || true), TickOutcome::Idle);

        assert!(driver.start(ms(100)));
        assert_eq!(driver.state(), DriverState::Running);
        assert_eq!(driver.next_due(), Some(ms(100)));
        // Already running
        assert!(!driver.start(ms(100)));
    }

    #[test]
    fn test_tick_reschedules_at_interval() {
        let mut driver = AnimationDriver::default();
        driver.start(ms(0));

        assert_eq!(
            driver.poll(ms(0), || true),
            TickOutcome::Continue { next_due: ms(32) }
        );
        assert_eq!(driver.poll(ms(20), || true), TickOutcome::NotDue { due: ms(32) });
        assert_eq!(
            driver.poll(ms(32), || true),
            TickOutcome::Continue { next_due: ms(64) }
        );
        assert_eq!(driver.tick_count(), 2);
    }

    #[test]
    fn test_empty_set_goes_idle() {
        let mut driver = AnimationDriver::default();
        driver.start(ms(0));
        driver.poll(ms(0), || true);

        let outcome = driver.poll(ms(32), || false);
        assert_eq!(outcome, TickOutcome::Finished);
        assert!(outcome.needs_redraw());
        assert_eq!(driver.state(), DriverState::Idle);
        assert_eq!(driver.next_due(), None);

        // Can be started again
        assert!(driver.start(ms(40)));
    }

    #[test]
    fn test_pause_cancels_queued_tick() {
        let mut driver = AnimationDriver::default();
        driver.start(ms(0));
        let queued = driver.pending().cloned().unwrap();

        driver.pause();
        assert!(queued.token.is_cancelled());
        assert_eq!(driver.state(), DriverState::Paused);

        let mut stepped = false;
        let outcome = driver.run(&queued, ms(0), || {
            stepped = true;
            true
        });
        assert_eq!(outcome, TickOutcome::Cancelled);
        assert!(!stepped);
        assert_eq!(driver.tick_count(), 0);
    }

    #[test]
    fn test_paused_driver_does_not_start() {
        let mut driver = AnimationDriver::default();
        driver.pause();
        assert!(!driver.start(ms(0)));
        assert_eq!(driver.poll(ms(1000), || true), TickOutcome::Idle);

        driver.resume();
        assert_eq!(driver.state(), DriverState::Idle);
        assert_eq!(driver.next_due(), None);
        assert!(driver.start(ms(1000)));
    }

    #[test]
    fn test_tick_from_previous_run_is_stale() {
        let mut driver = AnimationDriver::default();
        driver.start(ms(0));
        let old = driver.pending().cloned().unwrap();
        driver.pause();
        driver.resume();
        driver.start(ms(50));

        assert_eq!(driver.run(&old, ms(50), || true), TickOutcome::Cancelled);
        // The new run is untouched
        assert_eq!(driver.next_due(), Some(ms(50)));
        assert_eq!(
            driver.poll(ms(50), || true),
            TickOutcome::Continue { next_due: ms(82) }
        );
    }

    #[test]
    fn test_resume_is_noop_when_not_paused() {
        let mut driver = AnimationDriver::default();
        driver.start(ms(0));
        driver.resume();
        assert_eq!(driver.state(), DriverState::Running);
    }
}
