use std::time::{Duration, Instant};

/// Handle for one started timer. Never reused by the scheduler that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

impl TimerId {
    pub fn new(raw: u64) -> Self {
        TimerId(raw)
    }
}

/// Starts and cancels repeating timers.
pub trait Scheduler {
    fn start(&mut self, interval: Duration) -> TimerId;
    /// Cancelling an id that is not active does nothing.
    fn cancel(&mut self, id: TimerId);
}

impl<S: Scheduler + ?Sized> Scheduler for &mut S {
    fn start(&mut self, interval: Duration) -> TimerId {
        (**self).start(interval)
    }

    fn cancel(&mut self, id: TimerId) {
        (**self).cancel(id)
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveTimer {
    id: TimerId,
    interval: Duration,
    due: Instant,
}

// ---------------------------------------------------------------------------
// IntervalTimer – polled from the egui frame loop
// ---------------------------------------------------------------------------

/// A single-slot repeating timer driven by explicit polling.
///
/// The UI calls [`poll`](Self::poll) once per frame and asks egui for a
/// repaint after [`time_until_due`](Self::time_until_due).
#[derive(Debug)]
pub struct IntervalTimer {
    next_id: u64,
    active: Option<ActiveTimer>,
    clock: fn() -> Instant,
}

impl Default for IntervalTimer {
    fn default() -> Self {
        Self::with_clock(Instant::now)
    }
}

impl IntervalTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom clock for the start instant (tests).
    pub fn with_clock(clock: fn() -> Instant) -> Self {
        Self {
            next_id: 0,
            active: None,
            clock,
        }
    }

    pub fn active(&self) -> Option<TimerId> {
        self.active.map(|t| t.id)
    }

    /// Fire the active timer if it is due, re-arming it for the next interval.
    /// Fires at most once per call; a poll that lags more than one interval
    /// behind re-arms from `now` instead of replaying the missed ticks.
    pub fn poll(&mut self, now: Instant) -> Option<TimerId> {
        let timer = self.active.as_mut()?;
        if now < timer.due {
            return None;
        }
        let next = timer.due + timer.interval;
        timer.due = if next <= now { now + timer.interval } else { next };
        Some(timer.id)
    }

    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.active.map(|t| t.due.saturating_duration_since(now))
    }
}

impl Scheduler for IntervalTimer {
    fn start(&mut self, interval: Duration) -> TimerId {
        if let Some(old) = self.active {
            log::warn!("Timer {:?} replaced without being cancelled", old.id);
        }
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.active = Some(ActiveTimer {
            id,
            interval,
            due: (self.clock)() + interval,
        });
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if self.active.is_some_and(|t| t.id == id) {
            self.active = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::OnceLock;

    fn epoch() -> Instant {
        static EPOCH: OnceLock<Instant> = OnceLock::new();
        *EPOCH.get_or_init(Instant::now)
    }

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn fires_once_per_interval() {
        let mut timer = IntervalTimer::with_clock(epoch);
        let id = timer.start(SECOND);

        assert_eq!(timer.poll(epoch()), None);
        assert_eq!(timer.poll(epoch() + SECOND), Some(id));
        // Same frame again: already re-armed.
        assert_eq!(timer.poll(epoch() + SECOND), None);
        assert_eq!(timer.poll(epoch() + 2 * SECOND), Some(id));
    }

    #[test]
    fn lagging_poll_does_not_burst() {
        let mut timer = IntervalTimer::with_clock(epoch);
        let id = timer.start(SECOND);
        let late = epoch() + 5 * SECOND;

        assert_eq!(timer.poll(late), Some(id));
        assert_eq!(timer.poll(late), None);
        assert_eq!(timer.time_until_due(late), Some(SECOND));
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut timer = IntervalTimer::with_clock(epoch);
        let id = timer.start(SECOND);
        timer.cancel(id);

        assert_eq!(timer.active(), None);
        assert_eq!(timer.poll(epoch() + 3 * SECOND), None);
        assert_eq!(timer.time_until_due(epoch()), None);
    }

    #[test]
    fn restart_issues_a_fresh_id_and_ignores_stale_cancel() {
        let mut timer = IntervalTimer::with_clock(epoch);
        let first = timer.start(SECOND);
        timer.cancel(first);
        let second = timer.start(SECOND);
        assert_ne!(first, second);

        timer.cancel(first);
        assert_eq!(timer.active(), Some(second));
    }
}
