//! Run deduplication guard.
//!
//! Serializes notification passes at minute granularity and gates scheduler
//! startup so that supervisor reloads (which re-execute process startup in a
//! second image) cannot race a second loop into existence.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};

#[derive(Debug, Default)]
struct RunState {
    /// Minutes since the Unix epoch of the last admitted tick.
    last_run_minute: Option<i64>,
    scheduler_started: bool,
}

/// Process-wide tick admission and scheduler singleton latch.
///
/// Both operations are compare-and-set under one lock, held only for the
/// comparison and update, never across fetch/send I/O.
#[derive(Debug)]
pub struct RunGuard {
    /// Whether this process image is the active worker. A supervisor's
    /// reloader parent constructs the guard with `false` and never runs the
    /// loop; the flag is supplied by the entry point, not sniffed here.
    active_worker: bool,
    state: Mutex<RunState>,
}

impl RunGuard {
    pub fn new(active_worker: bool) -> Self {
        Self {
            active_worker,
            state: Mutex::new(RunState::default()),
        }
    }

    /// Admits at most one tick per distinct minute value of `now`.
    ///
    /// The stored marker is updated before the lock is released, so no other
    /// caller can observe a stale value between check and update.
    pub fn admit_tick(&self, now: DateTime<Utc>) -> bool {
        let minute = now.timestamp().div_euclid(60);
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.last_run_minute == Some(minute) {
            return false;
        }
        state.last_run_minute = Some(minute);
        true
    }

    /// Returns `true` exactly once per process, and only in the active
    /// worker. The caller owns actually spawning the loop task.
    pub fn start_once(&self) -> bool {
        if !self.active_worker {
            return false;
        }
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.scheduler_started {
            return false;
        }
        state.scheduler_started = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;

    use super::*;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 25, h, m, s)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn same_minute_admits_once() {
        let guard = RunGuard::new(true);
        assert!(guard.admit_tick(at(8, 0, 3)));
        assert!(!guard.admit_tick(at(8, 0, 41)));
        assert!(!guard.admit_tick(at(8, 0, 59)));
    }

    #[test]
    fn consecutive_minutes_both_admit() {
        let guard = RunGuard::new(true);
        assert!(guard.admit_tick(at(8, 0, 59)));
        assert!(guard.admit_tick(at(8, 1, 0)));
    }

    #[test]
    fn start_once_latches() {
        let guard = RunGuard::new(true);
        assert!(guard.start_once());
        assert!(!guard.start_once());
    }

    #[test]
    fn inactive_worker_never_starts_the_loop() {
        let guard = RunGuard::new(false);
        assert!(!guard.start_once());
        assert!(!guard.start_once());
    }

    #[test]
    fn concurrent_ticks_in_one_minute_admit_exactly_one() {
        let guard = Arc::new(RunGuard::new(true));
        let now = at(9, 30, 12);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let guard = Arc::clone(&guard);
                std::thread::spawn(move || guard.admit_tick(now))
            })
            .collect();
        let admitted = handles
            .into_iter()
            .map(|h| h.join().unwrap_or(false))
            .filter(|admitted| *admitted)
            .count();
        assert_eq!(admitted, 1);
    }
}
