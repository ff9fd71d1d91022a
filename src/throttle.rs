//! Rate limiter that drops calls instead of queueing them.

use std::time::{Duration, Instant};

/// Runs a wrapped call at most once per `interval`.
///
/// State is the timestamp of the last call that actually ran; calls inside
/// the interval are dropped, never deferred. Not reentrant-safe: intended
/// for single-threaded use inside handlers.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Run `f` if the interval has elapsed since the last successful call.
    ///
    /// Returns `Some` with the result when `f` ran, `None` when the call
    /// was dropped. The first call always runs.
    pub fn call<T>(&mut self, f: impl FnOnce() -> T) -> Option<T> {
        let now = Instant::now();
        match self.last {
            Some(last) if now.duration_since(last) < self.interval => None,
            _ => {
                self.last = Some(now);
                Some(f())
            }
        }
    }
}
