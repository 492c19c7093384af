//! Timeout bookkeeping for polling loops.
//!
//! [`UntilTimeout`] hands out the number of seconds left before a timeout
//! expires, recomputed from the clock on every query. Once nothing is left
//! it yields `None`, which polling loops treat as a timeout failure.

use std::time::{Duration, Instant};

use crate::{Error, Result};

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// Yields the remaining number of seconds until `timeout` has passed since
/// `start`.
#[derive(Debug, Clone)]
pub struct UntilTimeout<C: Clock = SystemClock> {
    timeout: Duration,
    start: Instant,
    clock: C,
}

impl UntilTimeout {
    pub fn new(timeout: Duration) -> Self {
        Self::with_clock(timeout, SystemClock)
    }

    pub fn with_start(timeout: Duration, start: Instant) -> Self {
        Self {
            timeout,
            start,
            clock: SystemClock,
        }
    }
}

impl<C: Clock> UntilTimeout<C> {
    /// Start counting from the clock's current instant.
    pub fn with_clock(timeout: Duration, clock: C) -> Self {
        let start = clock.now();
        Self {
            timeout,
            start,
            clock,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn start(&self) -> Instant {
        self.start
    }

    /// Seconds left, or `None` once the timeout has been reached.
    pub fn next_remaining(&self) -> Option<f64> {
        let now = self.clock.now();
        // a start in the future counts as negative elapsed time
        let elapsed = match now.checked_duration_since(self.start) {
            Some(elapsed) => elapsed.as_secs_f64(),
            None => -(self.start - now).as_secs_f64(),
        };

        let remaining = self.timeout.as_secs_f64() - elapsed;
        if remaining <= 0.0 {
            tracing::trace!(timeout = ?self.timeout, "deadline reached");
            return None;
        }

        Some(remaining)
    }

    /// Like [`Self::next_remaining`] but reports exhaustion as
    /// [`Error::DeadlineExceeded`].
    pub fn remaining(&self) -> Result<f64> {
        self.next_remaining().ok_or(Error::DeadlineExceeded {
            timeout: self.timeout,
        })
    }
}

impl<C: Clock> Iterator for UntilTimeout<C> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        self.next_remaining()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct ManualClock {
        now: Cell<Instant>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                now: Cell::new(Instant::now()),
            }
        }

        fn advance(&self, by: Duration) {
            self.now.set(self.now.get() + by);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.now.get()
        }
    }

    #[test]
    fn yields_remaining_seconds() {
        let clock = ManualClock::new();
        let mut deadline = UntilTimeout::with_clock(Duration::from_secs(10), &clock);

        assert_eq!(deadline.next(), Some(10.0));
        clock.advance(Duration::from_secs(4));
        assert_eq!(deadline.next(), Some(6.0));
    }

    #[test]
    fn exhausted_just_after_timeout() {
        let clock = ManualClock::new();
        let deadline = UntilTimeout::with_clock(Duration::from_secs(10), &clock);

        clock.advance(Duration::from_millis(9_999));
        assert!(deadline.next_remaining().is_some());

        clock.advance(Duration::from_millis(2));
        assert_eq!(deadline.next_remaining(), None);
    }

    #[test]
    fn exhausted_exactly_at_timeout() {
        let clock = ManualClock::new();
        let deadline = UntilTimeout::with_clock(Duration::from_secs(3), &clock);

        clock.advance(Duration::from_secs(3));
        assert_eq!(deadline.next_remaining(), None);
    }

    #[test]
    fn stays_exhausted() {
        let clock = ManualClock::new();
        let mut deadline = UntilTimeout::with_clock(Duration::from_secs(1), &clock);

        clock.advance(Duration::from_secs(2));
        assert_eq!(deadline.next(), None);
        clock.advance(Duration::from_secs(2));
        assert_eq!(deadline.next(), None);
    }

    #[test]
    fn zero_timeout_is_exhausted_immediately() {
        let clock = ManualClock::new();
        let deadline = UntilTimeout::with_clock(Duration::ZERO, &clock);

        assert!(matches!(
            deadline.remaining(),
            Err(Error::DeadlineExceeded { timeout }) if timeout == Duration::ZERO
        ));
    }

    #[test]
    fn future_start_extends_remaining() {
        let start = Instant::now() + Duration::from_secs(60);
        let deadline = UntilTimeout::with_start(Duration::from_secs(1), start);

        let remaining = deadline.remaining().expect("deadline should not be exhausted");
        assert!(remaining > 59.0);
    }

    #[test]
    fn system_clock_counts_down() {
        let deadline = UntilTimeout::new(Duration::from_secs(30));
        let first = deadline.remaining().expect("fresh deadline");
        let second = deadline.remaining().expect("fresh deadline");

        assert!(first <= 30.0);
        assert!(second <= first);
    }
}
