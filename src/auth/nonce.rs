use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

/// Time source used to seed nonces.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Issues the nonce attached to each signed request.
///
/// Values returned by one source must be strictly increasing, including when
/// called concurrently from several threads.
pub trait NonceSource: Send + Sync {
    fn next_nonce(&self) -> u64;
}

/// Nanosecond-resolution nonces that never repeat or go backwards.
///
/// Each value is the later of the clock reading and the previous nonce plus
/// one, so a coarse, frozen or rewound clock still yields distinct values.
pub struct MonotonicNonce<C = SystemClock> {
    clock: C,
    last: AtomicU64,
}

impl MonotonicNonce<SystemClock> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for MonotonicNonce<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> MonotonicNonce<C> {
    #[must_use]
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            last: AtomicU64::new(0),
        }
    }

    fn clock_nanos(&self) -> u64 {
        // Pre-1970 clocks and dates past 2262 both fall back to the counter.
        self.clock
            .now()
            .timestamp_nanos_opt()
            .and_then(|nanos| u64::try_from(nanos).ok())
            .unwrap_or(0)
    }
}

impl<C: Clock> NonceSource for MonotonicNonce<C> {
    fn next_nonce(&self) -> u64 {
        let now = self.clock_nanos();
        let mut last = self.last.load(Ordering::Acquire);
        loop {
            let next = now.max(last.saturating_add(1));
            match self
                .last
                .compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return next,
                Err(actual) => last = actual,
            }
        }
    }
}

impl<C> fmt::Debug for MonotonicNonce<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonotonicNonce")
            .field("last", &self.last.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
