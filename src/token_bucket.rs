// src/token_bucket.rs

// bucket-limiter: a token bucket refilled in whole-second quanta.

// dependencies
use crate::clock::{Clock, SystemClock};
use crate::config::RateLimiterConfig;
use crate::errors::RateLimiterError;
use crate::rate_limiter::RateLimiter;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Minimum elapsed time, in milliseconds, before a bucket is refilled.
pub(crate) const REFILL_QUANTUM_MS: i64 = 1_000;

/// Mutable state of one bucket. Always accessed under a lock.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Bucket {
    tokens: u64,
    last_refill_ms: i64,
}

/// Outcome of a single take attempt, with the clock reading it was made at.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Admission {
    pub(crate) admitted: bool,
    pub(crate) now_ms: i64,
    pub(crate) next_refill_ms: i64,
}

impl Bucket {
    pub(crate) fn full(capacity: u64, now_ms: i64) -> Self {
        Self {
            tokens: capacity,
            last_refill_ms: now_ms,
        }
    }

    pub(crate) fn last_refill_ms(&self) -> i64 {
        self.last_refill_ms
    }

    // Negative elapsed time (clock went backwards) is simply "not due yet".
    fn refill(&mut self, now_ms: i64, capacity: u64, refill_rate: u64) {
        let elapsed = now_ms.saturating_sub(self.last_refill_ms);
        if elapsed < REFILL_QUANTUM_MS {
            return;
        }

        let added = u128::from(refill_rate) * elapsed as u128 / REFILL_QUANTUM_MS as u128;
        let tokens = (u128::from(self.tokens) + added).min(u128::from(capacity)) as u64;
        trace!(elapsed, before = self.tokens, after = tokens, "refilled bucket");

        self.tokens = tokens;
        self.last_refill_ms = now_ms;
    }

    pub(crate) fn try_take(&mut self, now_ms: i64, capacity: u64, refill_rate: u64) -> Admission {
        self.refill(now_ms, capacity, refill_rate);

        let admitted = self.tokens > 0;
        if admitted {
            self.tokens -= 1;
        }

        Admission {
            admitted,
            now_ms,
            next_refill_ms: self.last_refill_ms.saturating_add(REFILL_QUANTUM_MS),
        }
    }
}

/// Retry `try_take` until it admits, sleeping on `clock` between attempts.
///
/// `try_take` must take and release its own lock; nothing is held while
/// sleeping. With a `timeout`, gives up once the clock reaches the first
/// attempt's reading plus the timeout.
pub(crate) fn block_until_admitted<C, F>(
    clock: &C,
    capacity: u64,
    refill_rate: u64,
    timeout: Option<Duration>,
    mut try_take: F,
) -> Result<(), RateLimiterError>
where
    C: Clock + ?Sized,
    F: FnMut() -> Admission,
{
    let mut give_up_ms: Option<i64> = None;

    loop {
        let admission = try_take();
        if admission.admitted {
            return Ok(());
        }

        if capacity == 0 || refill_rate == 0 {
            warn!(capacity, refill_rate, "bucket is empty and can never refill");
            return Err(RateLimiterError::Unsatisfiable {
                capacity,
                refill_rate,
            });
        }

        let wake_ms = match timeout {
            None => admission.next_refill_ms,
            Some(timeout) => {
                let give_up = *give_up_ms.get_or_insert_with(|| {
                    let millis = i64::try_from(timeout.as_millis()).unwrap_or(i64::MAX);
                    admission.now_ms.saturating_add(millis)
                });
                if admission.now_ms >= give_up {
                    debug!(?timeout, "gave up waiting for a token");
                    return Err(RateLimiterError::Timeout { waited: timeout });
                }
                admission.next_refill_ms.min(give_up)
            }
        };

        debug!(
            now_ms = admission.now_ms,
            wake_ms, "no tokens available, sleeping until next refill"
        );
        clock.sleep_until(wake_ms);
    }
}

/// A thread-safe token bucket.
///
/// The bucket starts full. Once at least one second has passed since the last
/// refill, the next call adds `refill_rate * elapsed_ms / 1000` tokens (integer
/// division), capped at `capacity`, and restarts the refill timer at the current
/// reading. Each admitted request consumes one token.
///
/// All state changes happen under a single per-instance mutex that is held only
/// for the clock read and the arithmetic. Waiters sleep outside it, and there is
/// no fairness between them.
///
/// # Example
///
/// ```rust
/// use bucket_limiter::{ManualClock, TokenBucketLimiter};
///
/// let clock = ManualClock::new(0);
/// let limiter = TokenBucketLimiter::with_clock(2, 2, clock.clone()).unwrap();
///
/// assert!(limiter.allow());
/// assert!(limiter.allow());
/// assert!(!limiter.allow());
///
/// clock.set_time(1_000);
/// assert!(limiter.allow());
/// ```
#[derive(Debug)]
pub struct TokenBucketLimiter<C = SystemClock>
where
    C: Clock,
{
    capacity: u64,
    refill_rate: u64,
    state: Mutex<Bucket>,
    clock: C,
}

impl TokenBucketLimiter<SystemClock> {
    /// Create a limiter driven by the system clock.
    pub fn new(capacity: i64, refill_rate: i64) -> Result<Self, RateLimiterError> {
        Self::with_clock(capacity, refill_rate, SystemClock)
    }
}

impl<C> TokenBucketLimiter<C>
where
    C: Clock,
{
    /// Create a limiter driven by `clock`.
    pub fn with_clock(capacity: i64, refill_rate: i64, clock: C) -> Result<Self, RateLimiterError> {
        Self::with_config(RateLimiterConfig::new(capacity, refill_rate), clock)
    }

    // method to create a new limiter from a config object
    pub fn with_config(config: RateLimiterConfig, clock: C) -> Result<Self, RateLimiterError> {
        config.validate()?;
        let capacity = config.capacity as u64;
        let now_ms = clock.now();

        Ok(Self {
            capacity,
            refill_rate: config.refill_rate as u64,
            state: Mutex::new(Bucket::full(capacity, now_ms)),
            clock,
        })
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn refill_rate(&self) -> u64 {
        self.refill_rate
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn try_take(&self) -> Admission {
        // The bucket is two integers, so a panic elsewhere cannot leave it torn.
        let mut bucket = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let now_ms = self.clock.now();
        let admission = bucket.try_take(now_ms, self.capacity, self.refill_rate);
        if !admission.admitted {
            debug!(now_ms, capacity = self.capacity, "request denied");
        }
        admission
    }

    /// Take a token if one is available. Never blocks.
    pub fn allow(&self) -> bool {
        self.try_take().admitted
    }

    /// Block until a token is taken.
    ///
    /// Returns at once when a token is available. Otherwise sleeps on the clock
    /// until the next refill is due and tries again, as many times as needed.
    ///
    /// # Errors
    ///
    /// Returns [`RateLimiterError::Unsatisfiable`] instead of blocking forever
    /// when the bucket is empty and has zero capacity or zero refill rate.
    pub fn wait(&self) -> Result<(), RateLimiterError> {
        block_until_admitted(&self.clock, self.capacity, self.refill_rate, None, || {
            self.try_take()
        })
    }

    /// Like [`wait`](Self::wait), but gives up after `timeout` of clock time.
    ///
    /// A zero timeout behaves like a single [`allow`](Self::allow) that reports
    /// denial as [`RateLimiterError::Timeout`].
    pub fn wait_timeout(&self, timeout: Duration) -> Result<(), RateLimiterError> {
        block_until_admitted(
            &self.clock,
            self.capacity,
            self.refill_rate,
            Some(timeout),
            || self.try_take(),
        )
    }
}

impl<C> RateLimiter for TokenBucketLimiter<C>
where
    C: Clock,
{
    fn allow(&self) -> bool {
        TokenBucketLimiter::allow(self)
    }

    fn wait(&self) -> Result<(), RateLimiterError> {
        TokenBucketLimiter::wait(self)
    }
}
