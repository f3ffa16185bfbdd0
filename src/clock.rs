// src/clock.rs

// clock module definition and implementations

// dependencies
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Clock trait to abstract time retrieval.
/// Implementors must be thread-safe (Send + Sync).
/// The `now` method returns the current time in milliseconds since the Unix epoch.
/// Readings are not required to be monotonic; limiters treat a clock that moved
/// backwards as "no time has passed".
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;

    /// Block the calling thread until `now()` reaches `deadline_ms`.
    ///
    /// The default sleeps for the remaining wall time once, without polling.
    /// Returns immediately when the deadline is not in the future.
    fn sleep_until(&self, deadline_ms: i64) {
        let remaining = deadline_ms.saturating_sub(self.now());
        if remaining > 0 {
            std::thread::sleep(Duration::from_millis(remaining as u64));
        }
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> i64 {
        (**self).now()
    }

    fn sleep_until(&self, deadline_ms: i64) {
        (**self).sleep_until(deadline_ms)
    }
}

/// SystemClock implementation using the system time.
/// Returns the current time in milliseconds since the Unix epoch.
/// A system clock set before the epoch yields negative readings instead of failing.
/// This is the default clock used by the limiters.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(since) => since.as_millis() as i64,
            Err(before) => -(before.duration().as_millis() as i64),
        }
    }
}

/// A clock whose time only moves when told to.
///
/// Clones share the same reading, so a test can hand one clone to a limiter
/// and drive time from another thread. `sleep_until` parks the caller until
/// some other holder moves the clock to or past the deadline.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    inner: Arc<ManualClockInner>,
}

#[derive(Debug, Default)]
struct ManualClockInner {
    time: Mutex<i64>,
    moved: Condvar,
}

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            inner: Arc::new(ManualClockInner {
                time: Mutex::new(start_ms),
                moved: Condvar::new(),
            }),
        }
    }

    /// Set the reported time. Moving backwards is allowed.
    pub fn set_time(&self, ms: i64) {
        let mut time = self.inner.time.lock().unwrap_or_else(PoisonError::into_inner);
        *time = ms;
        self.inner.moved.notify_all();
    }

    pub fn advance(&self, ms: i64) {
        let mut time = self.inner.time.lock().unwrap_or_else(PoisonError::into_inner);
        *time = time.saturating_add(ms);
        self.inner.moved.notify_all();
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        *self.inner.time.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn sleep_until(&self, deadline_ms: i64) {
        let time = self.inner.time.lock().unwrap_or_else(PoisonError::into_inner);
        let _reached = self
            .inner
            .moved
            .wait_while(time, |now| *now < deadline_ms)
            .unwrap_or_else(PoisonError::into_inner);
    }
}
