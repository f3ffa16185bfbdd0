// tests/ratelimiter/fixtures/recording_clock.rs

// dependencies
use bucket_limiter::{Clock, ManualClock};
use std::sync::{Arc, Mutex};

// Manual clock that remembers every deadline a waiter slept until
#[derive(Debug, Clone, Default)]
pub struct RecordingClock {
    clock: ManualClock,
    sleeps: Arc<Mutex<Vec<i64>>>,
}

impl RecordingClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            clock: ManualClock::new(start_ms),
            sleeps: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn set_time(&self, ms: i64) {
        self.clock.set_time(ms);
    }

    pub fn sleeps(&self) -> Vec<i64> {
        self.sleeps.lock().unwrap().clone()
    }
}

impl Clock for RecordingClock {
    fn now(&self) -> i64 {
        self.clock.now()
    }

    fn sleep_until(&self, deadline_ms: i64) {
        self.sleeps.lock().unwrap().push(deadline_ms);
        self.clock.sleep_until(deadline_ms);
    }
}
