// src/config.rs

//! Configuration types for the bucket limiters

// dependencies
use crate::errors::RateLimiterError;

/// Configuration for a token bucket.
///
/// `capacity` is the most tokens the bucket holds (the largest burst), and
/// `refill_rate` is how many tokens one full second of elapsed time adds back.
///
/// Negative values are rejected by [`validate`](Self::validate). Zero is
/// accepted for both: a zero capacity never admits anything, and a zero refill
/// rate is a one-shot budget that is never replenished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiterConfig {
    pub(crate) capacity: i64,
    pub(crate) refill_rate: i64,
}

impl RateLimiterConfig {
    /// Create a new configuration with capacity and refill rate settings
    pub fn new(capacity: i64, refill_rate: i64) -> Self {
        Self {
            capacity,
            refill_rate,
        }
    }

    /// Builder-style: set bucket capacity
    pub fn capacity(mut self, capacity: i64) -> Self {
        self.capacity = capacity;
        self
    }

    /// Builder-style: set tokens added per second
    pub fn refill_rate(mut self, refill_rate: i64) -> Self {
        self.refill_rate = refill_rate;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), RateLimiterError> {
        if self.capacity < 0 {
            return Err(RateLimiterError::InvalidCapacity(self.capacity));
        }
        if self.refill_rate < 0 {
            return Err(RateLimiterError::InvalidRefillRate(self.refill_rate));
        }
        Ok(())
    }

    // A bucket with these settings cannot admit again once it runs dry.
    pub(crate) fn never_refills(&self) -> bool {
        self.capacity == 0 || self.refill_rate == 0
    }
}
