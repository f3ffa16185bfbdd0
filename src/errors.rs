// src/errors.rs

// error handling for the bucket limiter types

// dependencies
use std::time::Duration;

/// Error type for limiter configuration and blocking admission.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateLimiterError {
    /// Capacity below zero.
    #[error("Capacity must be non-negative, got {0}")]
    InvalidCapacity(i64),

    /// Refill rate below zero.
    #[error("Refill rate must be non-negative, got {0}")]
    InvalidRefillRate(i64),

    /// A bounded wait ran out of time before a token became available.
    #[error("Timed out after {waited:?} waiting for a token")]
    Timeout { waited: Duration },

    /// The bucket is empty and its settings mean it will never refill,
    /// so waiting would block forever.
    #[error("Bucket can never admit (capacity {capacity}, refill rate {refill_rate})")]
    Unsatisfiable { capacity: u64, refill_rate: u64 },
}
