// tests/ratelimiter/fixtures/mod.rs

pub mod recording_clock;

use bucket_limiter::{Clock, TokenBucketLimiter};

/// Build a limiter and spend every token at the clock's current time.
pub fn drained<C: Clock>(capacity: i64, refill_rate: i64, clock: C) -> TokenBucketLimiter<C> {
    let limiter = TokenBucketLimiter::with_clock(capacity, refill_rate, clock).unwrap();
    for i in 0..capacity {
        assert!(limiter.allow(), "Expected request {} to be allowed", i);
    }
    limiter
}
