// src/keyed.rs

// one independent token bucket per key, sharing a config and a clock

// dependencies
use crate::clock::{Clock, SystemClock};
use crate::config::RateLimiterConfig;
use crate::errors::RateLimiterError;
use crate::token_bucket::{Admission, Bucket, block_until_admitted};
use dashmap::DashMap;
use std::hash::Hash;
use std::time::Duration;
use tracing::debug;

/// A token bucket per key (client id, IP address, tenant...).
/// K is the type used to identify keys (e.g., String, u64, etc.).
/// C is the clock type, defaulting to SystemClock.
/// Buckets live in a `DashMap`, so callers on different keys rarely contend;
/// each bucket is created full on the first request for its key.
#[derive(Debug)]
pub struct KeyedRateLimiter<K, C = SystemClock>
where
    K: Hash + Eq + Clone,
    C: Clock,
{
    capacity: u64,
    refill_rate: u64,
    buckets: DashMap<K, Bucket>,
    clock: C,
}

impl<K> KeyedRateLimiter<K, SystemClock>
where
    K: Hash + Eq + Clone,
{
    pub fn new(capacity: i64, refill_rate: i64) -> Result<Self, RateLimiterError> {
        Self::with_config(RateLimiterConfig::new(capacity, refill_rate), SystemClock)
    }
}

// methods for the KeyedRateLimiter type
impl<K, C> KeyedRateLimiter<K, C>
where
    K: Hash + Eq + Clone,
    C: Clock,
{
    // method to create a new keyed limiter from a config object
    pub fn with_config(config: RateLimiterConfig, clock: C) -> Result<Self, RateLimiterError> {
        config.validate()?;

        Ok(Self {
            capacity: config.capacity as u64,
            refill_rate: config.refill_rate as u64,
            buckets: DashMap::new(),
            clock,
        })
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn refill_rate(&self) -> u64 {
        self.refill_rate
    }

    // the shard guard is the per-bucket lock; it drops before returning
    fn try_take(&self, key: &K) -> Admission {
        let mut bucket = self
            .buckets
            .entry(key.clone())
            .or_insert_with(|| Bucket::full(self.capacity, self.clock.now()));
        let now_ms = self.clock.now();
        bucket.try_take(now_ms, self.capacity, self.refill_rate)
    }

    /// Take a token from `key`'s bucket if one is available. Never blocks.
    pub fn allow(&self, key: K) -> bool {
        self.try_take(&key).admitted
    }

    /// Block until a token is taken from `key`'s bucket.
    ///
    /// # Errors
    ///
    /// [`RateLimiterError::Unsatisfiable`] when the bucket is empty and can never refill.
    pub fn wait(&self, key: K) -> Result<(), RateLimiterError> {
        block_until_admitted(&self.clock, self.capacity, self.refill_rate, None, || {
            self.try_take(&key)
        })
    }

    /// Like [`wait`](Self::wait), giving up after `timeout` of clock time.
    pub fn wait_timeout(&self, key: K, timeout: Duration) -> Result<(), RateLimiterError> {
        block_until_admitted(
            &self.clock,
            self.capacity,
            self.refill_rate,
            Some(timeout),
            || self.try_take(&key),
        )
    }

    /// Drop buckets whose last refill is at least `max_idle_ms` old.
    ///
    /// A dropped key starts over with a full bucket. Pick a threshold of at
    /// least `capacity * 1000 / refill_rate` ms so that only buckets which
    /// would have refilled completely anyway are forgotten.
    pub fn cleanup_idle(&self, max_idle_ms: i64) {
        let now_ms = self.clock.now();
        let before = self.buckets.len();
        self.buckets
            .retain(|_, bucket| now_ms.saturating_sub(bucket.last_refill_ms()) < max_idle_ms);
        debug!(
            removed = before.saturating_sub(self.buckets.len()),
            "cleaned up idle buckets"
        );
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
