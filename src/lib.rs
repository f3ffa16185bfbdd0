// src/lib.rs

//! # Bucket Limiter
//!
//! A thread-safe token bucket rate limiter with an injectable clock.
//!
//! A bucket holds up to `capacity` tokens and starts full. Every admitted
//! request consumes one token. Once a full second has passed since the last
//! refill, the bucket gains `refill_rate` tokens per elapsed second, never
//! exceeding `capacity`.
//!
//! Two ways to ask for a token:
//!
//! * [`allow`](TokenBucketLimiter::allow) answers immediately.
//! * [`wait`](TokenBucketLimiter::wait) blocks the calling thread until a token
//!   is taken, or fails with [`RateLimiterError::Unsatisfiable`] if the bucket
//!   is empty and configured so that it can never refill.
//!
//! Time comes from a [`Clock`]. [`SystemClock`] is the default; [`ManualClock`]
//! only moves when told to, which makes blocking behaviour testable without
//! real delays.
//!
//! ## Quick Example
//!
//! ```rust
//! use bucket_limiter::{RateLimiterConfig, SystemClock, TokenBucketLimiter};
//!
//! let config = RateLimiterConfig::new(10, 5);
//! let limiter = TokenBucketLimiter::with_config(config, SystemClock).unwrap();
//!
//! if limiter.allow() {
//!     println!("Request allowed");
//! } else {
//!     println!("Rate limited");
//! }
//!
//! limiter.wait().unwrap();
//! ```

// private modules
mod clock;
mod config;
mod errors;
mod keyed;
mod rate_limiter;
mod token_bucket;

// public API exports
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::RateLimiterConfig;
pub use errors::RateLimiterError;
pub use keyed::KeyedRateLimiter;
pub use rate_limiter::RateLimiter;
pub use token_bucket::TokenBucketLimiter;
