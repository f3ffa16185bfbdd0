// src/rate_limiter.rs

// dependencies
use crate::errors::RateLimiterError;
use std::sync::Arc;

/// The two admission modes every limiter offers.
///
/// Implementors must be safe to call from many threads at once.
pub trait RateLimiter: Send + Sync {
    /// Admit one request if possible, without blocking.
    fn allow(&self) -> bool;

    /// Block the calling thread until one request is admitted.
    fn wait(&self) -> Result<(), RateLimiterError>;
}

impl<L: RateLimiter + ?Sized> RateLimiter for Arc<L> {
    fn allow(&self) -> bool {
        (**self).allow()
    }

    fn wait(&self) -> Result<(), RateLimiterError> {
        (**self).wait()
    }
}

impl<L: RateLimiter + ?Sized> RateLimiter for Box<L> {
    fn allow(&self) -> bool {
        (**self).allow()
    }

    fn wait(&self) -> Result<(), RateLimiterError> {
        (**self).wait()
    }
}
