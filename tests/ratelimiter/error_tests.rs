// tests/ratelimiter/error_tests.rs

#[cfg(test)]
mod tests {
    use crate::fixtures::drained;
    use bucket_limiter::{ManualClock, RateLimiterError, TokenBucketLimiter};
    use std::time::Duration;

    #[test]
    fn wait_on_zero_capacity_is_unsatisfiable() {
        let limiter = TokenBucketLimiter::with_clock(0, 10, ManualClock::new(0)).unwrap();

        match limiter.wait() {
            Err(RateLimiterError::Unsatisfiable {
                capacity,
                refill_rate,
            }) => {
                assert_eq!(capacity, 0);
                assert_eq!(refill_rate, 10);
            }
            other => panic!("Expected Unsatisfiable, got: {:?}", other),
        }
    }

    #[test]
    fn wait_on_spent_fixed_budget_is_unsatisfiable() {
        let limiter = drained(3, 0, ManualClock::new(0));
        assert!(matches!(
            limiter.wait(),
            Err(RateLimiterError::Unsatisfiable { .. })
        ));
    }

    #[test]
    fn fixed_budget_wait_succeeds_while_tokens_remain() {
        let limiter = TokenBucketLimiter::with_clock(1, 0, ManualClock::new(0)).unwrap();
        assert!(limiter.wait().is_ok());
        assert!(limiter.wait().is_err());
    }

    #[test]
    fn wait_timeout_reports_waited_duration() {
        let limiter = drained(1, 1, ManualClock::new(0));
        let result = limiter.wait_timeout(Duration::ZERO);
        assert_eq!(
            result,
            Err(RateLimiterError::Timeout {
                waited: Duration::ZERO
            })
        );
    }

    #[test]
    fn error_display_formatting() {
        let cases = [
            (RateLimiterError::InvalidCapacity(-1), "capacity"),
            (RateLimiterError::InvalidRefillRate(-2), "refill rate"),
            (
                RateLimiterError::Timeout {
                    waited: Duration::from_millis(250),
                },
                "timed out",
            ),
            (
                RateLimiterError::Unsatisfiable {
                    capacity: 0,
                    refill_rate: 1,
                },
                "never admit",
            ),
        ];

        for (error, needle) in cases {
            let error_string = error.to_string();
            assert!(
                error_string.to_lowercase().contains(needle),
                "{:?} rendered as {:?}",
                error,
                error_string
            );
        }
    }

    #[test]
    fn errors_are_std_errors() {
        let error: Box<dyn std::error::Error + Send + Sync> =
            Box::new(RateLimiterError::InvalidCapacity(-7));
        assert!(error.to_string().contains("-7"));
    }
}
