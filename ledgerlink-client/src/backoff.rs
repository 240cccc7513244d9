//! Reconnection backoff strategies
//!
//! When the socket drops, the strategy decides how long to wait before the
//! next attempt and when to give up. A strategy is pure: it has no side
//! effects beyond advancing its own cursor, so it can be unit-tested without
//! a connection.
//!
//! # Built-in Strategies
//!
//! - **FibonacciBackoff**: Fibonacci-growing delays with jitter (default)
//! - **FixedDelay**: Constant delay between attempts
//! - **NoReconnect**: Give up immediately
//!
//! # Custom Strategies
//!
//! Implement the `ReconnectStrategy` trait for custom behavior.
//!
//! # Examples
//!
//! ```rust
//! use ledgerlink_client::FibonacciBackoff;
//! use std::time::Duration;
//!
//! // Default: 100ms base, 30s cap, max 10 attempts, with jitter
//! let default = FibonacciBackoff::default();
//!
//! // Custom: 1s base, 60s cap, unlimited attempts
//! let custom = FibonacciBackoff::new(
//!     Duration::from_secs(1),
//!     Duration::from_secs(60)
//! );
//! ```

use std::time::Duration;

/// Decides the delay before each reconnection attempt.
///
/// The connection manager calls `next_delay` once per attempt until either
/// the connection is re-established or the strategy returns `None`, which is
/// terminal. `reset` is called on every successful open so the next outage
/// starts the sequence over.
pub trait ReconnectStrategy: Send + Sync {
    /// Delay before the next attempt, or `None` to give up.
    ///
    /// Each call consumes one attempt from the strategy's budget.
    fn next_delay(&mut self) -> Option<Duration>;

    /// Restart the delay sequence after a successful connection.
    fn reset(&mut self);
}

/// Fibonacci backoff with bounded random jitter.
///
/// Delays grow as `base * fib(n)` (1, 1, 2, 3, 5, ...) capped at `max_delay`,
/// each perturbed by a random 0-25% of the step so a fleet of clients does
/// not reconnect in lockstep.
pub struct FibonacciBackoff {
    base: Duration,
    max_delay: Duration,
    max_attempts: Option<u32>,
    jitter: bool,
    attempt: u32,
    fib_prev: u64,
    fib_curr: u64,
}

impl FibonacciBackoff {
    /// Create a strategy with unlimited attempts and no jitter.
    pub fn new(base: Duration, max_delay: Duration) -> Self {
        Self {
            base,
            max_delay,
            max_attempts: None,
            jitter: false,
            attempt: 0,
            fib_prev: 0,
            fib_curr: 1,
        }
    }

    /// Cap the number of attempts before giving up.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Enable jitter to prevent thundering herd.
    pub fn with_jitter(mut self) -> Self {
        self.jitter = true;
        self
    }
}

impl Default for FibonacciBackoff {
    fn default() -> Self {
        Self::new(Duration::from_millis(100), Duration::from_secs(30))
            .with_max_attempts(10)
            .with_jitter()
    }
}

impl ReconnectStrategy for FibonacciBackoff {
    fn next_delay(&mut self) -> Option<Duration> {
        if let Some(max) = self.max_attempts {
            if self.attempt >= max {
                return None;
            }
        }
        self.attempt += 1;

        let step_ms = (self.base.as_millis() as u64)
            .saturating_mul(self.fib_curr)
            .min(self.max_delay.as_millis() as u64);

        let next = self.fib_prev.saturating_add(self.fib_curr);
        self.fib_prev = self.fib_curr;
        self.fib_curr = next;

        let mut delay_ms = step_ms;
        if self.jitter {
            use rand::Rng;
            delay_ms += rand::thread_rng().gen_range(0..=(step_ms / 4));
        }

        Some(Duration::from_millis(delay_ms))
    }

    fn reset(&mut self) {
        self.attempt = 0;
        self.fib_prev = 0;
        self.fib_curr = 1;
    }
}

/// Fixed delay between attempts.
pub struct FixedDelay {
    delay: Duration,
    max_attempts: Option<u32>,
    attempt: u32,
}

impl FixedDelay {
    /// Create a fixed-delay strategy with unlimited attempts.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            max_attempts: None,
            attempt: 0,
        }
    }

    /// Cap the number of attempts before giving up.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }
}

impl ReconnectStrategy for FixedDelay {
    fn next_delay(&mut self) -> Option<Duration> {
        if let Some(max) = self.max_attempts {
            if self.attempt >= max {
                return None;
            }
        }
        self.attempt += 1;
        Some(self.delay)
    }

    fn reset(&mut self) {
        self.attempt = 0;
    }
}

/// Strategy that never reconnects: the first drop is terminal.
pub struct NoReconnect;

impl ReconnectStrategy for NoReconnect {
    fn next_delay(&mut self) -> Option<Duration> {
        None
    }

    fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fibonacci_sequence() {
        let mut strategy =
            FibonacciBackoff::new(Duration::from_millis(100), Duration::from_secs(60));

        assert_eq!(strategy.next_delay().unwrap(), Duration::from_millis(100));
        assert_eq!(strategy.next_delay().unwrap(), Duration::from_millis(100));
        assert_eq!(strategy.next_delay().unwrap(), Duration::from_millis(200));
        assert_eq!(strategy.next_delay().unwrap(), Duration::from_millis(300));
        assert_eq!(strategy.next_delay().unwrap(), Duration::from_millis(500));
        assert_eq!(strategy.next_delay().unwrap(), Duration::from_millis(800));
    }

    #[test]
    fn test_fibonacci_caps_at_max_delay() {
        let mut strategy =
            FibonacciBackoff::new(Duration::from_millis(100), Duration::from_millis(400));

        for _ in 0..20 {
            let delay = strategy.next_delay().unwrap();
            assert!(delay <= Duration::from_millis(400));
        }
    }

    #[test]
    fn test_fibonacci_max_attempts() {
        let mut strategy =
            FibonacciBackoff::new(Duration::from_millis(100), Duration::from_secs(10))
                .with_max_attempts(3);

        assert!(strategy.next_delay().is_some());
        assert!(strategy.next_delay().is_some());
        assert!(strategy.next_delay().is_some());
        assert!(strategy.next_delay().is_none());
        // Exhaustion is sticky until reset
        assert!(strategy.next_delay().is_none());
    }

    #[test]
    fn test_fibonacci_reset_restarts_sequence() {
        let mut strategy =
            FibonacciBackoff::new(Duration::from_millis(100), Duration::from_secs(10))
                .with_max_attempts(3);

        strategy.next_delay();
        strategy.next_delay();
        strategy.next_delay();
        assert!(strategy.next_delay().is_none());

        strategy.reset();
        assert_eq!(strategy.next_delay().unwrap(), Duration::from_millis(100));
        assert_eq!(strategy.next_delay().unwrap(), Duration::from_millis(100));
        assert_eq!(strategy.next_delay().unwrap(), Duration::from_millis(200));
    }

    #[test]
    fn test_fibonacci_jitter_bounds() {
        let mut strategy =
            FibonacciBackoff::new(Duration::from_millis(100), Duration::from_secs(10))
                .with_jitter();

        // First step is 100ms; jitter adds at most 25%
        let delay = strategy.next_delay().unwrap();
        assert!(delay >= Duration::from_millis(100));
        assert!(delay <= Duration::from_millis(125));
    }

    #[test]
    fn test_fixed_delay() {
        let mut strategy = FixedDelay::new(Duration::from_secs(1)).with_max_attempts(3);

        assert_eq!(strategy.next_delay().unwrap(), Duration::from_secs(1));
        assert_eq!(strategy.next_delay().unwrap(), Duration::from_secs(1));
        assert_eq!(strategy.next_delay().unwrap(), Duration::from_secs(1));
        assert!(strategy.next_delay().is_none());

        strategy.reset();
        assert!(strategy.next_delay().is_some());
    }

    #[test]
    fn test_no_reconnect() {
        let mut strategy = NoReconnect;
        assert!(strategy.next_delay().is_none());
        strategy.reset();
        assert!(strategy.next_delay().is_none());
    }

    #[test]
    fn test_default_is_bounded() {
        let mut strategy = FibonacciBackoff::default();
        let mut attempts = 0;
        while strategy.next_delay().is_some() {
            attempts += 1;
        }
        assert_eq!(attempts, 10);
    }
}
