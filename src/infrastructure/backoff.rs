use std::time::Duration;

use crate::types::constants::{RECONNECT_BASE, RECONNECT_CAP};

/// Reconnect delay policy: exponential growth with a hard ceiling.
///
/// `delay(n)` = min(base * 2^n, cap). The ceiling bounds worst-case
/// reconnection storms during a long outage; there is no retry cutoff.
#[derive(Debug, Clone, Copy)]
pub struct Backoff {
    base: Duration,
    cap: Duration,
}

impl Backoff {
    pub fn new(base: Duration, cap: Duration) -> Self {
        Self { base, cap }
    }

    /// Wait before reconnect attempt `attempt` (starting at 0).
    pub fn delay(&self, attempt: u32) -> Duration {
        // Clamp the shift so large attempt counts saturate at the cap
        // instead of overflowing.
        let factor = 1u32.checked_shl(attempt.min(31)).unwrap_or(u32::MAX);
        self.base.saturating_mul(factor).min(self.cap)
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(RECONNECT_BASE, RECONNECT_CAP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_doubles_from_base() {
        let backoff = Backoff::default();

        assert_eq!(backoff.delay(0), Duration::from_secs(1));
        assert_eq!(backoff.delay(1), Duration::from_secs(2));
        assert_eq!(backoff.delay(2), Duration::from_secs(4));
        assert_eq!(backoff.delay(3), Duration::from_secs(8));
    }

    #[test]
    fn test_delay_is_monotonic_and_capped() {
        let backoff = Backoff::default();

        let mut previous = Duration::ZERO;
        for attempt in 0..64 {
            let delay = backoff.delay(attempt);
            assert!(delay >= previous, "delay shrank at attempt {}", attempt);
            assert!(delay <= Duration::from_secs(30), "cap exceeded at attempt {}", attempt);
            previous = delay;
        }

        assert_eq!(backoff.delay(63), Duration::from_secs(30));
    }

    #[test]
    fn test_custom_base_and_cap() {
        let backoff = Backoff::new(Duration::from_millis(50), Duration::from_millis(200));

        assert_eq!(backoff.delay(0), Duration::from_millis(50));
        assert_eq!(backoff.delay(1), Duration::from_millis(100));
        assert_eq!(backoff.delay(2), Duration::from_millis(200));
        assert_eq!(backoff.delay(3), Duration::from_millis(200));
    }
}
