//! Usage-credit counter owned by the calling layer.

use std::sync::atomic::{AtomicU64, Ordering};

/// Remaining usage credits. A grid search reserves one credit before it
/// starts and hands it back if the run fails.
#[derive(Debug)]
pub struct UsageCredits {
    remaining: AtomicU64,
}

impl UsageCredits {
    #[must_use]
    pub fn new(initial: u64) -> Self {
        Self {
            remaining: AtomicU64::new(initial),
        }
    }

    #[must_use]
    pub fn remaining(&self) -> u64 {
        self.remaining.load(Ordering::SeqCst)
    }

    /// Atomically takes one credit. Returns the balance after the call, or
    /// `None` when the balance was already zero.
    #[must_use]
    pub fn try_consume(&self) -> Option<u64> {
        self.remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .ok()
            .map(|previous| previous - 1)
    }

    /// Returns a credit taken by [`UsageCredits::try_consume`].
    pub fn refund_one(&self) {
        self.remaining.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn try_consume_decrements() {
        let credits = UsageCredits::new(3);
        assert_eq!(credits.try_consume(), Some(2));
        assert_eq!(credits.remaining(), 2);
    }

    #[test]
    fn try_consume_refuses_at_zero() {
        let credits = UsageCredits::new(0);
        assert_eq!(credits.try_consume(), None);
        assert_eq!(credits.remaining(), 0);
    }

    #[test]
    fn refund_restores_reserved_credit() {
        let credits = UsageCredits::new(1);
        assert_eq!(credits.try_consume(), Some(0));
        assert_eq!(credits.try_consume(), None);
        credits.refund_one();
        assert_eq!(credits.remaining(), 1);
    }

    #[test]
    fn concurrent_reservations_never_overdraw() {
        let credits = Arc::new(UsageCredits::new(5));
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let credits = Arc::clone(&credits);
                std::thread::spawn(move || credits.try_consume().is_some())
            })
            .collect();
        let granted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(granted, 5);
        assert_eq!(credits.remaining(), 0);
    }
}
