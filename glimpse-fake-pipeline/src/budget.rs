//! Session-wide event budget.

use std::sync::atomic::{AtomicU32, Ordering};

/// Caps the number of records a session emits across all summary batches.
#[derive(Debug)]
pub struct EventBudget {
    total: u32,
    remaining: AtomicU32,
}

impl EventBudget {
    pub fn new(total: u32) -> Self {
        Self {
            total,
            remaining: AtomicU32::new(total),
        }
    }

    /// Take up to `requested` events from the budget.
    ///
    /// Returns how many were granted, which is less than `requested` only
    /// when the budget runs out.
    pub fn take(&self, requested: u32) -> u32 {
        let mut granted = 0;
        // The closure always returns Some, so the update cannot fail.
        let _ = self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |left| {
                granted = requested.min(left);
                Some(left - granted)
            });
        granted
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn remaining(&self) -> u32 {
        self.remaining.load(Ordering::Acquire)
    }

    pub fn emitted(&self) -> u32 {
        self.total - self.remaining()
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Batch size for a share of the total budget, rounded up.
    pub fn share(&self, fraction: f64) -> u32 {
        (f64::from(self.total) * fraction).ceil() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_decrements() {
        let budget = EventBudget::new(30);

        assert_eq!(budget.take(8), 8);
        assert_eq!(budget.remaining(), 22);
        assert_eq!(budget.emitted(), 8);
    }

    #[test]
    fn test_take_is_clamped_to_remaining() {
        let budget = EventBudget::new(3);

        assert_eq!(budget.take(2), 2);
        assert_eq!(budget.take(2), 1);
        assert_eq!(budget.take(2), 0);
        assert!(budget.is_exhausted());
        assert_eq!(budget.emitted(), 3);
    }

    #[test]
    fn test_share_rounds_up() {
        let budget = EventBudget::new(30);

        assert_eq!(budget.share(0.25), 8);
        assert_eq!(budget.share(0.3), 9);
        assert_eq!(EventBudget::new(25).share(0.25), 7);
        assert_eq!(EventBudget::new(35).share(0.3), 11);
    }
}
