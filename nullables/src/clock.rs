//! Nullable clock: deterministic block time for testing.

use bill_types::{Timestamp, ONE_DAY_SECS};
use std::cell::Cell;

/// A deterministic block clock.
///
/// Time only advances when you tell it to.
pub struct NullClock {
    current: Cell<Timestamp>,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            current: Cell::new(Timestamp::new(initial_secs)),
        }
    }

    pub fn now(&self) -> Timestamp {
        self.current.get()
    }

    /// Advance time by a number of seconds.
    pub fn advance(&self, secs: u64) {
        self.current.set(self.current.get().plus(secs));
    }

    /// Advance time by whole days.
    pub fn advance_days(&self, days: u64) {
        self.advance(days.saturating_mul(ONE_DAY_SECS));
    }

    pub fn set(&self, at: Timestamp) {
        self.current.set(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_by_days() {
        let clock = NullClock::new(100);
        clock.advance_days(2);
        assert_eq!(clock.now(), Timestamp::new(100 + 2 * ONE_DAY_SECS));
        clock.advance(5);
        assert_eq!(clock.now().as_secs(), 100 + 2 * ONE_DAY_SECS + 5);
    }
}
