//! Timestamp type used throughout the engine.
//!
//! Timestamps are Unix epoch seconds (UTC), taken from the block that carries
//! the action, never from the local clock of the executing node.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::params::ONE_DAY_SECS;

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    /// Sentinel for "never": the repay date of a fully settled bill.
    pub const NEVER: Self = Self(u64::MAX);

    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    pub fn is_never(&self) -> bool {
        self.0 == u64::MAX
    }

    /// Seconds elapsed since this timestamp (relative to `now`).
    pub fn elapsed_since(&self, now: Timestamp) -> u64 {
        now.0.saturating_sub(self.0)
    }

    /// Whole days from this timestamp forward to `later`; zero if `later` is earlier.
    pub fn days_to(&self, later: Timestamp) -> u64 {
        self.elapsed_since(later) / ONE_DAY_SECS
    }

    /// This timestamp shifted forward by `secs`, saturating at [`Timestamp::NEVER`].
    pub fn plus(&self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_never() {
            write!(f, "never")
        } else {
            write!(f, "{}s", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_to_truncates_partial_days() {
        let start = Timestamp::new(1_000);
        assert_eq!(start.days_to(Timestamp::new(1_000 + ONE_DAY_SECS - 1)), 0);
        assert_eq!(start.days_to(Timestamp::new(1_000 + 3 * ONE_DAY_SECS + 5)), 3);
        assert_eq!(start.days_to(Timestamp::new(0)), 0);
    }

    #[test]
    fn plus_saturates_at_never() {
        assert_eq!(Timestamp::new(u64::MAX - 1).plus(10), Timestamp::NEVER);
        assert!(Timestamp::NEVER.is_never());
    }
}
