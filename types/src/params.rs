//! Protocol constants shared by the engine and the interest calculators.

/// Fixed-point scale for every stored rate: `1e8` represents a rate of 1.0.
pub const RATE_SCALE: i64 = 100_000_000;

/// Seconds in one day; all interest is accrued in whole days.
pub const ONE_DAY_SECS: u64 = 86_400;

/// Days past maturity during which no overdue interest accrues, when a bill
/// does not specify its own grace period.
pub const DEFAULT_OVERDUE_GRACE_PERIOD: u64 = 1;

/// Maximum number of overdue days that accrue interest, when a bill does not
/// specify its own limit.
pub const DEFAULT_OVERDUE_LIMIT: u64 = 10;

/// A bill is repaid in a single instalment.
pub const BILL_REPAY_COUNT: u32 = 1;
