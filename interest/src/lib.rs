//! Bill interest: the repayment and valuation engine.
//!
//! Everything here is a pure function of a bill's terms and a point in time.
//! Rates arrive as integers scaled by 1e8 and compound factors are carried in
//! a 1e12 fixed-point domain, so results are identical on every host.
//!
//! This crate handles:
//! - Present value of bill tokens, `face / (1 + r)^days`
//! - Overdue accrual, `face × (1 + r)^min(days, limit)` past the grace period
//! - Issue price of a freshly created bill
//! - Simple-interest discount paid by a funder for early financing

pub mod error;
pub mod fixed;
pub mod repay;
pub mod value;

pub use error::InterestError;
pub use fixed::{compound_factor, FIXED_SCALE};
pub use repay::{BillRepayMethod, RepayInfo, RepaymentMethod};
pub use value::{calc_bill_value, calc_origin_price, calc_token_value_for_financing};
