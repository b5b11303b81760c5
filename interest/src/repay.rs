//! Repayment computation for a released bill.

use bill_types::{Bill, BillStatus, Timestamp, ONE_DAY_SECS};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fixed::{compound_factor, grow};
use crate::value::calc_bill_value;
use crate::InterestError;

/// What a borrower owes on `amount` bill tokens at a given moment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepayInfo {
    /// Amount owed without overdue interest.
    pub normal_amount: u128,
    /// Amount actually owed, overdue interest included.
    pub actual_amount: u128,
    pub overdue_rate: i64,
    pub due_date: Timestamp,
    /// Whether the moment lies past the due date.
    pub include_overdue: bool,
    pub current_count: u32,
    pub total_repay_count: u32,
}

impl RepayInfo {
    /// Overdue interest on top of the normal amount.
    pub fn overdue_amount(&self) -> u128 {
        self.actual_amount.saturating_sub(self.normal_amount)
    }
}

/// A repayment schedule.
pub trait RepaymentMethod {
    /// What is owed on `amount` tokens at `now`.
    ///
    /// `None` means there is nothing to compute: the bill is not released, or
    /// it has already been repaid in full.
    fn calc_repay_info(
        &self,
        bill: &Bill,
        now: Timestamp,
        amount: u128,
    ) -> Result<Option<RepayInfo>, InterestError>;

    /// Present value of `amount` tokens cashed out at `now`.
    fn get_token_value(
        &self,
        amount: u128,
        bill: &Bill,
        now: Timestamp,
    ) -> Result<u128, InterestError>;
}

/// Single-payment bill: compound discounting before maturity, capped
/// compound overdue interest after the grace period.
#[derive(Clone, Copy, Debug, Default)]
pub struct BillRepayMethod;

impl BillRepayMethod {
    /// Whole days left until maturity when evaluated at `at`.
    fn remaining_days(bill: &Bill, at: Timestamp) -> u64 {
        let elapsed = bill.issue_date.elapsed_since(at) / ONE_DAY_SECS;
        bill.circulation_days().saturating_sub(elapsed)
    }
}

impl RepaymentMethod for BillRepayMethod {
    fn calc_repay_info(
        &self,
        bill: &Bill,
        now: Timestamp,
        amount: u128,
    ) -> Result<Option<RepayInfo>, InterestError> {
        if bill.status != BillStatus::Released {
            debug!(bill_id = %bill.id, status = %bill.status, "bill not released");
            return Ok(None);
        }
        if bill.is_settled() {
            debug!(bill_id = %bill.id, "bill already repaid");
            return Ok(None);
        }

        let due_date = bill.due_date();
        let include_overdue = now > due_date;

        let (normal_amount, actual_amount) = if include_overdue {
            let overdue_days = due_date.elapsed_since(now) / ONE_DAY_SECS;
            let actual = if overdue_days < bill.overdue_grace_period {
                amount
            } else {
                let days = overdue_days.min(bill.overdue_limit);
                grow(amount, compound_factor(bill.overdue_rate, days)?)?
            };
            (amount, actual)
        } else {
            let value = calc_bill_value(amount, Self::remaining_days(bill, now), bill.rate)?;
            (value, value)
        };

        Ok(Some(RepayInfo {
            normal_amount,
            actual_amount,
            overdue_rate: bill.overdue_rate,
            due_date,
            include_overdue,
            current_count: 1,
            total_repay_count: bill.repay_count,
        }))
    }

    fn get_token_value(
        &self,
        amount: u128,
        bill: &Bill,
        now: Timestamp,
    ) -> Result<u128, InterestError> {
        let at = now.min(bill.due_date());
        calc_bill_value(amount, Self::remaining_days(bill, at), bill.rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bill_types::{Address, BillStatus};

    const DAY: u64 = ONE_DAY_SECS;

    fn test_bill(rate: i64, overdue_rate: i64, days: u64) -> Bill {
        Bill {
            id: "bill-1".into(),
            token_symbol: "BILL1".into(),
            coins_symbol: "CCNY".into(),
            borrower: Address::new("core"),
            loan_amount: 1000,
            rate,
            overdue_rate,
            circulation_time: days * DAY,
            overdue_grace_period: 1,
            overdue_limit: 10,
            split: false,
            repay_count: 1,
            origin_price: 0,
            name: String::new(),
            remark: String::new(),
            status: BillStatus::Released,
            create_time: Timestamp::new(0),
            issue_date: Timestamp::new(1_000),
            repay_date: Timestamp::new(1_000 + days * DAY),
            current_repayed_count: 0,
            need_dpdt_token: false,
            dpdt_tokens: Vec::new(),
            total_cash_amount: 0,
            total_repay_amount: 0,
            total_redeem_token: 0,
            total_cashed_token: 0,
        }
    }

    #[test]
    fn zero_rate_before_maturity_is_face() {
        let bill = test_bill(0, 0, 30);
        let info = BillRepayMethod
            .calc_repay_info(&bill, Timestamp::new(1_000 + 5 * DAY), 1000)
            .unwrap()
            .unwrap();
        assert_eq!(info.normal_amount, 1000);
        assert_eq!(info.actual_amount, 1000);
        assert!(!info.include_overdue);
    }

    #[test]
    fn overdue_accrual_capped_at_limit() {
        let bill = test_bill(0, 1_000_000, 30);
        let now = bill.due_date().plus(15 * DAY);
        let info = BillRepayMethod.calc_repay_info(&bill, now, 1000).unwrap().unwrap();
        assert!(info.include_overdue);
        assert_eq!(info.normal_amount, 1000);
        // 1000 × 1.01^10 = 1104.62…, not 1000 × 1.01^15 = 1160.96…
        assert_eq!(info.actual_amount, 1104);
        assert_eq!(info.overdue_amount(), 104);
    }

    #[test]
    fn grace_period_waives_interest() {
        let bill = test_bill(0, 1_000_000, 30);
        let now = bill.due_date().plus(DAY - 1);
        let info = BillRepayMethod.calc_repay_info(&bill, now, 1000).unwrap().unwrap();
        assert!(info.include_overdue);
        assert_eq!(info.actual_amount, 1000);
    }

    #[test]
    fn first_day_past_grace_accrues_one_day() {
        let bill = test_bill(0, 1_000_000, 30);
        let now = bill.due_date().plus(DAY);
        let info = BillRepayMethod.calc_repay_info(&bill, now, 1000).unwrap().unwrap();
        assert_eq!(info.actual_amount, 1010);
    }

    #[test]
    fn exactly_at_maturity_is_not_overdue() {
        let bill = test_bill(1_000_000, 1_000_000, 30);
        let info = BillRepayMethod
            .calc_repay_info(&bill, bill.due_date(), 1000)
            .unwrap()
            .unwrap();
        assert!(!info.include_overdue);
        assert_eq!(info.actual_amount, 1000);
    }

    #[test]
    fn unreleased_bill_yields_none() {
        let mut bill = test_bill(0, 0, 30);
        bill.status = BillStatus::Created;
        let info = BillRepayMethod
            .calc_repay_info(&bill, Timestamp::new(2_000), 1000)
            .unwrap();
        assert_eq!(info, None);
    }

    #[test]
    fn settled_bill_yields_none() {
        let mut bill = test_bill(0, 0, 30);
        bill.current_repayed_count = 1;
        let info = BillRepayMethod
            .calc_repay_info(&bill, Timestamp::new(2_000), 1000)
            .unwrap();
        assert_eq!(info, None);
    }

    #[test]
    fn token_value_freezes_at_face_after_maturity() {
        let bill = test_bill(1_000_000, 0, 30);
        let late = bill.due_date().plus(40 * DAY);
        assert_eq!(BillRepayMethod.get_token_value(1000, &bill, late).unwrap(), 1000);
    }

    #[test]
    fn token_value_discounts_before_maturity() {
        let bill = test_bill(1_000_000, 0, 30);
        // 29 days elapsed → one day remaining.
        let now = bill.issue_date.plus(29 * DAY);
        assert_eq!(BillRepayMethod.get_token_value(1000, &bill, now).unwrap(), 990);
    }
}
