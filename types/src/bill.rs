//! The Bill record: the tokenized IOU at the centre of the engine.

use serde::{Deserialize, Serialize};

use crate::params::ONE_DAY_SECS;
use crate::{Address, BillStatus, Timestamp};

/// A dependent-credit pledge on a bill.
///
/// `used` is the portion currently reserved or consumed by financing; it
/// never exceeds `amount`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DpdtToken {
    pub symbol: String,
    pub amount: u128,
    #[serde(default)]
    pub used: u128,
}

impl DpdtToken {
    pub fn new(symbol: impl Into<String>, amount: u128) -> Self {
        Self {
            symbol: symbol.into(),
            amount,
            used: 0,
        }
    }

    /// Credit still available for financing.
    pub fn unused(&self) -> u128 {
        self.amount.saturating_sub(self.used)
    }
}

/// Canonical record of a bill.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    pub id: String,

    // ── Commercial terms ─────────────────────────────────────────────────
    /// The bill's own tradable token.
    pub token_symbol: String,
    /// Settlement currency.
    pub coins_symbol: String,
    /// The Core enterprise that issued the bill.
    pub borrower: Address,
    /// Face amount, in bill-token units (one token redeems for one currency unit at maturity).
    pub loan_amount: u128,
    /// Daily discount rate, scaled by 1e8.
    pub rate: i64,
    /// Daily overdue rate, scaled by 1e8.
    pub overdue_rate: i64,
    /// Seconds from issue to maturity.
    pub circulation_time: u64,
    /// Days past maturity without overdue interest.
    pub overdue_grace_period: u64,
    /// Maximum overdue days that accrue interest.
    pub overdue_limit: u64,
    /// Whether holders may split the bill among suppliers.
    pub split: bool,
    pub repay_count: u32,
    /// Issue price of one token, scaled by 1e8.
    pub origin_price: u128,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub remark: String,

    // ── Lifecycle ────────────────────────────────────────────────────────
    pub status: BillStatus,
    pub create_time: Timestamp,
    pub issue_date: Timestamp,
    /// `issue_date + circulation_time`; [`Timestamp::NEVER`] once settled.
    pub repay_date: Timestamp,
    pub current_repayed_count: u32,

    // ── Dependent credit ─────────────────────────────────────────────────
    pub need_dpdt_token: bool,
    pub dpdt_tokens: Vec<DpdtToken>,

    // ── Running totals ───────────────────────────────────────────────────
    /// Currency paid out to holders.
    pub total_cash_amount: u128,
    /// Currency repaid by the borrower.
    pub total_repay_amount: u128,
    /// Bill tokens redeemed. Never exceeds `loan_amount`.
    pub total_redeem_token: u128,
    /// Bill tokens cashed.
    pub total_cashed_token: u128,
}

impl Bill {
    /// Maturity: the moment the discounting clock stops and overdue accrual can begin.
    pub fn due_date(&self) -> Timestamp {
        self.issue_date.plus(self.circulation_time)
    }

    pub fn circulation_days(&self) -> u64 {
        self.circulation_time / ONE_DAY_SECS
    }

    /// Whether `now` is at or past maturity.
    pub fn is_matured(&self, now: Timestamp) -> bool {
        now >= self.due_date()
    }

    /// Whether every instalment has been repaid.
    pub fn is_settled(&self) -> bool {
        self.current_repayed_count == self.repay_count
    }

    /// Whether every token has been redeemed.
    pub fn is_fully_redeemed(&self) -> bool {
        self.total_redeem_token == self.loan_amount
    }

    pub fn dpdt_token(&self, symbol: &str) -> Option<&DpdtToken> {
        self.dpdt_tokens.iter().find(|t| t.symbol == symbol)
    }

    pub fn dpdt_token_mut(&mut self, symbol: &str) -> Option<&mut DpdtToken> {
        self.dpdt_tokens.iter_mut().find(|t| t.symbol == symbol)
    }

    /// Dependent-credit entries with something to freeze or unfreeze.
    pub fn pledged_tokens(&self) -> impl Iterator<Item = &DpdtToken> {
        self.dpdt_tokens
            .iter()
            .filter(move |t| self.need_dpdt_token && t.amount > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unused_never_underflows() {
        let mut token = DpdtToken::new("CREDIT", 100);
        token.used = 150;
        assert_eq!(token.unused(), 0);
        token.used = 40;
        assert_eq!(token.unused(), 60);
    }
}
