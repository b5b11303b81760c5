//! Valuation of bill tokens.

use bill_types::RATE_SCALE;
use tracing::error;

use crate::fixed::{compound_factor, shrink};
use crate::InterestError;

/// Present value of `face_value` discounted over `remain_days` at a daily
/// rate scaled by 1e8: `face / (1 + rate)^remain_days`.
pub fn calc_bill_value(
    face_value: u128,
    remain_days: u64,
    day_rate: i64,
) -> Result<u128, InterestError> {
    let factor = compound_factor(day_rate, remain_days)?;
    shrink(face_value, factor)
}

/// Issue price of one whole bill token (1e8 units) discounted over the full
/// circulation period.
pub fn calc_origin_price(rate: i64, circulation_days: u64) -> Result<u128, InterestError> {
    calc_bill_value(RATE_SCALE as u128, circulation_days, rate)
}

/// Price a funder pays for `amount` bill tokens `days` before maturity at a
/// simple daily discount `rate` (scaled by 1e8):
/// `amount × (1 − rate × days / 1e8)`.
///
/// Returns 0 for a negative rate, a zero amount, or a discount of 100% or
/// more. Callers treat 0 as an unusable quote.
pub fn calc_token_value_for_financing(amount: u128, rate: i64, days: u64) -> u128 {
    if rate < 0 || amount == 0 {
        error!(rate, amount, "financing discount: wrong parameter");
        return 0;
    }
    let scale = RATE_SCALE as u128;
    let discount = match (rate as u128).checked_mul(days as u128) {
        Some(d) if d <= scale => d,
        _ => {
            error!(rate, amount, days, "financing discount: negative token value");
            return 0;
        }
    };
    match amount.checked_mul(scale - discount) {
        Some(p) => p / scale,
        None => {
            error!(amount, "financing discount: overflow");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rate_bill_value_is_face() {
        assert_eq!(calc_bill_value(1000, 90, 0).unwrap(), 1000);
    }

    #[test]
    fn no_remaining_days_is_face() {
        assert_eq!(calc_bill_value(1000, 0, 50_000).unwrap(), 1000);
    }

    #[test]
    fn bill_value_discounts() {
        // 1000 / 1.01 = 990.09…
        assert_eq!(calc_bill_value(1000, 1, 1_000_000).unwrap(), 990);
    }

    #[test]
    fn negative_bill_rate_rejected() {
        assert_eq!(calc_bill_value(1000, 1, -5), Err(InterestError::NegativeRate(-5)));
    }

    #[test]
    fn origin_price_with_zero_rate_is_one_token() {
        assert_eq!(calc_origin_price(0, 30).unwrap(), 100_000_000);
    }

    #[test]
    fn origin_price_one_day_one_percent() {
        // 1e8 / 1.01 = 99_009_900.99
        assert_eq!(calc_origin_price(1_000_000, 1).unwrap(), 99_009_900);
    }

    #[test]
    fn financing_discount_thirty_days() {
        // 1000 × (1 − 0.0001 × 30) = 997
        assert_eq!(calc_token_value_for_financing(1000, 10_000, 30), 997);
    }

    #[test]
    fn financing_zero_rate_pays_face() {
        assert_eq!(calc_token_value_for_financing(1000, 0, 30), 1000);
    }

    #[test]
    fn financing_rejects_bad_inputs() {
        assert_eq!(calc_token_value_for_financing(1000, -1, 30), 0);
        assert_eq!(calc_token_value_for_financing(0, 10_000, 30), 0);
    }

    #[test]
    fn financing_discount_beyond_face_is_zero() {
        // 1% a day for 200 days would be −100%.
        assert_eq!(calc_token_value_for_financing(1000, 1_000_000, 200), 0);
    }
}
