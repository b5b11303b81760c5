//! Fixed-point compounding.

use bill_types::RATE_SCALE;

use crate::InterestError;

/// One unit in the compounding domain.
pub const FIXED_SCALE: u128 = 1_000_000_000_000;

/// Converts a 1e8-scaled rate into the 1e12 domain.
const RATE_TO_FIXED: u128 = FIXED_SCALE / RATE_SCALE as u128;

/// `(1 + rate)^periods` scaled by [`FIXED_SCALE`].
///
/// `rate` is a per-period fraction scaled by 1e8. Each multiplication rounds
/// toward zero, so the factor never overstates the exact value.
pub fn compound_factor(rate: i64, periods: u64) -> Result<u128, InterestError> {
    if rate < 0 {
        return Err(InterestError::NegativeRate(rate));
    }
    let mut base = (rate as u128)
        .checked_mul(RATE_TO_FIXED)
        .and_then(|r| r.checked_add(FIXED_SCALE))
        .ok_or(InterestError::Overflow)?;
    let mut acc = FIXED_SCALE;
    let mut exp = periods;

    while exp > 0 {
        if exp & 1 == 1 {
            acc = fixed_mul(acc, base)?;
        }
        exp >>= 1;
        if exp > 0 {
            base = fixed_mul(base, base)?;
        }
    }
    Ok(acc)
}

fn fixed_mul(a: u128, b: u128) -> Result<u128, InterestError> {
    a.checked_mul(b)
        .map(|p| p / FIXED_SCALE)
        .ok_or(InterestError::Overflow)
}

/// `amount × factor`, truncated.
pub(crate) fn grow(amount: u128, factor: u128) -> Result<u128, InterestError> {
    amount
        .checked_mul(factor)
        .map(|p| p / FIXED_SCALE)
        .ok_or(InterestError::Overflow)
}

/// `amount ÷ factor`, truncated.
pub(crate) fn shrink(amount: u128, factor: u128) -> Result<u128, InterestError> {
    if factor == 0 {
        return Err(InterestError::Overflow);
    }
    amount
        .checked_mul(FIXED_SCALE)
        .map(|p| p / factor)
        .ok_or(InterestError::Overflow)
}
