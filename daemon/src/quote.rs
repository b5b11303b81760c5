//! Price calculators behind the `quote` subcommand.

use bill_interest::{calc_bill_value, calc_origin_price, calc_token_value_for_financing};
use bill_types::ONE_DAY_SECS;
use bill_utils::{format_duration, format_rate};

#[derive(Clone, Debug, clap::Subcommand)]
pub enum Quote {
    /// Present value of bill tokens discounted over the remaining days.
    BillValue {
        #[arg(long)]
        face: u128,
        #[arg(long)]
        days: u64,
        /// Daily rate scaled by 1e8.
        #[arg(long)]
        rate: i64,
    },
    /// What a funder pays for bill tokens before maturity.
    Financing {
        #[arg(long)]
        amount: u128,
        /// Daily discount rate scaled by 1e8.
        #[arg(long)]
        rate: i64,
        #[arg(long)]
        days: u64,
    },
    /// Issue price of one whole bill token.
    OriginPrice {
        /// Daily rate scaled by 1e8.
        #[arg(long)]
        rate: i64,
        #[arg(long)]
        days: u64,
    },
}

/// Human-readable span of `days` whole days.
pub fn horizon(days: u64) -> String {
    format_duration(days.saturating_mul(ONE_DAY_SECS))
}

pub fn evaluate(quote: Quote) -> anyhow::Result<u128> {
    match quote {
        Quote::BillValue { face, days, rate } => {
            let value = calc_bill_value(face, days, rate)?;
            tracing::info!("{face} face at {} a day over {}", format_rate(rate), horizon(days));
            Ok(value)
        }
        Quote::Financing { amount, rate, days } => {
            let value = calc_token_value_for_financing(amount, rate, days);
            if value == 0 {
                anyhow::bail!(
                    "no usable financing value for {amount} at {} over {days} days",
                    format_rate(rate)
                );
            }
            Ok(value)
        }
        Quote::OriginPrice { rate, days } => Ok(calc_origin_price(rate, days)?),
    }
}
