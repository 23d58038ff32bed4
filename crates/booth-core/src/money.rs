//! Taka amounts and their display form.

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{iso, Money};

/// Round an amount to two decimal places, midpoint away from zero.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount in taka, e.g. `৳1,234.50`. Negative amounts keep their
/// sign in front of the symbol (`-৳20.00`).
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    let rounded = round_money(amount);
    let money = Money::from_decimal(rounded.abs(), iso::BDT);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{money}")
    } else {
        format!("{money}")
    }
}
