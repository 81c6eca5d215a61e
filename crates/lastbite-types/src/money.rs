//! Fixed-point currency helpers.
//!
//! All prices in the core are [`rust_decimal::Decimal`]. The cart layer
//! persists integer cents (matching the storage shape), so this module owns
//! the two conversions and the single rounding rule: **half-even to the
//! currency's minor unit**, applied everywhere a computed price leaves the
//! pricing engine.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::PRICE_DECIMALS;

/// Round an amount half-even (banker's rounding) to cents.
#[must_use]
pub fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(PRICE_DECIMALS, RoundingStrategy::MidpointNearestEven)
}

/// Convert a decimal amount to integer cents, rounding half-even.
///
/// # Panics
/// Panics if the amount (in cents) does not fit an `i64`. Marketplace
/// prices are bounded well below that.
#[must_use]
pub fn to_cents(amount: Decimal) -> i64 {
    let cents = round_to_cents(amount) * Decimal::ONE_HUNDRED;
    cents
        .to_i64()
        .unwrap_or_else(|| panic!("amount out of range for cents: {amount}"))
}

/// Convert integer cents back to a decimal amount.
#[must_use]
pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, PRICE_DECIMALS)
}
