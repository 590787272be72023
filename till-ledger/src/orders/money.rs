//! Money conversion between `Decimal` amounts and stored cents
//!
//! Amounts are rounded to 2 decimal places half-away-from-zero before they
//! are stored as integer cents, which keeps SQL `SUM` exact.

use super::error::{LedgerError, LedgerResult};
use rust_decimal::prelude::*;

/// Stored precision
pub const DECIMAL_PLACES: u32 = 2;

/// Largest accepted amount (1,000,000.00)
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 2);

/// Round to cents, half away from zero
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert to integer cents
pub fn to_cents(value: Decimal, field: &str) -> LedgerResult<i64> {
    (round_money(value) * Decimal::ONE_HUNDRED)
        .to_i64()
        .ok_or_else(|| LedgerError::validation(field, format!("{value} is out of range")))
}

pub fn to_cents_opt(value: Option<Decimal>, field: &str) -> LedgerResult<Option<i64>> {
    value.map(|v| to_cents(v, field)).transpose()
}

#[inline]
pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, DECIMAL_PLACES)
}
