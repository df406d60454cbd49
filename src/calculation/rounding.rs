//! Currency rounding and overflow-checked arithmetic.
//!
//! Every rule contribution is rounded to cents, half away from zero, before
//! it is added to a subtotal.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{BillingError, BillingResult};

/// The number of decimal places monetary amounts are kept to.
pub const CURRENCY_DECIMAL_PLACES: u32 = 2;

/// Rounds an amount to cents, half away from zero, and pads it to two places.
///
/// # Examples
///
/// ```
/// use concession_billing::calculation::round_currency;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_currency(Decimal::from_str("10.005").unwrap()).to_string(), "10.01");
/// assert_eq!(round_currency(Decimal::from_str("-10.005").unwrap()).to_string(), "-10.01");
/// assert_eq!(round_currency(Decimal::from(1000)).to_string(), "1000.00");
/// ```
pub fn round_currency(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(CURRENCY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(CURRENCY_DECIMAL_PLACES);
    rounded
}

/// Multiplies two amounts, failing with `AmountOverflow` for `rule` instead of panicking.
pub(crate) fn checked_product(rule: &str, lhs: Decimal, rhs: Decimal) -> BillingResult<Decimal> {
    lhs.checked_mul(rhs).ok_or_else(|| overflow(rule))
}

/// Adds two amounts, failing with `AmountOverflow` for `rule` instead of panicking.
pub(crate) fn checked_sum(rule: &str, lhs: Decimal, rhs: Decimal) -> BillingResult<Decimal> {
    lhs.checked_add(rhs).ok_or_else(|| overflow(rule))
}

fn overflow(rule: &str) -> BillingError {
    BillingError::AmountOverflow {
        rule: rule.to_string(),
    }
}
