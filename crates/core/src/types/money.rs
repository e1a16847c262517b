//! Currency amount conversions between decimal euros and minor units.
//!
//! Prices are stored and computed as [`rust_decimal::Decimal`] in the
//! currency's standard unit. The payment gateway wants integer minor units
//! (cents), so the conversion lives here in one place.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Errors that can occur when converting currency amounts.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    /// The amount is negative.
    #[error("amount cannot be negative: {0}")]
    Negative(Decimal),
    /// The amount does not fit in an i64 once scaled to minor units.
    #[error("amount out of range: {0}")]
    OutOfRange(Decimal),
}

/// Convert a decimal amount to integer minor units (e.g., 17.50 -> 1750).
///
/// Rounds half-up at the cent, matching how the gateway expects
/// `unit_amount` values.
///
/// # Errors
///
/// Returns `MoneyError::Negative` for negative amounts and
/// `MoneyError::OutOfRange` if the scaled value overflows an i64.
pub fn to_minor_units(amount: Decimal) -> Result<i64, MoneyError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(MoneyError::Negative(amount));
    }

    let scaled = (amount * Decimal::from(100)).round();
    scaled.to_i64().ok_or(MoneyError::OutOfRange(amount))
}

/// Convert integer minor units back to a decimal amount (e.g., 6248 -> 62.48).
#[must_use]
pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_to_minor_units_exact() {
        assert_eq!(to_minor_units(dec!(17.50)), Ok(1750));
        assert_eq!(to_minor_units(dec!(19.99)), Ok(1999));
        assert_eq!(to_minor_units(dec!(0)), Ok(0));
    }

    #[test]
    fn test_to_minor_units_rounds_fractional_cents() {
        assert_eq!(to_minor_units(dec!(9.995)), Ok(1000));
        assert_eq!(to_minor_units(dec!(9.994)), Ok(999));
    }

    #[test]
    fn test_to_minor_units_negative_rejected() {
        assert_eq!(
            to_minor_units(dec!(-1.00)),
            Err(MoneyError::Negative(dec!(-1.00)))
        );
    }

    #[test]
    fn test_from_minor_units() {
        assert_eq!(from_minor_units(6248), dec!(62.48));
        assert_eq!(from_minor_units(0), dec!(0.00));
        assert_eq!(from_minor_units(500), dec!(5.00));
    }

    #[test]
    fn test_checkout_total_scenario() {
        // 1 x 17.50 + 2 x 19.99 + 5.00 shipping = 62.48
        let subtotal = dec!(17.50) + dec!(19.99) * Decimal::from(2);
        assert_eq!(subtotal, dec!(57.48));
        let total = subtotal + dec!(5.00);
        assert_eq!(to_minor_units(total), Ok(6248));
    }
}
