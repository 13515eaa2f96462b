//! Monetary amount validation.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts in the system are `rust_decimal::Decimal` values in a single
//! currency unit; this module gates every amount that enters the engine.

use rust_decimal::Decimal;
use thiserror::Error;

/// Maximum number of decimal places accepted for a monetary amount.
pub const MONEY_SCALE: u32 = 2;

/// Errors raised when an amount fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// Amount is negative.
    #[error("Amount cannot be negative: {0}")]
    Negative(Decimal),

    /// Amount carries more decimal places than the currency supports.
    #[error("Amount {0} exceeds {MONEY_SCALE} decimal places")]
    TooPrecise(Decimal),
}

/// Validates an amount before it is allowed to touch any pool.
///
/// Amounts must be non-negative and have at most [`MONEY_SCALE`] decimal
/// places. Validation happens synchronously before any state mutation.
///
/// # Errors
///
/// Returns `MoneyError::Negative` or `MoneyError::TooPrecise`.
pub fn validate_amount(amount: Decimal) -> Result<(), MoneyError> {
    if amount.is_sign_negative() {
        return Err(MoneyError::Negative(amount));
    }
    if amount.normalize().scale() > MONEY_SCALE {
        return Err(MoneyError::TooPrecise(amount));
    }
    Ok(())
}

/// Validates an amount that must also be strictly positive.
///
/// # Errors
///
/// Returns `MoneyError::Negative` for zero or negative amounts,
/// `MoneyError::TooPrecise` for over-precise ones.
pub fn validate_positive_amount(amount: Decimal) -> Result<(), MoneyError> {
    validate_amount(amount)?;
    if amount.is_zero() {
        return Err(MoneyError::Negative(amount));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(20000))]
    #[case(dec!(149.99))]
    #[case(dec!(0.01))]
    fn test_validate_accepts_well_formed_amounts(#[case] amount: Decimal) {
        assert!(validate_amount(amount).is_ok());
    }

    #[test]
    fn test_validate_rejects_negative() {
        assert_eq!(
            validate_amount(dec!(-1)),
            Err(MoneyError::Negative(dec!(-1)))
        );
    }

    #[test]
    fn test_validate_rejects_sub_cent_precision() {
        assert_eq!(
            validate_amount(dec!(10.001)),
            Err(MoneyError::TooPrecise(dec!(10.001)))
        );
    }

    #[test]
    fn test_validate_accepts_trailing_zero_scale() {
        // 10.100 normalizes to 10.1 - scale check must not be fooled
        // by representation.
        assert!(validate_amount(dec!(10.100)).is_ok());
    }

    #[test]
    fn test_positive_rejects_zero() {
        assert!(validate_positive_amount(dec!(0)).is_err());
        assert!(validate_positive_amount(dec!(0.01)).is_ok());
    }
}
