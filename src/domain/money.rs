//! Fixed-point money handling.
//!
//! Balances and amounts are stored and compared as integer minor units
//! (cents). `rust_decimal::Decimal` is used only at the API boundary, where
//! JSON numbers are read and written.

use rust_decimal::Decimal;

use crate::errors::AppError;

/// Number of fractional digits of the currency.
pub const MINOR_UNIT_SCALE: u32 = 2;

/// Converts a decimal amount into minor units.
///
/// Fails if the amount has more than [`MINOR_UNIT_SCALE`] fractional digits
/// or does not fit in an `i64`.
pub fn to_minor_units(value: Decimal, field: &str) -> Result<i64, AppError> {
    let normalized = value.normalize();
    if normalized.scale() > MINOR_UNIT_SCALE {
        return Err(AppError::ValidationError(format!(
            "{} must have at most {} decimal places",
            field, MINOR_UNIT_SCALE
        )));
    }

    let mut scaled = normalized;
    scaled.rescale(MINOR_UNIT_SCALE);
    i64::try_from(scaled.mantissa())
        .map_err(|_| AppError::ValidationError(format!("{} is out of range", field)))
}

/// Converts minor units back into a decimal with two fractional digits.
pub fn from_minor_units(units: i64) -> Decimal {
    Decimal::new(units, MINOR_UNIT_SCALE)
}
