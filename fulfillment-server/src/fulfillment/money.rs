//! Money handling utilities
//!
//! Amounts cross the API as `f64`; all comparison and normalization goes
//! through `rust_decimal` so float noise never reaches the ledger.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use shared::error::{AppError, AppResult, ErrorCode};

/// Half a cent, the equality tolerance for money comparisons
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(5, 0, 0, false, 3);

/// Upper bound for a single amount
pub const MAX_AMOUNT: f64 = 1_000_000_000.0;

/// Convert an f64 to Decimal for money computation
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert a Decimal back to f64, rounded to cents
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Money equality within [`MONEY_TOLERANCE`]
pub fn money_eq(a: f64, b: f64) -> bool {
    (to_decimal(a) - to_decimal(b)).abs() <= MONEY_TOLERANCE
}

/// Validate a monetary amount from a request payload
///
/// Rejects non-finite and non-positive values and anything above
/// [`MAX_AMOUNT`]; returns the amount normalized to cents.
pub fn validate_amount(value: f64, field: &str) -> AppResult<f64> {
    if !value.is_finite() {
        return Err(
            AppError::validation(format!("{field} must be a finite number"))
                .with_detail("field", field),
        );
    }
    if value <= 0.0 {
        return Err(AppError::new(ErrorCode::AmountNotPositive).with_detail("field", field));
    }
    if value > MAX_AMOUNT {
        return Err(AppError::new(ErrorCode::ValueOutOfRange).with_detail("field", field));
    }
    Ok(to_f64(to_decimal(value)))
}
