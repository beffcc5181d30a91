//! Common utility functions for DIFAL calculations.
//!
//! This module provides shared functionality used by the calculation
//! steps, including monetary rounding and percent conversion.

use rust_decimal::Decimal;

/// Rounds a monetary value to exactly two decimal places (centavos)
/// using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero, the convention
/// used on Brazilian tax documents.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use difal_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(134.146)), dec!(134.15));
/// assert_eq!(round_half_up(dec!(134.145)), dec!(134.15));
/// assert_eq!(round_half_up(dec!(-53.763)), dec!(-53.76));
/// assert_eq!(round_half_up(dec!(-53.765)), dec!(-53.77)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Converts a human-range percentage (18 means 18%) to a fraction.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use difal_core::calculations::common::to_fraction;
///
/// assert_eq!(to_fraction(dec!(18)), dec!(0.18));
/// assert_eq!(to_fraction(dec!(20.5)), dec!(0.205));
/// assert_eq!(to_fraction(dec!(0)), dec!(0));
/// ```
pub fn to_fraction(percent: Decimal) -> Decimal {
    percent / Decimal::ONE_HUNDRED
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use difal_core::calculations::common::max;
///
/// assert_eq!(max(dec!(-53.76), dec!(0.00)), dec!(0.00));
/// assert_eq!(max(dec!(134.15), dec!(0.00)), dec!(134.15));
/// ```
pub fn max(a: Decimal, b: Decimal) -> Decimal {
    if a > b { a } else { b }
}
