//! Hour rounding helpers.
//!
//! Hours are rounded to 2 decimal places with the midpoint-to-even strategy,
//! matching how the source spreadsheets round.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places hours are reported with.
pub const HOURS_DP: u32 = 2;

/// Rounds hours to 2 decimal places, midpoint to even.
///
/// ```
/// use payroll_reconciler::calculation::round_hours;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_hours(Decimal::from_str("17.7777").unwrap()), Decimal::from_str("17.78").unwrap());
/// assert_eq!(round_hours(Decimal::from_str("0.125").unwrap()), Decimal::from_str("0.12").unwrap());
/// ```
pub fn round_hours(hours: Decimal) -> Decimal {
    hours.round_dp_with_strategy(HOURS_DP, RoundingStrategy::MidpointNearestEven)
}

/// Truncates hours to 2 decimal places.
pub fn floor_hours(hours: Decimal) -> Decimal {
    hours.round_dp_with_strategy(HOURS_DP, RoundingStrategy::ToZero)
}

/// One hundredth of an hour.
pub(crate) fn hundredth() -> Decimal {
    Decimal::new(1, HOURS_DP)
}
