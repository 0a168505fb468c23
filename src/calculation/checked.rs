//! Overflow-checked hour and unit arithmetic.
//!
//! Imported cells and combined summaries carry arbitrary magnitudes, so sums
//! and proportional shares over them fail with
//! [`ReconcileError::ValueOutOfRange`] instead of panicking.

use rust_decimal::Decimal;

use crate::error::{ReconcileError, ReconcileResult};

fn out_of_range(context: impl FnOnce() -> String) -> ReconcileError {
    ReconcileError::ValueOutOfRange { context: context() }
}

/// Adds two hour values.
pub(crate) fn add_hours(
    total: Decimal,
    value: Decimal,
    context: impl FnOnce() -> String,
) -> ReconcileResult<Decimal> {
    total.checked_add(value).ok_or_else(|| out_of_range(context))
}

/// Sums hour values.
pub(crate) fn sum_hours<I>(values: I, context: impl Fn() -> String) -> ReconcileResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |total, value| add_hours(total, value, &context))
}

/// Adds two unit counts.
pub(crate) fn add_units(
    total: u64,
    value: u64,
    context: impl FnOnce() -> String,
) -> ReconcileResult<u64> {
    total.checked_add(value).ok_or_else(|| out_of_range(context))
}

/// `pool × part ÷ whole`, the share of `pool` that `part` earns out of `whole`.
pub(crate) fn share_of(
    pool: Decimal,
    part: Decimal,
    whole: Decimal,
    context: impl FnOnce() -> String,
) -> ReconcileResult<Decimal> {
    pool.checked_mul(part)
        .and_then(|product| product.checked_div(whole))
        .ok_or_else(|| out_of_range(context))
}
