//! Period combination.
//!
//! Merges two periods' staff summaries (typically week 1 and week 2 of a
//! bi-weekly pay period) with an outer join on staff identity.

use std::collections::BTreeMap;

use crate::error::{ReconcileError, ReconcileResult};
use crate::models::{PeriodCombination, PeriodTotals, StaffSummary};

use super::checked::add_hours;
use super::roll_up::sort_summaries;
use super::rounding::round_hours;

/// Combines two periods' staff summaries into one.
///
/// A staff member missing from one period contributes zero for it. When
/// only one period is supplied its summaries pass through unchanged apart
/// from ordering.
///
/// # Errors
///
/// Returns [`ReconcileError::NoPeriodsToCombine`] when both periods are
/// absent, and [`ReconcileError::ValueOutOfRange`] when combined totals
/// overflow.
///
/// # Example
///
/// ```
/// use payroll_reconciler::calculation::combine_periods;
/// use payroll_reconciler::models::StaffSummary;
/// use rust_decimal::Decimal;
///
/// let week = |worked: i64| vec![StaffSummary {
///     staff_id: "sam".to_string(),
///     total_hours_worked: Decimal::from(worked),
///     total_payable_hours: Decimal::from(worked),
///     total_hours_reduced: Decimal::ZERO,
/// }];
///
/// let combined = combine_periods(Some(week(30).as_slice()), Some(week(20).as_slice())).unwrap();
/// assert_eq!(combined.summaries[0].total_hours_worked, Decimal::from(50));
/// ```
pub fn combine_periods(
    first: Option<&[StaffSummary]>,
    second: Option<&[StaffSummary]>,
) -> ReconcileResult<PeriodCombination> {
    let summaries = match (first, second) {
        (None, None) => return Err(ReconcileError::NoPeriodsToCombine),
        (Some(only), None) | (None, Some(only)) => {
            let mut summaries = only.to_vec();
            sort_summaries(&mut summaries);
            summaries
        }
        (Some(first), Some(second)) => merge(first, second)?,
    };

    let totals = PeriodTotals::from_summaries(&summaries)?;
    Ok(PeriodCombination { summaries, totals })
}

fn merge(first: &[StaffSummary], second: &[StaffSummary]) -> ReconcileResult<Vec<StaffSummary>> {
    let mut by_staff: BTreeMap<&str, StaffSummary> = BTreeMap::new();

    for summary in first.iter().chain(second) {
        let combined = by_staff
            .entry(summary.staff_id.as_str())
            .or_insert_with(|| StaffSummary::empty(summary.staff_id.clone()));
        let context = || format!("combined totals for staff '{}'", summary.staff_id);
        combined.total_hours_worked =
            add_hours(combined.total_hours_worked, summary.total_hours_worked, context)?;
        combined.total_payable_hours =
            add_hours(combined.total_payable_hours, summary.total_payable_hours, context)?;
        combined.total_hours_reduced =
            add_hours(combined.total_hours_reduced, summary.total_hours_reduced, context)?;
    }

    let mut summaries: Vec<StaffSummary> = by_staff
        .into_values()
        .map(|summary| StaffSummary {
            total_hours_worked: round_hours(summary.total_hours_worked),
            total_payable_hours: round_hours(summary.total_payable_hours),
            total_hours_reduced: round_hours(summary.total_hours_reduced),
            ..summary
        })
        .collect();
    sort_summaries(&mut summaries);
    Ok(summaries)
}
