//! Staff roll-up.
//!
//! Sums every allocation result for a staff member across all clients in a
//! period into one [`StaffSummary`]. Totals are the direct sum of the
//! already-rounded per-client figures, rounded once more at the summary.

use std::collections::BTreeMap;

use crate::error::ReconcileResult;
use crate::models::{AllocationResult, StaffSummary};

use super::checked::add_hours;
use super::rounding::round_hours;

/// Rolls allocation results up into one summary per staff member.
///
/// Summaries are ordered by total payable hours, highest first, with ties
/// broken by staff identifier.
///
/// # Errors
///
/// Returns [`crate::error::ReconcileError::ValueOutOfRange`] when a staff
/// member's totals overflow.
///
/// # Example
///
/// ```
/// use payroll_reconciler::calculation::roll_up_staff;
/// use payroll_reconciler::models::{AllocationResult, AllocationStatus};
/// use rust_decimal::Decimal;
///
/// let result = |client: &str, worked: i64| AllocationResult {
///     client_id: client.to_string(),
///     staff_id: "sam".to_string(),
///     ceiling_hours: Decimal::ZERO,
///     entitlement_hours: None,
///     hours_worked: Decimal::from(worked),
///     payable_hours: Decimal::from(worked),
///     hours_reduced: Decimal::ZERO,
///     status: AllocationStatus::NoLimitSet,
/// };
///
/// let summaries = roll_up_staff(&[result("c1", 10), result("c2", 5)]).unwrap();
/// assert_eq!(summaries.len(), 1);
/// assert_eq!(summaries[0].total_payable_hours, Decimal::from(15));
/// ```
pub fn roll_up_staff(results: &[AllocationResult]) -> ReconcileResult<Vec<StaffSummary>> {
    let mut by_staff: BTreeMap<&str, StaffSummary> = BTreeMap::new();

    for result in results {
        let summary = by_staff
            .entry(result.staff_id.as_str())
            .or_insert_with(|| StaffSummary::empty(result.staff_id.clone()));
        let context = || format!("totals for staff '{}'", result.staff_id);
        summary.total_hours_worked =
            add_hours(summary.total_hours_worked, result.hours_worked, context)?;
        summary.total_payable_hours =
            add_hours(summary.total_payable_hours, result.payable_hours, context)?;
        summary.total_hours_reduced =
            add_hours(summary.total_hours_reduced, result.hours_reduced, context)?;
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

/// Orders summaries by payable hours descending, then staff identifier.
pub(crate) fn sort_summaries(summaries: &mut [StaffSummary]) {
    summaries.sort_by(|a, b| {
        b.total_payable_hours
            .cmp(&a.total_payable_hours)
            .then_with(|| a.staff_id.cmp(&b.staff_id))
    });
}
