//! Allocation outputs.
//!
//! This module contains the per-(client, staff) [`AllocationResult`] produced
//! by the allocation engine and the per-staff [`StaffSummary`] roll-up.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::sum_hours;
use crate::error::ReconcileResult;

/// How a staff member's payable hours were decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStatus {
    /// Paid as worked.
    Ok,
    /// The client had no ceiling configured; paid as worked.
    NoLimitSet,
    /// Worked beyond their own entitlement while the client was over ceiling.
    CappedAtEntitlement,
    /// No entitlement known; paid a proportional share of the ceiling.
    ProratedNoEntitlement,
}

impl AllocationStatus {
    /// Returns the operator-facing label for the status.
    ///
    /// ```
    /// use payroll_reconciler::models::AllocationStatus;
    ///
    /// assert_eq!(AllocationStatus::CappedAtEntitlement.label(), "Capped at Assignment");
    /// ```
    pub fn label(&self) -> &'static str {
        match self {
            AllocationStatus::Ok => "OK",
            AllocationStatus::NoLimitSet => "No POS Set",
            AllocationStatus::CappedAtEntitlement => "Capped at Assignment",
            AllocationStatus::ProratedNoEntitlement => "No Assignment - Prorated",
        }
    }
}

/// The payable-hours decision for one staff member on one client.
///
/// # Example
///
/// ```
/// use payroll_reconciler::models::{AllocationResult, AllocationStatus};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let result = AllocationResult {
///     client_id: "client_a".to_string(),
///     staff_id: "staff_b".to_string(),
///     ceiling_hours: Decimal::from(40),
///     entitlement_hours: None,
///     hours_worked: Decimal::from(20),
///     payable_hours: Decimal::from_str("17.78").unwrap(),
///     hours_reduced: Decimal::from_str("2.22").unwrap(),
///     status: AllocationStatus::ProratedNoEntitlement,
/// };
/// assert!(result.was_reduced());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationResult {
    /// The client identifier.
    pub client_id: String,
    /// The staff identifier.
    pub staff_id: String,
    /// The client's ceiling used for the decision (zero when unset).
    pub ceiling_hours: Decimal,
    /// The staff member's entitlement on this client, when known.
    pub entitlement_hours: Option<Decimal>,
    /// Hours worked.
    pub hours_worked: Decimal,
    /// Hours payable.
    pub payable_hours: Decimal,
    /// `round(hours_worked - payable_hours, 2)`.
    pub hours_reduced: Decimal,
    /// How the decision was reached.
    pub status: AllocationStatus,
}

impl AllocationResult {
    /// Returns true when fewer hours are payable than were worked.
    pub fn was_reduced(&self) -> bool {
        self.hours_reduced > Decimal::ZERO
    }
}

/// One staff member's totals across all clients in a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffSummary {
    /// The staff identifier.
    pub staff_id: String,
    /// Sum of hours worked.
    pub total_hours_worked: Decimal,
    /// Sum of payable hours; the figure payroll pays.
    pub total_payable_hours: Decimal,
    /// Sum of hours reduced.
    pub total_hours_reduced: Decimal,
}

impl StaffSummary {
    /// A summary with every total at zero.
    pub fn empty(staff_id: impl Into<String>) -> Self {
        Self {
            staff_id: staff_id.into(),
            total_hours_worked: Decimal::ZERO,
            total_payable_hours: Decimal::ZERO,
            total_hours_reduced: Decimal::ZERO,
        }
    }
}

/// Headline totals across every staff member in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTotals {
    /// Number of staff members with a summary.
    pub staff_count: usize,
    /// Sum of hours worked.
    pub total_hours_worked: Decimal,
    /// Sum of payable hours.
    pub total_payable_hours: Decimal,
    /// Sum of hours reduced.
    pub total_hours_reduced: Decimal,
    /// Number of staff members with a positive reduction.
    pub staff_with_reductions: usize,
}

impl PeriodTotals {
    /// Computes totals from a set of staff summaries.
    ///
    /// Fails with [`crate::error::ReconcileError::ValueOutOfRange`] when a
    /// sum overflows.
    ///
    /// ```
    /// use payroll_reconciler::models::{PeriodTotals, StaffSummary};
    /// use rust_decimal::Decimal;
    ///
    /// let totals = PeriodTotals::from_summaries(&[StaffSummary::empty("s1")]).unwrap();
    /// assert_eq!(totals.staff_count, 1);
    /// assert_eq!(totals.total_payable_hours, Decimal::ZERO);
    /// ```
    pub fn from_summaries(summaries: &[StaffSummary]) -> ReconcileResult<Self> {
        let context = || "period totals".to_string();
        Ok(Self {
            staff_count: summaries.len(),
            total_hours_worked: sum_hours(summaries.iter().map(|s| s.total_hours_worked), context)?,
            total_payable_hours: sum_hours(summaries.iter().map(|s| s.total_payable_hours), context)?,
            total_hours_reduced: sum_hours(summaries.iter().map(|s| s.total_hours_reduced), context)?,
            staff_with_reductions: summaries
                .iter()
                .filter(|s| s.total_hours_reduced > Decimal::ZERO)
                .count(),
        })
    }
}
