//! Claims feed reconciliation helpers.
//!
//! In claims mode a client's ceiling is the payer-approved total rather than
//! a static authorization. Approved units convert to hours at a fixed
//! units-per-hour rate, and any difference between approved and worked
//! units is a discrepancy.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::error::{ReconcileError, ReconcileResult};
use crate::models::{
    ClaimsClientSummary, IssueKind, RawClaimEntry, ReconciliationIssue, WorkRecord,
};

use super::aggregation::parse_hours_cell;
use super::checked::{add_hours, add_units, sum_hours};
use super::rounding::round_hours;

/// The payer's fixed billing convention: four units per hour.
pub const DEFAULT_UNITS_PER_HOUR: Decimal = Decimal::from_parts(4, 0, 0, false, 0);

/// Approved claims for one client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientClaims {
    /// Net approved units, summed across claim lines.
    pub approved_units: Decimal,
    /// Non-blank comments in line order.
    pub comments: Vec<String>,
}

/// Claims grouped by client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimsAggregation {
    /// Approved claims per client identifier.
    pub by_client: BTreeMap<String, ClientClaims>,
    /// Malformed-cell findings in row order.
    pub issues: Vec<ReconciliationIssue>,
}

/// Groups claim lines by exact client identifier.
///
/// Net units may be negative on individual lines (reversals) and are summed
/// as given; a blank or non-numeric units cell contributes zero and is
/// reported.
///
/// # Errors
///
/// Returns [`ReconcileError::ValueOutOfRange`] when a client's net units
/// overflow.
pub fn aggregate_claims(entries: &[RawClaimEntry]) -> ReconcileResult<ClaimsAggregation> {
    let mut aggregation = ClaimsAggregation::default();

    for (row, entry) in entries.iter().enumerate() {
        let units = entry
            .approved_units
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .and_then(parse_net_units);

        let claims = aggregation
            .by_client
            .entry(entry.client.clone())
            .or_default();

        match units {
            Some(units) => {
                claims.approved_units = add_hours(claims.approved_units, units, || {
                    format!("approved units for client '{}'", entry.client)
                })?
            }
            None => aggregation.issues.push(
                ReconciliationIssue::new(
                    IssueKind::MalformedUnits,
                    format!(
                        "Claims row {}: approved units {:?} is not a number; counted as zero",
                        row + 1,
                        entry.approved_units.as_deref().unwrap_or("")
                    ),
                )
                .for_client(entry.client.clone()),
            ),
        }

        if let Some(comment) = entry
            .comments
            .as_deref()
            .map(str::trim)
            .filter(|comment| !comment.is_empty())
        {
            claims.comments.push(comment.to_string());
        }
    }

    Ok(aggregation)
}

fn parse_net_units(text: &str) -> Option<Decimal> {
    match text.strip_prefix('-') {
        Some(magnitude) => parse_hours_cell(Some(magnitude)).map(|units| -units),
        None => parse_hours_cell(Some(text)),
    }
}

/// Converts approved units to hours, rounded to 2 decimals.
///
/// Fails with [`ReconcileError::ValueOutOfRange`] when `units_per_hour` is
/// zero or the quotient overflows.
///
/// ```
/// use payroll_reconciler::calculation::{approved_hours, DEFAULT_UNITS_PER_HOUR};
/// use rust_decimal::Decimal;
///
/// let hours = approved_hours(Decimal::from(100), DEFAULT_UNITS_PER_HOUR).unwrap();
/// assert_eq!(hours, Decimal::from(25));
/// ```
pub fn approved_hours(approved_units: Decimal, units_per_hour: Decimal) -> ReconcileResult<Decimal> {
    approved_units
        .checked_div(units_per_hour)
        .map(round_hours)
        .ok_or_else(|| ReconcileError::ValueOutOfRange {
            context: format!(
                "approved hours for {} units at {} units per hour",
                approved_units, units_per_hour
            ),
        })
}

/// Compares one client's worked figures against its approved claims.
///
/// A client with no claim lines is treated as having zero approved units.
///
/// # Errors
///
/// Returns [`ReconcileError::NegativeApprovedUnits`] when net approved units
/// sum below zero.
pub fn summarize_client_claims(
    client_id: &str,
    work: &[WorkRecord],
    claims: Option<&ClientClaims>,
    units_per_hour: Decimal,
) -> ReconcileResult<ClaimsClientSummary> {
    let approved_units = claims.map(|c| c.approved_units).unwrap_or(Decimal::ZERO);
    if approved_units < Decimal::ZERO {
        return Err(ReconcileError::NegativeApprovedUnits {
            client_id: client_id.to_string(),
            units: approved_units,
        });
    }

    let worked_hours = round_hours(sum_hours(work.iter().map(|r| r.hours_worked), || {
        format!("hours worked for client '{}'", client_id)
    })?);
    let worked_units = work.iter().try_fold(0u64, |total, record| {
        add_units(total, record.units_worked, || {
            format!("units worked for client '{}'", client_id)
        })
    })?;

    Ok(ClaimsClientSummary {
        client_id: client_id.to_string(),
        worked_hours,
        worked_units,
        approved_units,
        approved_hours: approved_hours(approved_units, units_per_hour)?,
        has_discrepancy: approved_units != Decimal::from(worked_units),
        comments: claims.map(|c| c.comments.join("; ")).unwrap_or_default(),
    })
}
