//! Work entry aggregation.
//!
//! Collapses raw per-visit service lines into one [`WorkRecord`] per
//! (client, staff) pair. Grouping uses exact, case-sensitive string
//! equality; callers that want name normalization resolve identities first
//! (see [`crate::store::NameResolver`]).

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::ReconcileResult;
use crate::models::{IssueKind, RawWorkEntry, ReconciliationIssue, WorkRecord};

use super::checked::{add_hours, add_units};
use super::rounding::round_hours;

/// The aggregated work for one period.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    /// One record per (client, staff) pair, ordered by client then staff.
    pub records: BTreeMap<(String, String), WorkRecord>,
    /// Malformed-cell findings in row order.
    pub issues: Vec<ReconciliationIssue>,
}

impl Aggregation {
    /// Groups the records by client, preserving staff order within each client.
    pub fn by_client(&self) -> BTreeMap<String, Vec<WorkRecord>> {
        let mut grouped: BTreeMap<String, Vec<WorkRecord>> = BTreeMap::new();
        for ((client_id, _), record) in &self.records {
            grouped
                .entry(client_id.clone())
                .or_default()
                .push(record.clone());
        }
        grouped
    }
}

/// Parses a numeric cell, accepting plain and scientific notation.
///
/// Returns `None` for blank, non-numeric or negative values.
pub fn parse_hours_cell(cell: Option<&str>) -> Option<Decimal> {
    let text = cell?.trim();
    if text.is_empty() {
        return None;
    }
    let value = Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()?;
    (value >= Decimal::ZERO).then_some(value)
}

/// Parses a units cell. Units must be whole and non-negative.
pub fn parse_units_cell(cell: Option<&str>) -> Option<u64> {
    let value = parse_hours_cell(cell)?;
    if value.fract() != Decimal::ZERO {
        return None;
    }
    value.to_u64()
}

/// Aggregates raw work entries by exact (client, staff) pair.
///
/// Durations and units are summed; a cell that is missing or malformed
/// contributes zero and is recorded as an issue, never an error. Summed
/// hours are rounded to 2 decimals once, here.
///
/// # Errors
///
/// Returns [`crate::error::ReconcileError::ValueOutOfRange`] when a pair's
/// hours or units overflow.
///
/// # Example
///
/// ```
/// use payroll_reconciler::calculation::aggregate_work_entries;
/// use payroll_reconciler::models::RawWorkEntry;
/// use rust_decimal::Decimal;
///
/// let entries = vec![
///     RawWorkEntry::new("Client A", "Sam", Decimal::new(35, 1)).with_units(14),
///     RawWorkEntry::new("Client A", "Sam", Decimal::new(15, 1)).with_units(6),
/// ];
/// let aggregation = aggregate_work_entries(&entries).unwrap();
/// let record = &aggregation.records[&("Client A".to_string(), "Sam".to_string())];
/// assert_eq!(record.hours_worked, Decimal::new(5, 0));
/// assert_eq!(record.units_worked, 20);
/// ```
pub fn aggregate_work_entries(entries: &[RawWorkEntry]) -> ReconcileResult<Aggregation> {
    let mut sums: BTreeMap<(String, String), (Decimal, u64)> = BTreeMap::new();
    let mut issues = Vec::new();

    for (row, entry) in entries.iter().enumerate() {
        let hours = match parse_hours_cell(entry.duration.as_deref()) {
            Some(hours) => hours,
            None => {
                issues.push(
                    ReconciliationIssue::new(
                        IssueKind::MalformedDuration,
                        format!(
                            "Row {}: duration {:?} is not a usable number of hours; counted as zero",
                            row + 1,
                            entry.duration.as_deref().unwrap_or("")
                        ),
                    )
                    .for_client(entry.client.clone())
                    .for_staff(entry.staff.clone()),
                );
                Decimal::ZERO
            }
        };

        // A missing units column is normal for some exports; only flag text that fails to parse.
        let units = match entry.units.as_deref() {
            None => 0,
            Some(cell) if cell.trim().is_empty() => 0,
            Some(cell) => parse_units_cell(Some(cell)).unwrap_or_else(|| {
                issues.push(
                    ReconciliationIssue::new(
                        IssueKind::MalformedUnits,
                        format!(
                            "Row {}: units {:?} is not a whole number; counted as zero",
                            row + 1,
                            cell
                        ),
                    )
                    .for_client(entry.client.clone())
                    .for_staff(entry.staff.clone()),
                );
                0
            }),
        };

        let slot = sums
            .entry((entry.client.clone(), entry.staff.clone()))
            .or_insert((Decimal::ZERO, 0));
        let context = || {
            format!(
                "hours worked by '{}' on client '{}'",
                entry.staff, entry.client
            )
        };
        slot.0 = add_hours(slot.0, hours, context)?;
        slot.1 = add_units(slot.1, units, || {
            format!("units worked by '{}' on client '{}'", entry.staff, entry.client)
        })?;
    }

    let records = sums
        .into_iter()
        .map(|((client_id, staff_id), (hours, units))| {
            let record = WorkRecord::new(client_id.clone(), staff_id.clone(), round_hours(hours), units);
            ((client_id, staff_id), record)
        })
        .collect();

    Ok(Aggregation { records, issues })
}
