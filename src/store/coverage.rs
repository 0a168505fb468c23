//! Assignment coverage.
//!
//! Compares each active client's weekly POS hours with the hours assigned to
//! active staff, for spotting clients that are under- or over-assigned
//! before a period is reconciled.

use std::collections::{BTreeMap, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{add_hours, round_hours};
use crate::config::ReferenceData;
use crate::error::ReconcileResult;

/// How much of a client's POS hours are covered by assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageStatus {
    /// No active assignment.
    Unassigned,
    /// Assigned hours fall short of POS hours.
    PartiallyAssigned,
    /// Assigned hours equal POS hours.
    FullyAssigned,
    /// Assigned hours exceed POS hours.
    OverAssigned,
}

/// Assignment coverage for one active client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCoverage {
    /// The client identifier.
    pub client_id: String,
    /// Weekly POS hours.
    pub pos_hours: Decimal,
    /// Sum of active assignments.
    pub assigned_hours: Decimal,
    /// POS hours minus assigned hours; negative when over-assigned.
    pub remaining_hours: Decimal,
    /// Number of active assignments.
    pub assignment_count: usize,
    /// Coverage classification.
    pub status: CoverageStatus,
}

/// Computes assignment coverage for every active client, ordered by client.
///
/// Only assignments whose staff member and client are both active count.
/// Fails with [`crate::error::ReconcileError::ValueOutOfRange`] when a
/// client's assigned hours overflow.
pub fn assignment_coverage(data: &ReferenceData) -> ReconcileResult<Vec<ClientCoverage>> {
    let active_staff: HashSet<&str> = data
        .staff
        .iter()
        .filter(|staff| staff.active)
        .map(|staff| staff.name.as_str())
        .collect();

    let mut by_client: BTreeMap<&str, (Decimal, Decimal, usize)> = data
        .clients
        .iter()
        .filter(|client| client.active)
        .map(|client| (client.name.as_str(), (client.pos_hours, Decimal::ZERO, 0)))
        .collect();

    for assignment in &data.assignments {
        if !active_staff.contains(assignment.staff.as_str()) {
            continue;
        }
        if let Some((_, assigned, count)) = by_client.get_mut(assignment.client.as_str()) {
            *assigned = add_hours(*assigned, assignment.assigned_hours, || {
                format!("assigned hours for client '{}'", assignment.client)
            })?;
            *count += 1;
        }
    }

    Ok(by_client
        .into_iter()
        .map(|(client_id, (pos_hours, assigned, assignment_count))| {
            let remaining_hours = round_hours(pos_hours - assigned);
            let status = if assignment_count == 0 {
                CoverageStatus::Unassigned
            } else if remaining_hours > Decimal::ZERO {
                CoverageStatus::PartiallyAssigned
            } else if remaining_hours.is_zero() {
                CoverageStatus::FullyAssigned
            } else {
                CoverageStatus::OverAssigned
            };
            ClientCoverage {
                client_id: client_id.to_string(),
                pos_hours,
                assigned_hours: round_hours(assigned),
                remaining_hours,
                assignment_count,
                status,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> ReferenceData {
        serde_yaml::from_str(
            r#"
staff:
  - name: A
  - name: B
  - name: Gone
    active: false
clients:
  - name: Full
    pos_hours: 20
  - name: Over
    pos_hours: 10
  - name: Partial
    pos_hours: 40
  - name: Empty
    pos_hours: 15
  - name: Closed
    pos_hours: 5
    active: false
assignments:
  - { staff: A, client: Full, assigned_hours: 12 }
  - { staff: B, client: Full, assigned_hours: 8 }
  - { staff: A, client: Over, assigned_hours: 12.5 }
  - { staff: B, client: Partial, assigned_hours: 30 }
  - { staff: Gone, client: Partial, assigned_hours: 10 }
  - { staff: A, client: Closed, assigned_hours: 5 }
"#,
        )
        .unwrap()
    }

    fn find<'a>(coverage: &'a [ClientCoverage], client: &str) -> &'a ClientCoverage {
        coverage.iter().find(|c| c.client_id == client).unwrap()
    }

    #[test]
    fn test_statuses() {
        let coverage = assignment_coverage(&data()).unwrap();

        assert_eq!(coverage.len(), 4);
        assert_eq!(find(&coverage, "Full").status, CoverageStatus::FullyAssigned);
        assert_eq!(find(&coverage, "Empty").status, CoverageStatus::Unassigned);

        let over = find(&coverage, "Over");
        assert_eq!(over.status, CoverageStatus::OverAssigned);
        assert_eq!(over.remaining_hours, Decimal::new(-25, 1));

        let partial = find(&coverage, "Partial");
        assert_eq!(partial.status, CoverageStatus::PartiallyAssigned);
        assert_eq!(partial.assignment_count, 1);
        assert_eq!(partial.remaining_hours, Decimal::new(10, 0));
    }

    #[test]
    fn test_ordered_by_client() {
        let coverage = assignment_coverage(&data()).unwrap();

        let order: Vec<&str> = coverage.iter().map(|c| c.client_id.as_str()).collect();
        assert_eq!(order, vec!["Empty", "Full", "Over", "Partial"]);
    }

    #[test]
    fn test_assigned_hours_beyond_decimal_range_fail() {
        let data: ReferenceData = serde_yaml::from_str(
            r#"
staff:
  - name: A
  - name: B
clients:
  - name: Busy
    pos_hours: 40
assignments:
  - { staff: A, client: Busy, assigned_hours: "79228162514264337593543950335" }
  - { staff: B, client: Busy, assigned_hours: "79228162514264337593543950335" }
"#,
        )
        .unwrap();

        assert!(matches!(
            assignment_coverage(&data),
            Err(crate::error::ReconcileError::ValueOutOfRange { .. })
        ));
    }
}
