//! Hour allocation engine.
//!
//! Given one client's ceiling and the work records naming that client,
//! decides how many of each staff member's worked hours are payable.
//!
//! The decision has four branches:
//!
//! 1. **No limit** - the ceiling is the zero sentinel; everyone is paid as worked.
//! 2. **Pass-through** - the group is within budget (`total <= ceiling`), or in
//!    claims mode no discrepancy was detected; everyone is paid as worked.
//! 3. **Over ceiling** (assignment mode) - staff with an entitlement are capped
//!    at it; staff without one receive a proportional share of the ceiling.
//! 4. **Discrepancy** (claims mode) - every staff member receives a
//!    proportional share of the approved total.

use std::collections::HashSet;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ReconcileError, ReconcileResult};
use crate::models::{
    AllocationResult, AllocationStatus, AuditStep, ClientCeiling, Entitlements, IssueKind,
    ReconciliationIssue, WorkRecord,
};

use super::checked::{add_hours, share_of, sum_hours};
use super::rounding::{floor_hours, hundredth, round_hours};

/// How prorated shares are rounded to hundredths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProrationRounding {
    /// Each share is rounded to 2 decimals on its own.
    #[default]
    PerStaff,
    /// The pool is floored to hundredths and handed out by largest remainder,
    /// so the prorated shares never sum above the pool.
    LargestRemainder,
}

/// What makes a client's hours subject to capping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationTrigger {
    /// Cap when total worked exceeds the ceiling.
    OverCeiling,
    /// Prorate everyone whenever the claims feed disagrees with worked units.
    Discrepancy {
        /// Whether approved units differ from worked units.
        detected: bool,
    },
}

/// Parameters for one allocation decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationPolicy {
    /// Which rule triggers capping.
    pub trigger: AllocationTrigger,
    /// Clamp prorated payable hours to hours worked.
    pub clamp_payable_to_worked: bool,
    /// Rounding used for prorated shares.
    pub rounding: ProrationRounding,
}

impl AllocationPolicy {
    /// Policy for assignment-based allocation against a static ceiling.
    pub fn assignment_based(rounding: ProrationRounding) -> Self {
        Self {
            trigger: AllocationTrigger::OverCeiling,
            clamp_payable_to_worked: false,
            rounding,
        }
    }

    /// Policy for claims-based reconciliation against an approved total.
    pub fn claims_based(
        discrepancy_detected: bool,
        clamp_payable_to_worked: bool,
        rounding: ProrationRounding,
    ) -> Self {
        Self {
            trigger: AllocationTrigger::Discrepancy {
                detected: discrepancy_detected,
            },
            clamp_payable_to_worked,
            rounding,
        }
    }
}

impl Default for AllocationPolicy {
    fn default() -> Self {
        Self::assignment_based(ProrationRounding::PerStaff)
    }
}

/// The allocation decision for one client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAllocation {
    /// The client identifier.
    pub client_id: String,
    /// One result per staff member, ordered by staff identifier.
    pub results: Vec<AllocationResult>,
    /// Findings raised while deciding this client.
    pub issues: Vec<ReconciliationIssue>,
    /// The audit record of the decision.
    pub audit_step: AuditStep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Branch {
    NoLimit,
    PassThrough,
    OverCeiling,
    Discrepancy,
}

impl Branch {
    fn rule_id(&self) -> &'static str {
        match self {
            Branch::NoLimit => "no_limit_set",
            Branch::PassThrough => "within_ceiling",
            Branch::OverCeiling => "over_ceiling",
            Branch::Discrepancy => "claims_discrepancy",
        }
    }

    fn rule_name(&self) -> &'static str {
        match self {
            Branch::NoLimit => "No Ceiling Configured",
            Branch::PassThrough => "Within Ceiling",
            Branch::OverCeiling => "Over Ceiling Capping",
            Branch::Discrepancy => "Claims Discrepancy Proration",
        }
    }
}

/// Decides payable hours for every staff member who worked for one client.
///
/// # Arguments
///
/// * `ceiling` - The client's ceiling (zero means unset)
/// * `work` - The client's work records, at most one per staff member
/// * `entitlements` - Per-(staff, client) entitlements, or `None` when no
///   entitlement source exists (claims mode)
/// * `policy` - Trigger, clamping and rounding rules
/// * `step_number` - The step number for the audit record
///
/// # Returns
///
/// A [`ClientAllocation`], or an error if the work set is empty, names
/// another client, repeats a staff member, contains negative hours, or
/// requires proration over zero total hours.
///
/// # Example
///
/// ```
/// use payroll_reconciler::calculation::{allocate_client, AllocationPolicy};
/// use payroll_reconciler::models::{AllocationStatus, ClientCeiling, Entitlement, Entitlements, WorkRecord};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let ceiling = ClientCeiling::new("client", Decimal::from(40));
/// let work = vec![
///     WorkRecord::new("client", "a", Decimal::from(25), 0),
///     WorkRecord::new("client", "b", Decimal::from(20), 0),
/// ];
/// let entitlements: Entitlements = vec![Entitlement {
///     staff_id: "a".to_string(),
///     client_id: "client".to_string(),
///     assigned_hours: Decimal::from(30),
/// }]
/// .into_iter()
/// .collect();
///
/// let allocation = allocate_client(&ceiling, &work, Some(&entitlements), &AllocationPolicy::default(), 1).unwrap();
///
/// assert_eq!(allocation.results[0].payable_hours, Decimal::from(25));
/// assert_eq!(allocation.results[1].payable_hours, Decimal::from_str("17.78").unwrap());
/// assert_eq!(allocation.results[1].status, AllocationStatus::ProratedNoEntitlement);
/// ```
pub fn allocate_client(
    ceiling: &ClientCeiling,
    work: &[WorkRecord],
    entitlements: Option<&Entitlements>,
    policy: &AllocationPolicy,
    step_number: u32,
) -> ReconcileResult<ClientAllocation> {
    let client_id = ceiling.client_id.as_str();
    let mut work = validate_work_set(ceiling, work)?;
    work.sort_by(|a, b| a.staff_id.cmp(&b.staff_id));

    let ceiling_hours = ceiling.ceiling_hours;
    let total_worked = sum_hours(work.iter().map(|record| record.hours_worked), || {
        format!("hours worked on client '{}'", client_id)
    })?;

    let branch = if ceiling.is_unset() {
        Branch::NoLimit
    } else {
        match policy.trigger {
            AllocationTrigger::OverCeiling if total_worked <= ceiling_hours => Branch::PassThrough,
            AllocationTrigger::OverCeiling => Branch::OverCeiling,
            AllocationTrigger::Discrepancy { detected: false } => Branch::PassThrough,
            AllocationTrigger::Discrepancy { detected: true } => Branch::Discrepancy,
        }
    };

    let lookup = |record: &WorkRecord| -> ReconcileResult<Option<Decimal>> {
        let assigned = entitlements.and_then(|table| table.assigned_hours(&record.staff_id, client_id));
        if let Some(hours) = assigned.filter(|hours| *hours < Decimal::ZERO) {
            return Err(ReconcileError::NegativeHours {
                context: format!(
                    "entitlement for staff '{}' on client '{}'",
                    record.staff_id, client_id
                ),
                value: hours,
            });
        }
        Ok(assigned)
    };

    let mut issues = Vec::new();
    let mut results = Vec::with_capacity(work.len());

    match branch {
        Branch::NoLimit => {
            issues.push(
                ReconciliationIssue::new(
                    IssueKind::NoLimitSet,
                    format!(
                        "Client '{}' not found or has no ceiling set; {} hours paid as worked",
                        client_id,
                        total_worked.normalize()
                    ),
                )
                .for_client(client_id),
            );
            for record in &work {
                results.push(build_result(
                    record,
                    ceiling_hours,
                    None,
                    record.hours_worked,
                    AllocationStatus::NoLimitSet,
                ));
            }
        }
        Branch::PassThrough => {
            for record in &work {
                results.push(build_result(
                    record,
                    ceiling_hours,
                    lookup(record)?,
                    record.hours_worked,
                    AllocationStatus::Ok,
                ));
            }
        }
        Branch::OverCeiling | Branch::Discrepancy => {
            if total_worked.is_zero() {
                return Err(ReconcileError::ZeroTotalWorked {
                    client_id: client_id.to_string(),
                });
            }

            // Index into `work` of every record that takes the prorated path.
            let mut prorated: Vec<usize> = Vec::new();
            let mut decided: Vec<Option<(Option<Decimal>, Decimal, AllocationStatus)>> =
                vec![None; work.len()];

            for (index, record) in work.iter().enumerate() {
                let assigned = if branch == Branch::OverCeiling {
                    lookup(record)?
                } else {
                    None
                };
                match assigned {
                    Some(assigned_hours) if record.hours_worked > assigned_hours => {
                        decided[index] = Some((
                            Some(assigned_hours),
                            assigned_hours,
                            AllocationStatus::CappedAtEntitlement,
                        ));
                    }
                    Some(assigned_hours) => {
                        decided[index] = Some((
                            Some(assigned_hours),
                            record.hours_worked,
                            AllocationStatus::Ok,
                        ));
                    }
                    None => {
                        if branch == Branch::OverCeiling {
                            issues.push(
                                ReconciliationIssue::new(
                                    IssueKind::MissingEntitlement,
                                    format!(
                                        "No assignment found for '{}' on client '{}'; hours prorated",
                                        record.staff_id, client_id
                                    ),
                                )
                                .for_client(client_id)
                                .for_staff(record.staff_id.clone()),
                            );
                        }
                        prorated.push(index);
                    }
                }
            }

            let shares = prorate(
                ceiling_hours,
                total_worked,
                &prorated.iter().map(|&i| &work[i]).collect::<Vec<_>>(),
                policy.rounding,
            )
            .map_err(|_| ReconcileError::ValueOutOfRange {
                context: format!("prorated shares for client '{}'", client_id),
            })?;
            for (&index, share) in prorated.iter().zip(shares) {
                let record = &work[index];
                let payable = if share > record.hours_worked {
                    if policy.clamp_payable_to_worked {
                        issues.push(
                            ReconciliationIssue::new(
                                IssueKind::PayableClampedToWorked,
                                format!(
                                    "Prorated share {} for '{}' on client '{}' clamped to {} hours worked",
                                    share.normalize(),
                                    record.staff_id,
                                    client_id,
                                    record.hours_worked.normalize()
                                ),
                            )
                            .for_client(client_id)
                            .for_staff(record.staff_id.clone()),
                        );
                        record.hours_worked
                    } else {
                        issues.push(
                            ReconciliationIssue::new(
                                IssueKind::PayableExceedsWorked,
                                format!(
                                    "Prorated share {} for '{}' on client '{}' exceeds {} hours worked",
                                    share.normalize(),
                                    record.staff_id,
                                    client_id,
                                    record.hours_worked.normalize()
                                ),
                            )
                            .for_client(client_id)
                            .for_staff(record.staff_id.clone()),
                        );
                        share
                    }
                } else {
                    share
                };
                decided[index] = Some((None, payable, AllocationStatus::ProratedNoEntitlement));
            }

            for (record, decision) in work.iter().zip(decided) {
                if let Some((assigned, payable, status)) = decision {
                    results.push(build_result(record, ceiling_hours, assigned, payable, status));
                }
            }
        }
    }

    let total_payable = sum_hours(results.iter().map(|r| r.payable_hours), || {
        format!("payable hours on client '{}'", client_id)
    })?;
    let prorating = matches!(branch, Branch::OverCeiling | Branch::Discrepancy);
    if prorating && total_payable > ceiling_hours {
        issues.push(
            ReconciliationIssue::new(
                IssueKind::CeilingExceeded,
                format!(
                    "Payable hours for client '{}' total {} against a ceiling of {}",
                    client_id,
                    total_payable.normalize(),
                    ceiling_hours.normalize()
                ),
            )
            .for_client(client_id),
        );
    }

    debug!(
        client_id = %client_id,
        branch = branch.rule_id(),
        staff_count = results.len(),
        total_worked = %total_worked,
        total_payable = %total_payable,
        "Allocated client hours"
    );

    let audit_step = build_audit_step(
        step_number,
        branch,
        client_id,
        ceiling_hours,
        total_worked,
        total_payable,
        &results,
    );

    Ok(ClientAllocation {
        client_id: client_id.to_string(),
        results,
        issues,
        audit_step,
    })
}

/// Checks the structural invariants of a client's work set.
fn validate_work_set(
    ceiling: &ClientCeiling,
    work: &[WorkRecord],
) -> ReconcileResult<Vec<WorkRecord>> {
    if work.is_empty() {
        return Err(ReconcileError::EmptyWorkSet {
            client_id: ceiling.client_id.clone(),
        });
    }
    if ceiling.ceiling_hours < Decimal::ZERO {
        return Err(ReconcileError::NegativeHours {
            context: format!("ceiling for client '{}'", ceiling.client_id),
            value: ceiling.ceiling_hours,
        });
    }

    let mut seen = HashSet::new();
    for record in work {
        if record.client_id != ceiling.client_id {
            return Err(ReconcileError::MixedClientWorkSet {
                expected: ceiling.client_id.clone(),
                found: record.client_id.clone(),
            });
        }
        if !seen.insert(record.staff_id.as_str()) {
            return Err(ReconcileError::DuplicateWorkRecord {
                client_id: record.client_id.clone(),
                staff_id: record.staff_id.clone(),
            });
        }
        if record.hours_worked < Decimal::ZERO {
            return Err(ReconcileError::NegativeHours {
                context: format!(
                    "hours worked by '{}' on client '{}'",
                    record.staff_id, record.client_id
                ),
                value: record.hours_worked,
            });
        }
    }

    Ok(work.to_vec())
}

/// Splits `ceiling` across `records` in proportion to their share of `total_worked`.
fn prorate(
    ceiling: Decimal,
    total_worked: Decimal,
    records: &[&WorkRecord],
    rounding: ProrationRounding,
) -> ReconcileResult<Vec<Decimal>> {
    let context = || "prorated share".to_string();
    let share = |hours: Decimal| share_of(ceiling, hours, total_worked, context);

    match rounding {
        ProrationRounding::PerStaff => records
            .iter()
            .map(|record| share(record.hours_worked).map(round_hours))
            .collect(),
        ProrationRounding::LargestRemainder => {
            let exact = records
                .iter()
                .map(|record| share(record.hours_worked))
                .collect::<ReconcileResult<Vec<Decimal>>>()?;
            let mut shares: Vec<Decimal> = exact.iter().map(|&share| floor_hours(share)).collect();

            let prorated_worked = sum_hours(records.iter().map(|record| record.hours_worked), context)?;
            let target = floor_hours(share(prorated_worked)?);
            let handed_out = sum_hours(shares.iter().copied(), context)?;
            let spare_cents = (target - handed_out)
                .checked_div(hundredth())
                .ok_or_else(|| ReconcileError::ValueOutOfRange { context: context() })?
                .round()
                .to_i64()
                .unwrap_or(0)
                .max(0) as usize;

            let mut order: Vec<usize> = (0..records.len()).collect();
            order.sort_by(|&a, &b| {
                let remainder_a = exact[a] - shares[a];
                let remainder_b = exact[b] - shares[b];
                remainder_b
                    .cmp(&remainder_a)
                    .then_with(|| records[a].staff_id.cmp(&records[b].staff_id))
            });
            for &index in order.iter().take(spare_cents) {
                shares[index] = add_hours(shares[index], hundredth(), context)?;
            }
            Ok(shares)
        }
    }
}

fn build_result(
    record: &WorkRecord,
    ceiling_hours: Decimal,
    entitlement_hours: Option<Decimal>,
    payable_hours: Decimal,
    status: AllocationStatus,
) -> AllocationResult {
    AllocationResult {
        client_id: record.client_id.clone(),
        staff_id: record.staff_id.clone(),
        ceiling_hours,
        entitlement_hours,
        hours_worked: record.hours_worked,
        payable_hours,
        hours_reduced: round_hours(record.hours_worked - payable_hours),
        status,
    }
}

fn build_audit_step(
    step_number: u32,
    branch: Branch,
    client_id: &str,
    ceiling_hours: Decimal,
    total_worked: Decimal,
    total_payable: Decimal,
    results: &[AllocationResult],
) -> AuditStep {
    let reasoning = match branch {
        Branch::NoLimit => format!(
            "No ceiling configured for client; {} hours paid as worked",
            total_worked.normalize()
        ),
        Branch::PassThrough => format!(
            "{} hours worked is within the {} hour ceiling; all staff paid as worked",
            total_worked.normalize(),
            ceiling_hours.normalize()
        ),
        Branch::OverCeiling => format!(
            "{} hours worked exceeds the {} hour ceiling by {}; entitlements capped, unassigned staff prorated",
            total_worked.normalize(),
            ceiling_hours.normalize(),
            (total_worked - ceiling_hours).normalize()
        ),
        Branch::Discrepancy => format!(
            "Claims approved {} hours against {} hours worked; all staff prorated by share of hours",
            ceiling_hours.normalize(),
            total_worked.normalize()
        ),
    };

    AuditStep {
        step_number,
        rule_id: branch.rule_id().to_string(),
        rule_name: branch.rule_name().to_string(),
        client_id: client_id.to_string(),
        input: serde_json::json!({
            "ceiling_hours": ceiling_hours.normalize().to_string(),
            "total_worked": total_worked.normalize().to_string(),
            "staff_count": results.len()
        }),
        output: serde_json::json!({
            "total_payable": total_payable.normalize().to_string(),
            "allocations": results
                .iter()
                .map(|r| serde_json::json!({
                    "staff_id": r.staff_id,
                    "payable_hours": r.payable_hours.normalize().to_string(),
                    "status": r.status.label()
                }))
                .collect::<Vec<_>>()
        }),
        reasoning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Entitlement;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn work(client: &str, staff: &str, hours: &str) -> WorkRecord {
        WorkRecord::new(client, staff, dec(hours), 0)
    }

    fn entitlements(pairs: &[(&str, &str, &str)]) -> Entitlements {
        pairs
            .iter()
            .map(|(staff, client, hours)| Entitlement {
                staff_id: staff.to_string(),
                client_id: client.to_string(),
                assigned_hours: dec(hours),
            })
            .collect()
    }

    fn assignment() -> AllocationPolicy {
        AllocationPolicy::default()
    }

    /// AL-001: ceiling 40, 25 + 20 worked, A entitled to 30, B unassigned
    #[test]
    fn test_mixed_entitled_and_unentitled_over_ceiling() {
        let ceiling = ClientCeiling::new("C", dec("40"));
        let records = vec![work("C", "A", "25"), work("C", "B", "20")];
        let table = entitlements(&[("A", "C", "30")]);

        let allocation = allocate_client(&ceiling, &records, Some(&table), &assignment(), 1).unwrap();

        let a = &allocation.results[0];
        assert_eq!(a.payable_hours, dec("25"));
        assert_eq!(a.status, AllocationStatus::Ok);
        assert_eq!(a.entitlement_hours, Some(dec("30")));

        let b = &allocation.results[1];
        assert_eq!(b.payable_hours, dec("17.78"));
        assert_eq!(b.hours_reduced, dec("2.22"));
        assert_eq!(b.status, AllocationStatus::ProratedNoEntitlement);
        assert_eq!(b.entitlement_hours, None);

        let kinds: Vec<IssueKind> = allocation.issues.iter().map(|i| i.kind).collect();
        assert_eq!(kinds, vec![IssueKind::MissingEntitlement, IssueKind::CeilingExceeded]);
    }

    /// AL-002: unset ceiling pays as worked and records an issue
    #[test]
    fn test_unset_ceiling_pays_as_worked() {
        let ceiling = ClientCeiling::new("C", Decimal::ZERO);
        let records = vec![work("C", "A", "10")];

        let allocation = allocate_client(&ceiling, &records, None, &assignment(), 1).unwrap();

        assert_eq!(allocation.results[0].payable_hours, dec("10"));
        assert_eq!(allocation.results[0].hours_reduced, Decimal::ZERO);
        assert_eq!(allocation.results[0].status, AllocationStatus::NoLimitSet);
        assert_eq!(allocation.issues.len(), 1);
        assert_eq!(allocation.issues[0].kind, IssueKind::NoLimitSet);
        assert_eq!(allocation.audit_step.rule_id, "no_limit_set");
    }

    /// AL-003: total exactly at the ceiling is not capped
    #[test]
    fn test_total_equal_to_ceiling_passes_through() {
        let ceiling = ClientCeiling::new("C", dec("40"));
        let records = vec![work("C", "A", "30"), work("C", "B", "10")];
        let table = entitlements(&[("A", "C", "20")]);

        let allocation = allocate_client(&ceiling, &records, Some(&table), &assignment(), 1).unwrap();

        assert!(allocation.results.iter().all(|r| r.payable_hours == r.hours_worked));
        assert!(allocation.results.iter().all(|r| r.status == AllocationStatus::Ok));
        assert!(allocation.issues.is_empty());
        // Entitlement is still reported even though it was not applied.
        assert_eq!(allocation.results[0].entitlement_hours, Some(dec("20")));
    }

    /// AL-004: staff over their own entitlement are capped at it
    #[test]
    fn test_capped_at_entitlement() {
        let ceiling = ClientCeiling::new("C", dec("40"));
        let records = vec![work("C", "A", "28"), work("C", "B", "20")];
        let table = entitlements(&[("A", "C", "20"), ("B", "C", "20")]);

        let allocation = allocate_client(&ceiling, &records, Some(&table), &assignment(), 1).unwrap();

        assert_eq!(allocation.results[0].payable_hours, dec("20"));
        assert_eq!(allocation.results[0].hours_reduced, dec("8"));
        assert_eq!(allocation.results[0].status, AllocationStatus::CappedAtEntitlement);
        assert_eq!(allocation.results[1].payable_hours, dec("20"));
        assert_eq!(allocation.results[1].status, AllocationStatus::Ok);
        assert!(allocation.issues.is_empty());
    }

    /// AL-005: every staff member unassigned splits the ceiling by share
    #[test]
    fn test_all_unentitled_prorated_within_ceiling() {
        let ceiling = ClientCeiling::new("C", dec("20"));
        let records = vec![work("C", "A", "10"), work("C", "B", "10"), work("C", "C", "10")];

        let allocation = allocate_client(&ceiling, &records, Some(&Entitlements::new()), &assignment(), 1)
            .unwrap();

        for result in &allocation.results {
            assert_eq!(result.payable_hours, dec("6.67"));
            assert_eq!(result.hours_reduced, dec("3.33"));
        }
        // 3 x 6.67 = 20.01 exceeds 20 by a rounding cent.
        assert!(
            allocation
                .issues
                .iter()
                .any(|issue| issue.kind == IssueKind::CeilingExceeded)
        );
    }

    /// AL-006: largest remainder keeps the shares within the ceiling
    #[test]
    fn test_largest_remainder_rounding_stays_within_ceiling() {
        let ceiling = ClientCeiling::new("C", dec("20"));
        let records = vec![work("C", "A", "10"), work("C", "B", "10"), work("C", "C", "10")];
        let policy = AllocationPolicy::assignment_based(ProrationRounding::LargestRemainder);

        let allocation = allocate_client(&ceiling, &records, None, &policy, 1).unwrap();

        let payable: Vec<Decimal> = allocation.results.iter().map(|r| r.payable_hours).collect();
        assert_eq!(payable, vec![dec("6.67"), dec("6.67"), dec("6.66")]);
        let total: Decimal = payable.iter().sum();
        assert_eq!(total, dec("20"));
        assert!(
            !allocation
                .issues
                .iter()
                .any(|issue| issue.kind == IssueKind::CeilingExceeded)
        );
    }

    /// AL-007: zero-hour staff appear with zero payable
    #[test]
    fn test_zero_hour_record_participates() {
        let ceiling = ClientCeiling::new("C", dec("10"));
        let records = vec![work("C", "A", "12"), work("C", "B", "0")];

        let allocation = allocate_client(&ceiling, &records, None, &assignment(), 1).unwrap();

        assert_eq!(allocation.results.len(), 2);
        assert_eq!(allocation.results[0].payable_hours, dec("10"));
        assert_eq!(allocation.results[1].payable_hours, Decimal::ZERO);
        assert_eq!(allocation.results[1].hours_reduced, Decimal::ZERO);
    }

    /// AL-008: claims discrepancy where approved is below worked
    #[test]
    fn test_claims_discrepancy_prorates_to_approved() {
        let ceiling = ClientCeiling::new("C", dec("25"));
        let records = vec![work("C", "A", "30")];
        let policy = AllocationPolicy::claims_based(true, false, ProrationRounding::PerStaff);

        let allocation = allocate_client(&ceiling, &records, None, &policy, 1).unwrap();

        assert_eq!(allocation.results[0].payable_hours, dec("25"));
        assert_eq!(allocation.results[0].hours_reduced, dec("5"));
        assert_eq!(allocation.results[0].status, AllocationStatus::ProratedNoEntitlement);
        assert_eq!(allocation.audit_step.rule_id, "claims_discrepancy");
    }

    /// AL-009: approved above worked inflates payable unless clamped
    #[test]
    fn test_claims_approved_more_than_worked_inflates() {
        let ceiling = ClientCeiling::new("C", dec("30"));
        let records = vec![work("C", "A", "15"), work("C", "B", "10")];
        let policy = AllocationPolicy::claims_based(true, false, ProrationRounding::PerStaff);

        let allocation = allocate_client(&ceiling, &records, None, &policy, 1).unwrap();

        assert_eq!(allocation.results[0].payable_hours, dec("18"));
        assert_eq!(allocation.results[0].hours_reduced, dec("-3"));
        assert_eq!(allocation.results[1].payable_hours, dec("12"));
        assert_eq!(
            allocation
                .issues
                .iter()
                .filter(|issue| issue.kind == IssueKind::PayableExceedsWorked)
                .count(),
            2
        );
    }

    #[test]
    fn test_claims_clamp_limits_payable_to_worked() {
        let ceiling = ClientCeiling::new("C", dec("30"));
        let records = vec![work("C", "A", "15"), work("C", "B", "10")];
        let policy = AllocationPolicy::claims_based(true, true, ProrationRounding::PerStaff);

        let allocation = allocate_client(&ceiling, &records, None, &policy, 1).unwrap();

        assert_eq!(allocation.results[0].payable_hours, dec("15"));
        assert_eq!(allocation.results[1].payable_hours, dec("10"));
        assert!(allocation.results.iter().all(|r| r.hours_reduced == Decimal::ZERO));
        assert!(
            allocation
                .issues
                .iter()
                .all(|issue| issue.kind == IssueKind::PayableClampedToWorked)
        );
    }

    #[test]
    fn test_claims_without_discrepancy_pays_as_worked() {
        let ceiling = ClientCeiling::new("C", dec("10"));
        let records = vec![work("C", "A", "10")];
        let policy = AllocationPolicy::claims_based(false, false, ProrationRounding::PerStaff);

        let allocation = allocate_client(&ceiling, &records, None, &policy, 1).unwrap();

        assert_eq!(allocation.results[0].payable_hours, dec("10"));
        assert_eq!(allocation.results[0].status, AllocationStatus::Ok);
    }

    #[test]
    fn test_claims_mode_ignores_entitlements() {
        let ceiling = ClientCeiling::new("C", dec("20"));
        let records = vec![work("C", "A", "30")];
        let table = entitlements(&[("A", "C", "25")]);
        let policy = AllocationPolicy::claims_based(true, false, ProrationRounding::PerStaff);

        let allocation = allocate_client(&ceiling, &records, Some(&table), &policy, 1).unwrap();

        assert_eq!(allocation.results[0].payable_hours, dec("20"));
        assert_eq!(allocation.results[0].status, AllocationStatus::ProratedNoEntitlement);
    }

    #[test]
    fn test_discrepancy_with_zero_total_is_an_error() {
        let ceiling = ClientCeiling::new("C", dec("5"));
        let records = vec![work("C", "A", "0")];
        let policy = AllocationPolicy::claims_based(true, false, ProrationRounding::PerStaff);

        let result = allocate_client(&ceiling, &records, None, &policy, 1);

        assert!(matches!(result, Err(ReconcileError::ZeroTotalWorked { client_id }) if client_id == "C"));
    }

    #[test]
    fn test_empty_work_set_is_an_error() {
        let ceiling = ClientCeiling::new("C", dec("40"));
        let result = allocate_client(&ceiling, &[], None, &assignment(), 1);
        assert!(matches!(result, Err(ReconcileError::EmptyWorkSet { .. })));
    }

    #[test]
    fn test_mixed_clients_is_an_error() {
        let ceiling = ClientCeiling::new("C", dec("40"));
        let records = vec![work("C", "A", "1"), work("D", "B", "1")];
        let result = allocate_client(&ceiling, &records, None, &assignment(), 1);
        assert!(matches!(
            result,
            Err(ReconcileError::MixedClientWorkSet { expected, found }) if expected == "C" && found == "D"
        ));
    }

    #[test]
    fn test_duplicate_staff_is_an_error() {
        let ceiling = ClientCeiling::new("C", dec("40"));
        let records = vec![work("C", "A", "1"), work("C", "A", "2")];
        let result = allocate_client(&ceiling, &records, None, &assignment(), 1);
        assert!(matches!(result, Err(ReconcileError::DuplicateWorkRecord { .. })));
    }

    #[test]
    fn test_negative_hours_is_an_error() {
        let ceiling = ClientCeiling::new("C", dec("40"));
        let records = vec![work("C", "A", "-1")];
        let result = allocate_client(&ceiling, &records, None, &assignment(), 1);
        assert!(matches!(result, Err(ReconcileError::NegativeHours { .. })));
    }

    #[test]
    fn test_hours_beyond_decimal_range_fail() {
        let ceiling = ClientCeiling::new("C", dec("40"));
        let records = vec![
            WorkRecord::new("C", "A", Decimal::MAX, 0),
            WorkRecord::new("C", "B", Decimal::MAX, 0),
        ];

        let result = allocate_client(&ceiling, &records, None, &assignment(), 1);

        match result {
            Err(ReconcileError::ValueOutOfRange { context }) => assert!(context.contains("'C'")),
            other => panic!("expected ValueOutOfRange, got {:?}", other.map(|a| a.results)),
        }
    }

    #[test]
    fn test_proration_beyond_decimal_range_fails() {
        let ceiling = ClientCeiling::new("C", dec("1000000000000000000000000000"));
        let records = vec![
            work("C", "A", "30000000000000000000000000000"),
            work("C", "B", "30000000000000000000000000000"),
        ];

        for rounding in [ProrationRounding::PerStaff, ProrationRounding::LargestRemainder] {
            let policy = AllocationPolicy::assignment_based(rounding);
            let result = allocate_client(&ceiling, &records, None, &policy, 1);
            assert!(matches!(result, Err(ReconcileError::ValueOutOfRange { .. })));
        }
    }

    #[test]
    fn test_results_are_independent_of_input_order() {
        let ceiling = ClientCeiling::new("C", dec("30"));
        let forward = vec![work("C", "A", "20"), work("C", "B", "15"), work("C", "C", "5")];
        let mut reversed = forward.clone();
        reversed.reverse();

        let first = allocate_client(&ceiling, &forward, None, &assignment(), 1).unwrap();
        let second = allocate_client(&ceiling, &reversed, None, &assignment(), 1).unwrap();

        assert_eq!(first.results, second.results);
    }

    #[test]
    fn test_audit_step_records_decision() {
        let ceiling = ClientCeiling::new("C", dec("40"));
        let records = vec![work("C", "A", "25"), work("C", "B", "20")];

        let allocation = allocate_client(&ceiling, &records, None, &assignment(), 7).unwrap();

        let step = &allocation.audit_step;
        assert_eq!(step.step_number, 7);
        assert_eq!(step.rule_id, "over_ceiling");
        assert_eq!(step.client_id, "C");
        assert_eq!(step.input["total_worked"].as_str().unwrap(), "45");
        assert_eq!(step.input["ceiling_hours"].as_str().unwrap(), "40");
        assert_eq!(step.output["allocations"].as_array().unwrap().len(), 2);
        assert!(step.reasoning.contains("exceeds the 40 hour ceiling by 5"));
    }

    mod proptest_allocation {
        use proptest::prelude::*;

        use super::*;

        /// Hours in cents with an optional entitlement, one per staff member.
        fn arb_staff() -> impl Strategy<Value = Vec<(i64, Option<i64>)>> {
            prop::collection::vec((0i64..=6_000, prop::option::of(0i64..=6_000)), 1..6)
        }

        fn arb_rounding() -> impl Strategy<Value = ProrationRounding> {
            prop_oneof![
                Just(ProrationRounding::PerStaff),
                Just(ProrationRounding::LargestRemainder),
            ]
        }

        fn build(staff: &[(i64, Option<i64>)]) -> (Vec<WorkRecord>, Entitlements) {
            let records = staff
                .iter()
                .enumerate()
                .map(|(i, (cents, _))| WorkRecord::new("C", format!("S{i}"), Decimal::new(*cents, 2), 0))
                .collect();
            let table = staff
                .iter()
                .enumerate()
                .filter_map(|(i, (_, assigned))| {
                    assigned.map(|cents| Entitlement {
                        staff_id: format!("S{i}"),
                        client_id: "C".to_string(),
                        assigned_hours: Decimal::new(cents, 2),
                    })
                })
                .collect();
            (records, table)
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(256))]

            #[test]
            fn prop_payable_between_zero_and_worked(
                staff in arb_staff(),
                ceiling in 0i64..=20_000,
                rounding in arb_rounding(),
            ) {
                let (records, table) = build(&staff);
                let ceiling = ClientCeiling::new("C", Decimal::new(ceiling, 2));
                let policy = AllocationPolicy::assignment_based(rounding);

                let allocation = allocate_client(&ceiling, &records, Some(&table), &policy, 1).unwrap();

                for result in &allocation.results {
                    prop_assert!(result.payable_hours >= Decimal::ZERO);
                    prop_assert!(result.payable_hours <= result.hours_worked);
                    prop_assert_eq!(
                        result.hours_reduced,
                        round_hours(result.hours_worked - result.payable_hours)
                    );
                }
            }

            #[test]
            fn prop_within_ceiling_pays_as_worked(
                staff in arb_staff(),
                headroom in 0i64..=1_000,
            ) {
                let (records, table) = build(&staff);
                let total: i64 = staff.iter().map(|(cents, _)| cents).sum();
                let ceiling = ClientCeiling::new("C", Decimal::new(total + headroom, 2));

                let allocation =
                    allocate_client(&ceiling, &records, Some(&table), &AllocationPolicy::default(), 1).unwrap();

                for result in &allocation.results {
                    prop_assert_eq!(result.payable_hours, result.hours_worked);
                }
            }

            #[test]
            fn prop_largest_remainder_never_exceeds_ceiling(
                hours in prop::collection::vec(1i64..=6_000, 1..8),
                ceiling in 1i64..=20_000,
            ) {
                let staff: Vec<(i64, Option<i64>)> = hours.iter().map(|h| (*h, None)).collect();
                let (records, _) = build(&staff);
                let ceiling = ClientCeiling::new("C", Decimal::new(ceiling, 2));
                let policy = AllocationPolicy::assignment_based(ProrationRounding::LargestRemainder);

                let allocation = allocate_client(&ceiling, &records, None, &policy, 1).unwrap();

                let total: Decimal = allocation.results.iter().map(|r| r.payable_hours).sum();
                prop_assert!(total <= ceiling.ceiling_hours);
                prop_assert!(!allocation.issues.iter().any(|i| i.kind == IssueKind::CeilingExceeded));
            }

            #[test]
            fn prop_input_order_does_not_matter(staff in arb_staff(), ceiling in 1i64..=20_000) {
                let (records, table) = build(&staff);
                let mut reversed = records.clone();
                reversed.reverse();
                let ceiling = ClientCeiling::new("C", Decimal::new(ceiling, 2));

                let first = allocate_client(&ceiling, &records, Some(&table), &AllocationPolicy::default(), 1).unwrap();
                let second = allocate_client(&ceiling, &reversed, Some(&table), &AllocationPolicy::default(), 1).unwrap();

                prop_assert_eq!(first.results, second.results);
            }
        }
    }
}
