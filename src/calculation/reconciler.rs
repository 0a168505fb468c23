//! Period reconciliation pipeline.
//!
//! Runs one reporting period end to end: resolve names, aggregate work,
//! read the reference store once, allocate each client in client order,
//! then roll results up per staff member.

use std::collections::BTreeSet;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::ReconcilerConfig;
use crate::error::ReconcileResult;
use crate::models::{
    AllocationResult, AuditStep, ClaimsReport, ClientCeiling, IssueKind, IssueSeverity,
    PeriodReport, PeriodTotals, RawClaimEntry, RawWorkEntry, ReconciliationIssue,
};
use crate::store::{NameResolver, ReferenceSnapshot, ReferenceStore};

use super::aggregation::aggregate_work_entries;
use super::allocation::{AllocationPolicy, allocate_client};
use super::claims::{aggregate_claims, summarize_client_claims};
use super::roll_up::roll_up_staff;

/// Reconciles periods against a reference store.
///
/// # Example
///
/// ```
/// use payroll_reconciler::calculation::Reconciler;
/// use payroll_reconciler::config::{ReconcilerConfig, ReferenceData};
/// use payroll_reconciler::models::RawWorkEntry;
/// use payroll_reconciler::store::InMemoryStore;
/// use rust_decimal::Decimal;
///
/// let store = InMemoryStore::from_reference_data(&ReferenceData::default()).unwrap();
/// let config = ReconcilerConfig::default();
/// let reconciler = Reconciler::new(&store, &config);
///
/// let report = reconciler
///     .reconcile_period("week 1", &[RawWorkEntry::new("Client A", "Sam", Decimal::from(10))])
///     .unwrap();
/// assert_eq!(report.totals.total_payable_hours, Decimal::from(10));
/// ```
pub struct Reconciler<'a, S: ReferenceStore + ?Sized> {
    store: &'a S,
    config: &'a ReconcilerConfig,
}

impl<'a, S: ReferenceStore + ?Sized> Reconciler<'a, S> {
    /// Creates a reconciler over a store and settings.
    pub fn new(store: &'a S, config: &'a ReconcilerConfig) -> Self {
        Self { store, config }
    }

    /// Reconciles one period's EVV export against POS ceilings and assignments.
    ///
    /// # Errors
    ///
    /// Returns an error only for structurally invalid data, such as a
    /// negative ceiling or entitlement in the store, or hours and units
    /// too large to sum.
    pub fn reconcile_period(
        &self,
        period: &str,
        entries: &[RawWorkEntry],
    ) -> ReconcileResult<PeriodReport> {
        info!(period = %period, rows = entries.len(), "Starting period reconciliation");

        let resolver = NameResolver::from_store(self.store);
        let mut pass = resolver.pass();
        let resolved = pass.work_entries(entries);
        let mut issues = pass.into_issues();

        let aggregation = aggregate_work_entries(&resolved)?;
        issues.extend(aggregation.issues.iter().cloned());
        let by_client = aggregation.by_client();

        let snapshot = ReferenceSnapshot::capture(
            self.store,
            by_client.keys().map(String::as_str),
            aggregation
                .records
                .keys()
                .map(|(client_id, staff_id)| (staff_id.as_str(), client_id.as_str())),
        );
        let policy = AllocationPolicy::assignment_based(self.config.proration_rounding);

        let mut details: Vec<AllocationResult> = Vec::new();
        let mut audit_steps: Vec<AuditStep> = Vec::with_capacity(by_client.len());
        for (step, (client_id, records)) in by_client.iter().enumerate() {
            let allocation = allocate_client(
                &snapshot.ceiling(client_id),
                records,
                Some(snapshot.entitlements()),
                &policy,
                step as u32 + 1,
            )?;
            details.extend(allocation.results);
            issues.extend(allocation.issues);
            audit_steps.push(allocation.audit_step);
        }

        let summary = roll_up_staff(&details)?;
        let totals = PeriodTotals::from_summaries(&summary)?;
        log_outcome(period, by_client.len(), &totals, &issues);

        Ok(PeriodReport {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            period: period.to_string(),
            details,
            summary,
            issues,
            audit_steps,
            totals,
        })
    }

    /// Reconciles one period's EVV export against claims-approved units.
    ///
    /// Each client's ceiling is its approved hours. Entitlements play no
    /// part; when approved and worked units differ every staff member is
    /// prorated.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ReconcileError::NegativeApprovedUnits`] when a
    /// client's net approved units are negative, or
    /// [`crate::error::ReconcileError::ZeroTotalWorked`] when a discrepancy
    /// must be prorated over zero hours worked.
    pub fn reconcile_claims_period(
        &self,
        period: &str,
        entries: &[RawWorkEntry],
        claims: &[RawClaimEntry],
    ) -> ReconcileResult<ClaimsReport> {
        info!(
            period = %period,
            rows = entries.len(),
            claim_lines = claims.len(),
            "Starting claims reconciliation"
        );

        let resolver = NameResolver::from_store(self.store);
        let mut pass = resolver.pass();
        let resolved = pass.work_entries(entries);
        let resolved_claims = pass.claim_entries(claims);
        let mut issues = pass.into_issues();

        let aggregation = aggregate_work_entries(&resolved)?;
        issues.extend(aggregation.issues.iter().cloned());
        let approved = aggregate_claims(&resolved_claims)?;
        issues.extend(approved.issues.iter().cloned());
        let by_client = aggregation.by_client();

        let clamp = self.config.claims.clamp_payable_to_worked;
        let units_per_hour = self.config.units_per_hour;

        let client_ids: BTreeSet<&str> = by_client
            .keys()
            .chain(approved.by_client.keys())
            .map(String::as_str)
            .collect();

        let mut clients = Vec::with_capacity(client_ids.len());
        let mut details: Vec<AllocationResult> = Vec::new();
        let mut audit_steps: Vec<AuditStep> = Vec::with_capacity(by_client.len());

        for client_id in client_ids {
            let records = by_client.get(client_id).map(Vec::as_slice).unwrap_or(&[]);
            let summary = summarize_client_claims(
                client_id,
                records,
                approved.by_client.get(client_id),
                units_per_hour,
            )?;

            if records.is_empty() {
                issues.push(
                    ReconciliationIssue::new(
                        IssueKind::ClaimWithoutWork,
                        format!(
                            "Client '{}' has {} approved units but no hours worked this period",
                            client_id,
                            summary.approved_units.normalize()
                        ),
                    )
                    .for_client(client_id),
                );
                clients.push(summary);
                continue;
            }

            if summary.has_discrepancy {
                issues.push(
                    ReconciliationIssue::new(
                        IssueKind::ClaimsDiscrepancy,
                        format!(
                            "Client '{}' approved {} units ({} hours) against {} units worked ({} hours)",
                            client_id,
                            summary.approved_units.normalize(),
                            summary.approved_hours.normalize(),
                            summary.worked_units,
                            summary.worked_hours.normalize()
                        ),
                    )
                    .for_client(client_id),
                );
            }

            let policy = AllocationPolicy::claims_based(
                summary.has_discrepancy,
                clamp,
                self.config.proration_rounding,
            );
            let allocation = allocate_client(
                &ClientCeiling::new(client_id, summary.approved_hours),
                records,
                None,
                &policy,
                audit_steps.len() as u32 + 1,
            )?;
            details.extend(allocation.results);
            issues.extend(allocation.issues);
            audit_steps.push(allocation.audit_step);
            clients.push(summary);
        }

        let summary = roll_up_staff(&details)?;
        let totals = PeriodTotals::from_summaries(&summary)?;
        log_outcome(period, by_client.len(), &totals, &issues);

        Ok(ClaimsReport {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            period: period.to_string(),
            clamp_payable_to_worked: clamp,
            clients,
            details,
            summary,
            issues,
            audit_steps,
            totals,
        })
    }
}

fn log_outcome(
    period: &str,
    client_count: usize,
    totals: &PeriodTotals,
    issues: &[ReconciliationIssue],
) {
    info!(
        period = %period,
        clients = client_count,
        staff = totals.staff_count,
        total_worked = %totals.total_hours_worked,
        total_payable = %totals.total_payable_hours,
        total_reduced = %totals.total_hours_reduced,
        "Period reconciled"
    );
    if !issues.is_empty() {
        let high = issues
            .iter()
            .filter(|issue| issue.severity == IssueSeverity::High)
            .count();
        warn!(
            period = %period,
            issues = issues.len(),
            high_severity = high,
            "Reconciliation recorded issues"
        );
    }
}
