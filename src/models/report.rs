//! Report models.
//!
//! This module contains the [`PeriodReport`], [`ClaimsReport`] and
//! [`PeriodCombination`] types handed to report sinks, together with the
//! [`AuditStep`] records that explain each client's allocation decision.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    AllocationResult, ClaimsClientSummary, PeriodTotals, ReconciliationIssue, StaffSummary,
};

/// A single recorded allocation decision.
///
/// Each step captures the input, output, and reasoning for one client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number within the run.
    pub step_number: u32,
    /// Identifier of the branch that decided the client.
    pub rule_id: String,
    /// Human-readable name of the branch.
    pub rule_name: String,
    /// The client the decision applies to.
    pub client_id: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// The reconciled result of one reporting period in assignment mode.
///
/// # Example
///
/// ```
/// use payroll_reconciler::models::{PeriodReport, PeriodTotals};
/// use chrono::Utc;
/// use uuid::Uuid;
///
/// let report = PeriodReport {
///     report_id: Uuid::new_v4(),
///     generated_at: Utc::now(),
///     engine_version: "0.1.0".to_string(),
///     period: "week 1".to_string(),
///     details: vec![],
///     summary: vec![],
///     issues: vec![],
///     audit_steps: vec![],
///     totals: PeriodTotals::from_summaries(&[]).unwrap(),
/// };
/// assert_eq!(report.totals.staff_count, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodReport {
    /// Unique identifier for this run.
    pub report_id: Uuid,
    /// When the run was performed.
    pub generated_at: DateTime<Utc>,
    /// The version of the reconciler that produced the report.
    pub engine_version: String,
    /// Caller-supplied label for the period (e.g. "week 1").
    pub period: String,
    /// One result per (client, staff) pair, ordered by client then staff.
    pub details: Vec<AllocationResult>,
    /// One summary per staff member, highest payable first.
    pub summary: Vec<StaffSummary>,
    /// Findings in discovery order.
    pub issues: Vec<ReconciliationIssue>,
    /// One decision record per client.
    pub audit_steps: Vec<AuditStep>,
    /// Headline totals.
    pub totals: PeriodTotals,
}

/// The reconciled result of one reporting period in claims mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimsReport {
    /// Unique identifier for this run.
    pub report_id: Uuid,
    /// When the run was performed.
    pub generated_at: DateTime<Utc>,
    /// The version of the reconciler that produced the report.
    pub engine_version: String,
    /// Caller-supplied label for the period.
    pub period: String,
    /// Whether prorated payable hours were clamped to hours worked.
    pub clamp_payable_to_worked: bool,
    /// Worked versus approved figures per client.
    pub clients: Vec<ClaimsClientSummary>,
    /// One result per (client, staff) pair.
    pub details: Vec<AllocationResult>,
    /// One summary per staff member, highest payable first.
    pub summary: Vec<StaffSummary>,
    /// Findings in discovery order.
    pub issues: Vec<ReconciliationIssue>,
    /// One decision record per client.
    pub audit_steps: Vec<AuditStep>,
    /// Headline totals.
    pub totals: PeriodTotals,
}

/// Two periods' staff summaries merged into one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodCombination {
    /// One summary per staff member present in either period.
    pub summaries: Vec<StaffSummary>,
    /// Headline totals across the combined summaries.
    pub totals: PeriodTotals,
}
