//! Reconciliation issues.
//!
//! Issues are findings that change or qualify payable hours without stopping
//! the run. They are collected in discovery order and returned with the
//! results so an operator can see every cap that was waived or prorated.

use serde::{Deserialize, Serialize};

/// The kind of finding recorded during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// The client has no ceiling configured; hours were paid as worked.
    NoLimitSet,
    /// A staff member had no entitlement in an over-ceiling client; hours were prorated.
    MissingEntitlement,
    /// Total payable for a client ended above its ceiling.
    CeilingExceeded,
    /// Claims-approved units differ from worked units.
    ClaimsDiscrepancy,
    /// Prorated payable hours are above the hours actually worked.
    PayableExceedsWorked,
    /// Prorated payable hours were clamped down to the hours worked.
    PayableClampedToWorked,
    /// Claims were approved for a client with no worked hours this period.
    ClaimWithoutWork,
    /// A duration cell was blank or not a non-negative number.
    MalformedDuration,
    /// A units cell was not a non-negative whole number.
    MalformedUnits,
    /// A name in the import did not match any known staff or client.
    UnresolvedReference,
    /// A name in the import matched more than one known staff or client.
    AmbiguousReference,
}

impl IssueKind {
    /// Stable upper-case code for the kind, e.g. `NO_LIMIT_SET`.
    pub fn code(&self) -> &'static str {
        match self {
            IssueKind::NoLimitSet => "NO_LIMIT_SET",
            IssueKind::MissingEntitlement => "MISSING_ENTITLEMENT",
            IssueKind::CeilingExceeded => "CEILING_EXCEEDED",
            IssueKind::ClaimsDiscrepancy => "CLAIMS_DISCREPANCY",
            IssueKind::PayableExceedsWorked => "PAYABLE_EXCEEDS_WORKED",
            IssueKind::PayableClampedToWorked => "PAYABLE_CLAMPED_TO_WORKED",
            IssueKind::ClaimWithoutWork => "CLAIM_WITHOUT_WORK",
            IssueKind::MalformedDuration => "MALFORMED_DURATION",
            IssueKind::MalformedUnits => "MALFORMED_UNITS",
            IssueKind::UnresolvedReference => "UNRESOLVED_REFERENCE",
            IssueKind::AmbiguousReference => "AMBIGUOUS_REFERENCE",
        }
    }

    /// Default severity for the kind.
    pub fn severity(&self) -> IssueSeverity {
        match self {
            IssueKind::MalformedDuration
            | IssueKind::MalformedUnits
            | IssueKind::ClaimWithoutWork => IssueSeverity::Low,
            IssueKind::NoLimitSet
            | IssueKind::MissingEntitlement
            | IssueKind::ClaimsDiscrepancy
            | IssueKind::PayableClampedToWorked
            | IssueKind::UnresolvedReference => IssueSeverity::Medium,
            IssueKind::CeilingExceeded
            | IssueKind::PayableExceedsWorked
            | IssueKind::AmbiguousReference => IssueSeverity::High,
        }
    }
}

/// How urgently an issue needs operator attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    /// Informational.
    Low,
    /// Affects payable hours for the named parties.
    Medium,
    /// Payable totals may be wrong until reviewed.
    High,
}

/// A single finding surfaced alongside reconciliation results.
///
/// # Example
///
/// ```
/// use payroll_reconciler::models::{IssueKind, IssueSeverity, ReconciliationIssue};
///
/// let issue = ReconciliationIssue::new(IssueKind::NoLimitSet, "no POS set")
///     .for_client("client_a");
/// assert_eq!(issue.severity, IssueSeverity::Medium);
/// assert_eq!(issue.kind.code(), "NO_LIMIT_SET");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationIssue {
    /// What was found.
    pub kind: IssueKind,
    /// The client concerned, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// The staff member concerned, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<String>,
    /// Human-readable description.
    pub message: String,
    /// Severity, defaulted from the kind.
    pub severity: IssueSeverity,
}

impl ReconciliationIssue {
    /// Creates an issue with the kind's default severity.
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            client_id: None,
            staff_id: None,
            message: message.into(),
            severity: kind.severity(),
        }
    }

    /// Attaches the client concerned.
    pub fn for_client(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Attaches the staff member concerned.
    pub fn for_staff(mut self, staff_id: impl Into<String>) -> Self {
        self.staff_id = Some(staff_id.into());
        self
    }
}
