//! Core data models for the payroll reconciler.
//!
//! Every model is an immutable value passed through the reconciliation
//! pipeline; nothing here holds state between runs.

mod allocation;
mod claims;
mod issue;
mod reference;
mod report;
mod work;

pub use allocation::{AllocationResult, AllocationStatus, PeriodTotals, StaffSummary};
pub use claims::{ClaimsClientSummary, RawClaimEntry};
pub use issue::{IssueKind, IssueSeverity, ReconciliationIssue};
pub use reference::{ClientCeiling, Entitlement, Entitlements};
pub use report::{AuditStep, ClaimsReport, PeriodCombination, PeriodReport};
pub use work::{RawWorkEntry, WorkRecord};
