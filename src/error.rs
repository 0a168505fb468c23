//! Error types for the payroll reconciler.
//!
//! Only structurally invalid input and configuration faults are errors.
//! Data-quality findings (unset ceilings, missing entitlements, claims
//! discrepancies) are reported as [`crate::models::ReconciliationIssue`]
//! values alongside the results instead.

use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for the payroll reconciler.
///
/// # Example
///
/// ```
/// use payroll_reconciler::error::ReconcileError;
///
/// let error = ReconcileError::EmptyWorkSet {
///     client_id: "client_a".to_string(),
/// };
/// assert_eq!(error.to_string(), "No work records supplied for client 'client_a'");
/// ```
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Reference data (staff, clients, assignments) was internally inconsistent.
    #[error("Invalid reference data field '{field}': {message}")]
    InvalidReferenceData {
        /// The field or record that was invalid.
        field: String,
        /// A description of what made it invalid.
        message: String,
    },

    /// A client was handed to the allocation engine without any work records.
    #[error("No work records supplied for client '{client_id}'")]
    EmptyWorkSet {
        /// The client with no rows.
        client_id: String,
    },

    /// A work record named a different client than the one being allocated.
    #[error("Work record for client '{found}' supplied while allocating client '{expected}'")]
    MixedClientWorkSet {
        /// The client being allocated.
        expected: String,
        /// The client named by the stray record.
        found: String,
    },

    /// More than one work record was supplied for the same (client, staff) pair.
    #[error("Duplicate work record for staff '{staff_id}' on client '{client_id}'")]
    DuplicateWorkRecord {
        /// The client identifier.
        client_id: String,
        /// The staff identifier.
        staff_id: String,
    },

    /// Proration was required but the client's total worked hours were zero.
    #[error("Cannot prorate hours for client '{client_id}': total hours worked is zero")]
    ZeroTotalWorked {
        /// The client identifier.
        client_id: String,
    },

    /// An hours value (worked, ceiling or entitlement) was negative.
    #[error("Negative hours in {context}: {value}")]
    NegativeHours {
        /// Where the negative value was found.
        context: String,
        /// The offending value.
        value: Decimal,
    },

    /// The net approved units for a client summed to less than zero.
    #[error("Net approved units for client '{client_id}' are negative: {units}")]
    NegativeApprovedUnits {
        /// The client identifier.
        client_id: String,
        /// The net approved units.
        units: Decimal,
    },

    /// Period combination was requested with neither period present.
    #[error("No periods supplied to combine")]
    NoPeriodsToCombine,

    /// A sum or product of hours or units left the representable range.
    #[error("Value out of range while computing {context}")]
    ValueOutOfRange {
        /// What was being computed.
        context: String,
    },
}

/// A type alias for Results that return ReconcileError.
pub type ReconcileResult<T> = Result<T, ReconcileError>;
