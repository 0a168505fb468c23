//! Request types for the payroll reconciler API.
//!
//! Raw rows are accepted exactly as the EVV and claims exports provide them;
//! malformed numeric cells are reported as issues in the response rather
//! than rejected here.

use serde::{Deserialize, Serialize};

use crate::models::{RawClaimEntry, RawWorkEntry, StaffSummary};

use super::response::ApiError;

/// Request body for `POST /reconcile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileRequest {
    /// Label for the period, e.g. "2025-03-03 week 1".
    pub period: String,
    /// Raw EVV service lines.
    pub entries: Vec<RawWorkEntry>,
}

/// Request body for `POST /reconcile/claims`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimsReconcileRequest {
    /// Label for the period.
    pub period: String,
    /// Raw EVV service lines.
    pub entries: Vec<RawWorkEntry>,
    /// Raw claims lines.
    #[serde(default)]
    pub claims: Vec<RawClaimEntry>,
}

/// Request body for `POST /combine`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombineRequest {
    /// Staff summaries of the first period.
    #[serde(default)]
    pub first: Option<Vec<StaffSummary>>,
    /// Staff summaries of the second period.
    #[serde(default)]
    pub second: Option<Vec<StaffSummary>>,
}

/// Request body for `POST /import/new-names`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNamesRequest {
    /// Raw EVV service lines.
    pub entries: Vec<RawWorkEntry>,
}

/// Rejects a blank period label.
pub(crate) fn validate_period(period: &str) -> Result<(), ApiError> {
    if period.trim().is_empty() {
        return Err(ApiError::with_details(
            "VALIDATION_ERROR",
            "period must not be blank",
            "Supply a label such as 'week 1' so reports can be told apart",
        ));
    }
    Ok(())
}
