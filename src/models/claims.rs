//! Claims feed models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::work::deserialize_cell;

/// A single line from a payer's claims report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawClaimEntry {
    /// Client name or identifier as it appears in the report.
    pub client: String,
    /// Net units approved for the line.
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub approved_units: Option<String>,
    /// Free-text payer comments.
    #[serde(default)]
    pub comments: Option<String>,
}

/// Worked versus approved figures for one client in claims mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimsClientSummary {
    /// The client identifier.
    pub client_id: String,
    /// Total hours worked across all staff.
    pub worked_hours: Decimal,
    /// Total units worked across all staff.
    pub worked_units: u64,
    /// Net units approved by the payer.
    pub approved_units: Decimal,
    /// Approved units converted to hours, rounded to 2 decimals.
    pub approved_hours: Decimal,
    /// True whenever approved units differ from worked units.
    pub has_discrepancy: bool,
    /// Non-blank payer comments for the client, joined with "; ".
    pub comments: String,
}
