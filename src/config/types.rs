//! Configuration types for reconciliation.
//!
//! This module contains the strongly-typed structures deserialized from the
//! YAML files in a configuration directory.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{DEFAULT_UNITS_PER_HOUR, ProrationRounding};
use crate::error::{ReconcileError, ReconcileResult};

fn default_units_per_hour() -> Decimal {
    DEFAULT_UNITS_PER_HOUR
}

fn default_active() -> bool {
    true
}

/// Engine settings from `reconciler.yaml`.
///
/// Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// Billing units per hour used to convert approved claims units.
    #[serde(default = "default_units_per_hour")]
    pub units_per_hour: Decimal,
    /// Claims-mode settings.
    #[serde(default)]
    pub claims: ClaimsConfig,
    /// Rounding used for prorated shares.
    #[serde(default)]
    pub proration_rounding: ProrationRounding,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            units_per_hour: default_units_per_hour(),
            claims: ClaimsConfig::default(),
            proration_rounding: ProrationRounding::default(),
        }
    }
}

impl ReconcilerConfig {
    /// Checks values serde cannot.
    pub fn validate(&self) -> ReconcileResult<()> {
        if self.units_per_hour <= Decimal::ZERO {
            return Err(ReconcileError::InvalidReferenceData {
                field: "units_per_hour".to_string(),
                message: format!("must be positive, got {}", self.units_per_hour),
            });
        }
        Ok(())
    }
}

/// Claims-mode settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimsConfig {
    /// Clamp prorated payable hours to hours worked when approved exceeds worked.
    #[serde(default)]
    pub clamp_payable_to_worked: bool,
}

/// A staff member in `reference.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffRecord {
    /// Display name, unique across staff. Also the staff identifier.
    pub name: String,
    /// Inactive staff are kept for history but excluded from lookups.
    #[serde(default = "default_active")]
    pub active: bool,
}

/// A client in `reference.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    /// Display name, unique across clients. Also the client identifier.
    pub name: String,
    /// Weekly POS (authorized) hours; zero means not yet set.
    #[serde(default)]
    pub pos_hours: Decimal,
    /// Inactive clients are kept for history but excluded from lookups.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Privately funded client.
    #[serde(default)]
    pub private: bool,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A staff-to-client assignment in `reference.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    /// Staff name.
    pub staff: String,
    /// Client name.
    pub client: String,
    /// Contracted hours per week.
    pub assigned_hours: Decimal,
    /// Permanent rather than cover assignment.
    #[serde(default = "default_active")]
    pub permanent: bool,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The reference data behind the in-memory store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceData {
    /// All staff, active or not.
    #[serde(default)]
    pub staff: Vec<StaffRecord>,
    /// All clients, active or not.
    #[serde(default)]
    pub clients: Vec<ClientRecord>,
    /// Staff-to-client assignments.
    #[serde(default)]
    pub assignments: Vec<AssignmentRecord>,
}

impl ReferenceData {
    /// Checks uniqueness, sign and referential integrity.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::InvalidReferenceData`] naming the first
    /// offending field.
    pub fn validate(&self) -> ReconcileResult<()> {
        let mut staff_names = HashSet::new();
        for (index, staff) in self.staff.iter().enumerate() {
            if staff.name.trim().is_empty() {
                return Err(invalid(format!("staff[{index}].name"), "must not be blank"));
            }
            if !staff_names.insert(staff.name.as_str()) {
                return Err(invalid(
                    format!("staff[{index}].name"),
                    format!("duplicate staff name '{}'", staff.name),
                ));
            }
        }

        let mut client_names = HashSet::new();
        for (index, client) in self.clients.iter().enumerate() {
            if client.name.trim().is_empty() {
                return Err(invalid(format!("clients[{index}].name"), "must not be blank"));
            }
            if !client_names.insert(client.name.as_str()) {
                return Err(invalid(
                    format!("clients[{index}].name"),
                    format!("duplicate client name '{}'", client.name),
                ));
            }
            if client.pos_hours < Decimal::ZERO {
                return Err(invalid(
                    format!("clients[{index}].pos_hours"),
                    format!("must not be negative, got {}", client.pos_hours),
                ));
            }
        }

        let mut pairs = HashSet::new();
        for (index, assignment) in self.assignments.iter().enumerate() {
            if !staff_names.contains(assignment.staff.as_str()) {
                return Err(invalid(
                    format!("assignments[{index}].staff"),
                    format!("unknown staff '{}'", assignment.staff),
                ));
            }
            if !client_names.contains(assignment.client.as_str()) {
                return Err(invalid(
                    format!("assignments[{index}].client"),
                    format!("unknown client '{}'", assignment.client),
                ));
            }
            if assignment.assigned_hours < Decimal::ZERO {
                return Err(invalid(
                    format!("assignments[{index}].assigned_hours"),
                    format!("must not be negative, got {}", assignment.assigned_hours),
                ));
            }
            if !pairs.insert((assignment.staff.as_str(), assignment.client.as_str())) {
                return Err(invalid(
                    format!("assignments[{index}]"),
                    format!(
                        "'{}' is already assigned to '{}'",
                        assignment.staff, assignment.client
                    ),
                ));
            }
        }

        Ok(())
    }
}

fn invalid(field: String, message: impl Into<String>) -> ReconcileError {
    ReconcileError::InvalidReferenceData {
        field,
        message: message.into(),
    }
}
