//! Ceilings and entitlements.
//!
//! These are the per-run values read from the reference store: how many
//! hours a client may be billed for, and how many hours each staff member
//! is contracted to work for that client.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A client's hour ceiling for one period.
///
/// In assignment mode this is the static weekly POS limit; in claims mode it
/// is the claims-approved total. A ceiling of exactly zero means "unset".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCeiling {
    /// The client identifier.
    pub client_id: String,
    /// Ceiling hours, or zero when no ceiling is configured.
    pub ceiling_hours: Decimal,
}

impl ClientCeiling {
    /// Creates a ceiling.
    pub fn new(client_id: impl Into<String>, ceiling_hours: Decimal) -> Self {
        Self {
            client_id: client_id.into(),
            ceiling_hours,
        }
    }

    /// Returns true when the ceiling is the zero "unset" sentinel.
    ///
    /// ```
    /// use payroll_reconciler::models::ClientCeiling;
    /// use rust_decimal::Decimal;
    ///
    /// assert!(ClientCeiling::new("c", Decimal::ZERO).is_unset());
    /// assert!(!ClientCeiling::new("c", Decimal::new(40, 0)).is_unset());
    /// ```
    pub fn is_unset(&self) -> bool {
        self.ceiling_hours.is_zero()
    }
}

/// A staff member's contracted hours against one client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entitlement {
    /// The staff identifier.
    pub staff_id: String,
    /// The client identifier.
    pub client_id: String,
    /// Assigned hours per period.
    pub assigned_hours: Decimal,
}

/// Entitlements keyed by (staff, client).
///
/// Inserting a second entitlement for the same pair replaces the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entitlements {
    by_pair: HashMap<(String, String), Decimal>,
}

impl Entitlements {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an entitlement.
    pub fn insert(&mut self, entitlement: Entitlement) {
        self.by_pair.insert(
            (entitlement.staff_id, entitlement.client_id),
            entitlement.assigned_hours,
        );
    }

    /// Returns the assigned hours for a pair, if an entitlement exists.
    pub fn assigned_hours(&self, staff_id: &str, client_id: &str) -> Option<Decimal> {
        self.by_pair
            .get(&(staff_id.to_string(), client_id.to_string()))
            .copied()
    }

    /// Number of entitlements held.
    pub fn len(&self) -> usize {
        self.by_pair.len()
    }

    /// Returns true when no entitlements are held.
    pub fn is_empty(&self) -> bool {
        self.by_pair.is_empty()
    }
}

impl FromIterator<Entitlement> for Entitlements {
    fn from_iter<I: IntoIterator<Item = Entitlement>>(iter: I) -> Self {
        let mut table = Self::new();
        for entitlement in iter {
            table.insert(entitlement);
        }
        table
    }
}
