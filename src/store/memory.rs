//! In-memory reference store.
//!
//! Serves staff, clients and assignments loaded from the reference YAML,
//! indexed for ceiling and entitlement lookups by identifier.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::ReferenceData;
use crate::error::ReconcileResult;
use crate::models::{Entitlement, Entitlements};

use super::{DirectoryEntry, ReferenceStore};

/// A [`ReferenceStore`] over reference data held in memory.
///
/// Inactive staff and clients are kept only for name discovery. An
/// assignment is visible only while both its staff member and its client
/// are active.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    staff: Vec<DirectoryEntry>,
    clients: Vec<DirectoryEntry>,
    all_staff: Vec<String>,
    all_clients: Vec<String>,
    ceilings: HashMap<String, Decimal>,
    entitlements: Entitlements,
}

impl InMemoryStore {
    /// Builds a store from validated reference data.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ReconcileError::InvalidReferenceData`] if the
    /// data fails validation.
    pub fn from_reference_data(data: &ReferenceData) -> ReconcileResult<Self> {
        data.validate()?;

        let active_staff: HashSet<&str> = data
            .staff
            .iter()
            .filter(|staff| staff.active)
            .map(|staff| staff.name.as_str())
            .collect();
        let active_clients: HashSet<&str> = data
            .clients
            .iter()
            .filter(|client| client.active)
            .map(|client| client.name.as_str())
            .collect();

        let staff = data
            .staff
            .iter()
            .filter(|staff| staff.active)
            .map(|staff| DirectoryEntry {
                id: staff.name.clone(),
                name: staff.name.clone(),
            })
            .collect();
        let clients = data
            .clients
            .iter()
            .filter(|client| client.active)
            .map(|client| DirectoryEntry {
                id: client.name.clone(),
                name: client.name.clone(),
            })
            .collect();

        let ceilings = data
            .clients
            .iter()
            .filter(|client| client.active)
            .map(|client| (client.name.clone(), client.pos_hours))
            .collect();

        let entitlements: Entitlements = data
            .assignments
            .iter()
            .filter(|a| {
                active_staff.contains(a.staff.as_str()) && active_clients.contains(a.client.as_str())
            })
            .map(|a| Entitlement {
                staff_id: a.staff.clone(),
                client_id: a.client.clone(),
                assigned_hours: a.assigned_hours,
            })
            .collect();

        debug!(
            active_staff = active_staff.len(),
            active_clients = active_clients.len(),
            visible_assignments = entitlements.len(),
            "Built in-memory reference store"
        );

        Ok(Self {
            staff,
            clients,
            all_staff: data.staff.iter().map(|s| s.name.clone()).collect(),
            all_clients: data.clients.iter().map(|c| c.name.clone()).collect(),
            ceilings,
            entitlements,
        })
    }
}

impl ReferenceStore for InMemoryStore {
    fn ceiling_hours(&self, client_id: &str) -> Decimal {
        self.ceilings.get(client_id).copied().unwrap_or(Decimal::ZERO)
    }

    fn assigned_hours(&self, staff_id: &str, client_id: &str) -> Option<Decimal> {
        self.entitlements.assigned_hours(staff_id, client_id)
    }

    fn staff_directory(&self) -> Vec<DirectoryEntry> {
        self.staff.clone()
    }

    fn client_directory(&self) -> Vec<DirectoryEntry> {
        self.clients.clone()
    }

    fn known_staff_names(&self) -> Vec<String> {
        self.all_staff.clone()
    }

    fn known_client_names(&self) -> Vec<String> {
        self.all_clients.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AssignmentRecord, ClientRecord, StaffRecord};

    fn staff(name: &str, active: bool) -> StaffRecord {
        StaffRecord {
            name: name.to_string(),
            active,
        }
    }

    fn client(name: &str, pos: i64, active: bool) -> ClientRecord {
        ClientRecord {
            name: name.to_string(),
            pos_hours: Decimal::new(pos, 0),
            active,
            private: false,
            notes: None,
        }
    }

    fn assignment(staff: &str, client: &str, hours: i64) -> AssignmentRecord {
        AssignmentRecord {
            staff: staff.to_string(),
            client: client.to_string(),
            assigned_hours: Decimal::new(hours, 0),
            permanent: true,
            notes: None,
        }
    }

    fn data() -> ReferenceData {
        ReferenceData {
            staff: vec![staff("Alice", true), staff("Bob", false)],
            clients: vec![client("C1", 40, true), client("C2", 20, false)],
            assignments: vec![
                assignment("Alice", "C1", 30),
                assignment("Bob", "C1", 10),
                assignment("Alice", "C2", 5),
            ],
        }
    }

    #[test]
    fn test_ceilings_only_for_active_clients() {
        let store = InMemoryStore::from_reference_data(&data()).unwrap();

        assert_eq!(store.ceiling_hours("C1"), Decimal::new(40, 0));
        assert_eq!(store.ceiling_hours("C2"), Decimal::ZERO);
        assert_eq!(store.ceiling_hours("unknown"), Decimal::ZERO);
    }

    #[test]
    fn test_assignment_needs_both_sides_active() {
        let store = InMemoryStore::from_reference_data(&data()).unwrap();

        assert_eq!(store.assigned_hours("Alice", "C1"), Some(Decimal::new(30, 0)));
        assert_eq!(store.assigned_hours("Bob", "C1"), None);
        assert_eq!(store.assigned_hours("Alice", "C2"), None);
    }

    #[test]
    fn test_directories_exclude_inactive_but_known_names_do_not() {
        let store = InMemoryStore::from_reference_data(&data()).unwrap();

        let staff: Vec<String> = store.staff_directory().into_iter().map(|e| e.id).collect();
        assert_eq!(staff, vec!["Alice"]);
        assert_eq!(store.client_directory().len(), 1);
        assert_eq!(store.known_staff_names(), vec!["Alice", "Bob"]);
        assert_eq!(store.known_client_names(), vec!["C1", "C2"]);
    }

    #[test]
    fn test_invalid_data_is_rejected() {
        let mut bad = data();
        bad.assignments.push(assignment("Zed", "C1", 1));

        assert!(InMemoryStore::from_reference_data(&bad).is_err());
    }
}
