//! Reference data access.
//!
//! The reconciler reads each client's ceiling and each (staff, client)
//! entitlement from a [`ReferenceStore`]. The store is read once per run
//! into a [`ReferenceSnapshot`] so the allocation itself never touches it.
//!
//! This module also holds the import-boundary helpers that map raw export
//! names onto directory identities ([`NameResolver`]) and the assignment
//! coverage view used when maintaining POS hours.

mod coverage;
mod memory;
mod resolver;
mod snapshot;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use coverage::{ClientCoverage, CoverageStatus, assignment_coverage};
pub use memory::InMemoryStore;
pub use resolver::{NameResolver, NewNames, ResolutionPass, discover_new_names, normalize_name};
pub use snapshot::ReferenceSnapshot;

/// An active staff member or client as listed in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Identifier used for grouping and lookups.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// Read access to ceilings, entitlements and directories.
pub trait ReferenceStore: Send + Sync {
    /// The client's ceiling hours, or zero when unset or unknown.
    fn ceiling_hours(&self, client_id: &str) -> Decimal;

    /// The staff member's assigned hours for the client, if an active
    /// assignment exists.
    fn assigned_hours(&self, staff_id: &str, client_id: &str) -> Option<Decimal>;

    /// Active staff.
    fn staff_directory(&self) -> Vec<DirectoryEntry>;

    /// Active clients.
    fn client_directory(&self) -> Vec<DirectoryEntry>;

    /// Every staff name on record, including inactive staff.
    fn known_staff_names(&self) -> Vec<String>;

    /// Every client name on record, including inactive clients.
    fn known_client_names(&self) -> Vec<String>;
}
