//! Name resolution at the import boundary.
//!
//! Export names drift in case and spacing from the directory. Names are
//! matched after normalization; a name that matches several directory
//! entries is attributed to an exact match when there is one, and otherwise
//! to an `ambiguous:` key that no directory entry can own.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::{IssueKind, RawClaimEntry, RawWorkEntry, ReconciliationIssue};

use super::{DirectoryEntry, ReferenceStore};

/// Normalizes a name for matching: trimmed, inner whitespace collapsed,
/// lower-cased.
///
/// ```
/// use payroll_reconciler::store::normalize_name;
///
/// assert_eq!(normalize_name("  Mary   ANN Smith "), "mary ann smith");
/// ```
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Role {
    Staff,
    Client,
}

impl Role {
    fn label(&self) -> &'static str {
        match self {
            Role::Staff => "staff",
            Role::Client => "client",
        }
    }
}

/// Prefix for names that normalize onto several directory entries.
const AMBIGUOUS_PREFIX: &str = "ambiguous:";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Match {
    Unique(DirectoryEntry),
    Ambiguous(Vec<DirectoryEntry>),
}

/// Maps raw export names onto directory identifiers.
#[derive(Debug, Clone, Default)]
pub struct NameResolver {
    staff: HashMap<String, Match>,
    clients: HashMap<String, Match>,
}

impl NameResolver {
    /// Builds a resolver from the store's active directories.
    pub fn from_store<S: ReferenceStore + ?Sized>(store: &S) -> Self {
        let index = |entries: Vec<DirectoryEntry>| {
            let mut by_name: HashMap<String, Match> = HashMap::new();
            for entry in entries {
                match by_name.entry(normalize_name(&entry.name)) {
                    Entry::Vacant(slot) => {
                        slot.insert(Match::Unique(entry));
                    }
                    Entry::Occupied(mut slot) => {
                        let mut candidates = match slot.get() {
                            Match::Unique(existing) => vec![existing.clone()],
                            Match::Ambiguous(candidates) => candidates.clone(),
                        };
                        candidates.push(entry);
                        slot.insert(Match::Ambiguous(candidates));
                    }
                }
            }
            by_name
        };

        Self {
            staff: index(store.staff_directory()),
            clients: index(store.client_directory()),
        }
    }

    /// Starts a resolution pass. Each distinct unresolved or ambiguous name
    /// is reported once per pass.
    pub fn pass(&self) -> ResolutionPass<'_> {
        ResolutionPass {
            resolver: self,
            reported: HashSet::new(),
            issues: Vec::new(),
        }
    }
}

/// One run's worth of name resolution.
#[derive(Debug)]
pub struct ResolutionPass<'r> {
    resolver: &'r NameResolver,
    reported: HashSet<(Role, String)>,
    issues: Vec<ReconciliationIssue>,
}

impl ResolutionPass<'_> {
    /// Rewrites the client and staff names of work entries to identifiers.
    pub fn work_entries(&mut self, entries: &[RawWorkEntry]) -> Vec<RawWorkEntry> {
        entries
            .iter()
            .map(|entry| RawWorkEntry {
                client: self.resolve(Role::Client, &entry.client),
                staff: self.resolve(Role::Staff, &entry.staff),
                ..entry.clone()
            })
            .collect()
    }

    /// Rewrites the client names of claim lines to identifiers.
    pub fn claim_entries(&mut self, entries: &[RawClaimEntry]) -> Vec<RawClaimEntry> {
        entries
            .iter()
            .map(|entry| RawClaimEntry {
                client: self.resolve(Role::Client, &entry.client),
                ..entry.clone()
            })
            .collect()
    }

    /// The issues raised so far, in discovery order.
    pub fn into_issues(self) -> Vec<ReconciliationIssue> {
        self.issues
    }

    fn resolve(&mut self, role: Role, raw: &str) -> String {
        let key = normalize_name(raw);
        let resolver = self.resolver;
        let directory = match role {
            Role::Staff => &resolver.staff,
            Role::Client => &resolver.clients,
        };

        let (id, issue) = match directory.get(&key) {
            Some(Match::Unique(entry)) => return entry.id.clone(),
            Some(Match::Ambiguous(candidates)) => {
                if let Some(exact) = candidates.iter().find(|entry| entry.name == raw.trim()) {
                    return exact.id.clone();
                }
                let id = format!("{}{}", AMBIGUOUS_PREFIX, key);
                let names: Vec<&str> = candidates.iter().map(|entry| entry.name.as_str()).collect();
                let issue = ReconciliationIssue::new(
                    IssueKind::AmbiguousReference,
                    format!(
                        "{} name '{}' matches {} directory entries ({}); grouped under '{}'",
                        role.label(),
                        raw.trim(),
                        candidates.len(),
                        names.join(", "),
                        id
                    ),
                );
                (id, issue)
            }
            None => {
                let issue = ReconciliationIssue::new(
                    IssueKind::UnresolvedReference,
                    format!(
                        "{} name '{}' is not in the directory; grouped under '{}'",
                        role.label(),
                        raw.trim(),
                        key
                    ),
                );
                (key, issue)
            }
        };

        if self.reported.insert((role, id.clone())) {
            let issue = match role {
                Role::Staff => issue.for_staff(id.clone()),
                Role::Client => issue.for_client(id.clone()),
            };
            self.issues.push(issue);
        }
        id
    }
}

/// Names in an import that are not yet on record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNames {
    /// Staff names in first-seen order.
    pub staff: Vec<String>,
    /// Client names in first-seen order.
    pub clients: Vec<String>,
}

/// Lists distinct staff and client names in `entries` that match no name on
/// record, ignoring case and spacing. Inactive records count as on record.
pub fn discover_new_names<S: ReferenceStore + ?Sized>(
    entries: &[RawWorkEntry],
    store: &S,
) -> NewNames {
    let known_staff: HashSet<String> = store
        .known_staff_names()
        .iter()
        .map(|name| normalize_name(name))
        .collect();
    let known_clients: HashSet<String> = store
        .known_client_names()
        .iter()
        .map(|name| normalize_name(name))
        .collect();

    let mut seen_staff = HashSet::new();
    let mut seen_clients = HashSet::new();
    let mut new_names = NewNames::default();

    for entry in entries {
        let staff_key = normalize_name(&entry.staff);
        if !staff_key.is_empty()
            && !known_staff.contains(&staff_key)
            && seen_staff.insert(staff_key)
        {
            new_names.staff.push(entry.staff.trim().to_string());
        }

        let client_key = normalize_name(&entry.client);
        if !client_key.is_empty()
            && !known_clients.contains(&client_key)
            && seen_clients.insert(client_key)
        {
            new_names.clients.push(entry.client.trim().to_string());
        }
    }

    new_names
}
