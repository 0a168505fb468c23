//! Per-run reference snapshot.
//!
//! Assignment mode reads every ceiling and entitlement it needs once, before
//! allocation starts, so a run sees one consistent view of the store. Claims
//! mode takes its ceilings from approved units instead and does not use a
//! snapshot.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::models::{ClientCeiling, Entitlement, Entitlements};

use super::ReferenceStore;

/// Ceilings and entitlements read from a store at the start of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceSnapshot {
    ceilings: BTreeMap<String, Decimal>,
    entitlements: Entitlements,
}

impl ReferenceSnapshot {
    /// Reads the ceiling of every named client and the entitlement of every
    /// named (staff, client) pair.
    pub fn capture<'a, S, C, P>(store: &S, clients: C, pairs: P) -> Self
    where
        S: ReferenceStore + ?Sized,
        C: IntoIterator<Item = &'a str>,
        P: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let ceilings = clients
            .into_iter()
            .map(|client_id| (client_id.to_string(), store.ceiling_hours(client_id)))
            .collect();

        let entitlements = pairs
            .into_iter()
            .filter_map(|(staff_id, client_id)| {
                store
                    .assigned_hours(staff_id, client_id)
                    .map(|assigned_hours| Entitlement {
                        staff_id: staff_id.to_string(),
                        client_id: client_id.to_string(),
                        assigned_hours,
                    })
            })
            .collect();

        Self {
            ceilings,
            entitlements,
        }
    }

    /// The captured ceiling for a client; the zero sentinel if it was not captured.
    pub fn ceiling(&self, client_id: &str) -> ClientCeiling {
        ClientCeiling::new(
            client_id,
            self.ceilings.get(client_id).copied().unwrap_or(Decimal::ZERO),
        )
    }

    /// The captured entitlements.
    pub fn entitlements(&self) -> &Entitlements {
        &self.entitlements
    }
}
