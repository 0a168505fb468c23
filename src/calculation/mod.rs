//! Calculation logic for the payroll reconciler.
//!
//! This module contains the reconciliation steps: aggregating raw EVV
//! service lines per (client, staff) pair, allocating payable hours against
//! a client's ceiling, comparing worked units with claims-approved units,
//! rolling results up per staff member, and combining two periods.
//! [`Reconciler`] runs them in order for one period.

mod aggregation;
mod allocation;
mod checked;
mod claims;
mod period_combiner;
mod reconciler;
mod roll_up;
mod rounding;

pub use aggregation::{Aggregation, aggregate_work_entries, parse_hours_cell, parse_units_cell};
pub use allocation::{
    AllocationPolicy, AllocationTrigger, ClientAllocation, ProrationRounding, allocate_client,
};
pub use claims::{
    ClaimsAggregation, ClientClaims, DEFAULT_UNITS_PER_HOUR, aggregate_claims, approved_hours,
    summarize_client_claims,
};
pub use period_combiner::combine_periods;
pub use reconciler::Reconciler;
pub use roll_up::roll_up_staff;
pub use rounding::{HOURS_DP, floor_hours, round_hours};

pub(crate) use checked::{add_hours, sum_hours};
