//! Configuration loading for the payroll reconciler.
//!
//! This module loads engine settings and reference data (staff, clients
//! and their POS hours, assignments) from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use payroll_reconciler::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Units per hour: {}", config.settings().units_per_hour);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AssignmentRecord, ClaimsConfig, ClientRecord, ReconcilerConfig, ReferenceData, StaffRecord,
};
