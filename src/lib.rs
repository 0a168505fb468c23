//! Payroll hour reconciliation for home-care agencies
//!
//! This crate reconciles the hours staff worked, as recorded by Electronic
//! Visit Verification exports, against what each client is authorized
//! (weekly POS ceilings and per-staff assignments) or what the payer approved
//! through claims, and reports the payable hours per staff member.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
