//! HTTP API module for the payroll reconciler.
//!
//! This module exposes period reconciliation, claims reconciliation, period
//! combination, assignment coverage and new-name discovery over REST.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{ClaimsReconcileRequest, CombineRequest, NewNamesRequest, ReconcileRequest};
pub use response::{ApiError, CoverageResponse};
pub use state::AppState;
