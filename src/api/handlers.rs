//! HTTP request handlers for the payroll reconciler API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{Reconciler, combine_periods};
use crate::error::ReconcileError;
use crate::store::{assignment_coverage, discover_new_names};

use super::request::{
    ClaimsReconcileRequest, CombineRequest, NewNamesRequest, ReconcileRequest, validate_period,
};
use super::response::{ApiError, ApiErrorResponse, CoverageResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/reconcile", post(reconcile_handler))
        .route("/reconcile/claims", post(reconcile_claims_handler))
        .route("/combine", post(combine_handler))
        .route("/coverage", get(coverage_handler))
        .route("/import/new-names", post(new_names_handler))
        .with_state(state)
}

/// Handler for POST /reconcile.
///
/// Reconciles one period's EVV rows against POS ceilings and assignments.
async fn reconcile_handler(
    State(state): State<AppState>,
    payload: Result<Json<ReconcileRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing reconcile request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    if let Err(error) = validate_period(&request.period) {
        return error_response(correlation_id, ApiErrorResponse::bad_request(error));
    }

    let start_time = Instant::now();
    let reconciler = Reconciler::new(state.store(), state.config().settings());
    match reconciler.reconcile_period(&request.period, &request.entries) {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                period = %report.period,
                rows = request.entries.len(),
                total_payable = %report.totals.total_payable_hours,
                issues = report.issues.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Reconciliation completed successfully"
            );
            json_response(StatusCode::OK, &report)
        }
        Err(err) => reconcile_error(correlation_id, err),
    }
}

/// Handler for POST /reconcile/claims.
///
/// Reconciles one period's EVV rows against claims-approved units.
async fn reconcile_claims_handler(
    State(state): State<AppState>,
    payload: Result<Json<ClaimsReconcileRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing claims reconcile request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    if let Err(error) = validate_period(&request.period) {
        return error_response(correlation_id, ApiErrorResponse::bad_request(error));
    }

    let start_time = Instant::now();
    let reconciler = Reconciler::new(state.store(), state.config().settings());
    match reconciler.reconcile_claims_period(&request.period, &request.entries, &request.claims) {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                period = %report.period,
                clients = report.clients.len(),
                discrepancies = report.clients.iter().filter(|c| c.has_discrepancy).count(),
                total_payable = %report.totals.total_payable_hours,
                duration_us = start_time.elapsed().as_micros(),
                "Claims reconciliation completed successfully"
            );
            json_response(StatusCode::OK, &report)
        }
        Err(err) => reconcile_error(correlation_id, err),
    }
}

/// Handler for POST /combine.
///
/// Merges two periods' staff summaries.
async fn combine_handler(payload: Result<Json<CombineRequest>, JsonRejection>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing combine request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    match combine_periods(request.first.as_deref(), request.second.as_deref()) {
        Ok(combination) => {
            info!(
                correlation_id = %correlation_id,
                staff = combination.totals.staff_count,
                total_payable = %combination.totals.total_payable_hours,
                "Periods combined"
            );
            json_response(StatusCode::OK, &combination)
        }
        Err(err) => reconcile_error(correlation_id, err),
    }
}

/// Handler for GET /coverage.
///
/// Reports how much of each active client's POS hours are assigned.
async fn coverage_handler(State(state): State<AppState>) -> Response {
    match assignment_coverage(state.config().reference()) {
        Ok(clients) => {
            info!(clients = clients.len(), "Coverage computed");
            json_response(StatusCode::OK, &CoverageResponse { clients })
        }
        Err(err) => reconcile_error(Uuid::new_v4(), err),
    }
}

/// Handler for POST /import/new-names.
///
/// Lists staff and client names in an export that are not yet on record.
async fn new_names_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewNamesRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let new_names = discover_new_names(&request.entries, state.store());
    info!(
        correlation_id = %correlation_id,
        new_staff = new_names.staff.len(),
        new_clients = new_names.clients.len(),
        "New names discovered"
    );
    json_response(StatusCode::OK, &new_names)
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], Json(body)).into_response()
}

fn error_response(correlation_id: Uuid, api_error: ApiErrorResponse) -> Response {
    warn!(
        correlation_id = %correlation_id,
        code = %api_error.error.code,
        status = api_error.status.as_u16(),
        "Request rejected"
    );
    json_response(api_error.status, &api_error.error)
}

fn reconcile_error(correlation_id: Uuid, err: ReconcileError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Reconciliation failed"
    );
    error_response(correlation_id, err.into())
}

/// Maps a JSON extraction failure to a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, &error)
}
