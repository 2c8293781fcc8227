//! HTTP request handlers for the expense report API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::assistant::{apply_suggestion, run_tax_optimization};
use crate::config::ReportConfig;
use crate::layout::generate_report;
use crate::models::{ExpenseRecord, GeolocationFix, filter_expenses};

use super::request::{
    IntakeRequest, ListQuery, OptimizeRequest, ReportQuery, ReportRequest, SaveRequest,
    StoredReportQuery,
};
use super::response::{ApiError, ApiErrorResponse, OptimizeResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/reports", post(report_handler))
        .route("/expenses", post(save_handler).get(list_handler))
        .route("/expenses/report", get(stored_report_handler))
        .route("/expenses/intake", post(intake_handler))
        .route("/translations/optimize", post(optimize_handler))
        .with_state(state)
}

/// Maps a body rejection to a `400` response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") || body_text.contains("Invalid expense field")
            {
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
    ApiErrorResponse::bad_request(error).into_response()
}

/// A file-name prefix must be safe to place inside a quoted header value.
fn valid_prefix(prefix: &str) -> bool {
    !prefix.is_empty()
        && prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Applies a `?prefix=` override to the configured report settings.
fn report_config(
    state: &AppState,
    correlation_id: Uuid,
    prefix: Option<&str>,
) -> Result<ReportConfig, ApiErrorResponse> {
    let mut config = state.config().report().clone();
    if let Some(prefix) = prefix.map(str::trim).filter(|p| !p.is_empty()) {
        if !valid_prefix(prefix) {
            warn!(correlation_id = %correlation_id, prefix, "Rejected file-name prefix");
            return Err(ApiErrorResponse::bad_request(ApiError::validation_error(
                "prefix may only contain letters, digits, '-' and '_'",
            )));
        }
        config.filename_prefix = prefix.to_string();
    }
    Ok(config)
}

/// Lays out `records` and wraps the PDF in an attachment response.
fn report_response(
    correlation_id: Uuid,
    records: &[ExpenseRecord],
    location: Option<&GeolocationFix>,
    config: &ReportConfig,
) -> Response {
    let start_time = Instant::now();
    match generate_report(records, location, config, Utc::now()) {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                records = records.len(),
                pages = report.page_count,
                bytes = report.bytes.len(),
                filename = %report.filename,
                duration_us = start_time.elapsed().as_micros() as u64,
                "Report generated successfully"
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "application/pdf".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", report.filename),
                    ),
                ],
                report.bytes,
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Report generation failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /reports.
///
/// Lays out the posted records and returns the PDF as an attachment.
async fn report_handler(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing report request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let config = match report_config(&state, correlation_id, query.prefix.as_deref()) {
        Ok(config) => config,
        Err(err) => return err.into_response(),
    };
    report_response(
        correlation_id,
        &request.records,
        request.location.as_ref(),
        &config,
    )
}

/// Handler for GET /expenses/report.
///
/// Reports on stored expenses as listed, defaults included, so a malformed
/// stored document never blocks the download.
async fn stored_report_handler(
    State(state): State<AppState>,
    Query(query): Query<StoredReportQuery>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing stored report request");

    let config = match report_config(&state, correlation_id, query.prefix.as_deref()) {
        Ok(config) => config,
        Err(err) => return err.into_response(),
    };

    let records = match state.repository().list_all().await {
        Ok(records) => records,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Listing expenses failed");
            return ApiErrorResponse::from(err).into_response();
        }
    };

    let term = query.search.unwrap_or_default();
    let matching: Vec<ExpenseRecord> = filter_expenses(&records, &term, &config.date_format)
        .into_iter()
        .cloned()
        .collect();
    report_response(correlation_id, &matching, None, &config)
}

/// Handler for POST /expenses.
///
/// The outcome is always returned as data; a refused save is not an HTTP error.
async fn save_handler(
    State(state): State<AppState>,
    payload: Result<Json<SaveRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing save request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let outcome = state.repository().save_all(&request.records).await;
    info!(
        correlation_id = %correlation_id,
        success = outcome.success,
        count = outcome.count,
        "Save request finished"
    );
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(outcome),
    )
        .into_response()
}

/// Handler for GET /expenses.
async fn list_handler(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Response {
    let correlation_id = Uuid::new_v4();

    let records = match state.repository().list_all().await {
        Ok(records) => records,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Listing expenses failed");
            return ApiErrorResponse::from(err).into_response();
        }
    };

    let term = query.search.unwrap_or_default();
    let matching = filter_expenses(&records, &term, &state.config().report().date_format);
    info!(
        correlation_id = %correlation_id,
        total = records.len(),
        matching = matching.len(),
        "Listed expenses"
    );
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(matching),
    )
        .into_response()
}

/// Handler for POST /expenses/intake.
///
/// Validates an entered expense and returns it with its new id.
async fn intake_handler(payload: Result<Json<IntakeRequest>, JsonRejection>) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    match request.expense.into_record(request.location) {
        Ok(record) => {
            info!(correlation_id = %correlation_id, id = %record.id, "Expense accepted");
            (
                StatusCode::CREATED,
                [(header::CONTENT_TYPE, "application/json")],
                Json(record),
            )
                .into_response()
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Expense rejected");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /translations/optimize.
async fn optimize_handler(
    State(state): State<AppState>,
    payload: Result<Json<OptimizeRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing translation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let mut record = request.record;
    match run_tax_optimization(
        state.assistant(),
        &record,
        request.fallback_location.as_ref(),
    )
    .await
    {
        Ok(suggestion) => {
            apply_suggestion(&mut record, &suggestion);
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(OptimizeResponse { suggestion, record }),
            )
                .into_response()
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Translation failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}
