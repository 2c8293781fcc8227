//! HTTP API for the expense report service.
//!
//! This module provides the REST endpoints for generating reports, saving
//! and listing expenses, validating new entries and requesting translation
//! suggestions.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    IntakeRequest, ListQuery, OptimizeRequest, ReportQuery, ReportRequest, SaveRequest,
    StoredReportQuery,
};
pub use response::{ApiError, ApiErrorResponse, OptimizeResponse};
pub use state::AppState;
