//! HTTP API module for the concession billing engine.
//!
//! This module provides the REST API endpoints for submitting income
//! reports and computing, storing and retrieving monthly payments.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CalculatePaymentRequest, IncomeReportRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
