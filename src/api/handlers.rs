//! HTTP request handlers for the concession billing API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::evaluate_payment;
use crate::error::{BillingError, BillingResult};
use crate::models::{BillingPeriod, IncomeReport, PaymentRecord};

use super::request::{CalculatePaymentRequest, IncomeReportRequest};
use super::response::ApiErrorResponse;
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/contracts/:contract_id/calculate-payment",
            post(calculate_payment_handler),
        )
        .route("/contracts/:contract_id/payments", get(list_payments_handler))
        .route(
            "/contracts/:contract_id/payments/:year/:month",
            get(get_payment_handler),
        )
        .route(
            "/contracts/:contract_id/income-reports",
            post(submit_income_report_handler),
        )
        .route(
            "/income-reports/:report_id/verify",
            post(verify_income_report_handler),
        )
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(correlation_id: Uuid, err: BillingError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    ApiErrorResponse::from(err).into_response()
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %rejection.body_text(),
        "Rejected request body"
    );
    ApiErrorResponse::from(rejection).into_response()
}

/// Handler for POST /contracts/:contract_id/calculate-payment.
///
/// Computes the payment for the requested month, stores it and returns the
/// stored record with 201. Computing the same month twice returns 409.
async fn calculate_payment_handler(
    State(state): State<AppState>,
    Path(contract_id): Path<u64>,
    payload: Result<Json<CalculatePaymentRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        contract_id,
        "Processing payment calculation request"
    );

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    match perform_calculation(&state, contract_id, &request).await {
        Ok(record) => {
            info!(
                correlation_id = %correlation_id,
                contract_id,
                period = %record.payment.period,
                subtotal = %record.payment.subtotal,
                total = %record.payment.total,
                guarantee_applied = record.payment.guarantee_applied,
                duration_us = start_time.elapsed().as_micros(),
                "Payment calculated and stored"
            );
            json_response(StatusCode::CREATED, record)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Loads the contract terms and income report, evaluates and stores the payment.
async fn perform_calculation(
    state: &AppState,
    contract_id: u64,
    request: &CalculatePaymentRequest,
) -> BillingResult<PaymentRecord> {
    let period = request.period()?;
    let config = state.config().payment_configuration(contract_id)?;
    let rules = state.config().charge_rules(contract_id, &period)?;
    let income_report =
        resolve_income_report(state, contract_id, period, request.income_report_id).await?;

    let payment = evaluate_payment(config, &rules, income_report.as_ref(), period)?;
    let record = PaymentRecord::new(payment);
    state.payments().insert(record.clone()).await?;

    Ok(record)
}

/// Finds the income report to bill against.
///
/// An explicit report id must exist and cover the contract and period.
/// Without one, the report submitted for the period is used if there is one.
async fn resolve_income_report(
    state: &AppState,
    contract_id: u64,
    period: BillingPeriod,
    report_id: Option<u64>,
) -> BillingResult<Option<IncomeReport>> {
    let Some(report_id) = report_id else {
        return state
            .income_reports()
            .find_for_period(contract_id, period)
            .await;
    };

    let report = state
        .income_reports()
        .get(report_id)
        .await?
        .ok_or(BillingError::IncomeReportNotFound { report_id })?;

    if !report.covers(contract_id, &period) {
        return Err(BillingError::IncomeReportMismatch {
            report_id,
            contract_id,
            month: period.month,
            year: period.year,
        });
    }

    Ok(Some(report))
}

/// Handler for GET /contracts/:contract_id/payments.
async fn list_payments_handler(
    State(state): State<AppState>,
    Path(contract_id): Path<u64>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    if let Err(err) = state.config().get_contract(contract_id) {
        return error_response(correlation_id, err);
    }

    match state.payments().list_for_contract(contract_id).await {
        Ok(payments) => json_response(StatusCode::OK, payments),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /contracts/:contract_id/payments/:year/:month.
async fn get_payment_handler(
    State(state): State<AppState>,
    Path((contract_id, year, month)): Path<(u64, i32, u32)>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let result = find_payment(&state, contract_id, month, year).await;

    match result {
        Ok(record) => json_response(StatusCode::OK, record),
        Err(err) => error_response(correlation_id, err),
    }
}

async fn find_payment(
    state: &AppState,
    contract_id: u64,
    month: u32,
    year: i32,
) -> BillingResult<PaymentRecord> {
    state.config().get_contract(contract_id)?;
    let period = BillingPeriod::new(month, year)?;
    state
        .payments()
        .get(contract_id, period)
        .await?
        .ok_or(BillingError::PaymentNotFound {
            contract_id,
            month,
            year,
        })
}

/// Handler for POST /contracts/:contract_id/income-reports.
async fn submit_income_report_handler(
    State(state): State<AppState>,
    Path(contract_id): Path<u64>,
    payload: Result<Json<IncomeReportRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let result = submit_income_report(&state, contract_id, request).await;

    match result {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                contract_id,
                report_id = report.id,
                month = report.month,
                year = report.year,
                gross_income = %report.gross_income,
                "Income report submitted"
            );
            json_response(StatusCode::CREATED, report)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

async fn submit_income_report(
    state: &AppState,
    contract_id: u64,
    request: IncomeReportRequest,
) -> BillingResult<IncomeReport> {
    state.config().get_contract(contract_id)?;
    let report = request.into_new_report(contract_id)?;
    state.income_reports().submit(report).await
}

/// Handler for POST /income-reports/:report_id/verify.
async fn verify_income_report_handler(
    State(state): State<AppState>,
    Path(report_id): Path<u64>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    match state.income_reports().mark_verified(report_id, Utc::now()).await {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                report_id,
                contract_id = report.contract_id,
                "Income report verified"
            );
            json_response(StatusCode::OK, report)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::config::ConfigLoader;
    use axum::body::Body;
    use axum::http::Request;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let config = ConfigLoader::load("./config/parks").expect("Failed to load config");
        AppState::new(config)
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    async fn send(router: Router, method: &str, uri: &str, body: Option<String>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        router.oneshot(request).await.unwrap()
    }

    async fn body_bytes(response: Response) -> axum::body::Bytes {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_calculate_fixed_only_contract_returns_201() {
        let router = create_router(create_test_state());

        let response = send(
            router,
            "POST",
            "/contracts/103/calculate-payment",
            Some(r#"{"month": 3, "year": 2025}"#.to_string()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let record: PaymentRecord = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(record.payment.contract_id, 103);
        assert_eq!(record.payment.total, dec("1000.00"));
        assert_eq!(record.payment.percentage_subtotal, Decimal::ZERO);
        assert_eq!(record.payment.audit_trace.warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_calculate_uses_report_submitted_for_period() {
        let state = create_test_state();

        let response = send(
            create_router(state.clone()),
            "POST",
            "/contracts/101/income-reports",
            Some(
                r#"{"month": 3, "year": 2025, "gross_income": "2000", "net_income": "1500"}"#
                    .to_string(),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = send(
            create_router(state),
            "POST",
            "/contracts/101/calculate-payment",
            Some(r#"{"month": 3, "year": 2025}"#.to_string()),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let record: PaymentRecord = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(record.payment.subtotal, dec("400.00"));
        assert!(record.payment.guarantee_applied);
        assert_eq!(record.payment.guarantee_adjustment, dec("600.00"));
        assert_eq!(record.payment.total, dec("1000.00"));
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let router = create_router(create_test_state());
        let response = send(
            router,
            "POST",
            "/contracts/101/calculate-payment",
            Some("{invalid json".to_string()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_unknown_contract_returns_404() {
        let router = create_router(create_test_state());
        let response = send(
            router,
            "POST",
            "/contracts/999/calculate-payment",
            Some(r#"{"month": 3, "year": 2025}"#.to_string()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "CONTRACT_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_verify_unknown_report_returns_404() {
        let router = create_router(create_test_state());
        let response = send(router, "POST", "/income-reports/77/verify", None).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "INCOME_REPORT_NOT_FOUND");
    }
}
