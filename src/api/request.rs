//! Request types for the concession billing API.
//!
//! This module defines the JSON request bodies accepted by the API.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::BillingResult;
use crate::models::{BillingPeriod, validate_declared_figures};
use crate::store::NewIncomeReport;

/// Request body for `POST /contracts/:contract_id/calculate-payment`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculatePaymentRequest {
    /// The month to bill (1-12).
    pub month: u32,
    /// The year to bill.
    pub year: i32,
    /// The income report to use. When omitted, the report submitted for the
    /// period is used if there is one.
    #[serde(default)]
    pub income_report_id: Option<u64>,
}

impl CalculatePaymentRequest {
    /// Returns the requested billing period.
    pub fn period(&self) -> BillingResult<BillingPeriod> {
        BillingPeriod::new(self.month, self.year)
    }
}

/// Request body for `POST /contracts/:contract_id/income-reports`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeReportRequest {
    /// The reported month (1-12).
    pub month: u32,
    /// The reported year.
    pub year: i32,
    /// Declared gross income.
    pub gross_income: Decimal,
    /// Declared net income.
    pub net_income: Decimal,
    /// Units sold by unit type (e.g. `{"parking": "40"}`).
    #[serde(default)]
    pub units_sold: BTreeMap<String, Decimal>,
}

impl IncomeReportRequest {
    /// Converts the request into a report for the store.
    ///
    /// Fails with `InvalidPeriod` for a bad month and `InvalidIncomeReport`
    /// for a negative income or unit figure.
    pub fn into_new_report(self, contract_id: u64) -> BillingResult<NewIncomeReport> {
        validate_declared_figures(self.gross_income, self.net_income, &self.units_sold)?;
        Ok(NewIncomeReport {
            contract_id,
            period: BillingPeriod::new(self.month, self.year)?,
            gross_income: self.gross_income,
            net_income: self.net_income,
            units_sold: self.units_sold,
        })
    }
}
