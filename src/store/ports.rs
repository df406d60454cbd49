//! Storage ports.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::error::BillingResult;
use crate::models::{BillingPeriod, IncomeReport, PaymentRecord};

/// An income report as submitted, before the store assigns its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIncomeReport {
    /// The contract the report belongs to.
    pub contract_id: u64,
    /// The reported period.
    pub period: BillingPeriod,
    /// Declared gross income.
    pub gross_income: Decimal,
    /// Declared net income.
    pub net_income: Decimal,
    /// Units sold by unit type.
    pub units_sold: BTreeMap<String, Decimal>,
}

/// Stores concessionaires' income reports.
#[async_trait]
pub trait IncomeReportStore: Send + Sync {
    /// Stores a new report and returns it with its assigned id.
    ///
    /// Fails with `IncomeReportExists` if the contract already reported the period.
    async fn submit(&self, report: NewIncomeReport) -> BillingResult<IncomeReport>;

    /// Gets a report by id.
    async fn get(&self, report_id: u64) -> BillingResult<Option<IncomeReport>>;

    /// Gets the report a contract submitted for a period, if any.
    async fn find_for_period(
        &self,
        contract_id: u64,
        period: BillingPeriod,
    ) -> BillingResult<Option<IncomeReport>>;

    /// Marks a report as verified by an administrator.
    ///
    /// Fails with `IncomeReportNotFound` if the report does not exist.
    async fn mark_verified(&self, report_id: u64, at: DateTime<Utc>) -> BillingResult<IncomeReport>;
}

/// Stores computed monthly payments.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Stores a payment.
    ///
    /// Fails with `PaymentAlreadyExists` if a payment for the same contract
    /// and period is already stored; the stored payment is left untouched.
    async fn insert(&self, record: PaymentRecord) -> BillingResult<()>;

    /// Gets the payment computed for a contract and period, if any.
    async fn get(
        &self,
        contract_id: u64,
        period: BillingPeriod,
    ) -> BillingResult<Option<PaymentRecord>>;

    /// Lists a contract's payments, oldest period first.
    async fn list_for_contract(&self, contract_id: u64) -> BillingResult<Vec<PaymentRecord>>;
}
