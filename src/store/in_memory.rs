use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::error::{BillingError, BillingResult};
use crate::models::{BillingPeriod, IncomeReport, PaymentRecord};

use super::ports::{IncomeReportStore, NewIncomeReport, PaymentStore};

#[derive(Debug, Default)]
struct IncomeReports {
    next_id: u64,
    by_id: HashMap<u64, IncomeReport>,
    by_period: HashMap<(u64, BillingPeriod), u64>,
}

/// A thread-safe in-memory store for income reports.
///
/// Ids are assigned sequentially from 1.
#[derive(Debug, Default, Clone)]
pub struct InMemoryIncomeReportStore {
    reports: Arc<RwLock<IncomeReports>>,
}

impl InMemoryIncomeReportStore {
    /// Creates a new, empty income report store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IncomeReportStore for InMemoryIncomeReportStore {
    async fn submit(&self, report: NewIncomeReport) -> BillingResult<IncomeReport> {
        let mut reports = self.reports.write().await;

        let key = (report.contract_id, report.period);
        if reports.by_period.contains_key(&key) {
            return Err(BillingError::IncomeReportExists {
                contract_id: report.contract_id,
                month: report.period.month,
                year: report.period.year,
            });
        }

        reports.next_id += 1;
        let stored = IncomeReport {
            id: reports.next_id,
            contract_id: report.contract_id,
            month: report.period.month,
            year: report.period.year,
            gross_income: report.gross_income,
            net_income: report.net_income,
            units_sold: report.units_sold,
            verified: false,
            verified_at: None,
            submitted_at: Utc::now(),
        };
        reports.by_period.insert(key, stored.id);
        reports.by_id.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get(&self, report_id: u64) -> BillingResult<Option<IncomeReport>> {
        let reports = self.reports.read().await;
        Ok(reports.by_id.get(&report_id).cloned())
    }

    async fn find_for_period(
        &self,
        contract_id: u64,
        period: BillingPeriod,
    ) -> BillingResult<Option<IncomeReport>> {
        let reports = self.reports.read().await;
        Ok(reports
            .by_period
            .get(&(contract_id, period))
            .and_then(|id| reports.by_id.get(id))
            .cloned())
    }

    async fn mark_verified(&self, report_id: u64, at: DateTime<Utc>) -> BillingResult<IncomeReport> {
        let mut reports = self.reports.write().await;
        let report = reports
            .by_id
            .get_mut(&report_id)
            .ok_or(BillingError::IncomeReportNotFound { report_id })?;
        report.verified = true;
        report.verified_at = Some(at);
        Ok(report.clone())
    }
}

/// A thread-safe in-memory store for computed payments.
///
/// Keyed by (contract, period); the check for an existing payment and the
/// insert happen under one write lock.
#[derive(Debug, Default, Clone)]
pub struct InMemoryPaymentStore {
    payments: Arc<RwLock<BTreeMap<(u64, BillingPeriod), PaymentRecord>>>,
}

impl InMemoryPaymentStore {
    /// Creates a new, empty payment store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn insert(&self, record: PaymentRecord) -> BillingResult<()> {
        let mut payments = self.payments.write().await;
        let key = record.key();
        if payments.contains_key(&key) {
            return Err(BillingError::PaymentAlreadyExists {
                contract_id: key.0,
                month: key.1.month,
                year: key.1.year,
            });
        }
        payments.insert(key, record);
        Ok(())
    }

    async fn get(
        &self,
        contract_id: u64,
        period: BillingPeriod,
    ) -> BillingResult<Option<PaymentRecord>> {
        let payments = self.payments.read().await;
        Ok(payments.get(&(contract_id, period)).cloned())
    }

    async fn list_for_contract(&self, contract_id: u64) -> BillingResult<Vec<PaymentRecord>> {
        let payments = self.payments.read().await;
        Ok(payments
            .iter()
            .filter(|((id, _), _)| *id == contract_id)
            .map(|(_, record)| record.clone())
            .collect())
    }
}
