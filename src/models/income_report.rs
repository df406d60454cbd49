//! Income report model.
//!
//! Concessionaires declare their income and units sold once per month.
//! Percentage and per-unit charge rules are evaluated against this report.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{BillingError, BillingResult};

use super::{BillingPeriod, IncomeBasis};

/// Checks that declared income and unit figures are non-negative.
///
/// Fails with `InvalidIncomeReport` naming the first offending figure.
pub fn validate_declared_figures(
    gross_income: Decimal,
    net_income: Decimal,
    units_sold: &BTreeMap<String, Decimal>,
) -> BillingResult<()> {
    let incomes = [("gross_income", gross_income), ("net_income", net_income)];
    if let Some((field, value)) = incomes.into_iter().find(|(_, v)| *v < Decimal::ZERO) {
        return Err(BillingError::InvalidIncomeReport {
            message: format!("{} {} is negative", field, value),
        });
    }

    if let Some((unit_type, units)) = units_sold
        .iter()
        .find(|(_, units)| **units < Decimal::ZERO)
    {
        return Err(BillingError::InvalidIncomeReport {
            message: format!("units sold for '{}' ({}) is negative", unit_type, units),
        });
    }

    Ok(())
}

/// A concessionaire's declared figures for one billing period.
///
/// # Example
///
/// ```
/// use concession_billing::models::{IncomeBasis, IncomeReport};
/// use chrono::Utc;
/// use rust_decimal::Decimal;
/// use std::collections::BTreeMap;
///
/// let report = IncomeReport {
///     id: 1,
///     contract_id: 101,
///     month: 3,
///     year: 2025,
///     gross_income: Decimal::from(5000),
///     net_income: Decimal::from(4200),
///     units_sold: BTreeMap::from([("parking".to_string(), Decimal::from(40))]),
///     verified: false,
///     verified_at: None,
///     submitted_at: Utc::now(),
/// };
///
/// assert_eq!(report.income(IncomeBasis::Net), Decimal::from(4200));
/// assert_eq!(report.units("parking"), Some(Decimal::from(40)));
/// assert_eq!(report.units("bikes"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeReport {
    /// Unique identifier of the report.
    pub id: u64,
    /// The contract the report belongs to.
    pub contract_id: u64,
    /// The reported month (1-12).
    pub month: u32,
    /// The reported year.
    pub year: i32,
    /// Declared gross income.
    pub gross_income: Decimal,
    /// Declared net income.
    pub net_income: Decimal,
    /// Units sold by unit type.
    #[serde(default)]
    pub units_sold: BTreeMap<String, Decimal>,
    /// Whether an administrator has verified the report.
    #[serde(default)]
    pub verified: bool,
    /// When the report was verified.
    #[serde(default)]
    pub verified_at: Option<DateTime<Utc>>,
    /// When the report was submitted.
    pub submitted_at: DateTime<Utc>,
}

impl IncomeReport {
    /// Returns the income figure for the given basis.
    pub fn income(&self, basis: IncomeBasis) -> Decimal {
        match basis {
            IncomeBasis::Gross => self.gross_income,
            IncomeBasis::Net => self.net_income,
        }
    }

    /// Returns the number of units sold of the given type, if reported.
    pub fn units(&self, unit_type: &str) -> Option<Decimal> {
        self.units_sold.get(unit_type).copied()
    }

    /// Checks that the declared figures are non-negative.
    pub fn validate(&self) -> BillingResult<()> {
        validate_declared_figures(self.gross_income, self.net_income, &self.units_sold)
    }

    /// Returns true if the report covers the given contract and period.
    pub fn covers(&self, contract_id: u64, period: &BillingPeriod) -> bool {
        self.contract_id == contract_id && self.month == period.month && self.year == period.year
    }
}
