//! Per-unit charge calculation.
//!
//! Per-unit rules charge a rate for every unit of a given type the
//! concessionaire reported selling (parking tickets, rentals, entries).

use rust_decimal::Decimal;

use crate::error::BillingResult;
use crate::models::{AuditStep, AuditWarning, IncomeReport};

use super::rounding::checked_product;
use super::{NO_INCOME_REPORT_WARNING, round_currency};

/// Warning code raised when the income report has no figure for the rule's unit type.
pub const UNIT_TYPE_NOT_REPORTED_WARNING: &str = "UNIT_TYPE_NOT_REPORTED";

/// The result of evaluating a per-unit charge rule.
#[derive(Debug, Clone)]
pub struct PerUnitChargeResult {
    /// The rounded contribution of the rule.
    pub contribution: Decimal,
    /// The number of units found in the income report.
    pub units: Option<Decimal>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
    /// Raised when no income report or no figure for the unit type was available.
    pub warning: Option<AuditWarning>,
}

/// Evaluates a per-unit charge rule as `units_sold[unit_type] × per_unit_rate`.
///
/// Contributes zero when there is no income report or the report has no
/// figure for `unit_type`. Fails with `AmountOverflow` if the product is out
/// of range.
///
/// # Examples
///
/// ```
/// use concession_billing::calculation::calculate_per_unit_charge;
/// use concession_billing::models::IncomeReport;
/// use chrono::Utc;
/// use rust_decimal::Decimal;
/// use std::collections::BTreeMap;
///
/// let report = IncomeReport {
///     id: 1,
///     contract_id: 101,
///     month: 3,
///     year: 2025,
///     gross_income: Decimal::ZERO,
///     net_income: Decimal::ZERO,
///     units_sold: BTreeMap::from([("parking".to_string(), Decimal::from(40))]),
///     verified: false,
///     verified_at: None,
///     submitted_at: Utc::now(),
/// };
///
/// let result =
///     calculate_per_unit_charge("Parking", "parking", Decimal::from(15), Some(&report), 1).unwrap();
/// assert_eq!(result.contribution, Decimal::from(600));
/// ```
pub fn calculate_per_unit_charge(
    rule_name: &str,
    unit_type: &str,
    per_unit_rate: Decimal,
    income_report: Option<&IncomeReport>,
    step_number: u32,
) -> BillingResult<PerUnitChargeResult> {
    let units = income_report.and_then(|r| r.units(unit_type));

    let (contribution, reasoning, warning) = match (income_report, units) {
        (Some(_), Some(units)) => {
            let contribution = round_currency(checked_product(rule_name, units, per_unit_rate)?);
            let reasoning = format!(
                "{} '{}' units × {} = {}",
                units.normalize(),
                unit_type,
                per_unit_rate.normalize(),
                contribution
            );
            (contribution, reasoning, None)
        }
        (Some(report), None) => (
            round_currency(Decimal::ZERO),
            format!(
                "Income report {} has no '{}' units - per-unit charge contributes nothing",
                report.id, unit_type
            ),
            Some(AuditWarning {
                code: UNIT_TYPE_NOT_REPORTED_WARNING.to_string(),
                message: format!(
                    "Income report {} does not report units of type '{}' used by rule '{}'",
                    report.id, unit_type, rule_name
                ),
                severity: "low".to_string(),
            }),
        ),
        (None, _) => (
            round_currency(Decimal::ZERO),
            "No income report for the period - per-unit charge contributes nothing".to_string(),
            Some(AuditWarning {
                code: NO_INCOME_REPORT_WARNING.to_string(),
                message: format!(
                    "Per-unit rule '{}' evaluated without an income report",
                    rule_name
                ),
                severity: "medium".to_string(),
            }),
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "per_unit_charge".to_string(),
        rule_name: rule_name.to_string(),
        input: serde_json::json!({
            "unit_type": unit_type,
            "per_unit_rate": per_unit_rate.normalize().to_string(),
            "income_report_id": income_report.map(|r| r.id),
            "units": units.map(|u| u.normalize().to_string())
        }),
        output: serde_json::json!({
            "contribution": contribution.to_string()
        }),
        reasoning,
    };

    Ok(PerUnitChargeResult {
        contribution,
        units,
        audit_step,
        warning,
    })
}
