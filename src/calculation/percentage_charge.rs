//! Percentage-of-income charge calculation.
//!
//! Percentage rules take a share of the income the concessionaire declared for
//! the period. A period with no income report yet is valid: the rule then
//! contributes zero and a warning is recorded.

use rust_decimal::Decimal;

use crate::error::BillingResult;
use crate::models::{AuditStep, AuditWarning, IncomeBasis, IncomeReport};

use super::round_currency;
use super::rounding::checked_product;

/// Warning code raised when a percentage rule has no income report to apply to.
pub const NO_INCOME_REPORT_WARNING: &str = "NO_INCOME_REPORT";

/// The result of evaluating a percentage charge rule.
#[derive(Debug, Clone)]
pub struct PercentageChargeResult {
    /// The rounded contribution of the rule.
    pub contribution: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
    /// Raised when no income report was available.
    pub warning: Option<AuditWarning>,
}

/// Evaluates a percentage charge rule.
///
/// The contribution is `income × percentage / 100`, where the income figure is
/// selected by `basis`. Without an income report the contribution is zero.
/// Fails with `AmountOverflow` if the product is out of range.
///
/// # Arguments
///
/// * `rule_name` - The rule name, recorded in the audit step
/// * `percentage` - The percentage in `[0, 100]`
/// * `income_report` - The period's income report, if one was submitted
/// * `basis` - Whether gross or net income is used
/// * `step_number` - The step number for audit trail sequencing
///
/// # Examples
///
/// ```
/// use concession_billing::calculation::calculate_percentage_charge;
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
///     net_income: Decimal::from(4000),
///     units_sold: BTreeMap::new(),
///     verified: true,
///     verified_at: None,
///     submitted_at: Utc::now(),
/// };
///
/// let result = calculate_percentage_charge(
///     "Sales share",
///     Decimal::from(10),
///     Some(&report),
///     IncomeBasis::Gross,
///     1,
/// )
/// .unwrap();
/// assert_eq!(result.contribution, Decimal::from(500));
/// assert!(result.warning.is_none());
/// ```
pub fn calculate_percentage_charge(
    rule_name: &str,
    percentage: Decimal,
    income_report: Option<&IncomeReport>,
    basis: IncomeBasis,
    step_number: u32,
) -> BillingResult<PercentageChargeResult> {
    let Some(report) = income_report else {
        let audit_step = AuditStep {
            step_number,
            rule_id: "percentage_charge".to_string(),
            rule_name: rule_name.to_string(),
            input: serde_json::json!({
                "percentage": percentage.normalize().to_string(),
                "income_basis": basis,
                "income_report_id": null
            }),
            output: serde_json::json!({
                "contribution": "0.00"
            }),
            reasoning: "No income report for the period - percentage charge contributes nothing"
                .to_string(),
        };

        return Ok(PercentageChargeResult {
            contribution: round_currency(Decimal::ZERO),
            audit_step,
            warning: Some(AuditWarning {
                code: NO_INCOME_REPORT_WARNING.to_string(),
                message: format!(
                    "Percentage rule '{}' evaluated without an income report",
                    rule_name
                ),
                severity: "medium".to_string(),
            }),
        });
    };

    let income = report.income(basis);
    let contribution =
        round_currency(checked_product(rule_name, income, percentage)? / Decimal::ONE_HUNDRED);

    let basis_label = match basis {
        IncomeBasis::Gross => "gross",
        IncomeBasis::Net => "net",
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "percentage_charge".to_string(),
        rule_name: rule_name.to_string(),
        input: serde_json::json!({
            "percentage": percentage.normalize().to_string(),
            "income_basis": basis,
            "income_report_id": report.id,
            "income": income.to_string()
        }),
        output: serde_json::json!({
            "contribution": contribution.to_string()
        }),
        reasoning: format!(
            "{}% of {} income {} = {}",
            percentage.normalize(),
            basis_label,
            income,
            contribution
        ),
    };

    Ok(PercentageChargeResult {
        contribution,
        audit_step,
        warning: None,
    })
}
