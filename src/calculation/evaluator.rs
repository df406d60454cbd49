//! Monthly payment evaluation.
//!
//! This module ties the individual charge calculations together: it validates
//! the contract's payment configuration and rules, evaluates every applicable
//! rule, and applies the minimum guarantee.

use rust_decimal::Decimal;

use crate::error::{BillingError, BillingResult};
use crate::models::{
    AuditTrace, BillingPeriod, BreakdownLine, CalculationInputs, Charge, ChargeKind, ChargeRule,
    IncomeReport, IncomeSnapshot, MonthlyPayment, PaymentConfiguration,
};

use super::rounding::checked_sum;
use super::rule_window::skipped_rule_step;
use super::{
    apply_minimum_guarantee, calculate_fixed_charge, calculate_per_area_charge,
    calculate_per_unit_charge, calculate_percentage_charge, round_currency,
};

#[derive(Debug, Default)]
struct Subtotals {
    fixed: Decimal,
    percentage: Decimal,
    per_unit: Decimal,
    per_area: Decimal,
}

impl Subtotals {
    fn add(&mut self, rule: &str, kind: ChargeKind, contribution: Decimal) -> BillingResult<()> {
        let subtotal = match kind {
            ChargeKind::Fixed => &mut self.fixed,
            ChargeKind::Percentage => &mut self.percentage,
            ChargeKind::PerUnit => &mut self.per_unit,
            ChargeKind::PerArea => &mut self.per_area,
        };
        *subtotal = checked_sum(rule, *subtotal, contribution)?;
        Ok(())
    }

    fn total(&self) -> BillingResult<Decimal> {
        [self.percentage, self.per_unit, self.per_area]
            .into_iter()
            .try_fold(self.fixed, |acc, amount| checked_sum("subtotal", acc, amount))
    }
}

/// Computes the payment owed under a contract for one billing period.
///
/// The configuration and every rule are validated before anything is summed,
/// so the function either returns a complete [`MonthlyPayment`] or an error.
/// Rules that are inactive, outside their validity window, or of a kind the
/// configuration does not enable are recorded in the audit trace and
/// contribute nothing. A missing income report is not an error: percentage
/// and per-unit rules then contribute zero.
///
/// # Errors
///
/// - `InvalidConfiguration` if a minimum guarantee is enabled without a
///   non-negative amount.
/// - `InvalidRule` if any rule fails [`ChargeRule::validate`].
/// - `IncomeReportMismatch` if the income report belongs to another contract
///   or period.
/// - `InvalidIncomeReport` if the income report declares a negative figure.
/// - `AmountOverflow` if a contribution or the subtotal is out of range.
///
/// # Examples
///
/// ```
/// use concession_billing::calculation::evaluate_payment;
/// use concession_billing::models::{
///     BillingPeriod, Charge, ChargeRule, IncomeBasis, PaymentConfiguration,
/// };
/// use rust_decimal::Decimal;
///
/// let config = PaymentConfiguration {
///     contract_id: 101,
///     has_fixed_charge: true,
///     has_percentage_charge: false,
///     has_per_unit_charge: false,
///     has_per_area_charge: false,
///     has_minimum_guarantee: false,
///     minimum_guarantee_amount: None,
///     income_basis: IncomeBasis::Gross,
/// };
/// let rules = vec![ChargeRule {
///     id: 1,
///     name: "Kiosk rent".to_string(),
///     is_active: true,
///     start_date: None,
///     end_date: None,
///     charge: Charge::Fixed { amount: Decimal::from(1000) },
/// }];
///
/// let period = BillingPeriod::new(3, 2025).unwrap();
/// let payment = evaluate_payment(&config, &rules, None, period).unwrap();
/// assert_eq!(payment.total.to_string(), "1000.00");
/// assert!(!payment.guarantee_applied);
/// ```
pub fn evaluate_payment(
    config: &PaymentConfiguration,
    rules: &[ChargeRule],
    income_report: Option<&IncomeReport>,
    period: BillingPeriod,
) -> BillingResult<MonthlyPayment> {
    let guarantee = config.validate()?;
    for rule in rules {
        rule.validate()?;
    }
    if let Some(report) = income_report {
        if !report.covers(config.contract_id, &period) {
            return Err(BillingError::IncomeReportMismatch {
                report_id: report.id,
                contract_id: config.contract_id,
                month: period.month,
                year: period.year,
            });
        }
        report.validate()?;
    }

    let mut step_number: u32 = 1;
    let mut subtotals = Subtotals::default();
    let mut breakdown = Vec::with_capacity(rules.len());
    let mut trace = AuditTrace::default();

    for rule in rules {
        let kind = rule.kind();

        let skip_reason = if !rule.is_active {
            Some("Rule is inactive".to_string())
        } else if !period.overlaps(rule.start_date, rule.end_date) {
            Some(format!("Rule validity window does not cover {}", period))
        } else if !config.is_kind_enabled(kind) {
            Some(format!(
                "{} charges are not enabled in the payment configuration",
                kind
            ))
        } else {
            None
        };

        if let Some(reason) = skip_reason {
            trace
                .steps
                .push(skipped_rule_step(rule, &period, &reason, step_number));
            step_number += 1;
            continue;
        }

        let contribution = match &rule.charge {
            Charge::Fixed { amount } => {
                let result = calculate_fixed_charge(&rule.name, *amount, step_number);
                trace.steps.push(result.audit_step);
                result.contribution
            }
            Charge::Percentage { percentage } => {
                let result = calculate_percentage_charge(
                    &rule.name,
                    *percentage,
                    income_report,
                    config.income_basis,
                    step_number,
                )?;
                trace.steps.push(result.audit_step);
                trace.warnings.extend(result.warning);
                result.contribution
            }
            Charge::PerUnit {
                unit_type,
                per_unit_rate,
            } => {
                let result = calculate_per_unit_charge(
                    &rule.name,
                    unit_type,
                    *per_unit_rate,
                    income_report,
                    step_number,
                )?;
                trace.steps.push(result.audit_step);
                trace.warnings.extend(result.warning);
                result.contribution
            }
            Charge::PerArea {
                area_m2,
                per_m2_rate,
            } => {
                let result =
                    calculate_per_area_charge(&rule.name, *area_m2, *per_m2_rate, step_number)?;
                trace.steps.push(result.audit_step);
                result.contribution
            }
        };
        step_number += 1;

        subtotals.add(&rule.name, kind, contribution)?;
        breakdown.push(BreakdownLine {
            rule_id: rule.id,
            rule_name: rule.name.clone(),
            kind,
            contribution,
        });
    }

    let subtotal = round_currency(subtotals.total()?);
    let guarantee_result = apply_minimum_guarantee(subtotal, guarantee, step_number);
    trace.steps.push(guarantee_result.audit_step);

    let calculation_inputs = CalculationInputs {
        has_minimum_guarantee: config.has_minimum_guarantee,
        minimum_guarantee_amount: config.minimum_guarantee_amount,
        income_basis: config.income_basis,
        income_report: income_report.map(|r| IncomeSnapshot {
            report_id: r.id,
            gross_income: r.gross_income,
            net_income: r.net_income,
            units_sold: r.units_sold.clone(),
            verified: r.verified,
        }),
        rule_ids: rules.iter().map(|r| r.id).collect(),
    };

    Ok(MonthlyPayment {
        contract_id: config.contract_id,
        period,
        fixed_subtotal: round_currency(subtotals.fixed),
        percentage_subtotal: round_currency(subtotals.percentage),
        per_unit_subtotal: round_currency(subtotals.per_unit),
        per_area_subtotal: round_currency(subtotals.per_area),
        subtotal,
        guarantee_applied: guarantee_result.guarantee_applied,
        guarantee_adjustment: guarantee_result.guarantee_adjustment,
        total: guarantee_result.total,
        breakdown,
        calculation_inputs,
        audit_trace: trace,
    })
}
