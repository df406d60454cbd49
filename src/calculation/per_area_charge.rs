//! Per-area charge calculation.
//!
//! The occupied area is a property of the contract, not of the income report,
//! so per-area rules always contribute.

use rust_decimal::Decimal;

use crate::error::BillingResult;
use crate::models::AuditStep;

use super::round_currency;
use super::rounding::checked_product;

/// The result of evaluating a per-area charge rule.
#[derive(Debug, Clone)]
pub struct PerAreaChargeResult {
    /// The rounded contribution of the rule.
    pub contribution: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Evaluates a per-area charge rule as `area_m2 × per_m2_rate`.
///
/// Fails with `AmountOverflow` if the product is out of range.
///
/// # Examples
///
/// ```
/// use concession_billing::calculation::calculate_per_area_charge;
/// use rust_decimal::Decimal;
///
/// let result =
///     calculate_per_area_charge("Terrace", Decimal::from(50), Decimal::from(20), 1).unwrap();
/// assert_eq!(result.contribution, Decimal::from(1000));
/// ```
pub fn calculate_per_area_charge(
    rule_name: &str,
    area_m2: Decimal,
    per_m2_rate: Decimal,
    step_number: u32,
) -> BillingResult<PerAreaChargeResult> {
    let contribution = round_currency(checked_product(rule_name, area_m2, per_m2_rate)?);

    let audit_step = AuditStep {
        step_number,
        rule_id: "per_area_charge".to_string(),
        rule_name: rule_name.to_string(),
        input: serde_json::json!({
            "area_m2": area_m2.normalize().to_string(),
            "per_m2_rate": per_m2_rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "contribution": contribution.to_string()
        }),
        reasoning: format!(
            "{} m² × {} per m² = {}",
            area_m2.normalize(),
            per_m2_rate.normalize(),
            contribution
        ),
    };

    Ok(PerAreaChargeResult {
        contribution,
        audit_step,
    })
}
