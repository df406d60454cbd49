//! Minimum guarantee calculation.
//!
//! Some contracts guarantee the park a minimum monthly payment. When the
//! subtotal of all charge rules falls short of that amount, the total is
//! raised to the guarantee and the difference is recorded as an adjustment.

use rust_decimal::Decimal;

use crate::models::AuditStep;

use super::round_currency;

/// The result of applying the minimum guarantee to a subtotal.
#[derive(Debug, Clone)]
pub struct MinimumGuaranteeResult {
    /// Whether the guarantee raised the total.
    pub guarantee_applied: bool,
    /// The amount added to reach the guarantee.
    pub guarantee_adjustment: Decimal,
    /// The amount owed.
    pub total: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Applies a minimum guarantee floor to a subtotal.
///
/// `guarantee` is `None` when the contract has no minimum guarantee; the
/// total is then the subtotal.
///
/// # Examples
///
/// ```
/// use concession_billing::calculation::apply_minimum_guarantee;
/// use rust_decimal::Decimal;
///
/// let result = apply_minimum_guarantee(Decimal::from(400), Some(Decimal::from(1000)), 3);
/// assert!(result.guarantee_applied);
/// assert_eq!(result.guarantee_adjustment, Decimal::from(600));
/// assert_eq!(result.total, Decimal::from(1000));
/// ```
pub fn apply_minimum_guarantee(
    subtotal: Decimal,
    guarantee: Option<Decimal>,
    step_number: u32,
) -> MinimumGuaranteeResult {
    let subtotal = round_currency(subtotal);
    let guarantee = guarantee.map(round_currency);

    let (guarantee_applied, guarantee_adjustment, total, reasoning) = match guarantee {
        Some(amount) if amount > subtotal => (
            true,
            amount - subtotal,
            amount,
            format!(
                "Subtotal {} is below the minimum guarantee {} - adding {}",
                subtotal,
                amount,
                amount - subtotal
            ),
        ),
        Some(amount) => (
            false,
            round_currency(Decimal::ZERO),
            subtotal,
            format!(
                "Subtotal {} meets the minimum guarantee {} - no adjustment",
                subtotal, amount
            ),
        ),
        None => (
            false,
            round_currency(Decimal::ZERO),
            subtotal,
            "Contract has no minimum guarantee - total equals subtotal".to_string(),
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "minimum_guarantee".to_string(),
        rule_name: "Minimum Guarantee".to_string(),
        input: serde_json::json!({
            "subtotal": subtotal.to_string(),
            "minimum_guarantee_amount": guarantee.map(|g| g.to_string())
        }),
        output: serde_json::json!({
            "guarantee_applied": guarantee_applied,
            "guarantee_adjustment": guarantee_adjustment.to_string(),
            "total": total.to_string()
        }),
        reasoning,
    };

    MinimumGuaranteeResult {
        guarantee_applied,
        guarantee_adjustment,
        total,
        audit_step,
    }
}
