//! Fixed charge calculation.
//!
//! A fixed rule charges the same flat amount every month, whether or not the
//! concessionaire reported any income.

use rust_decimal::Decimal;

use crate::models::AuditStep;

use super::round_currency;

/// The result of evaluating a fixed charge rule.
#[derive(Debug, Clone)]
pub struct FixedChargeResult {
    /// The rounded contribution of the rule.
    pub contribution: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Evaluates a fixed charge rule.
///
/// # Arguments
///
/// * `rule_name` - The rule name, recorded in the audit step
/// * `amount` - The flat monthly amount
/// * `step_number` - The step number for audit trail sequencing
///
/// # Examples
///
/// ```
/// use concession_billing::calculation::calculate_fixed_charge;
/// use rust_decimal::Decimal;
///
/// let result = calculate_fixed_charge("Kiosk rent", Decimal::from(1000), 1);
/// assert_eq!(result.contribution.to_string(), "1000.00");
/// ```
pub fn calculate_fixed_charge(rule_name: &str, amount: Decimal, step_number: u32) -> FixedChargeResult {
    let contribution = round_currency(amount);

    let audit_step = AuditStep {
        step_number,
        rule_id: "fixed_charge".to_string(),
        rule_name: rule_name.to_string(),
        input: serde_json::json!({
            "amount": amount.to_string()
        }),
        output: serde_json::json!({
            "contribution": contribution.to_string()
        }),
        reasoning: format!("Flat monthly charge of {}", contribution),
    };

    FixedChargeResult {
        contribution,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_fixed_charge_contributes_amount() {
        let result = calculate_fixed_charge("Kiosk rent", dec("1000"), 1);
        assert_eq!(result.contribution, dec("1000.00"));
        assert_eq!(result.audit_step.rule_id, "fixed_charge");
        assert_eq!(result.audit_step.rule_name, "Kiosk rent");
        assert_eq!(result.audit_step.output["contribution"], "1000.00");
    }

    #[test]
    fn test_fixed_charge_rounds_sub_cent_amounts() {
        let result = calculate_fixed_charge("Odd rent", dec("333.335"), 4);
        assert_eq!(result.contribution, dec("333.34"));
        assert_eq!(result.audit_step.step_number, 4);
    }
}
