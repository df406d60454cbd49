//! Rule applicability for a billing period.
//!
//! A charge rule is applied to a month only while it is active and its
//! validity window overlaps that month.

use crate::models::{AuditStep, BillingPeriod, ChargeRule};

/// Returns the rules that apply to the period, preserving their order.
///
/// # Examples
///
/// ```
/// use concession_billing::calculation::select_applicable_rules;
/// use concession_billing::models::{BillingPeriod, Charge, ChargeRule};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let expired = ChargeRule {
///     id: 1,
///     name: "Old rent".to_string(),
///     is_active: true,
///     start_date: None,
///     end_date: NaiveDate::from_ymd_opt(2024, 12, 31),
///     charge: Charge::Fixed { amount: Decimal::from(800) },
/// };
/// let current = ChargeRule {
///     id: 2,
///     name: "Rent".to_string(),
///     is_active: true,
///     start_date: NaiveDate::from_ymd_opt(2025, 1, 1),
///     end_date: None,
///     charge: Charge::Fixed { amount: Decimal::from(900) },
/// };
///
/// let period = BillingPeriod::new(3, 2025).unwrap();
/// let rules = [expired, current];
/// let applicable = select_applicable_rules(&rules, &period);
/// assert_eq!(applicable.len(), 1);
/// assert_eq!(applicable[0].id, 2);
/// ```
pub fn select_applicable_rules(rules: &[ChargeRule], period: &BillingPeriod) -> Vec<ChargeRule> {
    rules
        .iter()
        .filter(|rule| rule.applies_to(period))
        .cloned()
        .collect()
}

/// Builds the audit step recording that a rule was not applied.
pub(crate) fn skipped_rule_step(
    rule: &ChargeRule,
    period: &BillingPeriod,
    reason: &str,
    step_number: u32,
) -> AuditStep {
    AuditStep {
        step_number,
        rule_id: "rule_skipped".to_string(),
        rule_name: rule.name.clone(),
        input: serde_json::json!({
            "rule_id": rule.id,
            "kind": rule.kind(),
            "is_active": rule.is_active,
            "start_date": rule.start_date.map(|d| d.to_string()),
            "end_date": rule.end_date.map(|d| d.to_string()),
            "period": period.to_string()
        }),
        output: serde_json::json!({
            "applied": false
        }),
        reasoning: reason.to_string(),
    }
}
