//! Monthly payment models.
//!
//! This module contains the [`MonthlyPayment`] type produced by the evaluator
//! and its supporting structures: the per-rule breakdown, the snapshot of
//! calculation inputs, and the audit trace. [`PaymentRecord`] wraps a payment
//! once it has been stored.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BillingPeriod, ChargeKind, IncomeBasis};

/// One rule's contribution to a monthly payment.
///
/// # Example
///
/// ```
/// use concession_billing::models::{BreakdownLine, ChargeKind};
/// use rust_decimal::Decimal;
///
/// let line = BreakdownLine {
///     rule_id: 1,
///     rule_name: "Kiosk rent".to_string(),
///     kind: ChargeKind::Fixed,
///     contribution: Decimal::from(1000),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownLine {
    /// The id of the rule.
    pub rule_id: u64,
    /// The name of the rule.
    pub rule_name: String,
    /// The kind of the rule.
    pub kind: ChargeKind,
    /// The rounded amount the rule contributed.
    pub contribution: Decimal,
}

/// The income report figures a payment was computed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeSnapshot {
    /// The id of the income report.
    pub report_id: u64,
    /// Declared gross income.
    pub gross_income: Decimal,
    /// Declared net income.
    pub net_income: Decimal,
    /// Units sold by unit type.
    pub units_sold: BTreeMap<String, Decimal>,
    /// Whether the report had been verified when the payment was computed.
    pub verified: bool,
}

/// A snapshot of everything the evaluator was given, kept for audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationInputs {
    /// Whether a minimum guarantee was configured.
    pub has_minimum_guarantee: bool,
    /// The configured guarantee amount.
    pub minimum_guarantee_amount: Option<Decimal>,
    /// The income figure percentage rules used.
    pub income_basis: IncomeBasis,
    /// The income report, if one was available.
    pub income_report: Option<IncomeSnapshot>,
    /// Ids of every rule handed to the evaluator, in evaluation order.
    pub rule_ids: Vec<u64>,
}

/// A single step in the audit trace recording a calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// Identifier of the calculation that produced the step (e.g. "fixed_charge").
    pub rule_id: String,
    /// Human-readable name of the charge rule or calculation.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings flag situations that are valid but worth a second look, such as
/// a percentage rule evaluated without an income report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

/// The amount owed by a concessionaire for one billing period.
///
/// Produced by [`evaluate_payment`](crate::calculation::evaluate_payment).
/// Contains no timestamps or generated ids, so evaluating the same inputs
/// twice yields identical values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyPayment {
    /// The contract billed.
    pub contract_id: u64,
    /// The billed period.
    pub period: BillingPeriod,
    /// Sum of fixed rule contributions.
    pub fixed_subtotal: Decimal,
    /// Sum of percentage rule contributions.
    pub percentage_subtotal: Decimal,
    /// Sum of per-unit rule contributions.
    pub per_unit_subtotal: Decimal,
    /// Sum of per-area rule contributions.
    pub per_area_subtotal: Decimal,
    /// Sum of the four subtotals, before the minimum guarantee.
    pub subtotal: Decimal,
    /// Whether the minimum guarantee raised the total.
    pub guarantee_applied: bool,
    /// The amount added by the minimum guarantee.
    pub guarantee_adjustment: Decimal,
    /// The amount owed.
    pub total: Decimal,
    /// Contribution of every evaluated rule.
    pub breakdown: Vec<BreakdownLine>,
    /// Snapshot of the calculation inputs.
    pub calculation_inputs: CalculationInputs,
    /// Audit trace of the calculation.
    pub audit_trace: AuditTrace,
}

/// Settlement state of a stored payment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Computed and awaiting settlement.
    #[default]
    Computed,
    /// Settled by the concessionaire.
    Paid,
}

/// A monthly payment as held by a payment store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Unique identifier of the stored payment.
    pub id: Uuid,
    /// When the payment was stored.
    pub created_at: DateTime<Utc>,
    /// Settlement state.
    pub status: PaymentStatus,
    /// Amount paid, set by settlement.
    pub paid_amount: Option<Decimal>,
    /// Date paid, set by settlement.
    pub paid_date: Option<NaiveDate>,
    /// The computed payment.
    #[serde(flatten)]
    pub payment: MonthlyPayment,
}

impl PaymentRecord {
    /// Wraps a freshly computed payment for storage.
    pub fn new(payment: MonthlyPayment) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            status: PaymentStatus::Computed,
            paid_amount: None,
            paid_date: None,
            payment,
        }
    }

    /// Returns the (contract, period) key the record is unique on.
    pub fn key(&self) -> (u64, BillingPeriod) {
        (self.payment.contract_id, self.payment.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment() -> MonthlyPayment {
        MonthlyPayment {
            contract_id: 101,
            period: BillingPeriod::new(3, 2025).unwrap(),
            fixed_subtotal: Decimal::from(1000),
            percentage_subtotal: Decimal::ZERO,
            per_unit_subtotal: Decimal::ZERO,
            per_area_subtotal: Decimal::ZERO,
            subtotal: Decimal::from(1000),
            guarantee_applied: false,
            guarantee_adjustment: Decimal::ZERO,
            total: Decimal::from(1000),
            breakdown: vec![BreakdownLine {
                rule_id: 1,
                rule_name: "Kiosk rent".to_string(),
                kind: ChargeKind::Fixed,
                contribution: Decimal::from(1000),
            }],
            calculation_inputs: CalculationInputs {
                has_minimum_guarantee: false,
                minimum_guarantee_amount: None,
                income_basis: IncomeBasis::Gross,
                income_report: None,
                rule_ids: vec![1],
            },
            audit_trace: AuditTrace::default(),
        }
    }

    #[test]
    fn test_new_record_is_computed_and_unpaid() {
        let record = PaymentRecord::new(payment());
        assert_eq!(record.status, PaymentStatus::Computed);
        assert!(record.paid_amount.is_none());
        assert!(record.paid_date.is_none());
        assert_eq!(record.key(), (101, BillingPeriod::new(3, 2025).unwrap()));
    }

    #[test]
    fn test_record_serializes_payment_fields_flat() {
        let json = serde_json::to_value(PaymentRecord::new(payment())).unwrap();
        assert_eq!(json["status"], "computed");
        assert_eq!(json["contract_id"], 101);
        assert_eq!(json["total"], "1000");
        assert_eq!(json["breakdown"][0]["kind"], "fixed");
        assert_eq!(json["period"]["month"], 3);
    }

    #[test]
    fn test_record_round_trips_through_json() {
        let record = PaymentRecord::new(payment());
        let json = serde_json::to_string(&record).unwrap();
        let parsed: PaymentRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
