//! Core data models for the concession billing engine.
//!
//! This module contains all the domain models used throughout the engine.

mod billing_period;
mod charge_rule;
mod income_report;
mod monthly_payment;
mod payment_config;

pub use billing_period::BillingPeriod;
pub use charge_rule::{Charge, ChargeKind, ChargeRule, ChargeRuleRecord};
pub use income_report::{IncomeReport, validate_declared_figures};
pub use monthly_payment::{
    AuditStep, AuditTrace, AuditWarning, BreakdownLine, CalculationInputs, IncomeSnapshot,
    MonthlyPayment, PaymentRecord, PaymentStatus,
};
pub use payment_config::{IncomeBasis, PaymentConfiguration};
