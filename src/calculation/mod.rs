//! Calculation logic for the concession billing engine.
//!
//! This module contains one calculation per charge kind (fixed, percentage of
//! income, per unit sold, per square metre), the minimum guarantee floor,
//! currency rounding, rule applicability for a billing period, and the
//! evaluator that combines them into a monthly payment.

mod evaluator;
mod fixed_charge;
mod minimum_guarantee;
mod per_area_charge;
mod per_unit_charge;
mod percentage_charge;
mod rounding;
mod rule_window;

pub use evaluator::evaluate_payment;
pub use fixed_charge::{FixedChargeResult, calculate_fixed_charge};
pub use minimum_guarantee::{MinimumGuaranteeResult, apply_minimum_guarantee};
pub use per_area_charge::{PerAreaChargeResult, calculate_per_area_charge};
pub use per_unit_charge::{
    PerUnitChargeResult, UNIT_TYPE_NOT_REPORTED_WARNING, calculate_per_unit_charge,
};
pub use percentage_charge::{
    NO_INCOME_REPORT_WARNING, PercentageChargeResult, calculate_percentage_charge,
};
pub use rounding::{CURRENCY_DECIMAL_PLACES, round_currency};
pub use rule_window::select_applicable_rules;
