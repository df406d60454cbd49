//! Charge rule models.
//!
//! A charge rule is one clause of a contract's payment terms. Rules are kept in
//! storage as loosely typed [`ChargeRuleRecord`] rows and converted into the
//! typed [`ChargeRule`] before evaluation, so every kind carries exactly the
//! parameters it needs.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{BillingError, BillingResult};

use super::BillingPeriod;

/// The kind of a charge rule, without its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeKind {
    /// A flat monthly amount.
    Fixed,
    /// A percentage of declared income.
    Percentage,
    /// A rate per unit sold of a given type.
    PerUnit,
    /// A rate per square metre of occupied area.
    PerArea,
}

impl ChargeKind {
    /// Returns the identifier used in stored rule rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChargeKind::Fixed => "fixed",
            ChargeKind::Percentage => "percentage",
            ChargeKind::PerUnit => "per_unit",
            ChargeKind::PerArea => "per_area",
        }
    }
}

impl fmt::Display for ChargeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The parameters of a charge rule, by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Charge {
    /// A flat monthly amount.
    Fixed {
        /// The amount charged every month.
        amount: Decimal,
    },
    /// A percentage of declared income, stored in `[0, 100]`.
    Percentage {
        /// The percentage applied to the income figure.
        percentage: Decimal,
    },
    /// A rate per unit sold.
    PerUnit {
        /// The unit type looked up in the income report (e.g. "parking").
        unit_type: String,
        /// The amount charged per unit.
        per_unit_rate: Decimal,
    },
    /// A rate per square metre.
    PerArea {
        /// The occupied area in square metres.
        area_m2: Decimal,
        /// The amount charged per square metre.
        per_m2_rate: Decimal,
    },
}

impl Charge {
    /// Returns the kind of this charge.
    pub fn kind(&self) -> ChargeKind {
        match self {
            Charge::Fixed { .. } => ChargeKind::Fixed,
            Charge::Percentage { .. } => ChargeKind::Percentage,
            Charge::PerUnit { .. } => ChargeKind::PerUnit,
            Charge::PerArea { .. } => ChargeKind::PerArea,
        }
    }
}

/// A typed charge rule ready for evaluation.
///
/// # Example
///
/// ```
/// use concession_billing::models::{Charge, ChargeKind, ChargeRule};
/// use rust_decimal::Decimal;
///
/// let rule = ChargeRule {
///     id: 1,
///     name: "Kiosk rent".to_string(),
///     is_active: true,
///     start_date: None,
///     end_date: None,
///     charge: Charge::Fixed { amount: Decimal::from(1000) },
/// };
///
/// assert_eq!(rule.kind(), ChargeKind::Fixed);
/// assert!(rule.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeRule {
    /// Unique identifier of the rule.
    pub id: u64,
    /// Human-readable name shown in payment breakdowns.
    pub name: String,
    /// Whether the rule is currently in force.
    pub is_active: bool,
    /// First day the rule applies, if bounded.
    pub start_date: Option<NaiveDate>,
    /// Last day the rule applies, if bounded.
    pub end_date: Option<NaiveDate>,
    /// The kind-specific parameters.
    pub charge: Charge,
}

impl ChargeRule {
    /// Returns the kind of this rule.
    pub fn kind(&self) -> ChargeKind {
        self.charge.kind()
    }

    /// Returns true if the rule is active and its validity window overlaps the period.
    pub fn applies_to(&self, period: &BillingPeriod) -> bool {
        self.is_active && period.overlaps(self.start_date, self.end_date)
    }

    /// Checks the rule's parameters.
    ///
    /// Fails with `InvalidRule` when a per-unit rule has a blank unit type,
    /// a per-area rule has no positive area, a percentage falls outside
    /// `[0, 100]`, any amount or rate is negative, or the validity window
    /// ends before it starts.
    pub fn validate(&self) -> BillingResult<()> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(self.invalid(format!(
                    "validity window ends ({}) before it starts ({})",
                    end, start
                )));
            }
        }

        match &self.charge {
            Charge::Fixed { amount } => {
                if *amount < Decimal::ZERO {
                    return Err(self.invalid(format!("fixed amount {} is negative", amount)));
                }
            }
            Charge::Percentage { percentage } => {
                if *percentage < Decimal::ZERO || *percentage > Decimal::ONE_HUNDRED {
                    return Err(self.invalid(format!(
                        "percentage {} must be between 0 and 100",
                        percentage
                    )));
                }
            }
            Charge::PerUnit {
                unit_type,
                per_unit_rate,
            } => {
                if unit_type.trim().is_empty() {
                    return Err(self.invalid("per-unit rule requires a unit type"));
                }
                if *per_unit_rate < Decimal::ZERO {
                    return Err(self.invalid(format!("per-unit rate {} is negative", per_unit_rate)));
                }
            }
            Charge::PerArea {
                area_m2,
                per_m2_rate,
            } => {
                if *area_m2 <= Decimal::ZERO {
                    return Err(self.invalid("per-area rule requires a positive area"));
                }
                if *per_m2_rate < Decimal::ZERO {
                    return Err(self.invalid(format!("per-m2 rate {} is negative", per_m2_rate)));
                }
            }
        }

        Ok(())
    }

    fn invalid(&self, message: impl Into<String>) -> BillingError {
        BillingError::InvalidRule {
            rule: self.name.clone(),
            message: message.into(),
        }
    }
}

/// A charge rule as stored in contract files.
///
/// Every kind-specific parameter is optional here; converting into a
/// [`ChargeRule`] checks that the parameters the kind needs are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeRuleRecord {
    /// Unique identifier of the rule.
    pub id: u64,
    /// Human-readable name.
    pub name: String,
    /// One of `fixed`, `percentage`, `per_unit`, `per_area` (alias `per_m2`).
    pub charge_type: String,
    /// Flat amount for fixed rules.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// Percentage for percentage rules.
    #[serde(default)]
    pub percentage: Option<Decimal>,
    /// Unit type for per-unit rules.
    #[serde(default)]
    pub unit_type: Option<String>,
    /// Rate per unit for per-unit rules.
    #[serde(default)]
    pub per_unit_rate: Option<Decimal>,
    /// Area for per-area rules.
    #[serde(default)]
    pub area_m2: Option<Decimal>,
    /// Rate per square metre for per-area rules.
    #[serde(default)]
    pub per_m2_rate: Option<Decimal>,
    /// Whether the rule is in force.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// First day the rule applies.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Last day the rule applies.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl ChargeRuleRecord {
    /// Returns true if the record is active and its validity window overlaps the period.
    pub fn applies_to(&self, period: &BillingPeriod) -> bool {
        self.is_active && period.overlaps(self.start_date, self.end_date)
    }
}

fn default_active() -> bool {
    true
}

fn require<T>(value: Option<T>, rule: &str, message: &str) -> BillingResult<T> {
    value.ok_or_else(|| BillingError::InvalidRule {
        rule: rule.to_string(),
        message: message.to_string(),
    })
}

impl TryFrom<ChargeRuleRecord> for ChargeRule {
    type Error = BillingError;

    fn try_from(record: ChargeRuleRecord) -> BillingResult<Self> {
        let name = record.name;
        let charge = match record.charge_type.trim().to_lowercase().as_str() {
            "fixed" => Charge::Fixed {
                amount: require(record.amount, &name, "fixed rule requires an amount")?,
            },
            "percentage" => Charge::Percentage {
                percentage: require(
                    record.percentage,
                    &name,
                    "percentage rule requires a percentage",
                )?,
            },
            "per_unit" => Charge::PerUnit {
                unit_type: require(record.unit_type, &name, "per-unit rule requires a unit type")?,
                per_unit_rate: require(
                    record.per_unit_rate,
                    &name,
                    "per-unit rule requires a per-unit rate",
                )?,
            },
            "per_area" | "per_m2" => Charge::PerArea {
                area_m2: require(record.area_m2, &name, "per-area rule requires an area")?,
                per_m2_rate: require(
                    record.per_m2_rate,
                    &name,
                    "per-area rule requires a per-m2 rate",
                )?,
            },
            other => {
                return Err(BillingError::InvalidRule {
                    rule: name,
                    message: format!("unknown charge type '{}'", other),
                });
            }
        };

        Ok(ChargeRule {
            id: record.id,
            name,
            is_active: record.is_active,
            start_date: record.start_date,
            end_date: record.end_date,
            charge,
        })
    }
}
