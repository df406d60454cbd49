//! Payment configuration model.
//!
//! A [`PaymentConfiguration`] belongs to one concession contract and records
//! which charge kinds the contract uses and whether a minimum guarantee applies.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{BillingError, BillingResult};

use super::ChargeKind;

/// Which declared income figure percentage rules are applied to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeBasis {
    /// Gross income as declared by the concessionaire.
    #[default]
    Gross,
    /// Net income as declared by the concessionaire.
    Net,
}

/// The payment terms of a concession contract.
///
/// # Example
///
/// ```
/// use concession_billing::models::{ChargeKind, IncomeBasis, PaymentConfiguration};
/// use rust_decimal::Decimal;
///
/// let config = PaymentConfiguration {
///     contract_id: 101,
///     has_fixed_charge: true,
///     has_percentage_charge: true,
///     has_per_unit_charge: false,
///     has_per_area_charge: false,
///     has_minimum_guarantee: true,
///     minimum_guarantee_amount: Some(Decimal::from(1000)),
///     income_basis: IncomeBasis::Gross,
/// };
///
/// assert!(config.validate().is_ok());
/// assert!(config.is_kind_enabled(ChargeKind::Fixed));
/// assert!(!config.is_kind_enabled(ChargeKind::PerArea));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentConfiguration {
    /// The contract this configuration belongs to.
    ///
    /// Contract files omit it; the loader fills it from the enclosing contract.
    #[serde(default)]
    pub contract_id: u64,
    /// Whether fixed charges are part of the contract terms.
    #[serde(default)]
    pub has_fixed_charge: bool,
    /// Whether percentage-of-income charges are part of the contract terms.
    #[serde(default)]
    pub has_percentage_charge: bool,
    /// Whether per-unit charges are part of the contract terms.
    #[serde(default)]
    pub has_per_unit_charge: bool,
    /// Whether per-area charges are part of the contract terms.
    #[serde(default)]
    pub has_per_area_charge: bool,
    /// Whether the contract guarantees a minimum monthly payment.
    #[serde(default)]
    pub has_minimum_guarantee: bool,
    /// The guaranteed minimum monthly payment.
    #[serde(default)]
    pub minimum_guarantee_amount: Option<Decimal>,
    /// Income figure used by percentage rules.
    #[serde(default)]
    pub income_basis: IncomeBasis,
}

impl PaymentConfiguration {
    /// Returns true if the configuration enables rules of the given kind.
    pub fn is_kind_enabled(&self, kind: ChargeKind) -> bool {
        match kind {
            ChargeKind::Fixed => self.has_fixed_charge,
            ChargeKind::Percentage => self.has_percentage_charge,
            ChargeKind::PerUnit => self.has_per_unit_charge,
            ChargeKind::PerArea => self.has_per_area_charge,
        }
    }

    /// Checks the minimum guarantee setup.
    ///
    /// Returns the guarantee amount when one applies, `None` otherwise.
    /// Fails with `InvalidConfiguration` if a guarantee is configured
    /// without an amount or with a negative amount.
    pub fn validate(&self) -> BillingResult<Option<Decimal>> {
        if !self.has_minimum_guarantee {
            return Ok(None);
        }

        match self.minimum_guarantee_amount {
            None => Err(BillingError::InvalidConfiguration {
                contract_id: self.contract_id,
                message: "minimum guarantee is enabled but no amount is set".to_string(),
            }),
            Some(amount) if amount < Decimal::ZERO => Err(BillingError::InvalidConfiguration {
                contract_id: self.contract_id,
                message: format!("minimum guarantee amount {} is negative", amount),
            }),
            Some(amount) => Ok(Some(amount)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(has_guarantee: bool, amount: Option<Decimal>) -> PaymentConfiguration {
        PaymentConfiguration {
            contract_id: 1,
            has_fixed_charge: true,
            has_percentage_charge: false,
            has_per_unit_charge: false,
            has_per_area_charge: false,
            has_minimum_guarantee: has_guarantee,
            minimum_guarantee_amount: amount,
            income_basis: IncomeBasis::Gross,
        }
    }

    #[test]
    fn test_validate_without_guarantee_ignores_amount() {
        let config = config(false, Some(Decimal::from(-5)));
        assert_eq!(config.validate().unwrap(), None);
    }

    #[test]
    fn test_validate_guarantee_without_amount_fails() {
        let result = config(true, None).validate();
        assert!(matches!(
            result,
            Err(BillingError::InvalidConfiguration { contract_id: 1, .. })
        ));
    }

    #[test]
    fn test_validate_negative_guarantee_fails() {
        let result = config(true, Some(Decimal::from(-1))).validate();
        assert!(matches!(result, Err(BillingError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_validate_zero_guarantee_is_allowed() {
        let result = config(true, Some(Decimal::ZERO)).validate();
        assert_eq!(result.unwrap(), Some(Decimal::ZERO));
    }

    #[test]
    fn test_deserialize_defaults() {
        let yaml = "has_fixed_charge: true\n";
        let config: PaymentConfiguration = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.contract_id, 0);
        assert!(config.has_fixed_charge);
        assert!(!config.has_minimum_guarantee);
        assert_eq!(config.income_basis, IncomeBasis::Gross);
    }

    #[test]
    fn test_income_basis_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&IncomeBasis::Net).unwrap(), "\"net\"");
    }
}
