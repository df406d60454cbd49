//! Error types for the concession billing engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the evaluator, configuration loader and stores can report.

use thiserror::Error;

/// The main error type for the concession billing engine.
///
/// # Example
///
/// ```
/// use concession_billing::error::BillingError;
///
/// let error = BillingError::ContractNotFound { contract_id: 42 };
/// assert_eq!(error.to_string(), "Contract not found: 42");
/// ```
#[derive(Debug, Error)]
pub enum BillingError {
    /// Configuration file or directory was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Two contract files declared the same contract id.
    #[error("Contract {contract_id} is defined more than once (second definition in '{path}')")]
    DuplicateContract {
        /// The duplicated contract id.
        contract_id: u64,
        /// The file holding the second definition.
        path: String,
    },

    /// The contract is unknown to the configuration.
    #[error("Contract not found: {contract_id}")]
    ContractNotFound {
        /// The contract id that was requested.
        contract_id: u64,
    },

    /// The payment configuration of a contract is malformed.
    #[error("Invalid payment configuration for contract {contract_id}: {message}")]
    InvalidConfiguration {
        /// The contract the configuration belongs to.
        contract_id: u64,
        /// A description of what is wrong.
        message: String,
    },

    /// A charge rule is missing a parameter its kind requires, or carries a bad value.
    #[error("Invalid charge rule '{rule}': {message}")]
    InvalidRule {
        /// The rule name (or id when the name is unavailable).
        rule: String,
        /// A description of what is wrong.
        message: String,
    },

    /// A rule's contribution or the payment subtotal exceeds the representable range.
    #[error("Amount for '{rule}' is too large to compute")]
    AmountOverflow {
        /// The rule being evaluated, or "subtotal".
        rule: String,
    },

    /// An income report carries a figure that cannot be billed against.
    #[error("Invalid income report: {message}")]
    InvalidIncomeReport {
        /// A description of what is wrong.
        message: String,
    },

    /// The requested billing period does not exist.
    #[error("Invalid billing period {month}/{year}: month must be between 1 and 12")]
    InvalidPeriod {
        /// The requested month.
        month: u32,
        /// The requested year.
        year: i32,
    },

    /// No income report exists with the given id.
    #[error("Income report not found: {report_id}")]
    IncomeReportNotFound {
        /// The report id that was requested.
        report_id: u64,
    },

    /// The income report belongs to a different contract or period.
    #[error("Income report {report_id} does not belong to contract {contract_id} for {month}/{year}")]
    IncomeReportMismatch {
        /// The report id supplied by the caller.
        report_id: u64,
        /// The contract being billed.
        contract_id: u64,
        /// The billed month.
        month: u32,
        /// The billed year.
        year: i32,
    },

    /// An income report was already submitted for the period.
    #[error("An income report already exists for contract {contract_id} for {month}/{year}")]
    IncomeReportExists {
        /// The contract id.
        contract_id: u64,
        /// The reported month.
        month: u32,
        /// The reported year.
        year: i32,
    },

    /// A monthly payment was already computed for the period.
    #[error("A payment already exists for contract {contract_id} for {month}/{year}")]
    PaymentAlreadyExists {
        /// The contract id.
        contract_id: u64,
        /// The billed month.
        month: u32,
        /// The billed year.
        year: i32,
    },

    /// No monthly payment has been computed for the period.
    #[error("No payment found for contract {contract_id} for {month}/{year}")]
    PaymentNotFound {
        /// The contract id.
        contract_id: u64,
        /// The requested month.
        month: u32,
        /// The requested year.
        year: i32,
    },
}

/// A type alias for Results that return BillingError.
pub type BillingResult<T> = Result<T, BillingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = BillingError::ConfigNotFound {
            path: "/missing/billing.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/billing.yaml"
        );
    }

    #[test]
    fn test_invalid_configuration_displays_contract_and_message() {
        let error = BillingError::InvalidConfiguration {
            contract_id: 7,
            message: "minimum guarantee amount is missing".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid payment configuration for contract 7: minimum guarantee amount is missing"
        );
    }

    #[test]
    fn test_invalid_rule_displays_rule_and_message() {
        let error = BillingError::InvalidRule {
            rule: "Parking spaces".to_string(),
            message: "per-unit rule requires a unit type".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid charge rule 'Parking spaces': per-unit rule requires a unit type"
        );
    }

    #[test]
    fn test_invalid_period_displays_month_and_year() {
        let error = BillingError::InvalidPeriod {
            month: 13,
            year: 2025,
        };
        assert_eq!(
            error.to_string(),
            "Invalid billing period 13/2025: month must be between 1 and 12"
        );
    }

    #[test]
    fn test_payment_already_exists_displays_period() {
        let error = BillingError::PaymentAlreadyExists {
            contract_id: 101,
            month: 3,
            year: 2025,
        };
        assert_eq!(
            error.to_string(),
            "A payment already exists for contract 101 for 3/2025"
        );
    }

    #[test]
    fn test_amount_overflow_displays_rule() {
        let error = BillingError::AmountOverflow {
            rule: "Share of sales".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Amount for 'Share of sales' is too large to compute"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<BillingError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_not_found() -> BillingResult<()> {
            Err(BillingError::ContractNotFound { contract_id: 1 })
        }

        fn propagates_error() -> BillingResult<()> {
            returns_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
