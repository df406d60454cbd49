//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading concession
//! contracts from YAML files.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BillingError, BillingResult};
use crate::models::{BillingPeriod, ChargeRule, PaymentConfiguration};

use super::types::{BillingConfig, BillingMetadata, ContractConfig};

/// Loads and provides access to concession contracts.
///
/// The `ConfigLoader` reads YAML configuration files from a directory
/// and answers the questions the payment evaluator needs: the payment
/// configuration of a contract, and which of its charge rules apply to a
/// billing period.
///
/// # Directory Structure
///
/// ```text
/// config/parks/
/// ├── billing.yaml          # Authority, currency and version
/// └── contracts/
///     ├── 101-lakeside-cafe.yaml
///     └── 102-north-gate-parking.yaml
/// ```
///
/// # Example
///
/// ```no_run
/// use concession_billing::config::ConfigLoader;
/// use concession_billing::models::BillingPeriod;
///
/// let loader = ConfigLoader::load("./config/parks").unwrap();
///
/// let period = BillingPeriod::new(3, 2025).unwrap();
/// let rules = loader.charge_rules(101, &period).unwrap();
/// println!("{} rules apply in {}", rules.len(), period);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: BillingConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/parks")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `billing.yaml` or the `contracts` directory is missing
    /// - The `contracts` directory holds no YAML files
    /// - Any file contains invalid YAML or lacks a required field
    /// - Two files declare the same contract id
    ///
    /// # Example
    ///
    /// ```no_run
    /// use concession_billing::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/parks")?;
    /// # Ok::<(), concession_billing::error::BillingError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> BillingResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<BillingMetadata>(&path.join("billing.yaml"))?;
        let contracts = Self::load_contracts(&path.join("contracts"))?;

        Ok(Self {
            config: BillingConfig::new(metadata, contracts),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> BillingResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| BillingError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| BillingError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads all contract files from the contracts directory.
    fn load_contracts(contracts_dir: &Path) -> BillingResult<Vec<ContractConfig>> {
        let contracts_dir_str = contracts_dir.display().to_string();

        let entries = fs::read_dir(contracts_dir).map_err(|_| BillingError::ConfigNotFound {
            path: contracts_dir_str.clone(),
        })?;

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| BillingError::ConfigNotFound {
                path: contracts_dir_str.clone(),
            })?;
            let path = entry.path();
            if path
                .extension()
                .is_some_and(|ext| ext == "yaml" || ext == "yml")
            {
                paths.push(path);
            }
        }
        paths.sort();

        if paths.is_empty() {
            return Err(BillingError::ConfigNotFound {
                path: format!("{} (no contract files found)", contracts_dir_str),
            });
        }

        let mut seen = HashSet::new();
        let mut contracts = Vec::with_capacity(paths.len());
        for path in paths {
            let contract = Self::load_yaml::<ContractConfig>(&path)?;
            if !seen.insert(contract.contract_id) {
                return Err(BillingError::DuplicateContract {
                    contract_id: contract.contract_id,
                    path: path.display().to_string(),
                });
            }
            contracts.push(contract);
        }

        Ok(contracts)
    }

    /// Returns the underlying billing configuration.
    pub fn config(&self) -> &BillingConfig {
        &self.config
    }

    /// Returns the billing metadata.
    pub fn metadata(&self) -> &BillingMetadata {
        self.config.metadata()
    }

    /// Gets a contract by its id.
    ///
    /// Returns `ContractNotFound` if the contract is unknown.
    pub fn get_contract(&self, contract_id: u64) -> BillingResult<&ContractConfig> {
        self.config
            .contracts()
            .get(&contract_id)
            .ok_or(BillingError::ContractNotFound { contract_id })
    }

    /// Gets the payment configuration of a contract.
    pub fn payment_configuration(&self, contract_id: u64) -> BillingResult<&PaymentConfiguration> {
        self.get_contract(contract_id)
            .map(|contract| &contract.payment_configuration)
    }

    /// Gets the charge rules of a contract that apply to a billing period.
    ///
    /// Only active rules whose validity window overlaps the period are
    /// returned, in file order. Superseded or inactive rules are never
    /// converted, so a malformed historical rule does not block billing.
    ///
    /// # Errors
    ///
    /// - `ContractNotFound` if the contract is unknown
    /// - `InvalidRule` if an applicable rule lacks a parameter its kind needs
    ///
    /// # Example
    ///
    /// ```no_run
    /// use concession_billing::config::ConfigLoader;
    /// use concession_billing::models::BillingPeriod;
    ///
    /// let loader = ConfigLoader::load("./config/parks")?;
    /// let period = BillingPeriod::new(3, 2025)?;
    /// for rule in loader.charge_rules(101, &period)? {
    ///     println!("{} ({})", rule.name, rule.kind());
    /// }
    /// # Ok::<(), concession_billing::error::BillingError>(())
    /// ```
    pub fn charge_rules(
        &self,
        contract_id: u64,
        period: &BillingPeriod,
    ) -> BillingResult<Vec<ChargeRule>> {
        self.get_contract(contract_id)?
            .charge_rules
            .iter()
            .filter(|record| record.applies_to(period))
            .cloned()
            .map(ChargeRule::try_from)
            .collect()
    }
}
