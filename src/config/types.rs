//! Configuration types for concession billing.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::models::{ChargeRuleRecord, PaymentConfiguration};

/// Metadata about the billing service.
///
/// Read from `billing.yaml` at the root of the configuration directory.
#[derive(Debug, Clone, Deserialize)]
pub struct BillingMetadata {
    /// The name of the administering body (e.g., "Municipal Parks Department").
    pub authority: String,
    /// The ISO 4217 currency code amounts are expressed in.
    pub currency: String,
    /// The version or effective date of the contract set.
    pub version: String,
}

/// A concession contract and its payment terms.
///
/// Each file in the `contracts/` directory holds one contract.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractConfig {
    /// The contract id.
    pub contract_id: u64,
    /// The human-readable name of the concession.
    pub name: String,
    /// The holder of the concession.
    pub concessionaire: String,
    /// The park the concession operates in.
    pub park: String,
    /// The payment terms.
    pub payment_configuration: PaymentConfiguration,
    /// The charge rules, including inactive and superseded ones.
    #[serde(default)]
    pub charge_rules: Vec<ChargeRuleRecord>,
}

/// The complete billing configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct BillingConfig {
    /// Service metadata.
    metadata: BillingMetadata,
    /// Contracts by id.
    contracts: BTreeMap<u64, ContractConfig>,
}

impl BillingConfig {
    /// Creates a new BillingConfig from its component parts.
    ///
    /// Each contract's payment configuration is stamped with its contract id.
    pub fn new(metadata: BillingMetadata, contracts: Vec<ContractConfig>) -> Self {
        let contracts = contracts
            .into_iter()
            .map(|mut contract| {
                contract.payment_configuration.contract_id = contract.contract_id;
                (contract.contract_id, contract)
            })
            .collect();
        Self {
            metadata,
            contracts,
        }
    }

    /// Returns the service metadata.
    pub fn metadata(&self) -> &BillingMetadata {
        &self.metadata
    }

    /// Returns all contracts, ordered by id.
    pub fn contracts(&self) -> &BTreeMap<u64, ContractConfig> {
        &self.contracts
    }
}
