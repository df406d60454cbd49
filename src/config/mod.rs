//! Configuration loading and management for the concession billing engine.
//!
//! This module loads billing metadata and concession contracts, with their
//! payment configurations and charge rules, from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use concession_billing::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/parks").unwrap();
//! println!("Loaded contracts for: {}", config.metadata().authority);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{BillingConfig, BillingMetadata, ContractConfig};
