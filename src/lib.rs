//! Monthly payment engine for park concession contracts
//!
//! This crate computes what a concessionaire owes the parks authority for a
//! month. A contract combines fixed, percentage, per-unit and per-area charge
//! rules with an optional minimum guarantee; the evaluator applies the rules
//! in force for the month to the concessionaire's income report and records
//! every step it takes in an audit trace.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
