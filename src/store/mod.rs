//! Persistence for income reports and computed payments.
//!
//! The evaluator itself never stores anything. These ports describe what the
//! API needs from storage, and the in-memory adapters implement them with the
//! uniqueness rules the billing process depends on: one income report and one
//! payment per contract and month.

mod in_memory;
mod ports;

pub use in_memory::{InMemoryIncomeReportStore, InMemoryPaymentStore};
pub use ports::{IncomeReportStore, NewIncomeReport, PaymentStore};
