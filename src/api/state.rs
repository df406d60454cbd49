//! Application state for the concession billing API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::store::{
    InMemoryIncomeReportStore, InMemoryPaymentStore, IncomeReportStore, PaymentStore,
};

/// Shared application state.
///
/// Contains the loaded contract configuration and the stores for income
/// reports and computed payments.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    income_reports: Arc<dyn IncomeReportStore>,
    payments: Arc<dyn PaymentStore>,
}

impl AppState {
    /// Creates application state backed by in-memory stores.
    pub fn new(config: ConfigLoader) -> Self {
        Self::with_stores(
            config,
            Arc::new(InMemoryIncomeReportStore::new()),
            Arc::new(InMemoryPaymentStore::new()),
        )
    }

    /// Creates application state with the given stores.
    pub fn with_stores(
        config: ConfigLoader,
        income_reports: Arc<dyn IncomeReportStore>,
        payments: Arc<dyn PaymentStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            income_reports,
            payments,
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the income report store.
    pub fn income_reports(&self) -> &dyn IncomeReportStore {
        self.income_reports.as_ref()
    }

    /// Returns the payment store.
    pub fn payments(&self) -> &dyn PaymentStore {
        self.payments.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        // Verify AppState can be cloned (required for axum state)
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_app_state_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AppState>();
    }
}
