//! Billing period model.
//!
//! Concession payments are computed once per calendar month. This module
//! contains the [`BillingPeriod`] type identifying that month.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{BillingError, BillingResult};

/// A calendar month for which a payment is computed.
///
/// # Example
///
/// ```
/// use concession_billing::models::BillingPeriod;
/// use chrono::NaiveDate;
///
/// let period = BillingPeriod::new(2, 2024).unwrap();
/// assert_eq!(period.first_day(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
/// assert_eq!(period.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBillingPeriod")]
pub struct BillingPeriod {
    /// The year of the period. Declared first so the derived ordering is chronological.
    pub year: i32,
    /// The month of the period (1-12).
    pub month: u32,
}

/// Unchecked wire form, validated through [`BillingPeriod::new`].
#[derive(Deserialize)]
struct RawBillingPeriod {
    year: i32,
    month: u32,
}

impl TryFrom<RawBillingPeriod> for BillingPeriod {
    type Error = BillingError;

    fn try_from(raw: RawBillingPeriod) -> BillingResult<Self> {
        Self::new(raw.month, raw.year)
    }
}

impl BillingPeriod {
    /// Creates a billing period, rejecting months outside 1-12.
    pub fn new(month: u32, year: i32) -> BillingResult<Self> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(BillingError::InvalidPeriod { month, year });
        }
        Ok(Self { year, month })
    }

    /// Returns the first day of the period.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Returns the last day of the period.
    pub fn last_day(&self) -> NaiveDate {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    /// Checks if the window `[start, end]` overlaps this period.
    ///
    /// Missing bounds are treated as open-ended.
    pub fn overlaps(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
        let starts_in_time = start.is_none_or(|s| s <= self.last_day());
        let still_valid = end.is_none_or(|e| e >= self.first_day());
        starts_in_time && still_valid
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
