use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Result of converting a concrete amount between two currencies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    /// Source currency code.
    pub base: String,
    /// Target currency code.
    pub target: String,
    /// The amount that was converted.
    pub amount: f64,
    /// 1-unit exchange rate used for the conversion.
    pub conversion_rate: f64,
    /// `amount * conversion_rate`.
    pub conversion_result: f64,
    /// When the conversion was fetched (client clock, not API-provided).
    pub timestamp: DateTime<Utc>,
}

/// Full rate table for one base currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub base: String,
    /// Target currency code → 1-unit rate.
    pub rates: HashMap<String, f64>,
    pub timestamp: DateTime<Utc>,
}

impl RateTable {
    /// Look up the rate for a target currency (exact uppercase code).
    #[must_use]
    pub fn rate_for(&self, target: &str) -> Option<f64> {
        self.rates.get(target).copied()
    }
}

/// A single point in a historical rate series (date → rate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatePoint {
    pub date: NaiveDate,
    pub rate: f64,
}
