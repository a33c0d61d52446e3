use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;

use crate::errors::CoreError;
use crate::models::rate::{Conversion, RateTable};

/// Trait abstraction for exchange-rate data providers.
///
/// Each rate API (ExchangeRate-API, Frankfurter) implements this trait.
/// If an API stops working or changes, we replace only that one
/// implementation — the rest of the codebase is untouched.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Get the latest 1-unit rates for every currency the provider knows,
    /// relative to `base`.
    async fn latest_rates(&self, base: &str) -> Result<RateTable, CoreError>;

    /// Convert a concrete amount from one currency to another at the
    /// current rate.
    async fn convert(
        &self,
        from: &str,
        to: &str,
        amount: f64,
    ) -> Result<Conversion, CoreError>;

    /// Get the 1-unit rates relative to `base` as of a specific date.
    async fn historical_rates(
        &self,
        base: &str,
        date: NaiveDate,
    ) -> Result<HashMap<String, f64>, CoreError>;
}
