use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use super::traits::RateProvider;
use crate::errors::CoreError;
use crate::models::rate::{Conversion, RateTable};

const BASE_URL: &str = "https://api.frankfurter.dev/v1";

/// Frankfurter API provider.
///
/// - **Free**: No API key, no rate limits, open-source.
/// - **Source**: European Central Bank (ECB) data.
/// - **Coverage**: ~30+ currencies (EUR, USD, GBP, JPY, etc.)
/// - **Endpoints**: `/latest`, `/{date}`
///
/// Used as the fallback when no ExchangeRate-API key is configured.
/// Frankfurter has no pair-conversion endpoint, so `convert` is computed
/// client-side from the fetched 1-unit rate.
pub struct FrankfurterProvider {
    client: Client,
}

impl FrankfurterProvider {
    pub fn new() -> Self {
        let builder = Client::builder().timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
        }
    }
}

impl Default for FrankfurterProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── Frankfurter API response types ──────────────────────────────────

#[derive(Deserialize)]
struct RatesResponse {
    rates: HashMap<String, f64>,
}

#[async_trait]
impl RateProvider for FrankfurterProvider {
    fn name(&self) -> &str {
        "Frankfurter"
    }

    async fn latest_rates(&self, base: &str) -> Result<RateTable, CoreError> {
        let base = base.to_uppercase();
        let url = format!("{BASE_URL}/latest?base={base}");

        let resp: RatesResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "Frankfurter".into(),
                message: format!("Failed to parse latest rates for {base}: {e}"),
            })?;

        Ok(RateTable {
            base,
            rates: resp.rates,
            timestamp: Utc::now(),
        })
    }

    async fn convert(
        &self,
        from: &str,
        to: &str,
        amount: f64,
    ) -> Result<Conversion, CoreError> {
        let base = from.to_uppercase();
        let target = to.to_uppercase();

        // Same currency → rate is 1.0
        if base == target {
            return Ok(Conversion {
                base,
                target,
                amount,
                conversion_rate: 1.0,
                conversion_result: amount,
                timestamp: Utc::now(),
            });
        }

        let url = format!("{BASE_URL}/latest?base={base}&symbols={target}");

        let resp: RatesResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "Frankfurter".into(),
                message: format!("Failed to parse rate for {base}/{target}: {e}"),
            })?;

        let rate = resp
            .rates
            .get(&target)
            .copied()
            .ok_or_else(|| CoreError::RateNotAvailable {
                base: base.clone(),
                target: target.clone(),
            })?;

        Ok(Conversion {
            base,
            target,
            amount,
            conversion_rate: rate,
            conversion_result: amount * rate,
            timestamp: Utc::now(),
        })
    }

    async fn historical_rates(
        &self,
        base: &str,
        date: NaiveDate,
    ) -> Result<HashMap<String, f64>, CoreError> {
        let base = base.to_uppercase();
        let date_str = date.format("%Y-%m-%d");
        let url = format!("{BASE_URL}/{date_str}?base={base}");

        let resp: RatesResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "Frankfurter".into(),
                message: format!("Failed to parse historical rates for {base} on {date}: {e}"),
            })?;

        Ok(resp.rates)
    }
}
