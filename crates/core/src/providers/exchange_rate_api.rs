use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use super::traits::RateProvider;
use crate::errors::CoreError;
use crate::models::rate::{Conversion, RateTable};

const BASE_URL: &str = "https://v6.exchangerate-api.com/v6";

/// ExchangeRate-API (v6) provider.
///
/// - **Requires an API key** (the key is a URL path segment).
/// - **Coverage**: 160+ currencies.
/// - **Endpoints**: `/latest/{base}`, `/pair/{from}/{to}/{amount}`,
///   `/history/{base}/{date}` (served as `/{date}/{base}` on some plans).
///
/// The API reports failures *inside* an HTTP 200 body: `result` is
/// `"error"` and `error-type` names the cause. Every response is checked
/// for that embedded error before its payload is trusted.
pub struct ExchangeRateApiProvider {
    client: Client,
    api_key: String,
}

impl ExchangeRateApiProvider {
    pub fn new(api_key: String) -> Self {
        let builder = Client::builder().timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            api_key,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{BASE_URL}/{}/{path}", self.api_key)
    }

    /// Reject responses that carry an embedded error payload despite a
    /// successful HTTP status.
    fn check_success(resp: &ApiEnvelope) -> Result<(), CoreError> {
        if resp.result.as_deref() == Some("success") {
            return Ok(());
        }
        Err(CoreError::Api {
            provider: "ExchangeRate-API".into(),
            message: resp
                .error_type
                .clone()
                .unwrap_or_else(|| "unknown-error".into()),
        })
    }
}

// ── ExchangeRate-API response types ─────────────────────────────────

#[derive(Deserialize)]
struct ApiEnvelope {
    result: Option<String>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    conversion_rates: Option<HashMap<String, f64>>,
    conversion_rate: Option<f64>,
    conversion_result: Option<f64>,
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    fn name(&self) -> &str {
        "ExchangeRate-API"
    }

    async fn latest_rates(&self, base: &str) -> Result<RateTable, CoreError> {
        let base = base.to_uppercase();
        let url = self.url(&format!("latest/{base}"));

        let resp: ApiEnvelope = self
            .client
            .get(&url)
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "ExchangeRate-API".into(),
                message: format!("Failed to parse latest rates for {base}: {e}"),
            })?;

        Self::check_success(&resp)?;

        let rates = resp.conversion_rates.ok_or_else(|| CoreError::Api {
            provider: "ExchangeRate-API".into(),
            message: format!("Missing conversion_rates for {base}"),
        })?;

        Ok(RateTable {
            base,
            rates,
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

        // Same currency → rate is 1.0, no request needed
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

        let url = self.url(&format!("pair/{base}/{target}/{amount}"));

        let resp: ApiEnvelope = self
            .client
            .get(&url)
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "ExchangeRate-API".into(),
                message: format!("Failed to parse conversion for {base}/{target}: {e}"),
            })?;

        Self::check_success(&resp)?;

        let rate = resp.conversion_rate.ok_or_else(|| CoreError::RateNotAvailable {
            base: base.clone(),
            target: target.clone(),
        })?;

        Ok(Conversion {
            conversion_result: resp.conversion_result.unwrap_or(amount * rate),
            base,
            target,
            amount,
            conversion_rate: rate,
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
        let url = self.url(&format!("{date_str}/{base}"));

        let resp: ApiEnvelope = self
            .client
            .get(&url)
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "ExchangeRate-API".into(),
                message: format!("Failed to parse historical rates for {base} on {date}: {e}"),
            })?;

        Self::check_success(&resp)?;

        resp.conversion_rates.ok_or_else(|| CoreError::Api {
            provider: "ExchangeRate-API".into(),
            message: format!("Missing conversion_rates for {base} on {date}"),
        })
    }
}
