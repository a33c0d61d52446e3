use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::CoreError;
use crate::models::currency;
use crate::models::rate::{Conversion, RateTable};
use crate::providers::registry::RateProviderRegistry;

/// Fetches exchange rates from API providers with automatic fallback.
///
/// Tries providers in registration order. If the primary fails (API down,
/// rate limited, invalid key, etc.), automatically falls back to the next
/// provider. Validates that returned rates are finite and non-negative.
///
/// Cheap to clone: the registry is shared behind an `Arc`, so enrichment
/// tasks can each hold their own handle.
#[derive(Clone)]
pub struct RateService {
    registry: Arc<RateProviderRegistry>,
}

impl RateService {
    pub fn new(registry: RateProviderRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Names of the available providers, in fallback order.
    pub fn provider_names(&self) -> Vec<String> {
        self.registry.provider_names()
    }

    /// Convert an amount between two currencies at the current rate.
    pub async fn convert(
        &self,
        from: &str,
        to: &str,
        amount: f64,
    ) -> Result<Conversion, CoreError> {
        let from = currency::normalize_code(from)?;
        let to = currency::normalize_code(to)?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Amount must be positive, got {amount}"
            )));
        }

        if self.registry.is_empty() {
            return Err(CoreError::NoProvider);
        }

        let mut last_error = None;
        for provider in self.registry.providers() {
            match provider.convert(&from, &to, amount).await {
                Ok(conversion) => {
                    if !conversion.conversion_rate.is_finite()
                        || conversion.conversion_rate < 0.0
                    {
                        last_error = Some(CoreError::Api {
                            provider: provider.name().to_string(),
                            message: format!(
                                "Invalid rate returned for {from}/{to}: {} (must be finite and non-negative)",
                                conversion.conversion_rate
                            ),
                        });
                        continue;
                    }
                    return Ok(conversion);
                }
                Err(e) => {
                    tracing::debug!(
                        provider = provider.name(),
                        %from,
                        %to,
                        error = %e,
                        "conversion failed, trying next provider"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(CoreError::NoProvider))
    }

    /// Get the current 1-unit rate for a pair. This is what enrichment
    /// uses to refresh a favorite's display.
    pub async fn pair_rate(&self, from: &str, to: &str) -> Result<f64, CoreError> {
        let conversion = self.convert(from, to, 1.0).await?;
        Ok(conversion.conversion_rate)
    }

    /// Get the full latest rate table for a base currency.
    pub async fn latest_rates(&self, base: &str) -> Result<RateTable, CoreError> {
        let base = currency::normalize_code(base)?;

        if self.registry.is_empty() {
            return Err(CoreError::NoProvider);
        }

        let mut last_error = None;
        for provider in self.registry.providers() {
            match provider.latest_rates(&base).await {
                Ok(table) => return Ok(table),
                Err(e) => {
                    tracing::debug!(
                        provider = provider.name(),
                        %base,
                        error = %e,
                        "latest rates failed, trying next provider"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(CoreError::NoProvider))
    }

    /// Get the 1-unit rates for a base currency as of a specific date.
    pub async fn historical_rates(
        &self,
        base: &str,
        date: NaiveDate,
    ) -> Result<HashMap<String, f64>, CoreError> {
        let base = currency::normalize_code(base)?;

        if self.registry.is_empty() {
            return Err(CoreError::NoProvider);
        }

        let mut last_error = None;
        for provider in self.registry.providers() {
            match provider.historical_rates(&base, date).await {
                Ok(rates) => return Ok(rates),
                Err(e) => {
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(CoreError::NoProvider))
    }
}
