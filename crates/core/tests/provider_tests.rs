// ═══════════════════════════════════════════════════════════════════
// Provider Tests — registry composition, same-currency short-circuits
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;

use currency_converter_core::errors::CoreError;
use currency_converter_core::models::rate::{Conversion, RateTable};
use currency_converter_core::providers::exchange_rate_api::ExchangeRateApiProvider;
use currency_converter_core::providers::frankfurter::FrankfurterProvider;
use currency_converter_core::providers::registry::RateProviderRegistry;
use currency_converter_core::providers::traits::RateProvider;

// ═══════════════════════════════════════════════════════════════════
// Test Helpers — Mock Provider
// ═══════════════════════════════════════════════════════════════════

struct MockProvider {
    name: String,
}

impl MockProvider {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[async_trait]
impl RateProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn latest_rates(&self, base: &str) -> Result<RateTable, CoreError> {
        Ok(RateTable {
            base: base.to_string(),
            rates: HashMap::new(),
            timestamp: chrono::Utc::now(),
        })
    }

    async fn convert(&self, from: &str, to: &str, amount: f64) -> Result<Conversion, CoreError> {
        Ok(Conversion {
            base: from.to_string(),
            target: to.to_string(),
            amount,
            conversion_rate: 1.0,
            conversion_result: amount,
            timestamp: chrono::Utc::now(),
        })
    }

    async fn historical_rates(
        &self,
        _base: &str,
        _date: NaiveDate,
    ) -> Result<HashMap<String, f64>, CoreError> {
        Ok(HashMap::new())
    }
}

// ═══════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════

mod registry {
    use super::*;

    #[test]
    fn new_registry_is_empty() {
        let registry = RateProviderRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.provider_names().is_empty());
    }

    #[test]
    fn defaults_without_key_use_frankfurter_only() {
        let registry = RateProviderRegistry::new_with_defaults(None);
        assert_eq!(registry.provider_names(), ["Frankfurter"]);
    }

    #[test]
    fn defaults_with_key_put_exchange_rate_api_first() {
        let registry = RateProviderRegistry::new_with_defaults(Some("test-key"));
        assert_eq!(
            registry.provider_names(),
            ["ExchangeRate-API", "Frankfurter"]
        );
    }

    #[test]
    fn register_appends_in_fallback_order() {
        let mut registry = RateProviderRegistry::new();
        registry.register(Box::new(MockProvider::new("first")));
        registry.register(Box::new(MockProvider::new("second")));
        assert_eq!(registry.provider_names(), ["first", "second"]);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Same-currency conversions never hit the network
// ═══════════════════════════════════════════════════════════════════

mod same_currency {
    use super::*;

    #[tokio::test]
    async fn exchange_rate_api_short_circuits() {
        // An obviously invalid key: if the provider tried the network the
        // call would fail, so success proves the short-circuit.
        let provider = ExchangeRateApiProvider::new("invalid-key".to_string());
        let c = provider.convert("usd", "USD", 5.0).await.unwrap();
        assert_eq!(c.conversion_rate, 1.0);
        assert_eq!(c.conversion_result, 5.0);
        assert_eq!(c.base, "USD");
        assert_eq!(c.target, "USD");
    }

    #[tokio::test]
    async fn frankfurter_short_circuits() {
        let provider = FrankfurterProvider::new();
        let c = provider.convert("eur", "EUR", 123.45).await.unwrap();
        assert_eq!(c.conversion_rate, 1.0);
        assert_eq!(c.conversion_result, 123.45);
    }

    #[test]
    fn provider_names() {
        assert_eq!(
            ExchangeRateApiProvider::new("k".to_string()).name(),
            "ExchangeRate-API"
        );
        assert_eq!(FrankfurterProvider::new().name(), "Frankfurter");
    }
}
