use super::exchange_rate_api::ExchangeRateApiProvider;
use super::frankfurter::FrankfurterProvider;
use super::traits::RateProvider;

/// Registry of all available rate providers, in fallback order.
///
/// The first provider is tried first; if it fails, the next one is used.
/// New providers can be added without modifying existing code.
pub struct RateProviderRegistry {
    providers: Vec<Box<dyn RateProvider>>,
}

impl RateProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry with the default providers pre-configured.
    ///
    /// ExchangeRate-API is registered first when a key is available;
    /// Frankfurter (keyless) is always registered as the fallback.
    pub fn new_with_defaults(api_key: Option<&str>) -> Self {
        let mut registry = Self::new();

        if let Some(key) = api_key {
            registry.register(Box::new(ExchangeRateApiProvider::new(key.to_string())));
        }

        registry.register(Box::new(FrankfurterProvider::new()));

        registry
    }

    /// Register a new rate provider at the end of the fallback order.
    pub fn register(&mut self, provider: Box<dyn RateProvider>) {
        self.providers.push(provider);
    }

    /// All providers in fallback order.
    pub fn providers(&self) -> &[Box<dyn RateProvider>] {
        &self.providers
    }

    /// Names of the registered providers, in fallback order.
    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for RateProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
