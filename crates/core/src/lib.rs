pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;
pub mod view;

use errors::CoreError;
use models::currency::SUPPORTED_CURRENCIES;
use models::rate::{Conversion, RatePoint, RateTable};
use providers::registry::RateProviderRegistry;
use services::history_service::HistoryService;
use services::rate_service::RateService;
use storage::favorites::FavoritesStore;
use storage::kv::{FileStore, KeyValueStore, MemoryStore};
use view::panel::FavoritesPanel;

/// Main entry point for the currency converter core library.
///
/// Constructed once per application session. Owns the provider registry,
/// the rate and history services, and the favorites panel (which in turn
/// owns the persisted collection).
#[must_use]
pub struct CurrencyConverter {
    rates: RateService,
    history: HistoryService,
    favorites: FavoritesPanel,
}

impl CurrencyConverter {
    /// Build a converter over an arbitrary key-value backend.
    ///
    /// `api_key` enables the ExchangeRate-API provider; without one the
    /// keyless Frankfurter fallback is the sole provider.
    pub fn new(kv: Box<dyn KeyValueStore>, api_key: Option<&str>) -> Self {
        let registry = RateProviderRegistry::new_with_defaults(api_key);
        let rates = RateService::new(registry);
        let favorites = FavoritesPanel::new(FavoritesStore::new(kv), rates.clone());
        Self {
            rates,
            history: HistoryService::new(),
            favorites,
        }
    }

    /// Build a converter whose favorites live only for this session.
    pub fn in_memory(api_key: Option<&str>) -> Self {
        Self::new(Box::new(MemoryStore::new()), api_key)
    }

    /// Build a converter whose favorites persist to a JSON file on disk.
    pub fn with_file_store(path: &str, api_key: Option<&str>) -> Result<Self, CoreError> {
        let store = FileStore::open(path)?;
        Ok(Self::new(Box::new(store), api_key))
    }

    // ── Conversion & Rates ──────────────────────────────────────────

    /// Convert an amount between two currencies at the current rate.
    pub async fn convert(
        &self,
        from: &str,
        to: &str,
        amount: f64,
    ) -> Result<Conversion, CoreError> {
        self.rates.convert(from, to, amount).await
    }

    /// Get the full latest rate table for a base currency.
    pub async fn latest_rates(&self, base: &str) -> Result<RateTable, CoreError> {
        self.rates.latest_rates(base).await
    }

    /// Get the daily rate series for a pair over the last `days` days
    /// (clamped to 30), sorted by date ascending.
    pub async fn rate_history(
        &self,
        base: &str,
        target: &str,
        days: u32,
    ) -> Result<Vec<RatePoint>, CoreError> {
        self.history.rate_history(&self.rates, base, target, days).await
    }

    // ── Favorites ───────────────────────────────────────────────────

    /// The favorites panel: rendering, saving, deleting, enrichment.
    #[must_use]
    pub fn favorites(&self) -> &FavoritesPanel {
        &self.favorites
    }

    pub fn favorites_mut(&mut self) -> &mut FavoritesPanel {
        &mut self.favorites
    }

    // ── Metadata ────────────────────────────────────────────────────

    /// Currency codes offered in the converter's pickers.
    #[must_use]
    pub fn supported_currencies(&self) -> &'static [&'static str] {
        &SUPPORTED_CURRENCIES
    }

    /// Names of the configured rate providers, in fallback order.
    #[must_use]
    pub fn provider_names(&self) -> Vec<String> {
        self.rates.provider_names()
    }
}

impl std::fmt::Debug for CurrencyConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrencyConverter")
            .field("providers", &self.rates.provider_names())
            .field("favorites", &self.favorites)
            .finish()
    }
}
