use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of favorites kept in the store. Inserting beyond this
/// evicts the entries with the oldest `date_added` first.
pub const MAX_FAVORITES: usize = 10;

/// A saved currency-pair conversion intent.
///
/// Serde renames keep the legacy camelCase wire format of the persisted
/// `currencyFavorites` value, so collections written by earlier versions
/// of the app remain readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    /// Millisecond creation timestamp; unique within the store.
    /// Stable identity for card reconciliation and deletion.
    pub id: i64,

    /// The base amount the user wants converted (always positive).
    pub amount: f64,

    /// Source currency code (3 uppercase ASCII letters).
    #[serde(rename = "fromCurrency")]
    pub from_currency: String,

    /// Target currency code. May equal `from_currency`; such pairs are
    /// permitted and deduplicated like any other.
    #[serde(rename = "toCurrency")]
    pub to_currency: String,

    /// Creation time. Used only for sort order and eviction, not display.
    #[serde(rename = "dateAdded")]
    pub date_added: DateTime<Utc>,
}

impl FavoriteEntry {
    /// Create a new entry stamped with the current time.
    /// Currency codes are expected to be normalized by the caller.
    pub fn new(amount: f64, from_currency: impl Into<String>, to_currency: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: now.timestamp_millis(),
            amount,
            from_currency: from_currency.into(),
            to_currency: to_currency.into(),
            date_added: now,
        }
    }

    /// The "USD → EUR" label shown on the entry's card.
    #[must_use]
    pub fn pair_label(&self) -> String {
        format!("{} → {}", self.from_currency, self.to_currency)
    }

    /// True if this entry saves the same ordered currency pair as `other`.
    /// Amount is deliberately ignored — the store keys duplicates on the
    /// pair alone.
    #[must_use]
    pub fn same_pair(&self, from: &str, to: &str) -> bool {
        self.from_currency == from && self.to_currency == to
    }
}
