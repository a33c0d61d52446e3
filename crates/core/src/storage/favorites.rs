use crate::errors::CoreError;
use crate::models::currency;
use crate::models::favorite::{FavoriteEntry, MAX_FAVORITES};

use super::kv::KeyValueStore;

/// The single key under which the favorites collection persists.
pub const STORAGE_KEY: &str = "currencyFavorites";

/// Outcome of an `add` attempt. A duplicate save is an expected, reportable
/// outcome — it surfaces as a transient status on the save control, never
/// as an error.
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    /// The entry was stored.
    Added(FavoriteEntry),
    /// An entry with the same ordered (from, to) pair already exists;
    /// nothing was written.
    Duplicate,
}

/// Durable CRUD over the favorites collection, with dedup and capacity
/// enforcement.
///
/// This store is the sole owner of the persisted value: no other component
/// reads or writes [`STORAGE_KEY`]. Every mutation rewrites the full
/// collection in a single `set` call, so the persisted value is always a
/// complete JSON array.
pub struct FavoritesStore {
    kv: Box<dyn KeyValueStore>,
}

impl FavoritesStore {
    pub fn new(kv: Box<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// All saved entries, newest `date_added` first.
    ///
    /// Fails open: a missing or malformed persisted value yields an empty
    /// list, never an error.
    #[must_use]
    pub fn list(&self) -> Vec<FavoriteEntry> {
        let mut entries = self.load();
        // Ties on date_added (saves within the same instant) break by id,
        // which increases strictly in creation order.
        entries.sort_by(|a, b| (b.date_added, b.id).cmp(&(a.date_added, a.id)));
        entries
    }

    /// Number of saved entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.load().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.load().is_empty()
    }

    /// Save a conversion as a favorite.
    ///
    /// Rejects the save as [`AddOutcome::Duplicate`] when the identical
    /// ordered (from, to) pair is already stored, regardless of amount.
    /// On accept, appends the new entry and evicts the oldest entries
    /// (smallest `date_added`) until at most [`MAX_FAVORITES`] remain,
    /// then persists the whole collection in one write.
    pub fn add(
        &mut self,
        amount: f64,
        from_currency: &str,
        to_currency: &str,
    ) -> Result<AddOutcome, CoreError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Amount must be positive, got {amount}"
            )));
        }
        let from = currency::normalize_code(from_currency)?;
        let to = currency::normalize_code(to_currency)?;

        let mut entries = self.load();

        if entries.iter().any(|e| e.same_pair(&from, &to)) {
            tracing::debug!(%from, %to, "favorite already saved, rejecting duplicate");
            return Ok(AddOutcome::Duplicate);
        }

        let mut entry = FavoriteEntry::new(amount, from, to);
        // Two saves within the same millisecond would collide on the
        // timestamp id; probe upward until the id is unique.
        while entries.iter().any(|e| e.id == entry.id) {
            entry.id += 1;
        }

        entries.push(entry.clone());

        if entries.len() > MAX_FAVORITES {
            entries.sort_by(|a, b| (a.date_added, a.id).cmp(&(b.date_added, b.id)));
            let excess = entries.len() - MAX_FAVORITES;
            entries.drain(..excess);
            tracing::debug!(evicted = excess, "favorites over capacity, evicted oldest");
        }

        self.persist(&entries)?;
        tracing::debug!(id = entry.id, pair = %entry.pair_label(), "favorite saved");
        Ok(AddOutcome::Added(entry))
    }

    /// Remove the entry with the given id. Returns `true` if an entry was
    /// removed; removing an unknown id is a silent no-op.
    pub fn remove(&mut self, id: i64) -> Result<bool, CoreError> {
        let mut entries = self.load();
        let before = entries.len();
        entries.retain(|e| e.id != id);

        if entries.len() == before {
            return Ok(false);
        }

        self.persist(&entries)?;
        tracing::debug!(id, "favorite removed");
        Ok(true)
    }

    /// Remove every saved favorite.
    pub fn clear(&mut self) -> Result<(), CoreError> {
        self.kv.remove(STORAGE_KEY)?;
        tracing::debug!("favorites cleared");
        Ok(())
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Read the persisted collection in stored (append) order.
    fn load(&self) -> Vec<FavoriteEntry> {
        let raw = match self.kv.get(STORAGE_KEY) {
            Some(raw) => raw,
            None => return Vec::new(),
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "persisted favorites are malformed, treating as empty"
                );
                Vec::new()
            }
        }
    }

    fn persist(&mut self, entries: &[FavoriteEntry]) -> Result<(), CoreError> {
        let json = serde_json::to_string(entries)
            .map_err(|e| CoreError::Serialization(e.to_string()))?;
        self.kv.set(STORAGE_KEY, &json)
    }
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("entries", &self.load().len())
            .finish()
    }
}
