use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::errors::CoreError;
use crate::services::rate_service::RateService;
use crate::storage::favorites::{AddOutcome, FavoritesStore};

use super::enrichment::{self, RatePatch};
use super::{ConfirmPrompt, ConversionForm};

/// The live-rate area of one card.
#[derive(Debug, Clone, PartialEq)]
pub enum RateDisplay {
    /// Enrichment is in flight.
    Loading,
    /// Current 1-unit rate and when it was fetched.
    Rate { rate: f64, updated: DateTime<Utc> },
    /// Terse inline error; the rest of the card stays intact.
    Unavailable(String),
}

impl RateDisplay {
    /// The text the frontend puts in the live-rate area.
    /// Rates show fixed 4 decimal places.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            RateDisplay::Loading => "Loading latest rate...".to_string(),
            RateDisplay::Rate { rate, updated } => {
                format!("Rate: {rate:.4} — Updated: {}", updated.format("%Y-%m-%d %H:%M"))
            }
            RateDisplay::Unavailable(_) => "Could not load latest rate".to_string(),
        }
    }
}

/// The rendered projection of one favorite: everything a frontend needs
/// to draw the card and wire its actions.
#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteCard {
    pub id: i64,
    pub pair_label: String,
    pub amount: f64,
    pub from_currency: String,
    pub to_currency: String,
    pub rate: RateDisplay,
}

/// Transient status for the save control after a save attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFeedback {
    Saved,
    AlreadySaved,
}

/// Projects the favorites store into display cards and wires user actions
/// back into store operations.
///
/// The panel owns the store (no other component touches the persisted
/// key) and the per-card enrichment tasks. Rendering is synchronous;
/// enrichment results arrive later through [`poll_patches`].
///
/// [`poll_patches`]: FavoritesPanel::poll_patches
pub struct FavoritesPanel {
    store: FavoritesStore,
    rates: RateService,
    cards: Vec<FavoriteCard>,
    tasks: HashMap<i64, JoinHandle<()>>,
    patch_tx: UnboundedSender<RatePatch>,
    patch_rx: UnboundedReceiver<RatePatch>,
}

impl FavoritesPanel {
    pub fn new(store: FavoritesStore, rates: RateService) -> Self {
        let (patch_tx, patch_rx) = mpsc::unbounded_channel();
        Self {
            store,
            rates,
            cards: Vec::new(),
            tasks: HashMap::new(),
            patch_tx,
            patch_rx,
        }
    }

    /// Rebuild the card list from the store and start a fresh rate lookup
    /// for every card.
    ///
    /// In-flight lookups from the previous render are cancelled first, so
    /// a superseded request can never patch a card it no longer owns. An
    /// empty store yields an empty card list — the frontend shows its
    /// empty-state message.
    pub fn render(&mut self) {
        self.cancel_all_tasks();

        self.cards = self
            .store
            .list()
            .into_iter()
            .map(|entry| FavoriteCard {
                id: entry.id,
                pair_label: entry.pair_label(),
                amount: entry.amount,
                from_currency: entry.from_currency,
                to_currency: entry.to_currency,
                rate: RateDisplay::Loading,
            })
            .collect();

        for card in &self.cards {
            let handle = enrichment::spawn(
                self.rates.clone(),
                card.id,
                card.from_currency.clone(),
                card.to_currency.clone(),
                self.patch_tx.clone(),
            );
            self.tasks.insert(card.id, handle);
        }
    }

    /// The currently rendered cards, newest favorite first.
    #[must_use]
    pub fn cards(&self) -> &[FavoriteCard] {
        &self.cards
    }

    /// True when there is nothing to show but the empty-state message.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Drain completed enrichment results and patch the owning cards in
    /// place. Returns how many cards were patched.
    ///
    /// A patch whose card is no longer displayed (deleted, or from a
    /// cancelled task that had already completed) is a harmless no-op.
    pub fn poll_patches(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(patch) = self.patch_rx.try_recv() {
            self.tasks.remove(&patch.id);
            let Some(card) = self.cards.iter_mut().find(|c| c.id == patch.id) else {
                tracing::trace!(id = patch.id, "dropping stale rate patch");
                continue;
            };
            card.rate = match patch.outcome {
                Ok(rate) => RateDisplay::Rate {
                    rate,
                    updated: patch.completed_at,
                },
                Err(e) => RateDisplay::Unavailable(e.to_string()),
            };
            applied += 1;
        }
        applied
    }

    /// Save the active conversion as a favorite and re-render.
    ///
    /// A duplicate pair reports [`SaveFeedback::AlreadySaved`] without
    /// touching the store or the display.
    pub fn save_current(
        &mut self,
        amount: f64,
        from_currency: &str,
        to_currency: &str,
    ) -> Result<SaveFeedback, CoreError> {
        match self.store.add(amount, from_currency, to_currency)? {
            AddOutcome::Added(_) => {
                self.render();
                Ok(SaveFeedback::Saved)
            }
            AddOutcome::Duplicate => Ok(SaveFeedback::AlreadySaved),
        }
    }

    /// Delete a favorite after user confirmation.
    ///
    /// Removes only that entry's card (optimistic), falling back to a full
    /// re-render if the card cannot be located by id. Returns `false` when
    /// the user declined the prompt.
    pub fn delete(
        &mut self,
        id: i64,
        prompt: &dyn ConfirmPrompt,
    ) -> Result<bool, CoreError> {
        if !prompt.confirm("Remove this favorite?") {
            return Ok(false);
        }

        self.store.remove(id)?;

        if let Some(handle) = self.tasks.remove(&id) {
            handle.abort();
        }

        match self.cards.iter().position(|c| c.id == id) {
            Some(pos) => {
                self.cards.remove(pos);
            }
            None => self.render(),
        }

        Ok(true)
    }

    /// Clear every favorite after user confirmation. Returns `false` when
    /// the user declined the prompt.
    pub fn clear_all(&mut self, prompt: &dyn ConfirmPrompt) -> Result<bool, CoreError> {
        if !prompt.confirm("Are you sure you want to remove all favorites?") {
            return Ok(false);
        }

        self.store.clear()?;
        self.render();
        Ok(true)
    }

    /// Copy a favorite into the active conversion form and trigger its
    /// submit flow. Does not mutate the store. Returns `false` if no card
    /// with that id is displayed.
    pub fn convert_now(&self, id: i64, form: &mut dyn ConversionForm) -> bool {
        let Some(card) = self.cards.iter().find(|c| c.id == id) else {
            return false;
        };
        form.fill(card.amount, &card.from_currency, &card.to_currency);
        form.submit();
        true
    }

    /// Direct access to the underlying store, for callers that only need
    /// the collection (no rendering).
    pub fn store(&self) -> &FavoritesStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut FavoritesStore {
        &mut self.store
    }

    fn cancel_all_tasks(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

impl Drop for FavoritesPanel {
    fn drop(&mut self) {
        self.cancel_all_tasks();
    }
}

impl std::fmt::Debug for FavoritesPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesPanel")
            .field("cards", &self.cards.len())
            .field("pending_lookups", &self.tasks.len())
            .finish()
    }
}
