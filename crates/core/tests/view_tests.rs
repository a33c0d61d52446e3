// ═══════════════════════════════════════════════════════════════════
// View Tests — FavoritesPanel rendering, enrichment, actions
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use currency_converter_core::errors::CoreError;
use currency_converter_core::models::rate::{Conversion, RateTable};
use currency_converter_core::providers::registry::RateProviderRegistry;
use currency_converter_core::providers::traits::RateProvider;
use currency_converter_core::services::rate_service::RateService;
use currency_converter_core::storage::favorites::FavoritesStore;
use currency_converter_core::storage::kv::MemoryStore;
use currency_converter_core::view::panel::{FavoritesPanel, RateDisplay, SaveFeedback};
use currency_converter_core::view::{ConfirmPrompt, ConversionForm};

// ═══════════════════════════════════════════════════════════════════
// Test Helpers
// ═══════════════════════════════════════════════════════════════════

#[derive(Clone, Copy)]
enum Behavior {
    Rate(f64),
    Fail,
    /// Never resolves — simulates a hung request.
    Hang,
}

struct MockProvider {
    behavior: Behavior,
}

#[async_trait]
impl RateProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn latest_rates(&self, base: &str) -> Result<RateTable, CoreError> {
        Ok(RateTable {
            base: base.to_string(),
            rates: HashMap::new(),
            timestamp: Utc::now(),
        })
    }

    async fn convert(&self, from: &str, to: &str, amount: f64) -> Result<Conversion, CoreError> {
        match self.behavior {
            Behavior::Rate(rate) => Ok(Conversion {
                base: from.to_string(),
                target: to.to_string(),
                amount,
                conversion_rate: rate,
                conversion_result: amount * rate,
                timestamp: Utc::now(),
            }),
            Behavior::Fail => Err(CoreError::Api {
                provider: "mock".to_string(),
                message: "mock failure".to_string(),
            }),
            Behavior::Hang => std::future::pending().await,
        }
    }

    async fn historical_rates(
        &self,
        _base: &str,
        _date: NaiveDate,
    ) -> Result<HashMap<String, f64>, CoreError> {
        Ok(HashMap::new())
    }
}

fn panel(behavior: Behavior) -> FavoritesPanel {
    let mut registry = RateProviderRegistry::new();
    registry.register(Box::new(MockProvider { behavior }));
    FavoritesPanel::new(
        FavoritesStore::new(Box::new(MemoryStore::new())),
        RateService::new(registry),
    )
}

/// Poll until `expected` patches have been applied (or give up).
async fn wait_for_patches(panel: &mut FavoritesPanel, expected: usize) -> usize {
    let mut applied = 0;
    for _ in 0..200 {
        applied += panel.poll_patches();
        if applied >= expected {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    applied
}

struct AlwaysYes;
impl ConfirmPrompt for AlwaysYes {
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}

struct AlwaysNo;
impl ConfirmPrompt for AlwaysNo {
    fn confirm(&self, _message: &str) -> bool {
        false
    }
}

#[derive(Default)]
struct RecordingForm {
    filled: Mutex<Option<(f64, String, String)>>,
    submits: Mutex<usize>,
}

impl ConversionForm for RecordingForm {
    fn fill(&mut self, amount: f64, from_currency: &str, to_currency: &str) {
        *self.filled.lock().unwrap() =
            Some((amount, from_currency.to_string(), to_currency.to_string()));
    }

    fn submit(&mut self) {
        *self.submits.lock().unwrap() += 1;
    }
}

// ═══════════════════════════════════════════════════════════════════
// Rendering
// ═══════════════════════════════════════════════════════════════════

mod rendering {
    use super::*;

    #[tokio::test]
    async fn empty_store_renders_empty_state() {
        let mut p = panel(Behavior::Rate(1.0));
        p.render();
        assert!(p.is_empty());
        assert!(p.cards().is_empty());
    }

    #[tokio::test]
    async fn saved_favorite_renders_as_loading_card() {
        let mut p = panel(Behavior::Rate(1.0));
        let feedback = p.save_current(100.0, "USD", "EUR").unwrap();

        assert_eq!(feedback, SaveFeedback::Saved);
        assert_eq!(p.cards().len(), 1);
        let card = &p.cards()[0];
        assert_eq!(card.pair_label, "USD → EUR");
        assert_eq!(card.amount, 100.0);
        assert_eq!(card.rate, RateDisplay::Loading);
    }

    #[tokio::test]
    async fn cards_follow_store_order_newest_first() {
        let mut p = panel(Behavior::Rate(1.0));
        p.save_current(1.0, "USD", "EUR").unwrap();
        p.save_current(2.0, "GBP", "JPY").unwrap();

        let labels: Vec<&str> = p.cards().iter().map(|c| c.pair_label.as_str()).collect();
        assert_eq!(labels, ["GBP → JPY", "USD → EUR"]);
    }

    #[tokio::test]
    async fn duplicate_save_reports_already_saved() {
        let mut p = panel(Behavior::Rate(1.0));
        p.save_current(100.0, "USD", "EUR").unwrap();
        let feedback = p.save_current(50.0, "USD", "EUR").unwrap();

        assert_eq!(feedback, SaveFeedback::AlreadySaved);
        assert_eq!(p.cards().len(), 1);
        assert_eq!(p.cards()[0].amount, 100.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Enrichment
// ═══════════════════════════════════════════════════════════════════

mod enrichment {
    use super::*;

    #[tokio::test]
    async fn successful_lookup_patches_the_card() {
        let mut p = panel(Behavior::Rate(1.2345));
        p.save_current(100.0, "USD", "EUR").unwrap();

        let applied = wait_for_patches(&mut p, 1).await;
        assert_eq!(applied, 1);

        match &p.cards()[0].rate {
            RateDisplay::Rate { rate, .. } => assert_eq!(*rate, 1.2345),
            other => panic!("expected Rate, got {other:?}"),
        }
        assert!(p.cards()[0].rate.text().contains("1.2345"));
        assert!(p.cards()[0].rate.text().contains("Updated:"));
    }

    #[tokio::test]
    async fn failed_lookup_shows_inline_error_and_keeps_the_card() {
        let mut p = panel(Behavior::Fail);
        p.save_current(100.0, "USD", "EUR").unwrap();

        let applied = wait_for_patches(&mut p, 1).await;
        assert_eq!(applied, 1);

        let card = &p.cards()[0];
        assert!(matches!(card.rate, RateDisplay::Unavailable(_)));
        assert_eq!(card.rate.text(), "Could not load latest rate");
        // The favorite itself is untouched
        assert_eq!(card.amount, 100.0);
        assert_eq!(p.store().list().len(), 1);
    }

    #[tokio::test]
    async fn hung_lookup_leaves_the_card_loading() {
        let mut p = panel(Behavior::Hang);
        p.save_current(100.0, "USD", "EUR").unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(p.poll_patches(), 0);
        assert_eq!(p.cards()[0].rate, RateDisplay::Loading);
    }

    #[tokio::test]
    async fn each_render_issues_a_fresh_lookup() {
        let mut p = panel(Behavior::Rate(2.0));
        p.save_current(1.0, "USD", "EUR").unwrap();
        assert_eq!(wait_for_patches(&mut p, 1).await, 1);
        assert!(matches!(p.cards()[0].rate, RateDisplay::Rate { .. }));

        p.render();
        assert_eq!(p.cards()[0].rate, RateDisplay::Loading);
        assert_eq!(wait_for_patches(&mut p, 1).await, 1);
        assert!(matches!(p.cards()[0].rate, RateDisplay::Rate { .. }));
    }

    #[tokio::test]
    async fn patch_for_a_deleted_card_is_a_noop() {
        let mut p = panel(Behavior::Rate(1.0));
        p.save_current(1.0, "USD", "EUR").unwrap();
        let id = p.cards()[0].id;

        // Delete before draining the patch; whether the lookup completed
        // or was aborted, no patch may land anywhere.
        p.delete(id, &AlwaysYes).unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(p.poll_patches(), 0);
        assert!(p.cards().is_empty());
    }

    #[tokio::test]
    async fn rate_text_is_fixed_four_decimals() {
        let display = RateDisplay::Rate {
            rate: 0.5,
            updated: Utc::now(),
        };
        assert!(display.text().contains("0.5000"));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Actions — delete, clear, convert now
// ═══════════════════════════════════════════════════════════════════

mod actions {
    use super::*;

    #[tokio::test]
    async fn confirmed_delete_removes_card_and_entry() {
        let mut p = panel(Behavior::Rate(1.0));
        p.save_current(1.0, "USD", "EUR").unwrap();
        p.save_current(2.0, "GBP", "JPY").unwrap();
        let id = p.cards()[1].id; // the USD → EUR card

        assert!(p.delete(id, &AlwaysYes).unwrap());
        assert_eq!(p.cards().len(), 1);
        assert_eq!(p.cards()[0].pair_label, "GBP → JPY");
        assert_eq!(p.store().list().len(), 1);
    }

    #[tokio::test]
    async fn declined_delete_changes_nothing() {
        let mut p = panel(Behavior::Rate(1.0));
        p.save_current(1.0, "USD", "EUR").unwrap();
        let id = p.cards()[0].id;

        assert!(!p.delete(id, &AlwaysNo).unwrap());
        assert_eq!(p.cards().len(), 1);
        assert_eq!(p.store().list().len(), 1);
    }

    #[tokio::test]
    async fn delete_falls_back_to_full_render_when_card_missing() {
        let mut p = panel(Behavior::Rate(1.0));
        // Mutate the store directly so the card list is stale
        p.store_mut().add(1.0, "USD", "EUR").unwrap();
        p.store_mut().add(2.0, "GBP", "JPY").unwrap();
        let id = p.store().list()[0].id;
        assert!(p.cards().is_empty());

        assert!(p.delete(id, &AlwaysYes).unwrap());
        // Fallback re-render reconciled the display with the store
        assert_eq!(p.cards().len(), 1);
        assert_eq!(p.store().list().len(), 1);
    }

    #[tokio::test]
    async fn confirmed_clear_all_empties_everything() {
        let mut p = panel(Behavior::Rate(1.0));
        p.save_current(1.0, "USD", "EUR").unwrap();
        p.save_current(2.0, "GBP", "JPY").unwrap();

        assert!(p.clear_all(&AlwaysYes).unwrap());
        assert!(p.is_empty());
        assert!(p.store().list().is_empty());
    }

    #[tokio::test]
    async fn declined_clear_all_changes_nothing() {
        let mut p = panel(Behavior::Rate(1.0));
        p.save_current(1.0, "USD", "EUR").unwrap();

        assert!(!p.clear_all(&AlwaysNo).unwrap());
        assert_eq!(p.store().list().len(), 1);
    }

    #[tokio::test]
    async fn convert_now_fills_and_submits_the_form() {
        let mut p = panel(Behavior::Rate(1.0));
        p.save_current(250.0, "GBP", "JPY").unwrap();
        let id = p.cards()[0].id;

        let mut form = RecordingForm::default();
        assert!(p.convert_now(id, &mut form));

        let filled = form.filled.lock().unwrap().clone().unwrap();
        assert_eq!(filled, (250.0, "GBP".to_string(), "JPY".to_string()));
        assert_eq!(*form.submits.lock().unwrap(), 1);
        // The store was not mutated
        assert_eq!(p.store().list().len(), 1);
    }

    #[tokio::test]
    async fn convert_now_with_unknown_id_does_nothing() {
        let p = panel(Behavior::Rate(1.0));
        let mut form = RecordingForm::default();

        assert!(!p.convert_now(12345, &mut form));
        assert!(form.filled.lock().unwrap().is_none());
        assert_eq!(*form.submits.lock().unwrap(), 0);
    }
}
