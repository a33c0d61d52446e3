use chrono::{DateTime, Utc};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::errors::CoreError;
use crate::services::rate_service::RateService;

/// Completed rate lookup for one display card.
///
/// `completed_at` is fetch-completion time on the client clock, not
/// anything the API reported.
#[derive(Debug)]
pub struct RatePatch {
    pub id: i64,
    pub outcome: Result<f64, CoreError>,
    pub completed_at: DateTime<Utc>,
}

/// Spawn one enrichment task: fetch the current 1-unit rate for a card's
/// pair and post the result back to the panel.
///
/// The task has no deadline of its own (the HTTP client's timeout bounds
/// it) and may be aborted when its card leaves the display. A send into a
/// dropped or superseded channel is silently discarded — a stale result
/// must never patch detached state.
pub(crate) fn spawn(
    rates: RateService,
    id: i64,
    from_currency: String,
    to_currency: String,
    patches: UnboundedSender<RatePatch>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let outcome = rates.pair_rate(&from_currency, &to_currency).await;
        if let Err(e) = &outcome {
            tracing::warn!(
                id,
                from = %from_currency,
                to = %to_currency,
                error = %e,
                "rate enrichment failed"
            );
        }
        let _ = patches.send(RatePatch {
            id,
            outcome,
            completed_at: Utc::now(),
        });
    })
}
