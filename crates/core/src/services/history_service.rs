use chrono::{Duration, Utc};
use tokio::task::JoinSet;

use crate::errors::CoreError;
use crate::models::currency;
use crate::models::rate::RatePoint;

use super::rate_service::RateService;

/// Maximum number of days of history a single request may cover.
pub const MAX_HISTORY_DAYS: u32 = 30;

/// Builds historical rate series for charting.
///
/// The upstream APIs expose one rate table per date, so an N-day series
/// costs N requests. They are issued concurrently; days that fail (missing
/// data, transient errors) are dropped from the series rather than failing
/// the whole request.
pub struct HistoryService;

impl HistoryService {
    pub fn new() -> Self {
        Self
    }

    /// Fetch the daily 1-unit rate for `base` → `target` over the last
    /// `days` days (today inclusive, clamped to [`MAX_HISTORY_DAYS`]).
    ///
    /// Returns points sorted by date ascending. Errors only when no day
    /// produced a rate at all.
    pub async fn rate_history(
        &self,
        rates: &RateService,
        base: &str,
        target: &str,
        days: u32,
    ) -> Result<Vec<RatePoint>, CoreError> {
        let base = currency::normalize_code(base)?;
        let target = currency::normalize_code(target)?;
        let days = days.clamp(1, MAX_HISTORY_DAYS);

        let today = Utc::now().date_naive();
        let mut tasks = JoinSet::new();

        for offset in 0..days {
            let date = today - Duration::days(i64::from(offset));
            let rates = rates.clone();
            let base = base.clone();
            let target = target.clone();

            tasks.spawn(async move {
                let table = rates.historical_rates(&base, date).await.ok()?;
                let rate = table.get(&target).copied()?;
                Some(RatePoint { date, rate })
            });
        }

        let mut points = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            // A panicked or aborted task is treated like a failed day
            if let Ok(Some(point)) = joined {
                points.push(point);
            }
        }

        if points.is_empty() {
            return Err(CoreError::NoHistoricalData { base, target });
        }

        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}

impl Default for HistoryService {
    fn default() -> Self {
        Self::new()
    }
}
