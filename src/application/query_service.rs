// Metrics query layer - caching, retry, and stale-response suppression
use crate::application::metrics_provider::{
    CategoryStats, FetchError, MetricStats, MetricsPage, MetricsProvider,
};
use crate::application::store::DashboardStore;
use crate::domain::view::DateRange;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

const FIRST_PAGE: usize = 1;

/// Cache key: range endpoints in epoch millis.
type RangeKey = (i64, i64);

struct CacheEntry<T> {
    fetched_at: Instant,
    value: T,
}

/// Wraps a metrics provider with per-range caching (staleness window), a
/// one-retry budget on transient failures, and suppression of stale in-flight
/// responses when the date range changes mid-fetch.
pub struct MetricsQueryService {
    provider: Arc<dyn MetricsProvider>,
    metrics_cache: Mutex<HashMap<RangeKey, CacheEntry<MetricsPage>>>,
    stats_cache: Mutex<HashMap<RangeKey, CacheEntry<MetricStats>>>,
    stale_after: Duration,
    page_size: usize,
    generation: AtomicU64,
}

impl MetricsQueryService {
    pub fn new(provider: Arc<dyn MetricsProvider>, stale_after: Duration, page_size: usize) -> Self {
        Self {
            provider,
            metrics_cache: Mutex::new(HashMap::new()),
            stats_cache: Mutex::new(HashMap::new()),
            stale_after,
            page_size,
            generation: AtomicU64::new(0),
        }
    }

    /// Metric records for the range, served from cache while fresh.
    pub async fn metrics(&self, range: &DateRange) -> Result<MetricsPage, FetchError> {
        let key = range_key(range);
        if let Some(entry) = self.metrics_cache.lock().get(&key) {
            if entry.fetched_at.elapsed() < self.stale_after {
                tracing::debug!("metrics cache hit for range {:?}", key);
                return Ok(entry.value.clone());
            }
        }

        let page = self.fetch_page(range).await?;
        self.metrics_cache.lock().insert(
            key,
            CacheEntry {
                fetched_at: Instant::now(),
                value: page.clone(),
            },
        );
        Ok(page)
    }

    /// Aggregate stats for the range, served from cache while fresh.
    pub async fn stats(&self, range: &DateRange) -> Result<MetricStats, FetchError> {
        let key = range_key(range);
        if let Some(entry) = self.stats_cache.lock().get(&key) {
            if entry.fetched_at.elapsed() < self.stale_after {
                tracing::debug!("stats cache hit for range {:?}", key);
                return Ok(entry.value.clone());
            }
        }

        let stats = match self.provider.fetch_stats(range).await {
            Err(FetchError::Transient(reason)) => {
                tracing::warn!("transient stats fetch failure, retrying once: {reason}");
                self.provider.fetch_stats(range).await?
            }
            other => other?,
        };
        self.stats_cache.lock().insert(
            key,
            CacheEntry {
                fetched_at: Instant::now(),
                value: stats.clone(),
            },
        );
        Ok(stats)
    }

    /// Per-category rollup for the range. Not cached; callers poll this far
    /// less often than the record feed.
    pub async fn category_breakdown(
        &self,
        range: &DateRange,
    ) -> Result<HashMap<String, CategoryStats>, FetchError> {
        match self.provider.fetch_category_breakdown(range).await {
            Err(FetchError::Transient(reason)) => {
                tracing::warn!("transient breakdown fetch failure, retrying once: {reason}");
                self.provider.fetch_category_breakdown(range).await
            }
            other => other,
        }
    }

    /// Fetch metrics for the store's current date range and apply the result.
    /// A response that arrives after a newer refresh has started is dropped;
    /// the newer refresh owns the loading flag and the metrics slot.
    pub async fn refresh(&self, store: &DashboardStore) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let range = store.with_state(|s| s.date_range.clone());

        store.set_loading(true);
        let result = self.metrics(&range).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("dropping superseded metrics response for range {:?}", range);
            return;
        }

        match result {
            Ok(page) => {
                store.set_metrics(page.records);
                store.set_error(None);
            }
            // Stale metrics are retained so the UI can keep showing the
            // last-known-good data next to the error.
            Err(e) => store.set_error(Some(e.to_string())),
        }
        store.set_loading(false);
    }

    /// Drop all cached results; the next query refetches.
    pub fn invalidate(&self) {
        self.metrics_cache.lock().clear();
        self.stats_cache.lock().clear();
    }

    async fn fetch_page(&self, range: &DateRange) -> Result<MetricsPage, FetchError> {
        match self
            .provider
            .fetch_metrics(range, FIRST_PAGE, self.page_size)
            .await
        {
            Err(FetchError::Transient(reason)) => {
                tracing::warn!("transient metrics fetch failure, retrying once: {reason}");
                self.provider
                    .fetch_metrics(range, FIRST_PAGE, self.page_size)
                    .await
            }
            other => other,
        }
    }
}

fn range_key(range: &DateRange) -> RangeKey {
    (
        range.start.timestamp_millis(),
        range.end.timestamp_millis(),
    )
}
