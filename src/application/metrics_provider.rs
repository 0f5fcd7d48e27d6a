// Provider port for metric data access
use crate::domain::metric::MetricRecord;
use crate::domain::view::DateRange;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Fetch failures, split by whether a retry is worthwhile.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("transient fetch failure: {0}")]
    Transient(String),
    #[error("fetch failure: {0}")]
    Permanent(String),
}

/// One page of metric records for a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsPage {
    pub records: Vec<MetricRecord>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

/// Aggregate stats over a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricStats {
    pub total: usize,
    pub success_count: usize,
    pub warning_count: usize,
    pub error_count: usize,
    pub avg_value: f64,
    pub success_rate_percent: f64,
}

/// Per-category rollup for the breakdown endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub count: usize,
    pub total_value: f64,
    pub avg_value: f64,
}

#[async_trait]
pub trait MetricsProvider: Send + Sync {
    /// Fetch one page of metric records for a date range.
    async fn fetch_metrics(
        &self,
        range: &DateRange,
        page: usize,
        page_size: usize,
    ) -> Result<MetricsPage, FetchError>;

    /// Fetch aggregate stats for a date range.
    async fn fetch_stats(&self, range: &DateRange) -> Result<MetricStats, FetchError>;

    /// Fetch a per-category rollup for a date range.
    async fn fetch_category_breakdown(
        &self,
        range: &DateRange,
    ) -> Result<HashMap<String, CategoryStats>, FetchError>;
}
