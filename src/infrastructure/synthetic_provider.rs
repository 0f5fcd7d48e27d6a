// Synthetic metrics provider - generated data for local sessions and demos
use crate::application::metrics_provider::{
    CategoryStats, FetchError, MetricStats, MetricsPage, MetricsProvider,
};
use crate::domain::metric::{MetricRecord, MetricStatus};
use crate::domain::view::DateRange;
use async_trait::async_trait;
use chrono::Duration;
use rand::Rng;
use std::collections::HashMap;

const CATEGORIES: [&str; 5] = ["API", "Database", "Cache", "Network", "Server"];
const STATUSES: [MetricStatus; 3] = [
    MetricStatus::Success,
    MetricStatus::Warning,
    MetricStatus::Error,
];
const REGIONS: [&str; 3] = ["us-east", "eu-west", "ap-south"];

const STATS_SAMPLE: usize = 100;
const BREAKDOWN_SAMPLE: usize = 200;

/// Generates metric records evenly spaced across the requested range, with
/// values banded by status: success 50-80, warning 80-95, error 95-100.
pub struct SyntheticProvider {
    record_count: usize,
}

impl SyntheticProvider {
    pub fn new(record_count: usize) -> Self {
        Self { record_count }
    }

    fn generate(&self, count: usize, range: &DateRange) -> Vec<MetricRecord> {
        let mut rng = rand::thread_rng();
        let span_ms = (range.end - range.start).num_milliseconds();
        let step_ms = if count > 0 { span_ms as f64 / count as f64 } else { 0.0 };

        (0..count)
            .map(|i| {
                let timestamp =
                    range.start + Duration::milliseconds((i as f64 * step_ms) as i64);
                let category = CATEGORIES[rng.gen_range(0..CATEGORIES.len())];
                let status = STATUSES[rng.gen_range(0..STATUSES.len())];
                let value = match status {
                    MetricStatus::Success => 50.0 + rng.gen_range(0.0..30.0),
                    MetricStatus::Warning => 80.0 + rng.gen_range(0.0..15.0),
                    MetricStatus::Error => 95.0 + rng.gen_range(0.0..5.0),
                };

                let mut metadata = HashMap::new();
                metadata.insert(
                    "region".to_string(),
                    serde_json::Value::String(
                        REGIONS[rng.gen_range(0..REGIONS.len())].to_string(),
                    ),
                );
                metadata.insert(
                    "endpoint".to_string(),
                    serde_json::Value::String(format!(
                        "/api/v{}/{}",
                        rng.gen_range(1..=3),
                        category.to_lowercase()
                    )),
                );

                MetricRecord {
                    id: format!("metric-{i}"),
                    timestamp,
                    value: round2(value),
                    category: category.to_string(),
                    status,
                    metadata: Some(metadata),
                }
            })
            .collect()
    }
}

#[async_trait]
impl MetricsProvider for SyntheticProvider {
    async fn fetch_metrics(
        &self,
        range: &DateRange,
        page: usize,
        page_size: usize,
    ) -> Result<MetricsPage, FetchError> {
        let all = self.generate(self.record_count, range);
        let start = page.saturating_sub(1) * page_size;
        let end = (start + page_size).min(all.len());
        let records = if start < all.len() {
            all[start..end].to_vec()
        } else {
            Vec::new()
        };

        Ok(MetricsPage {
            records,
            total: all.len(),
            page,
            page_size,
        })
    }

    async fn fetch_stats(&self, range: &DateRange) -> Result<MetricStats, FetchError> {
        let sample = self.generate(STATS_SAMPLE, range);
        let total = sample.len();
        if total == 0 {
            return Err(FetchError::Permanent("empty stats sample".to_string()));
        }

        let success_count = sample
            .iter()
            .filter(|m| m.status == MetricStatus::Success)
            .count();
        let warning_count = sample
            .iter()
            .filter(|m| m.status == MetricStatus::Warning)
            .count();
        let error_count = sample
            .iter()
            .filter(|m| m.status == MetricStatus::Error)
            .count();
        let avg_value = sample.iter().map(|m| m.value).sum::<f64>() / total as f64;

        Ok(MetricStats {
            total,
            success_count,
            warning_count,
            error_count,
            avg_value: round2(avg_value),
            success_rate_percent: round2(success_count as f64 / total as f64 * 100.0),
        })
    }

    async fn fetch_category_breakdown(
        &self,
        range: &DateRange,
    ) -> Result<HashMap<String, CategoryStats>, FetchError> {
        let sample = self.generate(BREAKDOWN_SAMPLE, range);
        let mut breakdown: HashMap<String, CategoryStats> = HashMap::new();

        for record in &sample {
            let entry = breakdown
                .entry(record.category.clone())
                .or_insert(CategoryStats {
                    count: 0,
                    total_value: 0.0,
                    avg_value: 0.0,
                });
            entry.count += 1;
            entry.total_value += record.value;
        }
        for stats in breakdown.values_mut() {
            stats.avg_value = round2(stats.total_value / stats.count as f64);
        }

        Ok(breakdown)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn values_are_banded_by_status() {
        let provider = SyntheticProvider::new(200);
        let range = DateRange::trailing_days(7);
        let page = provider.fetch_metrics(&range, 1, 200).await.unwrap();

        for record in &page.records {
            match record.status {
                // Bands can touch their upper edge after 2-decimal rounding.
                MetricStatus::Success => assert!((50.0..=80.0).contains(&record.value)),
                MetricStatus::Warning => assert!((80.0..=95.0).contains(&record.value)),
                MetricStatus::Error => assert!((95.0..=100.0).contains(&record.value)),
            }
        }
    }

    #[tokio::test]
    async fn timestamps_stay_inside_the_range_in_order() {
        let provider = SyntheticProvider::new(50);
        let range = DateRange::trailing_days(7);
        let page = provider.fetch_metrics(&range, 1, 50).await.unwrap();

        let mut previous = range.start;
        for record in &page.records {
            assert!(record.timestamp >= previous);
            assert!(record.timestamp <= range.end);
            previous = record.timestamp;
        }
    }

    #[tokio::test]
    async fn pagination_slices_the_generated_set() {
        let provider = SyntheticProvider::new(10);
        let range = DateRange::trailing_days(1);

        let first = provider.fetch_metrics(&range, 1, 4).await.unwrap();
        let third = provider.fetch_metrics(&range, 3, 4).await.unwrap();
        let beyond = provider.fetch_metrics(&range, 4, 4).await.unwrap();

        assert_eq!(first.total, 10);
        assert_eq!(first.records.len(), 4);
        assert_eq!(third.records.len(), 2);
        assert!(beyond.records.is_empty());
    }

    #[tokio::test]
    async fn stats_counts_are_consistent() {
        let provider = SyntheticProvider::new(500);
        let range = DateRange::trailing_days(7);
        let stats = provider.fetch_stats(&range).await.unwrap();

        assert_eq!(stats.total, STATS_SAMPLE);
        assert_eq!(
            stats.success_count + stats.warning_count + stats.error_count,
            stats.total
        );
        assert!((0.0..=100.0).contains(&stats.success_rate_percent));
    }

    #[tokio::test]
    async fn breakdown_covers_known_categories_only() {
        let provider = SyntheticProvider::new(500);
        let range = DateRange::trailing_days(7);
        let breakdown = provider.fetch_category_breakdown(&range).await.unwrap();

        let total: usize = breakdown.values().map(|s| s.count).sum();
        assert_eq!(total, BREAKDOWN_SAMPLE);
        for category in breakdown.keys() {
            assert!(CATEGORIES.contains(&category.as_str()));
        }
    }
}
