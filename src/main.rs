// Main entry point - Dependency injection and a demo dashboard session
mod application;
mod domain;
mod infrastructure;

use std::sync::Arc;
use std::time::Duration;

use crate::application::filter_engine;
use crate::application::query_service::MetricsQueryService;
use crate::application::store::DashboardStore;
use crate::domain::filter::{FilterCondition, FilterField, FilterOperator, FilterValue};
use crate::domain::metric::ChartType;
use crate::domain::view::ViewDraft;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::file_storage::FileStorage;
use crate::infrastructure::synthetic_provider::SyntheticProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Create storage and store (hydrates from the previous session)
    let storage = Arc::new(FileStorage::new(&config.storage.dir));
    let store = Arc::new(DashboardStore::new(storage));

    // Create the query layer around the synthetic provider
    let provider = Arc::new(SyntheticProvider::new(config.query.record_count));
    let queries = MetricsQueryService::new(
        provider,
        Duration::from_secs(config.query.stale_after_secs),
        config.query.page_size,
    );

    store.subscribe(|state| {
        tracing::debug!(
            "state changed: {} metrics, {} filters, {} saved views, loading={}",
            state.metrics.len(),
            state.filters.len(),
            state.saved_views.len(),
            state.is_loading
        );
    });

    // Fetch metrics for the current date range
    queries.refresh(&store).await;

    store.add_filter(FilterCondition {
        id: uuid::Uuid::new_v4().to_string(),
        field: FilterField::Status,
        operator: FilterOperator::Equals(FilterValue::Text("error".to_string())),
    });

    let state = store.state();
    let filtered = filter_engine::apply(&state.metrics, &state.filters);
    tracing::info!(
        "{} of {} records match the active filters",
        filtered.len(),
        state.metrics.len()
    );

    let stats = queries.stats(&state.date_range).await?;
    tracing::info!(
        "stats: {} records, {} ok / {} warn / {} err, avg {}, success rate {}%",
        stats.total,
        stats.success_count,
        stats.warning_count,
        stats.error_count,
        stats.avg_value,
        stats.success_rate_percent
    );

    let breakdown = queries.category_breakdown(&state.date_range).await?;
    for (category, category_stats) in &breakdown {
        tracing::info!(
            "category {}: {} records, avg {}",
            category,
            category_stats.count,
            category_stats.avg_value
        );
    }

    let view_id = store.save_view(ViewDraft {
        name: "Errors Only".to_string(),
        description: Some("Records with error status".to_string()),
        filters: state.filters.clone(),
        date_range: state.date_range.clone(),
        chart_type: ChartType::Line,
    });
    tracing::info!(
        "saved view {view_id}; {} views persisted",
        store.with_state(|s| s.saved_views.len())
    );

    Ok(())
}
