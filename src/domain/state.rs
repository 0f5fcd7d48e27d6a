// Dashboard state aggregate and its durable subset
use super::filter::FilterCondition;
use super::metric::MetricRecord;
use super::view::{DateRange, SavedView};
use serde::{Deserialize, Serialize};

const DEFAULT_TRAILING_DAYS: i64 = 7;

/// Root state aggregate for one dashboard session. Mutated exclusively
/// through the store's action surface.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub metrics: Vec<MetricRecord>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub filters: Vec<FilterCondition>,
    pub date_range: DateRange,
    pub selected_view: Option<SavedView>,
    pub saved_views: Vec<SavedView>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            metrics: Vec::new(),
            is_loading: false,
            error: None,
            filters: Vec::new(),
            date_range: DateRange::trailing_days(DEFAULT_TRAILING_DAYS),
            selected_view: None,
            saved_views: Vec::new(),
        }
    }
}

/// The subset of state written to durable storage and restored at startup.
/// Metrics, status flags, and the selected view are transient per session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    pub saved_views: Vec<SavedView>,
    pub filters: Vec<FilterCondition>,
    pub date_range: DateRange,
}

impl PersistedState {
    pub fn snapshot_of(state: &DashboardState) -> Self {
        Self {
            saved_views: state.saved_views.clone(),
            filters: state.filters.clone(),
            date_range: state.date_range.clone(),
        }
    }

    /// Rebuild a session state around the persisted subset.
    pub fn into_state(self) -> DashboardState {
        DashboardState {
            saved_views: self.saved_views,
            filters: self.filters,
            date_range: self.date_range,
            ..DashboardState::default()
        }
    }
}
