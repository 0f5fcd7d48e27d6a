// Dashboard state store - single-writer state holder with observer fan-out
use crate::application::state_storage::StateStorage;
use crate::domain::filter::{FilterCondition, FilterUpdate};
use crate::domain::metric::MetricRecord;
use crate::domain::state::{DashboardState, PersistedState};
use crate::domain::view::{DateRange, SavedView, ViewDraft};
use parking_lot::RwLock;
use std::sync::Arc;

pub type Subscriber = Box<dyn Fn(&DashboardState) + Send + Sync>;

/// Authoritative state container for one dashboard session. All mutations go
/// through the action methods below; each one writes the persisted subset
/// through to storage (when touched) and then notifies subscribers
/// synchronously with a snapshot of the new state.
pub struct DashboardStore {
    state: RwLock<DashboardState>,
    subscribers: RwLock<Vec<Subscriber>>,
    storage: Arc<dyn StateStorage>,
}

impl DashboardStore {
    /// Build a store hydrated from storage. A missing or undecodable blob
    /// falls back to defaults; hydration never fails the session.
    pub fn new(storage: Arc<dyn StateStorage>) -> Self {
        let state = match storage.load() {
            Ok(Some(persisted)) => persisted.into_state(),
            Ok(None) => DashboardState::default(),
            Err(e) => {
                tracing::warn!("failed to hydrate dashboard state, using defaults: {e:#}");
                DashboardState::default()
            }
        };

        Self {
            state: RwLock::new(state),
            subscribers: RwLock::new(Vec::new()),
            storage,
        }
    }

    /// Snapshot of the full current state.
    pub fn state(&self) -> DashboardState {
        self.state.read().clone()
    }

    /// Read a derived slice without cloning the whole state.
    pub fn with_state<T>(&self, f: impl FnOnce(&DashboardState) -> T) -> T {
        f(&self.state.read())
    }

    /// Register a callback invoked synchronously after every mutation.
    pub fn subscribe(&self, subscriber: impl Fn(&DashboardState) + Send + Sync + 'static) {
        self.subscribers.write().push(Box::new(subscriber));
    }

    pub fn set_metrics(&self, records: Vec<MetricRecord>) {
        self.mutate(false, |state| state.metrics = records);
    }

    pub fn set_loading(&self, is_loading: bool) {
        self.mutate(false, |state| state.is_loading = is_loading);
    }

    pub fn set_error(&self, error: Option<String>) {
        self.mutate(false, |state| state.error = error);
    }

    /// Append a condition. The caller supplies a pre-generated unique id;
    /// no dedup check is performed.
    pub fn add_filter(&self, condition: FilterCondition) {
        self.mutate(true, |state| state.filters.push(condition));
    }

    /// Remove the condition with the given id. No-op if absent.
    pub fn remove_filter(&self, filter_id: &str) {
        self.mutate(true, |state| state.filters.retain(|f| f.id != filter_id));
    }

    /// Merge a partial update into the condition with the given id.
    /// No-op if absent.
    pub fn update_filter(&self, filter_id: &str, update: FilterUpdate) {
        self.mutate(true, |state| {
            if let Some(condition) = state.filters.iter_mut().find(|f| f.id == filter_id) {
                update.apply_to(condition);
            }
        });
    }

    pub fn set_date_range(&self, range: DateRange) {
        if !range.is_ordered() {
            tracing::warn!(
                "date range start {} is after end {}",
                range.start,
                range.end
            );
        }
        self.mutate(true, |state| state.date_range = range);
    }

    /// Save a named snapshot of the draft's filters, date range, and chart
    /// type, and select it. Returns the generated view id.
    pub fn save_view(&self, draft: ViewDraft) -> String {
        let view = SavedView::from_draft(draft);
        let view_id = view.id.clone();
        self.mutate(true, |state| {
            state.selected_view = Some(view.clone());
            state.saved_views.push(view);
        });
        view_id
    }

    /// Select the view with the given id and overwrite the live filters and
    /// date range with copies of its snapshot. No-op if absent; a previous
    /// selection is kept on a miss.
    pub fn load_view(&self, view_id: &str) {
        self.mutate(true, |state| {
            if let Some(view) = state.saved_views.iter().find(|v| v.id == view_id) {
                let view = view.clone();
                state.filters = view.filters.clone();
                state.date_range = view.date_range.clone();
                state.selected_view = Some(view);
            }
        });
    }

    /// Remove the view with the given id, clearing the selection only when
    /// the deleted view was the selected one.
    pub fn delete_view(&self, view_id: &str) {
        self.mutate(true, |state| {
            state.saved_views.retain(|v| v.id != view_id);
            if state
                .selected_view
                .as_ref()
                .is_some_and(|v| v.id == view_id)
            {
                state.selected_view = None;
            }
        });
    }

    /// Apply a mutation, write the persisted subset through when it was
    /// touched, then fan out the new state to subscribers. Persistence
    /// failures are logged, never raised; the bounded-loss window is at most
    /// the latest mutation.
    fn mutate(&self, touches_persisted: bool, f: impl FnOnce(&mut DashboardState)) {
        let snapshot = {
            let mut state = self.state.write();
            f(&mut state);
            state.clone()
        };

        if touches_persisted {
            if let Err(e) = self.storage.store(&PersistedState::snapshot_of(&snapshot)) {
                tracing::warn!("failed to persist dashboard state: {e:#}");
            }
        }

        for subscriber in self.subscribers.read().iter() {
            subscriber(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filter::{FilterField, FilterOperator, FilterValue};
    use crate::domain::metric::ChartType;
    use crate::infrastructure::file_storage::MemoryStorage;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn store() -> DashboardStore {
        DashboardStore::new(Arc::new(MemoryStorage::default()))
    }

    fn status_filter(id: &str, status: &str) -> FilterCondition {
        FilterCondition {
            id: id.to_string(),
            field: FilterField::Status,
            operator: FilterOperator::Equals(FilterValue::Text(status.to_string())),
        }
    }

    fn draft(name: &str, filters: Vec<FilterCondition>) -> ViewDraft {
        ViewDraft {
            name: name.to_string(),
            description: None,
            filters,
            date_range: DateRange::trailing_days(7),
            chart_type: ChartType::Line,
        }
    }

    #[test]
    fn add_then_remove_filter_leaves_filters_empty() {
        let store = store();
        store.add_filter(status_filter("f-1", "error"));
        assert_eq!(store.with_state(|s| s.filters.len()), 1);

        store.remove_filter("f-1");
        assert!(store.with_state(|s| s.filters.is_empty()));
    }

    #[test]
    fn remove_unknown_filter_is_a_noop() {
        let store = store();
        store.remove_filter("missing");
        assert!(store.with_state(|s| s.filters.is_empty()));
    }

    #[test]
    fn update_filter_merges_partial_fields() {
        let store = store();
        store.add_filter(status_filter("f-1", "error"));
        store.update_filter(
            "f-1",
            FilterUpdate {
                field: None,
                operator: Some(FilterOperator::Equals(FilterValue::Text(
                    "warning".to_string(),
                ))),
            },
        );

        let filters = store.with_state(|s| s.filters.clone());
        assert_eq!(filters[0].field, FilterField::Status);
        assert_eq!(
            filters[0].operator,
            FilterOperator::Equals(FilterValue::Text("warning".to_string()))
        );
    }

    #[test]
    fn update_unknown_filter_is_a_noop() {
        let store = store();
        store.update_filter("missing", FilterUpdate::default());
        assert!(store.with_state(|s| s.filters.is_empty()));
    }

    #[test]
    fn save_view_selects_it_and_snapshots_filters() {
        let store = store();
        store.add_filter(status_filter("f-1", "error"));

        let live_filters = store.with_state(|s| s.filters.clone());
        let view_id = store.save_view(draft("Errors Only", live_filters));

        let state = store.state();
        assert_eq!(state.saved_views.len(), 1);
        assert_eq!(state.saved_views[0].name, "Errors Only");
        assert_eq!(state.selected_view.as_ref().map(|v| v.id.as_str()), Some(view_id.as_str()));
    }

    #[test]
    fn saved_view_is_independent_of_live_filters() {
        let store = store();
        store.add_filter(status_filter("f-1", "error"));
        let view_id = store.save_view(draft("Errors Only", store.with_state(|s| s.filters.clone())));

        // Mutating the live set must not reach into the saved snapshot.
        store.remove_filter("f-1");
        store.add_filter(status_filter("f-2", "warning"));

        let saved = store.with_state(|s| s.saved_views[0].clone());
        assert_eq!(saved.id, view_id);
        assert_eq!(saved.filters.len(), 1);
        assert_eq!(saved.filters[0].id, "f-1");
    }

    #[test]
    fn load_view_restores_filters_and_range() {
        let store = store();
        store.add_filter(status_filter("f-1", "error"));
        let range = DateRange::trailing_days(30);
        store.set_date_range(range.clone());

        let mut view_draft = draft("Errors Only", store.with_state(|s| s.filters.clone()));
        view_draft.date_range = range.clone();
        let view_id = store.save_view(view_draft);

        store.remove_filter("f-1");
        store.set_date_range(DateRange::trailing_days(1));
        assert!(store.with_state(|s| s.filters.is_empty()));

        store.load_view(&view_id);
        let state = store.state();
        assert_eq!(state.filters.len(), 1);
        assert_eq!(state.filters[0].id, "f-1");
        assert_eq!(state.date_range, range);
    }

    #[test]
    fn load_unknown_view_keeps_previous_selection() {
        let store = store();
        let view_id = store.save_view(draft("Baseline", Vec::new()));

        store.load_view("missing");
        assert_eq!(
            store.with_state(|s| s.selected_view.as_ref().map(|v| v.id.clone())),
            Some(view_id)
        );
    }

    #[test]
    fn delete_selected_view_clears_selection() {
        let store = store();
        let view_id = store.save_view(draft("Baseline", Vec::new()));

        store.delete_view(&view_id);
        let state = store.state();
        assert!(state.saved_views.is_empty());
        assert!(state.selected_view.is_none());
    }

    #[test]
    fn delete_other_view_keeps_selection() {
        let store = store();
        let first = store.save_view(draft("First", Vec::new()));
        let second = store.save_view(draft("Second", Vec::new()));

        store.delete_view(&first);
        let state = store.state();
        assert_eq!(state.saved_views.len(), 1);
        assert_eq!(
            state.selected_view.as_ref().map(|v| v.id.as_str()),
            Some(second.as_str())
        );
    }

    #[test]
    fn errors_only_scenario_round_trips() {
        let store = store();
        assert!(store.with_state(|s| s.filters.is_empty() && s.saved_views.is_empty()));

        store.add_filter(status_filter("f-1", "error"));
        let view_id = store.save_view(draft("Errors Only", store.with_state(|s| s.filters.clone())));

        let state = store.state();
        assert_eq!(state.saved_views.len(), 1);
        assert_eq!(state.saved_views[0].filters.len(), 1);

        store.remove_filter("f-1");
        assert!(store.with_state(|s| s.filters.is_empty()));

        store.load_view(&view_id);
        assert_eq!(store.with_state(|s| s.filters.len()), 1);
    }

    #[test]
    fn filter_mutations_write_through_to_storage() {
        let storage = Arc::new(MemoryStorage::default());
        let store = DashboardStore::new(storage.clone());

        store.add_filter(status_filter("f-1", "error"));
        let persisted = storage.snapshot().expect("persisted after add_filter");
        assert_eq!(persisted.filters.len(), 1);

        store.remove_filter("f-1");
        let persisted = storage.snapshot().expect("persisted after remove_filter");
        assert!(persisted.filters.is_empty());
    }

    #[test]
    fn transient_mutations_skip_storage() {
        let storage = Arc::new(MemoryStorage::default());
        let store = DashboardStore::new(storage.clone());

        store.set_loading(true);
        store.set_error(Some("boom".to_string()));
        store.set_metrics(Vec::new());

        assert!(storage.snapshot().is_none());
    }

    #[test]
    fn hydration_restores_persisted_subset() {
        let storage = Arc::new(MemoryStorage::default());
        {
            let store = DashboardStore::new(storage.clone());
            store.add_filter(status_filter("f-1", "error"));
            store.save_view(draft("Errors Only", store.with_state(|s| s.filters.clone())));
        }

        let revived = DashboardStore::new(storage);
        let state = revived.state();
        assert_eq!(state.filters.len(), 1);
        assert_eq!(state.saved_views.len(), 1);
        // Selection is transient and does not survive restart.
        assert!(state.selected_view.is_none());
    }

    #[test]
    fn subscribers_observe_every_mutation() {
        let store = store();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_by_subscriber = seen.clone();
        store.subscribe(move |_state| {
            seen_by_subscriber.fetch_add(1, Ordering::SeqCst);
        });

        store.add_filter(status_filter("f-1", "error"));
        store.set_loading(true);
        store.remove_filter("f-1");

        assert_eq!(seen.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn empty_view_name_is_accepted() {
        let store = store();
        store.save_view(draft("", Vec::new()));
        assert_eq!(store.with_state(|s| s.saved_views.len()), 1);
    }
}
