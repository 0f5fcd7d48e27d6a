// Date range and saved view domain models
use super::filter::FilterCondition;
use super::metric::ChartType;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The [start, end] window used to scope metric queries. Ordering is not
/// enforced; `is_ordered` lets callers decide whether to warn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Range ending now and starting `days` days earlier.
    pub fn trailing_days(days: i64) -> Self {
        let end = Utc::now();
        Self {
            start: end - Duration::days(days),
            end,
        }
    }

    pub fn is_ordered(&self) -> bool {
        self.start <= self.end
    }
}

/// A named, persisted snapshot of filters + date range + chart type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedView {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub filters: Vec<FilterCondition>,
    pub date_range: DateRange,
    pub chart_type: ChartType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What the caller supplies when saving a view; id and timestamps are
/// generated at save time.
#[derive(Debug, Clone)]
pub struct ViewDraft {
    pub name: String,
    pub description: Option<String>,
    pub filters: Vec<FilterCondition>,
    pub date_range: DateRange,
    pub chart_type: ChartType,
}

impl SavedView {
    pub fn from_draft(draft: ViewDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            description: draft.description,
            filters: draft.filters,
            date_range: draft.date_range,
            chart_type: draft.chart_type,
            created_at: now,
            updated_at: now,
        }
    }
}
