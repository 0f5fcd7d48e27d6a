// Filter condition domain models and per-record predicate evaluation
use super::metric::MetricRecord;
use serde::{Deserialize, Serialize};

/// Record attributes eligible for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterField {
    Category,
    Status,
    Value,
}

/// Scalar comparison value for `equals`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Number(f64),
    Text(String),
}

/// Operator together with the value shape it requires, so an invalid
/// operator/value pairing cannot be constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operator", content = "value", rename_all = "camelCase")]
pub enum FilterOperator {
    Equals(FilterValue),
    Contains(String),
    GreaterThan(f64),
    LessThan(f64),
    Between(f64, f64),
}

/// One predicate applied to metric records. `id` is the identity used for
/// removal and update; uniqueness is the caller's responsibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub id: String,
    pub field: FilterField,
    pub operator: FilterOperator,
}

/// Partial update merged into an existing condition by id.
#[derive(Debug, Clone, Default)]
pub struct FilterUpdate {
    pub field: Option<FilterField>,
    pub operator: Option<FilterOperator>,
}

impl FilterUpdate {
    pub fn apply_to(&self, condition: &mut FilterCondition) {
        if let Some(field) = self.field {
            condition.field = field;
        }
        if let Some(operator) = &self.operator {
            condition.operator = operator.clone();
        }
    }
}

enum FieldValue<'a> {
    Number(f64),
    Text(&'a str),
}

impl FilterCondition {
    /// Evaluate this condition against one record. Type mismatches (a numeric
    /// operator against a string field) evaluate false, never fault.
    pub fn matches(&self, record: &MetricRecord) -> bool {
        let field = match self.field {
            FilterField::Category => FieldValue::Text(record.category.as_str()),
            FilterField::Status => FieldValue::Text(record.status.as_str()),
            FilterField::Value => FieldValue::Number(record.value),
        };

        match &self.operator {
            FilterOperator::Equals(expected) => match (&field, expected) {
                (FieldValue::Number(actual), FilterValue::Number(expected)) => actual == expected,
                (FieldValue::Text(actual), FilterValue::Text(expected)) => {
                    *actual == expected.as_str()
                }
                _ => false,
            },
            FilterOperator::Contains(needle) => {
                let haystack = match field {
                    FieldValue::Text(text) => text.to_lowercase(),
                    FieldValue::Number(value) => value.to_string(),
                };
                haystack.contains(&needle.to_lowercase())
            }
            FilterOperator::GreaterThan(limit) => {
                matches!(field, FieldValue::Number(actual) if actual > *limit)
            }
            FilterOperator::LessThan(limit) => {
                matches!(field, FieldValue::Number(actual) if actual < *limit)
            }
            // Inclusive on both ends; lo <= hi is not enforced, an inverted
            // range simply matches nothing.
            FilterOperator::Between(lo, hi) => {
                matches!(field, FieldValue::Number(actual) if actual >= *lo && actual <= *hi)
            }
        }
    }
}
