// Filter predicate engine - reduces metric records with active conditions
use crate::domain::filter::FilterCondition;
use crate::domain::metric::MetricRecord;
use std::borrow::Cow;

/// Return the subsequence of `records` matching every condition, in input
/// order. An empty condition set borrows the input instead of copying it.
pub fn apply<'a>(
    records: &'a [MetricRecord],
    conditions: &[FilterCondition],
) -> Cow<'a, [MetricRecord]> {
    if conditions.is_empty() {
        return Cow::Borrowed(records);
    }

    Cow::Owned(
        records
            .iter()
            .filter(|record| conditions.iter().all(|condition| condition.matches(record)))
            .cloned()
            .collect(),
    )
}
