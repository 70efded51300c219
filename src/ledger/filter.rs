//! Per-field allow-list filtering of ledger entries.

use std::collections::BTreeSet;

use super::fields::{Field, compare_values, field_value};
use super::entry::LedgerEntry;

/// An active filter: the set of values a field is allowed to take.
///
/// Membership is tested against the canonical display string of the field
/// (see [field_value][super::fields::field_value]), so the allowed values
/// are exactly the strings the filter menu offers.
///
/// An empty allowed set keeps nothing: deselecting every value in a menu
/// means "show nothing", not "show everything". The opposite state, a field
/// with no filter at all, is expressed by omitting the entry from the
/// filter list, which the grid does when a menu's selection is cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    /// The field this filter constrains.
    pub field: Field,
    /// The display strings the field may take.
    pub allowed: BTreeSet<String>,
}

impl FieldFilter {
    /// Create a filter for `field` allowing exactly `values`.
    pub fn new<I, S>(field: Field, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field,
            allowed: values.into_iter().map(Into::into).collect(),
        }
    }

    fn matches(&self, entry: &LedgerEntry) -> bool {
        self.allowed
            .contains(&field_value(entry, self.field).display_text())
    }
}

/// Keep the entries that satisfy every filter in `filters`.
///
/// Filters on distinct fields combine conjunctively; a field absent from
/// `filters` imposes no constraint.
pub fn apply_filters(entries: &[LedgerEntry], filters: &[FieldFilter]) -> Vec<LedgerEntry> {
    if filters.is_empty() {
        return entries.to_vec();
    }

    entries
        .iter()
        .filter(|entry| filters.iter().all(|filter| filter.matches(entry)))
        .cloned()
        .collect()
}

/// The distinct values a field takes across `entries`, as canonical display
/// strings ordered by the field's comparison rule.
///
/// This is the candidate list a filter menu offers. It goes through the
/// same extraction as the membership test, so every listed value matches at
/// least one row.
pub fn filter_options(entries: &[LedgerEntry], field: Field) -> Vec<String> {
    let mut values: Vec<_> = entries
        .iter()
        .map(|entry| field_value(entry, field))
        .collect();
    values.sort_by(compare_values);

    let mut options: Vec<String> = values.iter().map(|value| value.display_text()).collect();
    options.dedup();
    options
}

/// The active filter for `field`, if one exists.
pub fn active_filter(filters: &[FieldFilter], field: Field) -> Option<&FieldFilter> {
    filters.iter().find(|filter| filter.field == field)
}
