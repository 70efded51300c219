//! Display ordering of ledger entries.

use serde::Deserialize;

use super::entry::LedgerEntry;
use super::fields::{Field, compare_values, field_value};

/// The direction a field is sorted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum SortDirection {
    /// Sort in order of increasing value.
    #[serde(rename = "asc")]
    Ascending,
    /// Sort in order of decreasing value.
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    /// The opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// The value used for this direction in URL query strings.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// The active sort: which field orders the table, and which way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig {
    /// The field entries are ordered by.
    pub field: Field,
    /// The direction of the ordering.
    pub direction: SortDirection,
}

impl SortConfig {
    /// The sort applied when the user has not chosen one: newest payments
    /// first, the usual order of a bank statement.
    pub fn default_config() -> Self {
        Self {
            field: Field::Date,
            direction: SortDirection::Descending,
        }
    }

    /// The sort that results from clicking `field`'s column header:
    /// clicking the active field flips the direction, clicking a new field
    /// starts ascending.
    pub fn toggled(self, field: Field) -> Self {
        if self.field == field {
            Self {
                field,
                direction: self.direction.flipped(),
            }
        } else {
            Self {
                field,
                direction: SortDirection::Ascending,
            }
        }
    }
}

/// Order `entries` by the configured field and direction.
///
/// Descending is the exact mirror of ascending for every field. The sort is
/// stable, so equal values (including entries with missing dates) keep
/// their relative order. Sorting never touches the computed balances: it
/// runs after the balance accumulator and only rearranges rows.
pub fn sort_entries(entries: &[LedgerEntry], config: SortConfig) -> Vec<LedgerEntry> {
    let mut ordered = entries.to_vec();

    ordered.sort_by(|a, b| {
        let ordering = compare_values(&field_value(a, config.field), &field_value(b, config.field));
        match config.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });

    ordered
}
