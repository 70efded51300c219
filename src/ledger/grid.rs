//! The pipeline that turns raw ledger entries into a displayable page, and
//! the stateful grid that drives it.

use std::collections::BTreeSet;

use super::balance::accumulate_balances;
use super::entry::LedgerEntry;
use super::fields::Field;
use super::filter::{FieldFilter, apply_filters};
use super::page::{PageMeta, paginate};
use super::sort::{SortConfig, sort_entries};

/// One rendered page of the ledger, plus the state needed to reflect the
/// controls (sort arrows, active-filter markers, pagination).
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerView {
    /// The entries on the current page, in display order, each carrying a
    /// computed balance.
    pub entries: Vec<LedgerEntry>,
    /// Where the page sits within the filtered, sorted sequence.
    pub meta: PageMeta,
    /// The sort that produced the display order.
    pub sort: SortConfig,
    /// The filters that produced the filtered sequence.
    pub filters: Vec<FieldFilter>,
}

/// Run the full pipeline: balance accumulation, filtering, sorting, paging.
///
/// This is a pure function of its inputs: no caching, no hidden state, and
/// the input slice is never mutated. Callers re-run it whenever any input
/// changes. Balances are computed chronologically before filtering and
/// sorting, so the display order never influences them.
pub fn render_ledger(
    entries: &[LedgerEntry],
    sort: SortConfig,
    filters: &[FieldFilter],
    page: u64,
    page_size: u64,
) -> LedgerView {
    let accumulated = accumulate_balances(entries);
    let filtered = apply_filters(&accumulated, filters);
    let sorted = sort_entries(&filtered, sort);
    let (page_entries, meta) = paginate(&sorted, page_size, page);

    LedgerView {
        entries: page_entries,
        meta,
        sort,
        filters: filters.to_vec(),
    }
}

/// The interactive state of the ledger table: active sort, active filters,
/// current page and page size.
///
/// The grid owns the page-reset policy: the page snaps back to 1 when the
/// caller signals a new logical dataset through the reset key, or when the
/// filtered row count changes under the user while they are off page 1.
/// Without the reset, a shrinking filter could strand the user on a page
/// past the data.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerGrid {
    sort: SortConfig,
    filters: Vec<FieldFilter>,
    current_page: u64,
    page_size: u64,
    reset_key: Option<String>,
    last_item_count: Option<usize>,
}

impl LedgerGrid {
    /// Create a grid showing `page_size` rows per page, sorted by the
    /// default order and starting on page 1 with no filters.
    pub fn new(page_size: u64) -> Self {
        Self {
            sort: SortConfig::default_config(),
            filters: Vec::new(),
            current_page: 1,
            page_size,
            reset_key: None,
            last_item_count: None,
        }
    }

    /// The active sort.
    pub fn sort(&self) -> SortConfig {
        self.sort
    }

    /// The active filters.
    pub fn filters(&self) -> &[FieldFilter] {
        &self.filters
    }

    /// The 1-indexed page currently shown.
    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    /// The number of rows per page.
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// React to a click on `field`'s column header: flip the direction if
    /// the field is already active, otherwise sort by it ascending.
    pub fn toggle_sort(&mut self, field: Field) {
        self.sort = self.sort.toggled(field);
    }

    /// Replace the filter for `field` with `allowed`.
    ///
    /// An empty selection removes the filter entirely; the field goes back
    /// to imposing no constraint. (An explicitly present filter with an
    /// empty allowed set would instead hide every row; the grid never keeps
    /// one around.)
    pub fn set_filter(&mut self, field: Field, allowed: BTreeSet<String>) {
        self.filters.retain(|filter| filter.field != field);

        if !allowed.is_empty() {
            self.filters.push(FieldFilter { field, allowed });
        }
    }

    /// Show `page`. Out-of-range values are accepted and render empty; the
    /// caller's controls are expected to only offer pages that exist.
    pub fn set_page(&mut self, page: u64) {
        self.current_page = page;
    }

    /// Change the page size and snap back to page 1, so the cursor can
    /// never silently point past the new last page.
    pub fn set_page_size(&mut self, page_size: u64) {
        self.page_size = page_size;
        self.current_page = 1;
    }

    /// Tell the grid which upstream dataset it is looking at.
    ///
    /// When the key differs from the previous one the page resets to 1;
    /// the very first key observed does not reset, so a freshly restored
    /// grid does not lose its position.
    pub fn sync_reset_key(&mut self, key: &str) {
        let changed = match self.reset_key.as_deref() {
            Some(previous) => previous != key,
            None => false,
        };

        if changed {
            self.current_page = 1;
        }

        self.reset_key = Some(key.to_owned());
    }

    /// Recompute the visible page from `entries`, applying the page-reset
    /// policy for row-count changes.
    pub fn render(&mut self, entries: &[LedgerEntry]) -> LedgerView {
        let accumulated = accumulate_balances(entries);
        let filtered = apply_filters(&accumulated, &self.filters);

        if let Some(previous) = self.last_item_count
            && previous != filtered.len()
            && self.current_page != 1
        {
            self.current_page = 1;
        }
        self.last_item_count = Some(filtered.len());

        let sorted = sort_entries(&filtered, self.sort);
        let (page_entries, meta) = paginate(&sorted, self.page_size, self.current_page);

        LedgerView {
            entries: page_entries,
            meta,
            sort: self.sort,
            filters: self.filters.clone(),
        }
    }
}
