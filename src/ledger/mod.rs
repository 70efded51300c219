//! The transaction ledger view engine.
//!
//! This module turns a raw, unordered collection of financial transactions
//! into a paginated, filterable, sortable table with a running account
//! balance:
//! - [accumulate_balances] computes the chronological running balance,
//! - [apply_filters] reduces the set by per-field allow-lists,
//! - [sort_entries] orders the set for display,
//! - [paginate] slices the ordered set into fixed-size pages,
//! - [render_ledger] and [LedgerGrid] compose the four stages,
//! - [field_value] is the one field-to-value mapping the sort comparators,
//!   the filter membership test and the filter menus all share.
//!
//! Everything here is synchronous and pure: each stage returns a new
//! sequence, and rendering the same inputs twice yields the same output.
//! The HTML page handler for the engine also lives here, next to the logic
//! it renders.

mod balance;
mod entry;
mod fields;
mod filter;
mod grid;
mod ledger_page;
mod page;
mod sort;
mod view;

pub use balance::accumulate_balances;
pub use entry::{
    CARRIED_BALANCE_LABEL, CarriedBalance, LaunchType, LedgerEntry, Transaction,
    TransactionBuilder, UNKNOWN_ACCOUNT, UNKNOWN_CATEGORY, UNKNOWN_DATE, UNKNOWN_DESCRIPTION,
};
pub use fields::{Field, FieldValue, collation_key, compare_values, field_value};
pub use filter::{FieldFilter, active_filter, apply_filters, filter_options};
pub use grid::{LedgerGrid, LedgerView, render_ledger};
pub use ledger_page::{LedgerQuery, LedgerViewState, get_transactions_page};
pub use page::{PageMeta, paginate};
pub use sort::{SortConfig, SortDirection, sort_entries};
