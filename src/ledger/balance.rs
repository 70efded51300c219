//! Running-balance computation over a set of ledger entries.

use std::cmp::Ordering;

use super::entry::LedgerEntry;

/// Compute the running account balance for every entry.
///
/// Returns the same entries ordered chronologically ascending, each
/// transaction carrying the balance after it. The running total is seeded
/// from the carried-balance row when present (its own balance is left
/// untouched), and from zero otherwise.
///
/// The chronological order produced here is an internal detail of the
/// computation: callers re-apply the display sort afterwards.
pub fn accumulate_balances(entries: &[LedgerEntry]) -> Vec<LedgerEntry> {
    let mut ordered = entries.to_vec();
    ordered.sort_by(cmp_chronological);

    let mut running = ordered
        .iter()
        .find_map(|entry| match entry {
            LedgerEntry::CarriedBalance(carried) => Some(carried.starting_balance),
            LedgerEntry::Transaction(_) => None,
        })
        .unwrap_or(0.0);

    for entry in &mut ordered {
        if let LedgerEntry::Transaction(transaction) = entry {
            running += transaction.value;
            transaction.balance = Some(running);
        }
    }

    ordered
}

/// Order entries by anchor date ascending, breaking ties by creation date.
///
/// Entries without a comparable date pair report `Equal` so the surrounding
/// stable sort preserves their relative input order instead of erroring.
fn cmp_chronological(a: &LedgerEntry, b: &LedgerEntry) -> Ordering {
    match (a.anchor_date(), b.anchor_date()) {
        (Some(left), Some(right)) => left
            .cmp(&right)
            .then_with(|| match (a.created_at(), b.created_at()) {
                (Some(left), Some(right)) => left.cmp(&right),
                _ => Ordering::Equal,
            }),
        _ => Ordering::Equal,
    }
}
