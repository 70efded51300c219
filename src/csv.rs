//! Loads the ledger from a CSV export.
//!
//! The engine itself does not fetch or persist anything; the server feeds
//! it a set of entries read once at startup. The expected columns are
//! `id,description,category,account,value,launch_type,payment_date,created_at,balance`.
//! One row may carry the reserved id `previous-balance`: it is not a real
//! transaction but the balance carried forward from before the export, and
//! is mapped onto a [CarriedBalance] entry here so the rest of the crate
//! never has to compare id strings.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

use crate::Error;
use crate::ledger::{CarriedBalance, LaunchType, LedgerEntry, Transaction};

/// The reserved id marking the carried-forward balance row in CSV input.
const CARRIED_BALANCE_ID: &str = "previous-balance";

#[derive(Debug, Deserialize)]
struct RawRecord {
    id: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    account: String,
    #[serde(default)]
    value: String,
    #[serde(default)]
    launch_type: String,
    #[serde(default)]
    payment_date: String,
    #[serde(default)]
    created_at: String,
    #[serde(default)]
    balance: String,
}

/// Read ledger entries from the CSV file at `path`.
///
/// # Errors
/// Returns [Error::LedgerFileRead] if the file cannot be opened and
/// [Error::InvalidCsv] if it is not valid CSV. Degraded values inside an
/// otherwise well-formed file (bad dates, bad numbers, unknown launch
/// types) never fail the load; they fall back to the defaults described on
/// [parse_ledger_csv].
pub fn load_ledger_csv(path: &Path) -> Result<Vec<LedgerEntry>, Error> {
    let file = std::fs::File::open(path)
        .map_err(|error| Error::LedgerFileRead(format!("{}: {error}", path.display())))?;

    parse_ledger_csv(file)
}

/// Parse ledger entries from CSV text.
///
/// Row-level recovery rules:
/// - dates parse as RFC 3339, then `YYYY-MM-DD HH:MM:SS`, then bare
///   `YYYY-MM-DD` (midnight UTC); anything else becomes a missing date,
/// - an unparseable `value` counts as zero,
/// - an unknown `launch_type` is inferred from the value's sign,
/// - only the first `previous-balance` row is kept; extras are dropped
///   with a warning.
pub fn parse_ledger_csv<R: Read>(reader: R) -> Result<Vec<LedgerEntry>, Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut entries = Vec::new();
    let mut saw_carried_balance = false;

    for record in csv_reader.deserialize::<RawRecord>() {
        let record = record.map_err(|error| Error::InvalidCsv(error.to_string()))?;

        if record.id == CARRIED_BALANCE_ID {
            if saw_carried_balance {
                tracing::warn!(
                    "ignoring extra {CARRIED_BALANCE_ID} row; a ledger carries at most one"
                );
                continue;
            }
            saw_carried_balance = true;

            entries.push(LedgerEntry::CarriedBalance(CarriedBalance {
                starting_balance: parse_amount(&record.balance, "balance").unwrap_or(0.0),
                as_of: parse_timestamp(&record.payment_date)
                    .or_else(|| parse_timestamp(&record.created_at)),
            }));
            continue;
        }

        entries.push(LedgerEntry::Transaction(transaction_from_record(record)));
    }

    Ok(entries)
}

fn transaction_from_record(record: RawRecord) -> Transaction {
    let value = parse_amount(&record.value, "value").unwrap_or(0.0);

    let launch_type = match record.launch_type.as_str() {
        "revenue" => LaunchType::Revenue,
        "expense" => LaunchType::Expense,
        other => {
            if !other.is_empty() {
                tracing::debug!("unknown launch type {other:?}; inferring from the value's sign");
            }
            if value < 0.0 {
                LaunchType::Expense
            } else {
                LaunchType::Revenue
            }
        }
    };

    Transaction {
        id: record.id,
        description: non_empty(record.description),
        category: non_empty(record.category),
        account: non_empty(record.account),
        value,
        launch_type,
        payment_date: parse_timestamp(&record.payment_date),
        created_at: parse_timestamp(&record.created_at),
        balance: None,
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.trim().is_empty() { None } else { Some(text) }
}

fn parse_amount(text: &str, column: &str) -> Option<f64> {
    if text.is_empty() {
        return None;
    }

    match text.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Some(amount),
        _ => {
            tracing::debug!("could not parse {column} {text:?}; treating as missing");
            None
        }
    }
}

const DATE_ONLY_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");
const DATE_TIME_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Parse an ISO-ish timestamp leniently. Unparseable input becomes `None`
/// rather than an error, so one bad date cannot take down the whole page.
fn parse_timestamp(text: &str) -> Option<OffsetDateTime> {
    if text.is_empty() {
        return None;
    }

    if let Ok(timestamp) = OffsetDateTime::parse(text, &Rfc3339) {
        return Some(timestamp);
    }

    if let Ok(timestamp) = PrimitiveDateTime::parse(text, DATE_TIME_FORMAT) {
        return Some(timestamp.assume_utc());
    }

    if let Ok(date) = Date::parse(text, DATE_ONLY_FORMAT) {
        return Some(date.midnight().assume_utc());
    }

    tracing::debug!("could not parse timestamp {text:?}; treating as missing");
    None
}
