//! Defines the core data model for ledger entries.

use time::OffsetDateTime;

/// Display label used when a transaction has no description.
pub const UNKNOWN_DESCRIPTION: &str = "Sem descrição";
/// Display label used when a transaction has no category.
pub const UNKNOWN_CATEGORY: &str = "Sem categoria";
/// Display label used when a transaction has no account.
pub const UNKNOWN_ACCOUNT: &str = "Sem conta";
/// Display label used when a transaction has no usable date.
pub const UNKNOWN_DATE: &str = "Sem data";
/// Display label for the carried-forward balance row.
pub const CARRIED_BALANCE_LABEL: &str = "Saldo anterior";

/// Whether a transaction represents money earned or money spent.
///
/// The launch type decides which display column (credit or debit) a
/// transaction's value populates. It is independent of the value's sign:
/// the data source is expected to supply revenues as positive values and
/// expenses as negative values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchType {
    /// Money earned; populates the credit column.
    Revenue,
    /// Money spent; populates the debit column.
    Expense,
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction, unique within a ledger.
    pub id: String,
    /// A text description of what the transaction was for, if any.
    pub description: Option<String>,
    /// The category the transaction belongs to, e.g. "Alimentação".
    pub category: Option<String>,
    /// The account the transaction belongs to, e.g. "Conta Corrente".
    pub account: Option<String>,
    /// The amount of money moved, signed: positive for revenues, negative
    /// for expenses.
    pub value: f64,
    /// Whether this transaction is a revenue or an expense.
    pub launch_type: LaunchType,
    /// When the money actually moved. This is the chronological anchor used
    /// for the running balance and for date ordering.
    pub payment_date: Option<OffsetDateTime>,
    /// When the transaction was recorded. Used as the tie-break when two
    /// payment dates coincide, and as the chronological anchor when the
    /// payment date is missing.
    pub created_at: Option<OffsetDateTime>,
    /// The running account balance after this transaction.
    ///
    /// This field is derived, not authoritative input: the balance
    /// accumulator overwrites it on every pass. It is `None` only on raw,
    /// unprocessed input.
    pub balance: Option<f64>,
}

/// A synthetic row representing the account balance carried forward from
/// before the start of the loaded ledger, rather than an actual transaction.
///
/// The balance accumulator seeds its running total from this row and never
/// recomputes the row's own balance.
#[derive(Debug, Clone, PartialEq)]
pub struct CarriedBalance {
    /// The balance at the point the ledger starts.
    pub starting_balance: f64,
    /// The date the carried balance was taken, used to place the row
    /// chronologically among the real transactions.
    pub as_of: Option<OffsetDateTime>,
}

/// A single row of the ledger: either a real transaction or the
/// carried-forward starting balance.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerEntry {
    /// A real transaction.
    Transaction(Transaction),
    /// The carried-forward starting balance.
    CarriedBalance(CarriedBalance),
}

impl LedgerEntry {
    /// The date that places this entry on the account's timeline: the
    /// payment date, falling back to the creation date when the payment
    /// date is missing.
    pub fn anchor_date(&self) -> Option<OffsetDateTime> {
        match self {
            LedgerEntry::Transaction(transaction) => {
                transaction.payment_date.or(transaction.created_at)
            }
            LedgerEntry::CarriedBalance(carried) => carried.as_of,
        }
    }

    /// The creation date used to break ties between entries sharing a
    /// payment date. The carried balance row uses its own as-of date.
    pub fn created_at(&self) -> Option<OffsetDateTime> {
        match self {
            LedgerEntry::Transaction(transaction) => transaction.created_at,
            LedgerEntry::CarriedBalance(carried) => carried.as_of,
        }
    }

    /// The balance shown for this entry, if one has been computed. The
    /// carried balance row always has one.
    pub fn balance(&self) -> Option<f64> {
        match self {
            LedgerEntry::Transaction(transaction) => transaction.balance,
            LedgerEntry::CarriedBalance(carried) => Some(carried.starting_balance),
        }
    }

    /// Whether this entry is the carried-forward starting balance.
    pub fn is_carried_balance(&self) -> bool {
        matches!(self, LedgerEntry::CarriedBalance(_))
    }
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(id: &str, value: f64, launch_type: LaunchType) -> TransactionBuilder {
        TransactionBuilder {
            id: id.to_owned(),
            description: None,
            category: None,
            account: None,
            value,
            launch_type,
            payment_date: None,
            created_at: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// Only the ID, value and launch type are required; the display attributes
/// and dates default to absent, which the view engine substitutes with the
/// canonical "unknown" labels.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBuilder {
    id: String,
    description: Option<String>,
    category: Option<String>,
    account: Option<String>,
    value: f64,
    launch_type: LaunchType,
    payment_date: Option<OffsetDateTime>,
    created_at: Option<OffsetDateTime>,
}

impl TransactionBuilder {
    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }

    /// Set the category for the transaction.
    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(category.to_owned());
        self
    }

    /// Set the account for the transaction.
    pub fn account(mut self, account: &str) -> Self {
        self.account = Some(account.to_owned());
        self
    }

    /// Set the payment date for the transaction.
    pub fn payment_date(mut self, payment_date: OffsetDateTime) -> Self {
        self.payment_date = Some(payment_date);
        self
    }

    /// Set the creation date for the transaction.
    pub fn created_at(mut self, created_at: OffsetDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Build the transaction. The balance starts unset; the balance
    /// accumulator fills it in.
    pub fn finish(self) -> Transaction {
        Transaction {
            id: self.id,
            description: self.description,
            category: self.category,
            account: self.account,
            value: self.value,
            launch_type: self.launch_type,
            payment_date: self.payment_date,
            created_at: self.created_at,
            balance: None,
        }
    }

    /// Build the transaction and wrap it as a [LedgerEntry].
    pub fn into_entry(self) -> LedgerEntry {
        LedgerEntry::Transaction(self.finish())
    }
}
