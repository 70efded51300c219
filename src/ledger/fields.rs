//! The single field-to-value mapping shared by sorting, filtering and the
//! filter menus.
//!
//! The sort comparators, the filter membership test and the filter menu's
//! candidate list must all see exactly the same value for a given entry and
//! field, otherwise a menu would offer strings that never match a row. Keep
//! [field_value] the only place that mapping lives.

use std::cmp::Ordering;

use serde::Deserialize;
use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::currency::format_currency;

use super::entry::{
    CARRIED_BALANCE_LABEL, LaunchType, LedgerEntry, UNKNOWN_ACCOUNT, UNKNOWN_CATEGORY,
    UNKNOWN_DATE, UNKNOWN_DESCRIPTION,
};

/// A sortable and filterable column of the ledger table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Field {
    /// The chronological anchor date.
    Date,
    /// The transaction description.
    Description,
    /// The transaction category.
    Category,
    /// The transaction account.
    Account,
    /// The value of revenue transactions; zero for everything else.
    Credit,
    /// The value of expense transactions; zero for everything else.
    Debit,
    /// The computed running balance.
    Balance,
}

impl Field {
    /// The value used for this field in URL query strings.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Description => "description",
            Self::Category => "category",
            Self::Account => "account",
            Self::Credit => "credit",
            Self::Debit => "debit",
            Self::Balance => "balance",
        }
    }

    /// The column heading shown for this field.
    pub fn label(self) -> &'static str {
        match self {
            Self::Date => "Data",
            Self::Description => "Descrição",
            Self::Category => "Categoria",
            Self::Account => "Conta",
            Self::Credit => "Crédito",
            Self::Debit => "Débito",
            Self::Balance => "Saldo",
        }
    }
}

/// The value a field takes for a particular entry.
///
/// The variant decides the comparison rule; [FieldValue::display_text] gives
/// the canonical string form that filtering matches and menus list.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A point on the account timeline; `None` when the entry has no usable
    /// date.
    Date(Option<OffsetDateTime>),
    /// A display string, already substituted with the canonical fallback
    /// when the underlying attribute was missing.
    Text(String),
    /// A signed monetary amount.
    Amount(f64),
}

const DATE_DISPLAY_FORMAT: &[BorrowedFormatItem] =
    format_description!("[day]/[month]/[year]");

impl FieldValue {
    /// The canonical string form of this value, as shown in table cells and
    /// filter menu checkboxes.
    ///
    /// Amounts render as the currency text of their absolute value: which
    /// column a value lands in already communicates its direction, so the
    /// menu entries stay free of signs.
    pub fn display_text(&self) -> String {
        match self {
            FieldValue::Date(Some(date)) => date
                .format(DATE_DISPLAY_FORMAT)
                .unwrap_or_else(|_| date.date().to_string()),
            FieldValue::Date(None) => UNKNOWN_DATE.to_owned(),
            FieldValue::Text(text) => text.clone(),
            FieldValue::Amount(amount) => format_currency(amount.abs()),
        }
    }
}

/// Map an entry and a field to the value used for sorting, filtering and
/// filter menu candidates.
pub fn field_value(entry: &LedgerEntry, field: Field) -> FieldValue {
    match entry {
        LedgerEntry::Transaction(transaction) => match field {
            Field::Date => FieldValue::Date(entry.anchor_date()),
            Field::Description => FieldValue::Text(text_or_fallback(
                transaction.description.as_deref(),
                UNKNOWN_DESCRIPTION,
            )),
            Field::Category => FieldValue::Text(text_or_fallback(
                transaction.category.as_deref(),
                UNKNOWN_CATEGORY,
            )),
            Field::Account => FieldValue::Text(text_or_fallback(
                transaction.account.as_deref(),
                UNKNOWN_ACCOUNT,
            )),
            Field::Credit => FieldValue::Amount(match transaction.launch_type {
                LaunchType::Revenue => transaction.value,
                LaunchType::Expense => 0.0,
            }),
            Field::Debit => FieldValue::Amount(match transaction.launch_type {
                LaunchType::Expense => transaction.value,
                LaunchType::Revenue => 0.0,
            }),
            Field::Balance => FieldValue::Amount(transaction.balance.unwrap_or(0.0)),
        },
        LedgerEntry::CarriedBalance(carried) => match field {
            Field::Date => FieldValue::Date(carried.as_of),
            Field::Description => FieldValue::Text(CARRIED_BALANCE_LABEL.to_owned()),
            Field::Category => FieldValue::Text(UNKNOWN_CATEGORY.to_owned()),
            Field::Account => FieldValue::Text(UNKNOWN_ACCOUNT.to_owned()),
            Field::Credit | Field::Debit => FieldValue::Amount(0.0),
            Field::Balance => FieldValue::Amount(carried.starting_balance),
        },
    }
}

/// Compare two field values under the field's comparison rule.
///
/// Missing dates compare as equal rather than erroring, so entries without a
/// usable date keep their relative order under the surrounding stable sort.
pub fn compare_values(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a, b) {
        (FieldValue::Date(Some(left)), FieldValue::Date(Some(right))) => left.cmp(right),
        (FieldValue::Date(_), FieldValue::Date(_)) => Ordering::Equal,
        (FieldValue::Text(left), FieldValue::Text(right)) => {
            collation_key(left).cmp(&collation_key(right))
        }
        (FieldValue::Amount(left), FieldValue::Amount(right)) => {
            left.partial_cmp(right).unwrap_or(Ordering::Equal)
        }
        // Mixed variants cannot arise from a single field; treat as equal.
        _ => Ordering::Equal,
    }
}

/// Reduce text to an accent- and case-insensitive key so that labels like
/// "Alimentação" and "alimentacao" order together.
pub fn collation_key(text: &str) -> String {
    let mut key = String::with_capacity(text.len());

    for ch in text.nfkd() {
        if is_combining_mark(ch) {
            continue;
        }
        for lower in ch.to_lowercase() {
            key.push(lower);
        }
    }

    key
}

fn text_or_fallback(text: Option<&str>, fallback: &str) -> String {
    match text {
        Some(text) if !text.trim().is_empty() => text.to_owned(),
        _ => fallback.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use time::macros::datetime;

    use crate::ledger::entry::{CarriedBalance, LaunchType, LedgerEntry, Transaction};

    use super::{Field, FieldValue, collation_key, compare_values, field_value};

    fn revenue(value: f64) -> LedgerEntry {
        Transaction::build("t1", value, LaunchType::Revenue).into_entry()
    }

    fn expense(value: f64) -> LedgerEntry {
        Transaction::build("t2", value, LaunchType::Expense).into_entry()
    }

    #[test]
    fn credit_is_zero_for_expenses() {
        assert_eq!(field_value(&expense(-50.0), Field::Credit), FieldValue::Amount(0.0));
        assert_eq!(field_value(&revenue(20.0), Field::Credit), FieldValue::Amount(20.0));
    }

    #[test]
    fn debit_is_zero_for_revenues() {
        assert_eq!(field_value(&revenue(20.0), Field::Debit), FieldValue::Amount(0.0));
        assert_eq!(field_value(&expense(-50.0), Field::Debit), FieldValue::Amount(-50.0));
    }

    #[test]
    fn missing_strings_use_canonical_fallbacks() {
        let entry = revenue(10.0);

        assert_eq!(
            field_value(&entry, Field::Description).display_text(),
            "Sem descrição"
        );
        assert_eq!(
            field_value(&entry, Field::Category).display_text(),
            "Sem categoria"
        );
        assert_eq!(field_value(&entry, Field::Account).display_text(), "Sem conta");
    }

    #[test]
    fn blank_strings_are_treated_as_missing() {
        let entry = Transaction::build("t1", 10.0, LaunchType::Revenue)
            .category("   ")
            .into_entry();

        assert_eq!(
            field_value(&entry, Field::Category).display_text(),
            "Sem categoria"
        );
    }

    #[test]
    fn amounts_display_as_absolute_currency_text() {
        let value = field_value(&expense(-50.0), Field::Debit);

        assert_eq!(value.display_text(), "R$50.00");
    }

    #[test]
    fn dates_display_as_day_month_year() {
        let entry = Transaction::build("t1", 10.0, LaunchType::Revenue)
            .payment_date(datetime!(2024-01-05 0:00 UTC))
            .into_entry();

        assert_eq!(field_value(&entry, Field::Date).display_text(), "05/01/2024");
    }

    #[test]
    fn missing_dates_display_fallback_and_compare_equal() {
        let dated = FieldValue::Date(Some(datetime!(2024-01-05 0:00 UTC)));
        let missing = FieldValue::Date(None);

        assert_eq!(missing.display_text(), "Sem data");
        assert_eq!(compare_values(&missing, &dated), Ordering::Equal);
        assert_eq!(compare_values(&missing, &missing), Ordering::Equal);
    }

    #[test]
    fn carried_balance_exposes_starting_balance_and_label() {
        let entry = LedgerEntry::CarriedBalance(CarriedBalance {
            starting_balance: 500.0,
            as_of: None,
        });

        assert_eq!(
            field_value(&entry, Field::Description).display_text(),
            "Saldo anterior"
        );
        assert_eq!(field_value(&entry, Field::Balance), FieldValue::Amount(500.0));
        assert_eq!(field_value(&entry, Field::Credit), FieldValue::Amount(0.0));
    }

    #[test]
    fn collation_ignores_case_and_accents() {
        assert_eq!(collation_key("Alimentação"), "alimentacao");
        assert_eq!(
            compare_values(
                &FieldValue::Text("alimentacao".to_owned()),
                &FieldValue::Text("Alimentação".to_owned())
            ),
            Ordering::Equal
        );
    }

    #[test]
    fn text_comparison_orders_accented_labels_sensibly() {
        let order = compare_values(
            &FieldValue::Text("Água".to_owned()),
            &FieldValue::Text("Aluguel".to_owned()),
        );

        assert_eq!(order, Ordering::Less);
    }
}
