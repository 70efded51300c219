//! HTML rendering for the transactions page.

use maud::{Markup, html};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    currency::format_currency,
    endpoints,
    html::{
        FILTER_BADGE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
    },
    navigation::NavBar,
    pagination::PaginationIndicator,
};

use super::{
    entry::{CarriedBalance, LaunchType, LedgerEntry, Transaction},
    fields::{Field, field_value},
    filter::active_filter,
    ledger_page::{LedgerPageModel, LedgerUrl},
};

/// The max number of graphemes to display in the description cells before
/// truncating and displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

/// The table columns, left to right.
const LEDGER_COLUMNS: [Field; 7] = [
    Field::Date,
    Field::Description,
    Field::Category,
    Field::Account,
    Field::Credit,
    Field::Debit,
    Field::Balance,
];

/// The page sizes offered by the per-page selector.
const PAGE_SIZE_CHOICES: [u64; 3] = [10, 25, 50];

fn amount_class(amount: f64) -> &'static str {
    if amount < 0.0 {
        "text-red-700 dark:text-red-300"
    } else {
        "text-green-700 dark:text-green-300"
    }
}

pub(crate) fn transactions_view(model: &LedgerPageModel) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-6xl" id="ledger-content"
            {
                (ledger_content(model))
            }
        }
    };

    base("Lançamentos", &content)
}

/// The swappable part of the page: filter menus, the table and the
/// pagination controls. htmx requests replace only this.
pub(crate) fn ledger_content(model: &LedgerPageModel) -> Markup {
    html! {
        header class="flex justify-between flex-wrap items-center gap-3"
        {
            h1 class="text-xl font-bold" { "Lançamentos" }

            div class="flex items-center gap-2"
            {
                (filter_menu_view(Field::Category, &model.category_options, model))
                (filter_menu_view(Field::Account, &model.account_options, model))
            }
        }

        section class="rounded bg-gray-50 dark:bg-gray-800 overflow-x-auto"
        {
            table class="w-full my-2 text-sm text-left rtl:text-right
                text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        @for field in LEDGER_COLUMNS {
                            (header_cell_view(field, model))
                        }
                    }
                }

                tbody
                {
                    @for entry in &model.view.entries {
                        (entry_row_view(entry))
                    }

                    @if model.view.entries.is_empty() {
                        tr
                        {
                            td
                                colspan="7"
                                data-empty-state="true"
                                class="px-6 py-4 text-center"
                            {
                                "Nenhum lançamento nesta página."
                            }
                        }
                    }
                }
            }

            (pagination_view(model))
        }

        p class="text-xs text-gray-500 dark:text-gray-400"
        {
            "Gerado em " (model.generated_at)
        }
    }
}

fn header_cell_view(field: Field, model: &LedgerPageModel) -> Markup {
    let href = model
        .url
        .with_sort_toggled(field)
        .to_url(endpoints::TRANSACTIONS_VIEW);
    let sort = model.view.sort;
    let arrow = (sort.field == field).then(|| match sort.direction {
        super::SortDirection::Ascending => "▲",
        super::SortDirection::Descending => "▼",
    });
    let has_filter = active_filter(&model.view.filters, field).is_some();

    html! {
        th scope="col" class=(TABLE_CELL_STYLE)
        {
            div class="flex items-center gap-2"
            {
                a
                    href=(href)
                    data-sort-field=(field.as_query_value())
                    class="hover:underline"
                {
                    (field.label())
                }

                @if let Some(arrow) = arrow {
                    span aria-hidden="true" { (arrow) }
                }

                @if has_filter {
                    span class=(FILTER_BADGE_STYLE) title="Filtro ativo" { "•" }
                }
            }
        }
    }
}

fn entry_row_view(entry: &LedgerEntry) -> Markup {
    match entry {
        LedgerEntry::Transaction(transaction) => transaction_row_view(entry, transaction),
        LedgerEntry::CarriedBalance(carried) => carried_balance_row_view(entry, carried),
    }
}

fn transaction_row_view(entry: &LedgerEntry, transaction: &Transaction) -> Markup {
    let date_label = field_value(entry, Field::Date).display_text();
    let full_description = field_value(entry, Field::Description).display_text();
    let (description, tooltip) = format_description(&full_description);
    let category = field_value(entry, Field::Category).display_text();
    let account = field_value(entry, Field::Account).display_text();
    let credit = matches!(transaction.launch_type, LaunchType::Revenue)
        .then(|| format_currency(transaction.value));
    let debit = matches!(transaction.launch_type, LaunchType::Expense)
        .then(|| format_currency(transaction.value));
    let balance = transaction.balance.unwrap_or(0.0);

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
        {
            td class=(TABLE_CELL_STYLE) { (date_label) }
            td class=(TABLE_CELL_STYLE) title=[tooltip] { (description) }
            td class=(TABLE_CELL_STYLE) { (category) }
            td class=(TABLE_CELL_STYLE) { (account) }
            (amount_cell_view(credit, transaction.value))
            (amount_cell_view(debit, transaction.value))
            td class={ "px-6 py-4 text-right tabular-nums " (amount_class(balance)) }
            {
                (format_currency(balance))
            }
        }
    }
}

fn carried_balance_row_view(entry: &LedgerEntry, carried: &CarriedBalance) -> Markup {
    let date_label = field_value(entry, Field::Date).display_text();
    let label = field_value(entry, Field::Description).display_text();

    html! {
        tr class="bg-gray-50 italic dark:bg-gray-700/50" data-carried-balance-row="true"
        {
            td class=(TABLE_CELL_STYLE) { (date_label) }
            td class=(TABLE_CELL_STYLE) { (label) }
            td class=(TABLE_CELL_STYLE) {}
            td class=(TABLE_CELL_STYLE) {}
            td class="px-6 py-4 text-right" {}
            td class="px-6 py-4 text-right" {}
            td class={ "px-6 py-4 text-right tabular-nums " (amount_class(carried.starting_balance)) }
            {
                (format_currency(carried.starting_balance))
            }
        }
    }
}

fn amount_cell_view(amount_text: Option<String>, amount: f64) -> Markup {
    html! {
        td class="px-6 py-4 text-right tabular-nums"
        {
            @if let Some(ref amount_text) = amount_text {
                span class=(amount_class(amount)) { (amount_text) }
            } @else {
                span class="text-gray-400 dark:text-gray-500" { "-" }
            }
        }
    }
}

fn filter_menu_view(field: Field, options: &[String], model: &LedgerPageModel) -> Markup {
    let active = active_filter(&model.view.filters, field);
    let is_checked =
        |option: &str| active.is_some_and(|filter| filter.allowed.contains(option));
    let carried_filters = model
        .view
        .filters
        .iter()
        .filter(|filter| filter.field != field);

    html! {
        details class="relative"
        {
            summary
                class="cursor-pointer select-none list-none px-3 py-2 text-sm rounded border
                    border-gray-300 bg-white hover:bg-gray-100 dark:border-gray-600
                    dark:bg-gray-800 dark:hover:bg-gray-700"
            {
                (field.label())
                @if let Some(filter) = active {
                    " (" (filter.allowed.len()) ")"
                }
            }

            form
                method="get"
                action=(endpoints::TRANSACTIONS_VIEW)
                hx-get=(endpoints::TRANSACTIONS_VIEW)
                hx-target="#ledger-content"
                hx-swap="innerHTML"
                class="absolute right-0 z-10 mt-1 w-56 rounded border border-gray-200 bg-white
                    p-3 shadow-lg dark:border-gray-700 dark:bg-gray-800"
            {
                input type="hidden" name="sort" value=(model.url.sort().field.as_query_value());
                input type="hidden" name="dir" value=(model.url.sort().direction.as_query_value());
                input type="hidden" name="page" value="1";
                input type="hidden" name="page_size" value=(model.url.page_size());

                // Carry the other menus' selections so applying this one
                // does not clear them.
                @for filter in carried_filters {
                    @for value in &filter.allowed {
                        input type="hidden" name=(filter.field.as_query_value()) value=(value);
                    }
                }

                div class="max-h-64 overflow-y-auto space-y-1"
                {
                    @for option in options {
                        label class="flex items-center gap-2 text-sm"
                        {
                            input
                                type="checkbox"
                                name=(field.as_query_value())
                                value=(option)
                                checked[is_checked(option)];
                            span { (option) }
                        }
                    }
                }

                button
                    type="submit"
                    class="mt-2 w-full rounded bg-blue-600 px-2 py-1 text-sm text-white
                        hover:bg-blue-700"
                {
                    "Aplicar"
                }
            }
        }
    }
}

fn pagination_view(model: &LedgerPageModel) -> Markup {
    let meta = model.view.meta;
    let range_label = if meta.end_index > meta.start_index {
        format!(
            "Exibindo {} a {} de {}",
            meta.start_index + 1,
            meta.end_index,
            meta.total_items
        )
    } else {
        format!("Exibindo 0 de {}", meta.total_items)
    };

    html! {
        nav class="pagination flex flex-wrap items-center justify-between gap-3 px-6 py-3"
        {
            span class="text-sm text-gray-500 dark:text-gray-400" data-item-range="true"
            {
                (range_label)
            }

            ul class="flex items-center gap-1"
            {
                @for indicator in &model.indicators {
                    li { (indicator_view(indicator, &model.url)) }
                }
            }

            span class="flex items-center gap-2 text-sm"
            {
                "Por página:"
                @for size in PAGE_SIZE_CHOICES {
                    @if size == model.url.page_size() {
                        span class="font-bold text-gray-900 dark:text-white" { (size) }
                    } @else {
                        a
                            class=(LINK_STYLE)
                            href=(model.url.with_page_size(size).to_url(endpoints::TRANSACTIONS_VIEW))
                        {
                            (size)
                        }
                    }
                }
            }
        }
    }
}

fn indicator_view(indicator: &PaginationIndicator, url: &LedgerUrl) -> Markup {
    let page_link = |page: u64, label: String| {
        html! {
            a
                class="block px-3 py-2 rounded-sm text-blue-600 hover:underline"
                href=(url.with_page(page).to_url(endpoints::TRANSACTIONS_VIEW))
            {
                (label)
            }
        }
    };

    match indicator {
        PaginationIndicator::Page(page) => page_link(*page, page.to_string()),
        PaginationIndicator::BackButton(page) => page_link(*page, "Anterior".to_owned()),
        PaginationIndicator::NextButton(page) => page_link(*page, "Próxima".to_owned()),
        PaginationIndicator::CurrPage(page) => html! {
            span
                aria-current="page"
                class="block px-3 py-2 rounded-sm font-bold text-black dark:text-white"
            {
                (page)
            }
        },
        PaginationIndicator::Ellipsis => html! {
            span class="block px-2 py-2 text-gray-400" { "..." }
        },
    }
}

fn format_description(description: &str) -> (String, Option<&str>) {
    let description_length = description.graphemes(true).count();

    if description_length <= MAX_DESCRIPTION_GRAPHEMES {
        (description.to_owned(), None)
    } else {
        let truncated: String = description
            .graphemes(true)
            .take(MAX_DESCRIPTION_GRAPHEMES - 3)
            .collect();
        let truncated = truncated + "...";
        (truncated, Some(description))
    }
}
