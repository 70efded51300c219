//! Defines the route handler for the page that displays the ledger as a
//! table.

use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Query;
use axum_htmx::HxRequest;
use serde::Deserialize;
use time::{OffsetDateTime, UtcOffset};

use crate::{
    AppState, Error, endpoints,
    pagination::{PaginationConfig, PaginationIndicator, create_pagination_indicators},
    timezone::{format_generated_at, get_local_offset},
};

use super::{
    Field, FieldFilter, LedgerEntry, LedgerView, SortConfig, SortDirection, accumulate_balances,
    filter_options, render_ledger,
    view::{ledger_content, transactions_view},
};

/// The query parameters accepted by the transactions page.
///
/// The filter parameters repeat, one occurrence per allowed value
/// (`?category=Alimentação&category=Lazer`); an absent parameter leaves the
/// field unconstrained.
#[derive(Debug, Default, Deserialize)]
pub struct LedgerQuery {
    /// The field ordering the table.
    pub sort: Option<Field>,
    /// The sort direction.
    pub dir: Option<SortDirection>,
    /// The 1-indexed page to display.
    pub page: Option<u64>,
    /// The number of rows per page.
    pub page_size: Option<u64>,
    /// The category values to keep.
    #[serde(default)]
    pub category: Vec<String>,
    /// The account values to keep.
    #[serde(default)]
    pub account: Vec<String>,
}

/// Internal, validated selection of display options after normalization.
///
/// This is the source of truth for behavior: defaults applied, page and
/// page size forced to at least 1.
struct NormalizedQuery {
    /// The active sort.
    sort: SortConfig,
    /// The 1-indexed page to display.
    page: u64,
    /// Rows per page.
    page_size: u64,
    /// Active per-field filters.
    filters: Vec<FieldFilter>,
}

enum QueryDecision {
    Redirect(String),
    Normalized(NormalizedQuery),
}

/// URL encoding helper for the transactions page query params.
///
/// This is used to build consistent sort, page and filter links from
/// already-normalized values.
#[derive(Debug, Clone)]
pub(crate) struct LedgerUrl {
    sort: SortConfig,
    page: u64,
    page_size: u64,
    filters: Vec<FieldFilter>,
}

impl LedgerUrl {
    fn from_normalized(options: &NormalizedQuery) -> Self {
        Self {
            sort: options.sort,
            page: options.page,
            page_size: options.page_size,
            filters: options.filters.clone(),
        }
    }

    /// The active sort the links are built around.
    pub(crate) fn sort(&self) -> SortConfig {
        self.sort
    }

    /// Rows per page encoded in the links.
    pub(crate) fn page_size(&self) -> u64 {
        self.page_size
    }

    /// The link produced by clicking `field`'s column header. Toggling the
    /// sort keeps the current page: reordering does not change how many
    /// rows there are.
    pub(crate) fn with_sort_toggled(&self, field: Field) -> Self {
        Self {
            sort: self.sort.toggled(field),
            ..self.clone()
        }
    }

    /// The link to `page`.
    pub(crate) fn with_page(&self, page: u64) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    /// The link that switches to `page_size` rows per page, back on page 1.
    pub(crate) fn with_page_size(&self, page_size: u64) -> Self {
        Self {
            page: 1,
            page_size,
            ..self.clone()
        }
    }

    pub(crate) fn to_query_string(&self) -> String {
        let mut pairs: Vec<(&str, String)> = vec![
            ("sort", self.sort.field.as_query_value().to_owned()),
            ("dir", self.sort.direction.as_query_value().to_owned()),
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
        ];

        for filter in &self.filters {
            for value in &filter.allowed {
                pairs.push((filter.field.as_query_value(), value.clone()));
            }
        }

        serde_urlencoded::to_string(&pairs).unwrap_or_else(|error| {
            tracing::error!("Could not encode ledger query params: {error}");
            String::new()
        })
    }

    pub(crate) fn to_url(&self, route: &str) -> String {
        format!("{route}?{}", self.to_query_string())
    }
}

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct LedgerViewState {
    /// The ledger entries to display.
    pub entries: Arc<Vec<LedgerEntry>>,
    /// The local timezone as a canonical timezone name.
    pub local_timezone: String,
    /// Display defaults for paging.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for LedgerViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            entries: state.entries.clone(),
            local_timezone: state.local_timezone.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Everything the view needs to render the transactions page.
pub(crate) struct LedgerPageModel {
    /// The computed page of the ledger.
    pub(crate) view: LedgerView,
    /// Candidate values for the category filter menu.
    pub(crate) category_options: Vec<String>,
    /// Candidate values for the account filter menu.
    pub(crate) account_options: Vec<String>,
    /// The pagination indicator row.
    pub(crate) indicators: Vec<PaginationIndicator>,
    /// Link builder seeded with the current display state.
    pub(crate) url: LedgerUrl,
    /// Footer label with the local render time.
    pub(crate) generated_at: String,
}

/// Render an overview of the ledger as a sortable, filterable table.
///
/// htmx requests receive only the table fragment so filter and sort
/// changes swap in place; everything else receives the full page.
pub async fn get_transactions_page(
    State(state): State<LedgerViewState>,
    HxRequest(is_htmx_request): HxRequest,
    Query(query): Query<LedgerQuery>,
) -> Result<Response, Error> {
    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Err(Error::InvalidTimezone(state.local_timezone.clone()));
    };

    let options = match normalize_query(query, &state.pagination_config) {
        QueryDecision::Normalized(options) => options,
        QueryDecision::Redirect(redirect_url) => {
            return Ok(Redirect::to(&redirect_url).into_response());
        }
    };

    let model = build_ledger_page_model(
        &state.entries,
        options,
        &state.pagination_config,
        local_offset,
    );

    if is_htmx_request {
        Ok(ledger_content(&model).into_response())
    } else {
        Ok(transactions_view(&model).into_response())
    }
}

fn normalize_query(query: LedgerQuery, config: &PaginationConfig) -> QueryDecision {
    let has_missing_params = query.sort.is_none()
        || query.dir.is_none()
        || query.page.is_none()
        || query.page_size.is_none();
    let has_out_of_range_params = query.page == Some(0) || query.page_size == Some(0);

    let sort = match (query.sort, query.dir) {
        (Some(field), Some(direction)) => SortConfig { field, direction },
        // A sort without a direction behaves like clicking a fresh column.
        (Some(field), None) => SortConfig {
            field,
            direction: SortDirection::Ascending,
        },
        (None, _) => SortConfig::default_config(),
    };
    let page = query.page.unwrap_or(config.default_page).max(1);
    let page_size = query.page_size.unwrap_or(config.default_page_size).max(1);

    let mut filters = Vec::new();
    if !query.category.is_empty() {
        filters.push(FieldFilter::new(Field::Category, query.category));
    }
    if !query.account.is_empty() {
        filters.push(FieldFilter::new(Field::Account, query.account));
    }

    let options = NormalizedQuery {
        sort,
        page,
        page_size,
        filters,
    };

    if has_missing_params || has_out_of_range_params {
        let redirect_url =
            LedgerUrl::from_normalized(&options).to_url(endpoints::TRANSACTIONS_VIEW);
        return QueryDecision::Redirect(redirect_url);
    }

    QueryDecision::Normalized(options)
}

fn build_ledger_page_model(
    entries: &[LedgerEntry],
    options: NormalizedQuery,
    config: &PaginationConfig,
    local_offset: UtcOffset,
) -> LedgerPageModel {
    // The menus offer values from the whole accumulated set, not the
    // filtered one, so a filter can always be widened again.
    let accumulated = accumulate_balances(entries);
    let category_options = filter_options(&accumulated, Field::Category);
    let account_options = filter_options(&accumulated, Field::Account);

    let view = render_ledger(
        entries,
        options.sort,
        &options.filters,
        options.page,
        options.page_size,
    );
    let indicators =
        create_pagination_indicators(options.page, view.meta.total_pages, config.max_pages);
    let url = LedgerUrl::from_normalized(&options);
    let generated_at = format_generated_at(OffsetDateTime::now_utc(), local_offset);

    LedgerPageModel {
        view,
        category_options,
        account_options,
        indicators,
        url,
        generated_at,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        extract::State,
        http::StatusCode,
        response::Response,
    };
    use axum_extra::extract::Query;
    use axum_htmx::HxRequest;
    use scraper::{ElementRef, Html, Selector};
    use time::macros::datetime;

    use crate::endpoints;
    use crate::ledger::{CarriedBalance, LaunchType, LedgerEntry, Transaction};
    use crate::pagination::PaginationConfig;

    use super::{LedgerQuery, LedgerViewState, get_transactions_page};

    fn sample_state(entries: Vec<LedgerEntry>) -> LedgerViewState {
        LedgerViewState {
            entries: Arc::new(entries),
            local_timezone: "Etc/UTC".to_owned(),
            pagination_config: PaginationConfig::default(),
        }
    }

    fn two_transactions() -> Vec<LedgerEntry> {
        vec![
            Transaction::build("t1", 100.0, LaunchType::Revenue)
                .description("Salário")
                .category("Renda")
                .payment_date(datetime!(2024-01-05 0:00 UTC))
                .into_entry(),
            Transaction::build("t2", -30.0, LaunchType::Expense)
                .description("Mercado")
                .category("Alimentação")
                .payment_date(datetime!(2024-01-03 0:00 UTC))
                .into_entry(),
        ]
    }

    fn explicit_query() -> LedgerQuery {
        LedgerQuery {
            sort: Some(crate::ledger::Field::Date),
            dir: Some(crate::ledger::SortDirection::Descending),
            page: Some(1),
            page_size: Some(10),
            ..Default::default()
        }
    }

    async fn render(state: LedgerViewState, query: LedgerQuery) -> Html {
        let response = get_transactions_page(State(state), HxRequest(false), Query(query))
            .await
            .unwrap();
        parse_html(response).await
    }

    async fn parse_html(response: Response) -> Html {
        let body = response.into_body();
        let body = axum::body::to_bytes(body, usize::MAX)
            .await
            .expect("Could not get response body");
        let text = String::from_utf8_lossy(&body).to_string();

        Html::parse_document(&text)
    }

    #[track_caller]
    fn assert_valid_html(html: &Html) {
        assert!(
            html.errors.is_empty(),
            "Got HTML parsing errors: {:?}",
            html.errors
        );
    }

    #[track_caller]
    fn transaction_rows(html: &Html) -> Vec<ElementRef<'_>> {
        html.select(&Selector::parse("tbody tr[data-transaction-row='true']").unwrap())
            .collect()
    }

    fn cell_texts(row: ElementRef<'_>) -> Vec<String> {
        row.select(&Selector::parse("td").unwrap())
            .map(|cell| cell.text().collect::<String>().trim().to_owned())
            .collect()
    }

    #[tokio::test]
    async fn page_shows_rows_with_running_balances() {
        let html = render(sample_state(two_transactions()), explicit_query()).await;

        assert_valid_html(&html);
        let rows = transaction_rows(&html);
        assert_eq!(rows.len(), 2, "want two transaction rows");

        // Newest payment first under the default sort; balances follow the
        // chronological accumulation regardless.
        let first = cell_texts(rows[0]);
        let second = cell_texts(rows[1]);
        assert_eq!(first[0], "05/01/2024");
        assert_eq!(first[1], "Salário");
        assert_eq!(first[6], "R$70.00");
        assert_eq!(second[0], "03/01/2024");
        assert_eq!(second[6], "-R$30.00");
    }

    #[tokio::test]
    async fn credit_and_debit_columns_follow_the_launch_type() {
        let html = render(sample_state(two_transactions()), explicit_query()).await;

        let rows = transaction_rows(&html);
        let revenue = cell_texts(rows[0]);
        let expense = cell_texts(rows[1]);

        assert_eq!(revenue[4], "R$100.00", "revenue populates the credit column");
        assert_eq!(revenue[5], "-", "revenue leaves the debit column empty");
        assert_eq!(expense[4], "-", "expense leaves the credit column empty");
        assert_eq!(expense[5], "-R$30.00", "expense populates the debit column");
    }

    #[tokio::test]
    async fn carried_balance_renders_as_its_own_row() {
        let mut entries = two_transactions();
        entries.push(LedgerEntry::CarriedBalance(CarriedBalance {
            starting_balance: 500.0,
            as_of: Some(datetime!(2024-01-01 0:00 UTC)),
        }));

        let html = render(sample_state(entries), explicit_query()).await;

        let carried_selector = Selector::parse("tr[data-carried-balance-row='true']").unwrap();
        let carried = html
            .select(&carried_selector)
            .next()
            .expect("No carried balance row found");
        let text = carried.text().collect::<String>();
        assert!(text.contains("Saldo anterior"));
        assert!(text.contains("R$500.00"));
    }

    #[tokio::test]
    async fn missing_params_redirect_to_the_explicit_url() {
        let response = get_transactions_page(
            State(sample_state(two_transactions())),
            HxRequest(false),
            Query(LedgerQuery::default()),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response
            .headers()
            .get("location")
            .expect("Missing redirect location header")
            .to_str()
            .unwrap();
        assert_eq!(
            location,
            format!(
                "{}?sort=date&dir=desc&page=1&page_size=10",
                endpoints::TRANSACTIONS_VIEW
            )
        );
    }

    #[tokio::test]
    async fn page_zero_redirects_to_page_one() {
        let response = get_transactions_page(
            State(sample_state(two_transactions())),
            HxRequest(false),
            Query(LedgerQuery {
                page: Some(0),
                ..explicit_query()
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers().get("location").unwrap().to_str().unwrap();
        assert!(location.contains("page=1"), "got {location}");
    }

    #[tokio::test]
    async fn category_filter_keeps_only_matching_rows() {
        let html = render(
            sample_state(two_transactions()),
            LedgerQuery {
                category: vec!["Alimentação".to_owned()],
                ..explicit_query()
            },
        )
        .await;

        let rows = transaction_rows(&html);
        assert_eq!(rows.len(), 1);
        assert_eq!(cell_texts(rows[0])[1], "Mercado");
    }

    #[tokio::test]
    async fn filters_on_category_and_account_combine() {
        let entries = vec![
            Transaction::build("t1", 10.0, LaunchType::Revenue)
                .category("Renda")
                .account("Corrente")
                .into_entry(),
            Transaction::build("t2", 10.0, LaunchType::Revenue)
                .category("Renda")
                .account("Poupança")
                .into_entry(),
        ];

        let html = render(
            sample_state(entries),
            LedgerQuery {
                category: vec!["Renda".to_owned()],
                account: vec!["Corrente".to_owned()],
                ..explicit_query()
            },
        )
        .await;

        assert_eq!(transaction_rows(&html).len(), 1);
    }

    #[tokio::test]
    async fn empty_filter_result_shows_the_empty_state() {
        let html = render(
            sample_state(two_transactions()),
            LedgerQuery {
                category: vec!["Inexistente".to_owned()],
                ..explicit_query()
            },
        )
        .await;

        let empty_selector = Selector::parse("td[data-empty-state='true']").unwrap();
        let empty_cell = html
            .select(&empty_selector)
            .next()
            .expect("No empty-state cell found");
        assert_eq!(empty_cell.value().attr("colspan"), Some("7"));
        assert!(transaction_rows(&html).is_empty());
    }

    #[tokio::test]
    async fn out_of_range_page_renders_empty_not_error() {
        let html = render(
            sample_state(two_transactions()),
            LedgerQuery {
                page: Some(9),
                ..explicit_query()
            },
        )
        .await;

        assert_valid_html(&html);
        assert!(transaction_rows(&html).is_empty());
        let empty_selector = Selector::parse("td[data-empty-state='true']").unwrap();
        assert!(html.select(&empty_selector).next().is_some());
    }

    #[tokio::test]
    async fn sort_header_link_flips_the_active_direction() {
        let html = render(sample_state(two_transactions()), explicit_query()).await;

        let link_selector = Selector::parse("a[data-sort-field='date']").unwrap();
        let date_link = html
            .select(&link_selector)
            .next()
            .expect("No date header link found");
        let href = date_link.value().attr("href").unwrap();

        assert!(href.contains("sort=date"), "got {href}");
        assert!(href.contains("dir=asc"), "clicking the active field must flip it, got {href}");

        let other_selector = Selector::parse("a[data-sort-field='credit']").unwrap();
        let credit_link = html.select(&other_selector).next().unwrap();
        let href = credit_link.value().attr("href").unwrap();
        assert!(href.contains("dir=asc"), "a new field starts ascending, got {href}");
    }

    #[tokio::test]
    async fn filter_menu_lists_candidate_values() {
        let html = render(sample_state(two_transactions()), explicit_query()).await;

        let checkbox_selector = Selector::parse("input[type='checkbox'][name='category']").unwrap();
        let values: Vec<_> = html
            .select(&checkbox_selector)
            .filter_map(|checkbox| checkbox.value().attr("value"))
            .collect();

        assert_eq!(values, ["Alimentação", "Renda"]);
    }

    #[tokio::test]
    async fn active_filter_values_are_checked() {
        let html = render(
            sample_state(two_transactions()),
            LedgerQuery {
                category: vec!["Renda".to_owned()],
                ..explicit_query()
            },
        )
        .await;

        let checkbox_selector = Selector::parse("input[type='checkbox'][name='category']").unwrap();
        for checkbox in html.select(&checkbox_selector) {
            let value = checkbox.value().attr("value").unwrap();
            let checked = checkbox.value().attr("checked").is_some();
            assert_eq!(checked, value == "Renda", "checkbox {value} checked state");
        }
    }

    #[tokio::test]
    async fn htmx_requests_receive_only_the_fragment() {
        let response = get_transactions_page(
            State(sample_state(two_transactions())),
            HxRequest(true),
            Query(explicit_query()),
        )
        .await
        .unwrap();

        let html = parse_html(response).await;

        assert!(
            html.select(&Selector::parse("nav.navbar, html > head > title").unwrap())
                .next()
                .is_none(),
            "fragment must not include the page chrome"
        );
        assert!(
            html.select(&Selector::parse("table").unwrap()).next().is_some(),
            "fragment must include the table"
        );
    }

    #[tokio::test]
    async fn pagination_links_cover_the_filtered_set() {
        let entries: Vec<LedgerEntry> = (0..25)
            .map(|i| {
                Transaction::build(&format!("t{i}"), 1.0, LaunchType::Revenue)
                    .payment_date(datetime!(2024-01-01 0:00 UTC) + time::Duration::days(i))
                    .into_entry()
            })
            .collect();

        let html = render(
            sample_state(entries),
            LedgerQuery {
                page: Some(3),
                ..explicit_query()
            },
        )
        .await;

        assert_eq!(transaction_rows(&html).len(), 5);
        let current_selector = Selector::parse("[aria-current='page']").unwrap();
        let current = html
            .select(&current_selector)
            .next()
            .expect("No current page indicator");
        assert_eq!(current.text().collect::<String>().trim(), "3");

        let range_selector = Selector::parse("[data-item-range='true']").unwrap();
        let range = html.select(&range_selector).next().unwrap();
        assert_eq!(
            range.text().collect::<String>().trim(),
            "Exibindo 21 a 25 de 25"
        );
    }

    #[test]
    fn filters_parse_from_repeated_query_params() {
        let query: LedgerQuery = serde_html_form::from_str(
            "sort=date&dir=desc&page=1&page_size=10&category=Alimenta%C3%A7%C3%A3o&category=Lazer",
        )
        .unwrap();

        assert_eq!(query.category, ["Alimentação", "Lazer"]);
        assert!(query.account.is_empty());
    }
}
