//! The dashboard: what you are owed, what you owe, and every connection's balance.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    balance::{BalanceTotals, ConnectionBalance, balance_totals, compute_balances},
    connection::{ReturnTo, connection_form_view, get_all_connections},
    endpoints,
    html::{CARD_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base, format_currency},
    navigation::NavBar,
    transaction::get_all_transactions,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading connections and transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display the totals and the balance of every connection.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let connections = get_all_connections(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve connections: {error}"))?;
    let transactions = get_all_transactions(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve transactions: {error}"))?;

    let balances = compute_balances(&connections, &transactions);
    let totals = balance_totals(&balances);

    Ok(dashboard_view(&balances, totals).into_response())
}

fn dashboard_view(balances: &[ConnectionBalance], totals: BalanceTotals) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-2xl space-y-6"
            {
                h1 class="text-2xl font-bold" { "Dashboard" }

                (totals_view(totals))

                section class=(CARD_STYLE)
                {
                    (connection_form_view(ReturnTo::Dashboard, "", ""))
                }

                (balances_view(balances))
            }
        }
    );

    base("Dashboard", &content)
}

fn totals_view(totals: BalanceTotals) -> Markup {
    html! {
        section id="totals" class="grid grid-cols-1 gap-4 sm:grid-cols-2"
        {
            div class=(CARD_STYLE)
            {
                p class="text-sm text-gray-500 dark:text-gray-400" { "They owe you:" }
                p
                    data-total="owed-to-you"
                    class="text-2xl font-semibold text-green-600 dark:text-green-400"
                {
                    (format_currency(totals.owed_to_you))
                }
            }

            div class=(CARD_STYLE)
            {
                p class="text-sm text-gray-500 dark:text-gray-400" { "You owe them:" }
                p
                    data-total="you-owe"
                    class="text-2xl font-semibold text-red-600 dark:text-red-400"
                {
                    (format_currency(totals.you_owe))
                }
            }
        }
    }
}

fn balances_view(balances: &[ConnectionBalance]) -> Markup {
    html! {
        section class="space-y-2"
        {
            h2 class="text-xl font-semibold" { "Connections" }

            @if balances.is_empty() {
                p class="text-gray-500 dark:text-gray-400"
                {
                    "No connections yet. Add someone above to get started."
                }
            } @else {
                ul id="balances" class="divide-y divide-gray-200 dark:divide-gray-700"
                {
                    @for balance in balances {
                        @let card_url = format!(
                            "{}#connection-{}",
                            endpoints::CONNECTIONS_VIEW,
                            balance.connection_id
                        );
                        li class="flex items-center justify-between py-2"
                        {
                            a
                                href=(card_url)
                                class=(LINK_STYLE)
                            {
                                (balance.name)
                            }

                            span { "Balance: " (format_currency(balance.balance)) }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod dashboard_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;
    use scraper::{Html, Selector};

    use crate::{
        connection::{ConnectionName, create_connection, delete_connection},
        db::initialize,
        endpoints,
        test_utils::{
            assert_content_type, assert_hx_endpoint, assert_status_ok, assert_valid_html,
            must_get_form, parse_html_document,
        },
        transaction::{Amount, Direction, create_transaction},
    };

    use super::{DashboardState, get_dashboard_page};

    fn get_state() -> DashboardState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn add_transaction(
        state: &DashboardState,
        connection_id: i64,
        amount: f64,
        direction: Direction,
    ) {
        create_transaction(
            connection_id,
            Amount::new(amount).unwrap(),
            direction,
            None,
            &state.db_connection.lock().unwrap(),
        )
        .expect("Could not create test transaction");
    }

    fn add_connection(state: &DashboardState, name: &str) -> i64 {
        create_connection(
            ConnectionName::new_unchecked(name),
            None,
            &state.db_connection.lock().unwrap(),
        )
        .expect("Could not create test connection")
        .id
    }

    #[track_caller]
    fn get_total(html: &Html, name: &str) -> String {
        html.select(&Selector::parse(&format!("p[data-total={name}]")).unwrap())
            .next()
            .unwrap_or_else(|| panic!("No total {name} found"))
            .text()
            .collect::<String>()
            .trim()
            .to_owned()
    }

    fn balance_rows(html: &Html) -> Vec<String> {
        html.select(&Selector::parse("#balances li").unwrap())
            .map(|row| row.text().collect::<String>())
            .collect()
    }

    #[tokio::test]
    async fn empty_dashboard() {
        let response = get_dashboard_page(State(get_state()))
            .await
            .expect("Could not render dashboard");

        assert_status_ok(&response);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(get_total(&html, "owed-to-you"), "$0.00");
        assert_eq!(get_total(&html, "you-owe"), "$0.00");
        assert!(balance_rows(&html).is_empty());

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::POST_CONNECTION, "hx-post");
    }

    #[tokio::test]
    async fn shows_totals_and_balances() {
        let state = get_state();
        let alice = add_connection(&state, "Alice");
        let bob = add_connection(&state, "Bob");
        add_connection(&state, "Carol");
        add_transaction(&state, alice, 50.0, Direction::Give);
        add_transaction(&state, alice, 20.0, Direction::Take);
        add_transaction(&state, bob, 12.5, Direction::Take);

        let response = get_dashboard_page(State(state))
            .await
            .expect("Could not render dashboard");

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(get_total(&html, "owed-to-you"), "$30.00");
        assert_eq!(get_total(&html, "you-owe"), "$12.50");

        let rows = balance_rows(&html);
        assert_eq!(rows.len(), 3);
        assert!(rows[0].contains("Alice") && rows[0].contains("Balance: $30.00"));
        assert!(rows[1].contains("Bob") && rows[1].contains("Balance: -$12.50"));
        assert!(rows[2].contains("Carol") && rows[2].contains("Balance: $0.00"));
    }

    #[tokio::test]
    async fn deleted_connections_do_not_count() {
        let state = get_state();
        let alice = add_connection(&state, "Alice");
        add_transaction(&state, alice, 100.0, Direction::Give);
        delete_connection(alice, &state.db_connection.lock().unwrap())
            .expect("Could not delete connection");

        let response = get_dashboard_page(State(state))
            .await
            .expect("Could not render dashboard");

        let html = parse_html_document(response).await;
        assert_eq!(get_total(&html, "owed-to-you"), "$0.00");
        assert!(balance_rows(&html).is_empty());
    }

    #[tokio::test]
    async fn balance_links_to_connection_card() {
        let state = get_state();
        let alice = add_connection(&state, "Alice");

        let response = get_dashboard_page(State(state))
            .await
            .expect("Could not render dashboard");

        let html = parse_html_document(response).await;
        let link = html
            .select(&Selector::parse("#balances li a").unwrap())
            .next()
            .expect("No link found");
        assert_eq!(
            link.value().attr("href"),
            Some(format!("{}#connection-{alice}", endpoints::CONNECTIONS_VIEW).as_str())
        );
    }
}
