//! The connections page: add a connection and record money given or taken.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::UtcOffset;

use crate::{
    AppState, Error,
    connection::{
        ConnectionCard, ReturnTo, TransactionFormValues, build_connection_cards,
        connection_card_view, connection_form_view, get_all_connections,
    },
    endpoints,
    html::{CARD_STYLE, PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
    timezone::get_local_offset,
    transaction::get_all_transactions,
};

/// The state needed for the connections page.
#[derive(Debug, Clone)]
pub struct ConnectionsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for ConnectionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the connections page with a card for every connection.
pub async fn get_connections_page(
    State(state): State<ConnectionsPageState>,
) -> Result<Response, Error> {
    let local_offset = get_local_offset(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let connections = get_all_connections(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve connections: {error}"))?;
    let transactions = get_all_transactions(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve transactions: {error}"))?;

    let cards = build_connection_cards(connections, transactions);

    Ok(connections_view(&cards, local_offset).into_response())
}

fn connections_view(cards: &[ConnectionCard], local_offset: UtcOffset) -> Markup {
    let nav_bar = NavBar::new(endpoints::CONNECTIONS_VIEW).into_html();
    let empty_form = TransactionFormValues::default();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-2xl space-y-6"
            {
                h1 class="text-2xl font-bold" { "Connections" }

                section class=(CARD_STYLE)
                {
                    (connection_form_view(ReturnTo::Connections, "", ""))
                }

                @if cards.is_empty() {
                    p class="text-gray-500 dark:text-gray-400"
                    {
                        "No connections yet. Add someone above to start recording transactions."
                    }
                } @else {
                    section class="space-y-4"
                    {
                        @for card in cards {
                            (connection_card_view(card, &empty_form, local_offset))
                        }
                    }
                }
            }
        }
    );

    base("Connections", &content)
}
