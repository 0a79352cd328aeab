//! The card showing a connection, its balance, the form for recording money
//! given or taken, and the connection's transaction history.
//!
//! The card is rendered as part of the connections page and returned on its
//! own by the transaction endpoints so htmx can swap in the updated card.

use std::collections::HashMap;

use maud::{Markup, html};
use rusqlite::Connection as DbConnection;
use time::UtcOffset;

use crate::{
    Error,
    balance::compute_balances,
    connection::{Connection, ConnectionId, get_connection},
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, CARD_STYLE,
        FORM_ERROR_STYLE, FORM_TEXT_INPUT_STYLE, edit_delete_action_links, format_currency,
    },
    transaction::{Direction, Transaction, get_transactions_for_connection},
};

/// Everything needed to render a connection card.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionCard {
    pub connection: Connection,
    pub balance: f64,
    /// The connection's transactions, newest first.
    pub transactions: Vec<Transaction>,
}

/// What the user typed into the transaction form and what was wrong with it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFormValues<'a> {
    pub amount: &'a str,
    pub note: &'a str,
    pub error_message: &'a str,
}

/// Load the card for a single connection.
///
/// # Errors
/// Returns [Error::NotFound] if the connection does not exist or has been deleted.
pub fn load_connection_card(
    connection_id: ConnectionId,
    connection: &DbConnection,
) -> Result<ConnectionCard, Error> {
    let db_connection = get_connection(connection_id, connection)?;
    let transactions = get_transactions_for_connection(connection_id, connection)?;

    build_connection_cards(vec![db_connection], transactions)
        .pop()
        .ok_or(Error::NotFound)
}

/// Group `transactions` by connection and pair them with each connection's balance.
///
/// The cards are in the same order as `connections`. Transactions that do not
/// belong to any of `connections` are dropped.
pub fn build_connection_cards(
    connections: Vec<Connection>,
    transactions: Vec<Transaction>,
) -> Vec<ConnectionCard> {
    let balances = compute_balances(&connections, &transactions);

    let mut transactions_by_connection: HashMap<ConnectionId, Vec<Transaction>> = HashMap::new();
    for transaction in transactions {
        transactions_by_connection
            .entry(transaction.connection_id)
            .or_default()
            .push(transaction);
    }

    connections
        .into_iter()
        .zip(balances)
        .map(|(connection, balance)| {
            let mut transactions = transactions_by_connection
                .remove(&connection.id)
                .unwrap_or_default();
            transactions.reverse();

            ConnectionCard {
                connection,
                balance: balance.balance,
                transactions,
            }
        })
        .collect()
}

/// The HTML ID of the card for `connection_id`.
pub fn connection_card_id(connection_id: ConnectionId) -> String {
    format!("connection-{connection_id}")
}

pub fn connection_card_view(
    card: &ConnectionCard,
    form: &TransactionFormValues,
    local_offset: UtcOffset,
) -> Markup {
    let connection_id = card.connection.id;
    let card_id = connection_card_id(connection_id);
    let card_target = format!("#{card_id}");
    let edit_url = format_endpoint(endpoints::EDIT_CONNECTION_VIEW, connection_id);
    let delete_url = format_endpoint(endpoints::DELETE_CONNECTION, connection_id);
    let create_transaction_url = format_endpoint(endpoints::POST_TRANSACTION, connection_id);
    let amount_id = format!("amount-{connection_id}");
    let note_id = format!("note-{connection_id}");
    let confirm_message = format!(
        "Are you sure you want to delete '{}'? Their transactions will no longer count towards your totals.",
        card.connection.name
    );

    html! {
        article id=(card_id) class=(CARD_STYLE)
        {
            div class="flex items-start justify-between gap-4"
            {
                div
                {
                    h3 class="text-lg font-semibold" { (card.connection.name) }

                    @if let Some(note) = &card.connection.note {
                        p class="text-sm text-gray-500 dark:text-gray-400" { (note) }
                    }

                    p { "Balance: " (format_currency(card.balance)) }
                }

                div class="flex gap-4 text-sm"
                {
                    (edit_delete_action_links(
                        &edit_url,
                        &delete_url,
                        &confirm_message,
                        "closest article",
                        "delete",
                    ))
                }
            }

            form
                hx-post=(create_transaction_url)
                hx-target=(card_target)
                hx-target-error="#alert-container"
                hx-swap="outerHTML"
                class="mt-4 space-y-2"
            {
                label for=(amount_id) class="sr-only" { "Amount" }
                input
                    id=(amount_id)
                    type="text"
                    name="amount"
                    inputmode="decimal"
                    placeholder="Amount"
                    value=(form.amount)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);

                label for=(note_id) class="sr-only" { "Note" }
                input
                    id=(note_id)
                    type="text"
                    name="note"
                    placeholder="Note (optional)"
                    value=(form.note)
                    class=(FORM_TEXT_INPUT_STYLE);

                @if !form.error_message.is_empty() {
                    p class=(FORM_ERROR_STYLE) { (form.error_message) }
                }

                div class="flex gap-2"
                {
                    button
                        type="submit"
                        name="direction"
                        value=(Direction::Give.as_str())
                        class=(BUTTON_PRIMARY_STYLE)
                    {
                        (Direction::Give.label())
                    }

                    button
                        type="submit"
                        name="direction"
                        value=(Direction::Take.as_str())
                        class=(BUTTON_SECONDARY_STYLE)
                    {
                        (Direction::Take.label())
                    }
                }
            }

            @if !card.transactions.is_empty() {
                ul class="mt-4 divide-y divide-gray-200 dark:divide-gray-700"
                {
                    @for transaction in &card.transactions {
                        (transaction_row_view(transaction, &card_target, local_offset))
                    }
                }
            }
        }
    }
}

fn transaction_row_view(
    transaction: &Transaction,
    card_target: &str,
    local_offset: UtcOffset,
) -> Markup {
    let delete_url = format_endpoint(endpoints::DELETE_TRANSACTION, transaction.id);
    let date = transaction.created_at.to_offset(local_offset).date();

    html! {
        li class="flex items-center justify-between gap-4 py-2" data-transaction-id=(transaction.id)
        {
            div
            {
                span class="font-medium" { (transaction.direction().label()) }
                " "
                span { (format_currency(transaction.amount)) }

                @if let Some(note) = &transaction.note {
                    p class="text-sm text-gray-500 dark:text-gray-400" { (note) }
                }
            }

            div class="flex items-center gap-4 text-sm"
            {
                time datetime=(date) { (date) }

                button
                    type="button"
                    hx-delete=(delete_url)
                    hx-confirm="Are you sure you want to delete this transaction?"
                    hx-target=(card_target)
                    hx-target-error="#alert-container"
                    hx-swap="outerHTML"
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete"
                }
            }
        }
    }
}
