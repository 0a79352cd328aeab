//! Tally is a web app for keeping track of who owes whom.
//!
//! Money given to or taken from a *connection* (a person you exchange money
//! with) is recorded as a transaction, and each connection's running balance
//! is derived from those transactions.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod balance;
mod connection;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod note;
mod routing;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use balance::{BalanceTotals, ConnectionBalance, balance_totals, compute_balances};
pub use connection::{Connection, ConnectionId, ConnectionName, create_connection};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use note::Note;
pub use routing::build_router;
pub use timezone::get_local_offset;
pub use transaction::{Amount, Direction, Transaction, TransactionId, create_transaction};

use crate::{alert::Alert, internal_server_error::InternalServerError, not_found::NotFoundPage};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string (or just whitespace) was used as a connection name.
    #[error("Name cannot be empty")]
    EmptyConnectionName,

    /// The connection name is longer than 100 characters.
    ///
    /// The number of characters in the rejected name is included.
    #[error("Name must be at most 100 characters long, got {0}")]
    ConnectionNameTooLong(usize),

    /// The note is longer than 1000 characters.
    ///
    /// The number of characters in the rejected note is included.
    #[error("Note must be at most 1000 characters long, got {0}")]
    NoteTooLong(usize),

    /// The amount could not be parsed as a finite number.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// The amount was zero or negative.
    ///
    /// The direction of a transaction is given by whether it is a credit or a
    /// debit, so amounts are always positive.
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,

    /// A transaction was created for a connection that does not exist or has
    /// been deleted.
    #[error("the connection ID does not refer to a valid connection")]
    InvalidConnection(ConnectionId),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update a connection that does not exist
    #[error("tried to update a connection that is not in the database")]
    UpdateMissingConnection,

    /// Tried to delete a connection that does not exist
    #[error("tried to delete a connection that is not in the database")]
    DeleteMissingConnection,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundPage.into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        let (status_code, message, details) = match self {
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Invalid Timezone Settings",
                format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            ),
            Error::InvalidConnection(connection_id) => (
                StatusCode::NOT_FOUND,
                "Invalid connection",
                format!(
                    "Could not find a connection with the ID {connection_id}. \
                    Try refreshing the page to see if the connection has been deleted."
                ),
            ),
            Error::UpdateMissingConnection => (
                StatusCode::NOT_FOUND,
                "Could not update connection",
                "The connection could not be found.".to_owned(),
            ),
            Error::DeleteMissingConnection => (
                StatusCode::NOT_FOUND,
                "Could not delete connection",
                "The connection could not be found. \
                Try refreshing the page to see if the connection has already been deleted."
                    .to_owned(),
            ),
            Error::DeleteMissingTransaction => (
                StatusCode::NOT_FOUND,
                "Could not delete transaction",
                "The transaction could not be found. \
                Try refreshing the page to see if the transaction has already been deleted."
                    .to_owned(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong",
                "An unexpected error occurred, check the server logs for more details.".to_owned(),
            ),
        };

        (
            status_code,
            Alert::Error {
                message: message.to_owned(),
                details,
            },
        )
            .into_response()
    }
}
