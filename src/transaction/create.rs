//! The endpoint for recording money given to or taken from a connection.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    connection::{ConnectionId, TransactionFormValues, connection_card_view, load_connection_card},
    note::Note,
    timezone::get_local_offset,
    transaction::{Amount, Direction, TransactionFormData, create_transaction},
};

/// The state needed for creating a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Record a transaction for a connection and respond with the updated connection card.
///
/// If the amount or note is invalid nothing is recorded and the card is
/// returned with the submitted values and an error message in the form.
pub async fn create_transaction_endpoint(
    Path(connection_id): Path<ConnectionId>,
    State(state): State<CreateTransactionState>,
    Form(form): Form<TransactionFormData>,
) -> Response {
    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        return Error::InvalidTimezoneError(state.local_timezone).into_alert_response();
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let validated = Amount::parse(&form.amount)
        .and_then(|amount| Note::parse(&form.note).map(|note| (amount, note)));

    let error_message = match validated {
        Ok((amount, note)) => {
            let direction = form.direction.unwrap_or(Direction::Give);

            if let Err(error) =
                create_transaction(connection_id, amount, direction, note, &connection)
            {
                if !matches!(error, Error::InvalidConnection(_)) {
                    tracing::error!(
                        "An unexpected error occurred while creating a transaction for connection {connection_id}: {error}"
                    );
                }

                return error.into_alert_response();
            }

            String::new()
        }
        Err(error) => format!("Error: {error}"),
    };

    let card = match load_connection_card(connection_id, &connection) {
        Ok(card) => card,
        Err(Error::NotFound) => {
            return Error::InvalidConnection(connection_id).into_alert_response();
        }
        Err(error) => {
            tracing::error!("Failed to load connection {connection_id}: {error}");
            return error.into_alert_response();
        }
    };

    let form_values = if error_message.is_empty() {
        TransactionFormValues::default()
    } else {
        TransactionFormValues {
            amount: &form.amount,
            note: &form.note,
            error_message: &error_message,
        }
    };

    connection_card_view(&card, &form_values, local_offset).into_response()
}
