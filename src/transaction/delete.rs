//! Transaction deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    connection::{TransactionFormValues, connection_card_view, load_connection_card},
    timezone::get_local_offset,
    transaction::{TransactionId, delete_transaction},
};

/// The state needed for deleting a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Handle transaction deletion.
///
/// Responds with the updated card of the transaction's connection, or a
/// success alert if that connection has since been deleted.
pub async fn delete_transaction_endpoint(
    Path(transaction_id): Path<TransactionId>,
    State(state): State<DeleteTransactionState>,
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

    let connection_id = match delete_transaction(transaction_id, &connection) {
        Ok(connection_id) => connection_id,
        Err(Error::DeleteMissingTransaction) => {
            return Error::DeleteMissingTransaction.into_alert_response();
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting transaction {transaction_id}: {error}"
            );
            return error.into_alert_response();
        }
    };

    match load_connection_card(connection_id, &connection) {
        Ok(card) => {
            connection_card_view(&card, &TransactionFormValues::default(), local_offset)
                .into_response()
        }
        Err(Error::NotFound) => Alert::SuccessSimple {
            message: "Transaction deleted successfully".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("Failed to load connection {connection_id}: {error}");
            error.into_alert_response()
        }
    }
}
