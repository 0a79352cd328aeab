//! Connection deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    connection::{ConnectionId, delete_connection},
};

/// The state needed for deleting a connection.
#[derive(Debug, Clone)]
pub struct DeleteConnectionState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteConnectionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle connection deletion. Returns success alert or error.
pub async fn delete_connection_endpoint(
    Path(connection_id): Path<ConnectionId>,
    State(state): State<DeleteConnectionState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_connection(connection_id, &connection) {
        Ok(_) => Alert::SuccessSimple {
            message: "Connection deleted successfully".to_owned(),
        }
        .into_response(),
        Err(Error::DeleteMissingConnection) => Error::DeleteMissingConnection.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting connection {connection_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod delete_connection_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use scraper::{Html, Selector};

    use crate::{
        Error,
        connection::{
            ConnectionName, create_connection, delete_connection_endpoint, get_connection,
        },
        db::initialize,
        test_utils::{assert_valid_html, get_header, parse_html_fragment},
        transaction::{Amount, Direction, create_transaction, get_all_transactions},
    };

    use super::DeleteConnectionState;

    fn get_state() -> DeleteConnectionState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        DeleteConnectionState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn delete_connection_endpoint_succeeds() {
        let state = get_state();
        let created = create_connection(
            ConnectionName::new_unchecked("Alice"),
            None,
            &state.db_connection.lock().unwrap(),
        )
        .expect("Could not create test connection");

        let response = delete_connection_endpoint(Path(created.id), State(state.clone())).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            get_connection(created.id, &state.db_connection.lock().unwrap()),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn transactions_are_kept() {
        let state = get_state();
        let connection_id = {
            let connection = state.db_connection.lock().unwrap();
            let created =
                create_connection(ConnectionName::new_unchecked("Alice"), None, &connection)
                    .expect("Could not create test connection");
            create_transaction(
                created.id,
                Amount::new(10.0).unwrap(),
                Direction::Give,
                None,
                &connection,
            )
            .expect("Could not create test transaction");
            created.id
        };

        delete_connection_endpoint(Path(connection_id), State(state.clone())).await;

        let transactions = get_all_transactions(&state.db_connection.lock().unwrap())
            .expect("Could not get transactions");
        assert_eq!(transactions.len(), 1);
    }

    #[tokio::test]
    async fn delete_connection_endpoint_with_invalid_id_returns_error_html() {
        let state = get_state();

        let response = delete_connection_endpoint(Path(999999), State(state)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            get_header(&response, "content-type"),
            "text/html; charset=utf-8"
        );

        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        assert_error_content(&html, "Could not delete connection");
    }

    #[track_caller]
    fn assert_error_content(html: &Html, want_error_message: &str) {
        let p = Selector::parse("p").unwrap();
        let error_message = html
            .select(&p)
            .next()
            .expect("No error message found")
            .text()
            .collect::<Vec<_>>()
            .join("");
        let got_error_message = error_message.trim();

        assert_eq!(want_error_message, got_error_message);
    }
}
