//! The form and endpoint for adding a connection.
//!
//! The same form is shown on the dashboard and the connections page. A hidden
//! `return_to` field tells the endpoint which page to send the user back to.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    connection::{ConnectionFormData, ConnectionName, ReturnTo, create_connection},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
};

/// The state needed for creating a connection.
#[derive(Debug, Clone)]
pub struct CreateConnectionState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateConnectionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle connection creation form submission.
pub async fn create_connection_endpoint(
    State(state): State<CreateConnectionState>,
    Form(form): Form<ConnectionFormData>,
) -> Response {
    let name = match ConnectionName::new(&form.name) {
        Ok(name) => name,
        Err(error) => {
            return connection_form_view(form.return_to, &form.name, &format!("Error: {error}"))
                .into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_connection(name, None, &connection) {
        Ok(_) => (
            HxRedirect(form.return_to.endpoint().to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a connection: {error}");

            error.into_alert_response()
        }
    }
}

/// The form for adding a connection by name.
///
/// `name` pre-fills the name input and `error_message` is shown under it if
/// it is not empty.
pub fn connection_form_view(return_to: ReturnTo, name: &str, error_message: &str) -> Markup {
    let input_id = format!("new-connection-name-{}", return_to.as_str());

    html! {
        form
            hx-post=(endpoints::POST_CONNECTION)
            hx-target-error="#alert-container"
            hx-swap="outerHTML"
            class="w-full space-y-4"
        {
            input type="hidden" name="return_to" value=(return_to.as_str());

            div
            {
                label
                    for=(input_id)
                    class=(FORM_LABEL_STYLE)
                {
                    "New connection"
                }

                input
                    id=(input_id)
                    type="text"
                    name="name"
                    placeholder="Name"
                    value=(name)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if !error_message.is_empty() {
                p class=(FORM_ERROR_STYLE)
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Connection" }
        }
    }
}
