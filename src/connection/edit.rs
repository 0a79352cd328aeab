//! Connection editing page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    connection::{
        ConnectionId, ConnectionName, EditConnectionFormData, get_connection,
        update_connection,
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, base, link,
    },
    navigation::NavBar,
    note::Note,
};

/// The state needed for the edit connection page and endpoint.
#[derive(Debug, Clone)]
pub struct EditConnectionState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditConnectionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The values shown in the edit form.
struct EditFormValues<'a> {
    name: &'a str,
    note: &'a str,
    error_message: &'a str,
}

/// Render the connection editing page.
pub async fn get_edit_connection_page(
    Path(connection_id): Path<ConnectionId>,
    State(state): State<EditConnectionState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_CONNECTION_VIEW, connection_id);
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_CONNECTION, connection_id);

    match get_connection(connection_id, &connection) {
        Ok(db_connection) => {
            let values = EditFormValues {
                name: db_connection.name.as_ref(),
                note: db_connection.note.as_ref().map_or("", Note::as_str),
                error_message: "",
            };

            Ok(edit_connection_view(&edit_endpoint, &update_endpoint, &values).into_response())
        }
        Err(error) => {
            let error_message = match error {
                Error::NotFound => "Connection not found",
                _ => {
                    tracing::error!("Failed to retrieve connection {connection_id}: {error}");
                    "Failed to load connection"
                }
            };
            let values = EditFormValues {
                name: "",
                note: "",
                error_message,
            };

            Ok(edit_connection_view(&edit_endpoint, &update_endpoint, &values).into_response())
        }
    }
}

/// Handle connection update form submission.
pub async fn update_connection_endpoint(
    Path(connection_id): Path<ConnectionId>,
    State(state): State<EditConnectionState>,
    Form(form_data): Form<EditConnectionFormData>,
) -> Response {
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_CONNECTION, connection_id);

    let validated = ConnectionName::new(&form_data.name)
        .and_then(|name| Note::parse(&form_data.note).map(|note| (name, note)));

    let (name, note) = match validated {
        Ok(validated) => validated,
        Err(error) => {
            let error_message = format!("Error: {error}");
            let values = EditFormValues {
                name: &form_data.name,
                note: &form_data.note,
                error_message: &error_message,
            };

            return edit_connection_form_view(&update_endpoint, &values).into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_connection(connection_id, name, note, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::CONNECTIONS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UpdateMissingConnection) => {
            Error::UpdateMissingConnection.into_alert_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating connection {connection_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

fn edit_connection_view(
    edit_endpoint: &str,
    update_endpoint: &str,
    values: &EditFormValues,
) -> Markup {
    let nav_bar = NavBar::new(edit_endpoint).into_html();
    let form = edit_connection_form_view(update_endpoint, values);

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            (form)

            p class="mt-4 text-sm" { (link(endpoints::CONNECTIONS_VIEW, "Back to connections")) }
        }
    };

    base("Edit Connection", &content)
}

fn edit_connection_form_view(update_endpoint: &str, values: &EditFormValues) -> Markup {
    html! {
        form
            hx-put=(update_endpoint)
            hx-target-error="#alert-container"
            hx-swap="outerHTML"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label
                    for="name"
                    class=(FORM_LABEL_STYLE)
                {
                    "Name"
                }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="Name"
                    value=(values.name)
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label
                    for="note"
                    class=(FORM_LABEL_STYLE)
                {
                    "Note"
                }

                textarea
                    id="note"
                    name="note"
                    rows="3"
                    placeholder="Optional"
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    (values.note)
                }
            }

            @if !values.error_message.is_empty() {
                p class=(FORM_ERROR_STYLE)
                {
                    (values.error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Update Connection" }
        }
    }
}
