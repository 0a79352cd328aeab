//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/connections/{connection_id}/edit', use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The landing page showing the totals and every connection's balance.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for adding transactions to connections.
pub const CONNECTIONS_VIEW: &str = "/connections";
/// The page for editing an existing connection.
pub const EDIT_CONNECTION_VIEW: &str = "/connections/{connection_id}/edit";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to create a connection.
pub const POST_CONNECTION: &str = "/api/connections";
/// The route to update a connection.
pub const PUT_CONNECTION: &str = "/api/connections/{connection_id}";
/// The route to delete a connection.
pub const DELETE_CONNECTION: &str = "/api/connections/{connection_id}";
/// The route to create a transaction for a connection.
pub const POST_TRANSACTION: &str = "/api/connections/{connection_id}/transactions";
/// The route to delete a transaction.
pub const DELETE_TRANSACTION: &str = "/api/transactions/{transaction_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
