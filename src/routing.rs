//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{delete, get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    connection::{
        create_connection_endpoint, delete_connection_endpoint, get_connections_page,
        get_edit_connection_page, update_connection_endpoint,
    },
    dashboard::get_dashboard_page,
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    transaction::{create_transaction_endpoint, delete_transaction_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::CONNECTIONS_VIEW, get(get_connections_page))
        .route(
            endpoints::EDIT_CONNECTION_VIEW,
            get(get_edit_connection_page),
        )
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let api_routes = Router::new()
        .route(endpoints::POST_CONNECTION, post(create_connection_endpoint))
        .route(
            endpoints::PUT_CONNECTION,
            delete(delete_connection_endpoint).put(update_connection_endpoint),
        )
        .route(
            endpoints::POST_TRANSACTION,
            post(create_transaction_endpoint),
        )
        .route(
            endpoints::DELETE_TRANSACTION,
            delete(delete_transaction_endpoint),
        );

    page_routes
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}


#[cfg(test)]
mod router_tests {
    use axum::middleware;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use scraper::{Html, Selector};

    use crate::{
        AppState,
        logging::logging_middleware,
        connection::{ConnectionFormData, ReturnTo},
        endpoints::{self, format_endpoint},
        transaction::{Direction, TransactionFormData},
    };

    use super::build_router;

    fn get_test_server() -> TestServer {
        let db_connection =
            Connection::open_in_memory().expect("Could not open database in memory.");
        let state = AppState::new(db_connection, "Etc/UTC").expect("Could not create app state.");
        let app = build_router(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    fn total(html: &Html, name: &str) -> String {
        html.select(&Selector::parse(&format!("p[data-total={name}]")).unwrap())
            .next()
            .unwrap_or_else(|| panic!("No total {name} found"))
            .text()
            .collect::<String>()
            .trim()
            .to_owned()
    }

    async fn create_connection(server: &TestServer, name: &str) {
        let response = server
            .post(endpoints::POST_CONNECTION)
            .form(&ConnectionFormData {
                name: name.to_owned(),
                return_to: ReturnTo::Connections,
            })
            .await;

        response.assert_status_see_other();
        assert_eq!(response.header("hx-redirect"), endpoints::CONNECTIONS_VIEW);
    }

    async fn record(server: &TestServer, connection_id: i64, amount: &str, direction: Direction) {
        server
            .post(&format_endpoint(endpoints::POST_TRANSACTION, connection_id))
            .form(&TransactionFormData {
                amount: amount.to_owned(),
                note: String::new(),
                direction: Some(direction),
            })
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn root_redirects_to_dashboard() {
        let server = get_test_server();

        let response = server.get(endpoints::ROOT).await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::DASHBOARD_VIEW);
    }

    #[tokio::test]
    async fn unknown_route_returns_404_page() {
        let server = get_test_server();

        let response = server.get("/does-not-exist").await;

        response.assert_status_not_found();
        assert!(response.text().contains("404"));
    }

    #[tokio::test]
    async fn give_and_take_update_dashboard() {
        let server = get_test_server();
        create_connection(&server, "Alice").await;
        create_connection(&server, "Bob").await;

        record(&server, 1, "50", Direction::Give).await;
        record(&server, 1, "20", Direction::Take).await;
        record(&server, 2, "7.5", Direction::Take).await;

        let response = server.get(endpoints::DASHBOARD_VIEW).await;
        response.assert_status_ok();
        let html = Html::parse_document(&response.text());
        assert_eq!(total(&html, "owed-to-you"), "$30.00");
        assert_eq!(total(&html, "you-owe"), "$7.50");
    }

    #[tokio::test]
    async fn deleting_connection_removes_it_from_totals() {
        let server = get_test_server();
        create_connection(&server, "Alice").await;
        record(&server, 1, "50", Direction::Give).await;

        server
            .delete(&format_endpoint(endpoints::DELETE_CONNECTION, 1))
            .await
            .assert_status_ok();

        let response = server.get(endpoints::DASHBOARD_VIEW).await;
        let html = Html::parse_document(&response.text());
        assert_eq!(total(&html, "owed-to-you"), "$0.00");
    }

    #[tokio::test]
    async fn deleting_transaction_updates_balance() {
        let server = get_test_server();
        create_connection(&server, "Alice").await;
        record(&server, 1, "50", Direction::Give).await;
        record(&server, 1, "20", Direction::Take).await;

        let response = server
            .delete(&format_endpoint(endpoints::DELETE_TRANSACTION, 2))
            .await;

        response.assert_status_ok();
        assert!(response.text().contains("Balance: $50.00"));
    }

    #[tokio::test]
    async fn edit_connection_round_trip() {
        let server = get_test_server();
        create_connection(&server, "Alice").await;

        server
            .get(&format_endpoint(endpoints::EDIT_CONNECTION_VIEW, 1))
            .await
            .assert_status_ok();

        let response = server
            .put(&format_endpoint(endpoints::PUT_CONNECTION, 1))
            .form(&[("name", "Alicia"), ("note", "Flatmate")])
            .await;
        response.assert_status_see_other();

        let page = server.get(endpoints::CONNECTIONS_VIEW).await.text();
        assert!(page.contains("Alicia"));
        assert!(page.contains("Flatmate"));
    }

    #[tokio::test]
    async fn static_favicon_is_served_unchanged() {
        let expected = std::fs::read("static/favicon-32x32.png").expect("Could not read favicon");
        let db_connection =
            Connection::open_in_memory().expect("Could not open database in memory.");
        let state = AppState::new(db_connection, "Etc/UTC").expect("Could not create app state.");
        let app = build_router(state).layer(middleware::from_fn(logging_middleware));
        let server = TestServer::try_new(app).expect("Could not create test server.");

        let response = server.get("/static/favicon-32x32.png").await;

        response.assert_status_ok();
        assert_eq!(response.header("content-type"), "image/png");
        assert_eq!(response.as_bytes().as_ref(), expected.as_slice());
    }

    #[tokio::test]
    async fn error_page_is_served() {
        let server = get_test_server();

        let response = server.get(endpoints::INTERNAL_ERROR_VIEW).await;

        response.assert_status_internal_server_error();
    }
}
