//! Connections are the people you exchange money with.

mod card;
mod connections_page;
mod create;
mod db;
mod delete;
mod domain;
mod edit;

pub use card::{
    ConnectionCard, TransactionFormValues, build_connection_cards, connection_card_view,
    load_connection_card,
};
pub use connections_page::get_connections_page;
pub use create::{connection_form_view, create_connection_endpoint};
pub use db::{
    create_connection, create_connection_table, delete_connection, get_all_connections,
    get_connection, update_connection,
};
pub use delete::delete_connection_endpoint;
pub use domain::{
    Connection, ConnectionFormData, ConnectionId, ConnectionName, EditConnectionFormData, ReturnTo,
};
pub use edit::{get_edit_connection_page, update_connection_endpoint};
