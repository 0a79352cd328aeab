//! Transactions record money given to or taken from a connection.
//!
//! This module contains the `Transaction` model, the database functions for
//! storing and deleting transactions, and the endpoints that the connection
//! cards use to add and remove them.

mod create;
mod db;
mod delete;
mod domain;

pub use create::create_transaction_endpoint;
pub use db::{
    create_transaction, create_transaction_table, delete_transaction, get_all_transactions,
    get_transactions_for_connection,
};
pub use delete::delete_transaction_endpoint;
pub use domain::{Amount, Direction, Transaction, TransactionFormData, TransactionId};
