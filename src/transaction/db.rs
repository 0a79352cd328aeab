//! Database operations for transactions.
//!
//! Like connections, transactions are soft deleted and every query skips rows
//! with the `is_deleted` flag set.

use rusqlite::{Connection as DbConnection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    connection::{ConnectionId, get_connection},
    note::Note,
    transaction::{Amount, Direction, Transaction, TransactionId},
};

/// Record a transaction against a connection and return it with its generated ID.
///
/// # Errors
/// Returns [Error::InvalidConnection] if `connection_id` does not refer to a
/// connection that exists and has not been deleted.
pub fn create_transaction(
    connection_id: ConnectionId,
    amount: Amount,
    direction: Direction,
    note: Option<Note>,
    connection: &DbConnection,
) -> Result<Transaction, Error> {
    get_connection(connection_id, connection).map_err(|error| match error {
        Error::NotFound => Error::InvalidConnection(connection_id),
        error => error,
    })?;

    let now = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO \"transaction\" (connection_id, amount, is_credit, note, created_at, updated_at) \
        VALUES (?1, ?2, ?3, ?4, ?5, ?5);",
        (
            connection_id,
            amount.as_f64(),
            direction.is_credit(),
            note.as_ref().map(Note::as_str),
            now,
        ),
    )?;

    let id = connection.last_insert_rowid();

    get_transaction(id, connection)
}

/// Retrieve a single transaction by ID.
///
/// # Errors
/// Returns [Error::NotFound] if the transaction does not exist or has been deleted.
pub fn get_transaction(
    transaction_id: TransactionId,
    connection: &DbConnection,
) -> Result<Transaction, Error> {
    connection
        .prepare(
            "SELECT id, connection_id, amount, is_credit, note, created_at FROM \"transaction\" \
            WHERE id = :id AND is_deleted IS NOT 1;",
        )?
        .query_row(&[(":id", &transaction_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all transactions that have not been deleted, oldest first.
///
/// Transactions belonging to deleted connections are included; it is up to the
/// caller to drop them.
pub fn get_all_transactions(connection: &DbConnection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, connection_id, amount, is_credit, note, created_at FROM \"transaction\" \
            WHERE is_deleted IS NOT 1 \
            ORDER BY created_at ASC, id ASC;",
        )?
        .query_map([], map_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the transactions for a single connection that have not been deleted, oldest first.
pub fn get_transactions_for_connection(
    connection_id: ConnectionId,
    connection: &DbConnection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, connection_id, amount, is_credit, note, created_at FROM \"transaction\" \
            WHERE connection_id = :connection_id AND is_deleted IS NOT 1 \
            ORDER BY created_at ASC, id ASC;",
        )?
        .query_map(&[(":connection_id", &connection_id)], map_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Soft delete a transaction by ID, returning the ID of its connection.
///
/// # Errors
/// Returns [Error::DeleteMissingTransaction] if the transaction doesn't exist
/// or has already been deleted.
pub fn delete_transaction(
    transaction_id: TransactionId,
    connection: &DbConnection,
) -> Result<ConnectionId, Error> {
    connection
        .query_row(
            "UPDATE \"transaction\" SET is_deleted = 1, updated_at = ?1 \
            WHERE id = ?2 AND is_deleted IS NOT 1 \
            RETURNING connection_id",
            (OffsetDateTime::now_utc(), transaction_id),
            |row| row.get(0),
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::DeleteMissingTransaction,
            error => error.into(),
        })
}

/// Initialize the transaction table and indexes.
pub fn create_transaction_table(connection: &DbConnection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            connection_id INTEGER NOT NULL,
            amount REAL NOT NULL CHECK (amount > 0),
            is_credit INTEGER NOT NULL CHECK (is_credit IN (0, 1)),
            note TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            is_deleted INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_created_at ON \"transaction\"(created_at);
        CREATE INDEX IF NOT EXISTS idx_transaction_connection_id ON \"transaction\"(connection_id);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let connection_id = row.get(1)?;
    let amount = row.get(2)?;
    let is_credit = row.get(3)?;
    let raw_note: Option<String> = row.get(4)?;
    let created_at = row.get(5)?;

    Ok(Transaction {
        id,
        connection_id,
        amount,
        is_credit,
        note: raw_note.as_deref().map(Note::new_unchecked),
        created_at,
    })
}
