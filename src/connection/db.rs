//! Database operations for connections.
//!
//! Connections are never removed from the database. Deleting a connection
//! sets its `is_deleted` flag and every query skips flagged rows.

use rusqlite::{Connection as DbConnection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    connection::{Connection, ConnectionId, ConnectionName},
    note::Note,
};

/// Create a connection and return it with its generated ID.
pub fn create_connection(
    name: ConnectionName,
    note: Option<Note>,
    connection: &DbConnection,
) -> Result<Connection, Error> {
    let now = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO connection (name, note, created_at, updated_at) VALUES (?1, ?2, ?3, ?3);",
        (name.as_ref(), note.as_ref().map(Note::as_str), now),
    )?;

    let id = connection.last_insert_rowid();

    get_connection(id, connection)
}

/// Retrieve a single connection by ID.
///
/// # Errors
/// Returns [Error::NotFound] if the connection does not exist or has been deleted.
pub fn get_connection(
    connection_id: ConnectionId,
    connection: &DbConnection,
) -> Result<Connection, Error> {
    connection
        .prepare(
            "SELECT id, name, note, created_at FROM connection \
            WHERE id = :id AND is_deleted IS NOT 1;",
        )?
        .query_row(&[(":id", &connection_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all connections that have not been deleted, oldest first.
pub fn get_all_connections(connection: &DbConnection) -> Result<Vec<Connection>, Error> {
    connection
        .prepare(
            "SELECT id, name, note, created_at FROM connection \
            WHERE is_deleted IS NOT 1 \
            ORDER BY created_at ASC, id ASC;",
        )?
        .query_map([], map_row)?
        .map(|maybe_connection| maybe_connection.map_err(|error| error.into()))
        .collect()
}

/// Update a connection's name and note.
///
/// # Errors
/// Returns [Error::UpdateMissingConnection] if the connection doesn't exist or has been deleted.
pub fn update_connection(
    connection_id: ConnectionId,
    name: ConnectionName,
    note: Option<Note>,
    connection: &DbConnection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE connection SET name = ?1, note = ?2, updated_at = ?3 \
        WHERE id = ?4 AND is_deleted IS NOT 1",
        (
            name.as_ref(),
            note.as_ref().map(Note::as_str),
            OffsetDateTime::now_utc(),
            connection_id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingConnection);
    }

    Ok(())
}

/// Soft delete a connection by ID.
///
/// The connection's transactions are left untouched.
///
/// # Errors
/// Returns [Error::DeleteMissingConnection] if the connection doesn't exist or
/// has already been deleted.
pub fn delete_connection(
    connection_id: ConnectionId,
    connection: &DbConnection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE connection SET is_deleted = 1, updated_at = ?1 \
        WHERE id = ?2 AND is_deleted IS NOT 1",
        (OffsetDateTime::now_utc(), connection_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingConnection);
    }

    Ok(())
}

/// Initialize the connection table and indexes.
pub fn create_connection_table(connection: &DbConnection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS connection (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            note TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            is_deleted INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_connection_created_at ON connection(created_at);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Connection, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let raw_note: Option<String> = row.get(2)?;
    let created_at = row.get(3)?;

    Ok(Connection {
        id,
        name: ConnectionName::new_unchecked(&raw_name),
        note: raw_note.as_deref().map(Note::new_unchecked),
        created_at,
    })
}
