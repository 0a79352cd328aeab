//! Database ID type definition.

/// Alias for the integer type used for mapping to database IDs.
///
/// IDs are generated by SQLite when a row is inserted.
pub type DatabaseId = i64;
