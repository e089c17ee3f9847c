pub mod bible_models;
pub mod bible_schema;

use std::path::Path;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;

use crate::error::EncodeError;

pub const CREATE_METADATA_TABLE: &str =
    "CREATE TABLE metadata(key TEXT PRIMARY KEY, value TEXT);";

pub const CREATE_BOOK_INDEX_TABLE: &str =
    "CREATE TABLE book_index(book_id INTEGER PRIMARY KEY, name TEXT);";

pub const CREATE_CONTENT_TABLE: &str =
    "CREATE TABLE content(book_id INTEGER, chapter_id INTEGER, verse_id INTEGER, content TEXT);";

/// Opens a connection to the SQLite file at `db_path`, creating the file if needed.
pub fn establish_connection(db_path: &Path) -> Result<SqliteConnection, EncodeError> {
    let db_url = db_path
        .to_str()
        .ok_or_else(|| EncodeError::InvalidPath(db_path.to_path_buf()))?;

    Ok(SqliteConnection::establish(db_url)?)
}

/// Creates a new database file. Refuses to open one that already exists.
pub fn create_new_database(db_path: &Path) -> Result<SqliteConnection, EncodeError> {
    if db_path.exists() {
        return Err(EncodeError::DestinationConflict(db_path.to_path_buf()));
    }
    establish_connection(db_path)
}

/// Runs `create_sql` and then `fill` in one transaction.
///
/// Each table of the export is written this way, so a failure while filling
/// one table leaves the tables written before it committed.
pub fn create_and_fill_table<F>(
    conn: &mut SqliteConnection,
    create_sql: &str,
    fill: F,
) -> Result<usize, EncodeError>
where
    F: FnOnce(&mut SqliteConnection) -> Result<usize, diesel::result::Error>,
{
    let count = conn.transaction::<_, diesel::result::Error, _>(|conn| {
        conn.batch_execute(create_sql)?;
        fill(conn)
    })?;
    Ok(count)
}
