use std::path::Path;

use diesel::prelude::*;

use crate::db::bible_models::{NewBookIndexRow, NewContentRow, NewMetadataRow};
use crate::db::bible_schema::{book_index, content, metadata};
use crate::db::{self, CREATE_BOOK_INDEX_TABLE, CREATE_CONTENT_TABLE, CREATE_METADATA_TABLE};
use crate::document::Document;
use crate::error::EncodeError;
use crate::export::DocumentExporter;
use crate::logger;

/// Rows per INSERT statement, keeps the bound parameters below SQLite's limit.
const INSERT_CHUNK_SIZE: usize = 500;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SqliteExportStats {
    pub metadata_rows: usize,
    pub book_index_rows: usize,
    pub content_rows: usize,
}

/// Writes `doc` into a new SQLite database at `db_path`.
///
/// The three tables are committed one after the other. An error while filling
/// `content` leaves `metadata` and `book_index` in the file.
pub fn export_sqlite(doc: &Document, db_path: &Path) -> Result<SqliteExportStats, EncodeError> {
    let mut conn = db::create_new_database(db_path)?;

    let metadata_rows: Vec<NewMetadataRow> = doc
        .metadata
        .iter()
        .map(|(key, value)| NewMetadataRow { key: key.as_str(), value: value.as_str() })
        .collect();

    let metadata_count = db::create_and_fill_table(&mut conn, CREATE_METADATA_TABLE, |conn| {
        let mut n = 0;
        for chunk in metadata_rows.chunks(INSERT_CHUNK_SIZE) {
            n += diesel::insert_into(metadata::table).values(chunk).execute(conn)?;
        }
        Ok(n)
    })?;

    let book_rows: Vec<NewBookIndexRow> = doc
        .index
        .iter()
        .map(|(book_id, name)| NewBookIndexRow { book_id: *book_id, name: name.as_str() })
        .collect();

    let book_index_count = db::create_and_fill_table(&mut conn, CREATE_BOOK_INDEX_TABLE, |conn| {
        let mut n = 0;
        for chunk in book_rows.chunks(INSERT_CHUNK_SIZE) {
            n += diesel::insert_into(book_index::table).values(chunk).execute(conn)?;
        }
        Ok(n)
    })?;

    let mut content_rows: Vec<NewContentRow> = Vec::new();
    for (book_id, _, book) in doc.indexed_books() {
        for (chapter_id, chapter) in book.into_iter().flatten() {
            for (verse_id, text) in chapter {
                content_rows.push(NewContentRow {
                    book_id,
                    chapter_id: *chapter_id,
                    verse_id: *verse_id,
                    verse_text: text.as_str(),
                });
            }
        }
    }

    let content_count = db::create_and_fill_table(&mut conn, CREATE_CONTENT_TABLE, |conn| {
        let mut n = 0;
        for chunk in content_rows.chunks(INSERT_CHUNK_SIZE) {
            n += diesel::insert_into(content::table).values(chunk).execute(conn)?;
        }
        Ok(n)
    })?;

    let stats = SqliteExportStats {
        metadata_rows: metadata_count,
        book_index_rows: book_index_count,
        content_rows: content_count,
    };

    logger::debug(&format!(
        "SQLite {:?}: {} metadata, {} books, {} verses",
        db_path, stats.metadata_rows, stats.book_index_rows, stats.content_rows
    ));

    Ok(stats)
}

#[derive(Debug, Clone, Default)]
pub struct SqliteExporter;

impl DocumentExporter for SqliteExporter {
    /// Fails with `DestinationConflict` if `dest` exists.
    fn export(&self, doc: &Document, dest: &Path) -> Result<(), EncodeError> {
        export_sqlite(doc, dest)?;
        Ok(())
    }
}
