//! Exports a document as a tar archive of TSV files:
//!
//! - `tags.tsv`: `key\tvalue`
//! - `index.tsv`: `book_id\tname`
//! - `<book_id>.tsv` for every indexed book: `chapter_id\tverse_id\ttext`

use std::io::{self, BufWriter, Write};
use std::path::Path;

use tar::{Builder, Header};

use crate::document::Document;
use crate::error::EncodeError;
use crate::export::{DocumentExporter, create_new_file};

/// A named, fully buffered archive member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsvEntry {
    pub name: String,
    pub data: Vec<u8>,
}

fn push_row(buf: &mut Vec<u8>, fields: &[&dyn std::fmt::Display]) {
    let row = fields
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<String>>()
        .join("\t");
    buf.extend_from_slice(row.as_bytes());
    buf.push(b'\n');
}

/// Builds the archive members in archive order.
pub fn tsv_entries(doc: &Document) -> Vec<TsvEntry> {
    let mut entries = Vec::with_capacity(2 + doc.index.len());

    let mut tags = Vec::new();
    for (key, value) in &doc.metadata {
        push_row(&mut tags, &[key, value]);
    }
    entries.push(TsvEntry { name: "tags.tsv".to_string(), data: tags });

    let mut index = Vec::new();
    for (book_id, name) in &doc.index {
        push_row(&mut index, &[book_id, name]);
    }
    entries.push(TsvEntry { name: "index.tsv".to_string(), data: index });

    for (book_id, _, book) in doc.indexed_books() {
        let mut rows = Vec::new();
        for (chapter_id, chapter) in book.into_iter().flatten() {
            for (verse_id, text) in chapter {
                push_row(&mut rows, &[chapter_id, verse_id, text]);
            }
        }
        entries.push(TsvEntry { name: format!("{}.tsv", book_id), data: rows });
    }

    entries
}

/// Writes the tar archive to `writer` and returns the writer.
pub fn write_tsv_tar<W: Write>(doc: &Document, writer: W) -> io::Result<W> {
    let mut builder = Builder::new(writer);

    for entry in tsv_entries(doc) {
        let mut header = Header::new_gnu();
        header.set_size(entry.data.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(0);
        builder.append_data(&mut header, &entry.name, entry.data.as_slice())?;
    }

    builder.into_inner()
}

#[derive(Debug, Clone, Default)]
pub struct TsvTarExporter;

impl DocumentExporter for TsvTarExporter {
    /// Fails with `DestinationConflict` if `dest` exists.
    fn export(&self, doc: &Document, dest: &Path) -> Result<(), EncodeError> {
        let file = create_new_file(dest)?;
        let mut writer = write_tsv_tar(doc, BufWriter::new(file))?;
        writer.flush()?;
        Ok(())
    }
}
