//! A compact text layout for bible readers that parse with fixed-size buffers.
//!
//! ```text
//! <tag count>\t<book count>\t<total chapter count>\t<longest verse length>
//! <key>\t<value>                        (once per tag)
//! <book id>\t<name>\t<chapter count>    (once per book, in index order)
//! <chapter id>\t<verse count>           (once per chapter of that book)
//! <verse id>\t<text>                    (once per verse of that chapter)
//! ```
//!
//! Text fields are written as is. A tab or newline inside a value breaks the
//! layout, the noia format cannot produce either inside a verse.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::document::Document;
use crate::error::EncodeError;
use crate::export::DocumentExporter;

pub fn write_custom_text<W: Write>(doc: &Document, mut w: W) -> io::Result<()> {
    // The header needs the whole document scanned first.
    let stats = doc.stats();
    writeln!(
        w,
        "{}\t{}\t{}\t{}",
        stats.tag_count, stats.book_count, stats.chapter_count, stats.max_verse_len
    )?;

    for (key, value) in &doc.metadata {
        writeln!(w, "{}\t{}", key, value)?;
    }

    for (book_id, name, book) in doc.indexed_books() {
        let chapter_count = book.map(|b| b.len()).unwrap_or(0);
        writeln!(w, "{}\t{}\t{}", book_id, name, chapter_count)?;

        let Some(book) = book else { continue };
        for (chapter_id, chapter) in book {
            writeln!(w, "{}\t{}", chapter_id, chapter.len())?;
            for (verse_id, text) in chapter {
                writeln!(w, "{}\t{}", verse_id, text)?;
            }
        }
    }

    w.flush()
}

#[derive(Debug, Clone, Default)]
pub struct CustomTextExporter;

impl DocumentExporter for CustomTextExporter {
    /// Replaces an existing file at `dest`.
    fn export(&self, doc: &Document, dest: &Path) -> Result<(), EncodeError> {
        let file = File::create(dest)?;
        write_custom_text(doc, BufWriter::new(file))?;
        Ok(())
    }
}
