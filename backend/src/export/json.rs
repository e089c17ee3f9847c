use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::document::Document;
use crate::error::EncodeError;
use crate::export::DocumentExporter;

/// Writes the document as one JSON object: `tags`, `index`, then one member per book.
pub fn write_json<W: Write>(doc: &Document, mut writer: W, pretty: bool) -> Result<(), EncodeError> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, doc)?;
    } else {
        serde_json::to_writer(&mut writer, doc)?;
    }
    writer.flush()?;
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct JsonExporter {
    pub pretty: bool,
}

impl DocumentExporter for JsonExporter {
    /// Replaces an existing file at `dest`.
    fn export(&self, doc: &Document, dest: &Path) -> Result<(), EncodeError> {
        let file = File::create(dest)?;
        write_json(doc, BufWriter::new(file), self.pretty)
    }
}
