//! Exporters turning a parsed [`Document`] into one of the output formats.
//!
//! The set of formats is closed ([`OutputFormat`]); each format has one
//! exporter implementing [`DocumentExporter`], selected by [`exporter_for()`].

pub mod custom_text;
pub mod json;
pub mod sqlite;
pub mod tsv_tar;

use std::path::Path;

use crate::document::Document;
use crate::error::EncodeError;
use crate::logger;
use crate::settings::ExportOptions;
use crate::types::OutputFormat;

pub use custom_text::{CustomTextExporter, write_custom_text};
pub use json::{JsonExporter, write_json};
pub use sqlite::{SqliteExporter, export_sqlite};
pub use tsv_tar::{TsvTarExporter, write_tsv_tar};

pub trait DocumentExporter {
    /// Writes `doc` to the file at `dest`.
    fn export(&self, doc: &Document, dest: &Path) -> Result<(), EncodeError>;
}

pub fn exporter_for(format: OutputFormat, options: &ExportOptions) -> Box<dyn DocumentExporter> {
    match format {
        OutputFormat::Json => Box::new(JsonExporter { pretty: options.pretty_json }),
        OutputFormat::Sqlite => Box::new(SqliteExporter),
        OutputFormat::TsvTar => Box::new(TsvTarExporter),
        OutputFormat::CustomText => Box::new(CustomTextExporter),
    }
}

/// Exports `doc` in the given format to `dest`.
pub fn encode(
    doc: &Document,
    format: OutputFormat,
    dest: &Path,
    options: &ExportOptions,
) -> Result<(), EncodeError> {
    exporter_for(format, options).export(doc, dest)?;
    logger::debug(&format!("Exported {} to {:?}", format.as_str(), dest));
    Ok(())
}

/// Opens `dest` for writing, failing if it already exists.
pub(crate) fn create_new_file(dest: &Path) -> Result<std::fs::File, EncodeError> {
    std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dest)
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => EncodeError::DestinationConflict(dest.to_path_buf()),
            _ => EncodeError::Io(e),
        })
}
