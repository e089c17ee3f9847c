pub mod types;
pub mod settings;
pub mod error;
pub mod logger;
pub mod document;
pub mod noia_parse;
pub mod export;
pub mod db;

pub use document::{Book, BookId, Chapter, ChapterId, Document, DocumentStats, VerseId};
pub use error::{DuplicateKind, EncodeError, ParseError};
pub use export::{DocumentExporter, encode, exporter_for};
pub use noia_parse::{parse, parse_file};
pub use settings::{ExportOptions, ParseOptions};
pub use types::OutputFormat;

/// File extension of the noia source files, without the dot.
pub static NOIA_EXTENSION: &str = "noia";
