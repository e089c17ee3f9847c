//! Error types for parsing noia files and exporting documents.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort the parse of a whole noia document.
#[derive(Error, Debug)]
pub enum ParseError {
    /// A line that is neither a header, a comment, a book declaration nor a verse.
    #[error("Invalid line {line_no}: {line:?}")]
    InvalidLine { line_no: usize, line: String },

    /// Only raised with `ParseOptions::strict`.
    #[error("Duplicate {kind} at line {line_no}: {key}")]
    Duplicate {
        kind: DuplicateKind,
        line_no: usize,
        key: String,
    },

    #[error("Input is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateKind {
    MetadataKey,
    Book,
    Chapter,
    Verse,
}

impl std::fmt::Display for DuplicateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DuplicateKind::MetadataKey => "metadata key",
            DuplicateKind::Book => "book id",
            DuplicateKind::Chapter => "chapter id",
            DuplicateKind::Verse => "verse id",
        };
        write!(f, "{}", s)
    }
}

/// Errors raised while writing a document to one of the output formats.
#[derive(Error, Debug)]
pub enum EncodeError {
    /// SQLite and tar outputs are never written over an existing file.
    #[error("Destination already exists: {0:?}")]
    DestinationConflict(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to connect to database: {0}")]
    Connection(#[from] diesel::ConnectionError),

    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("Invalid destination path: {0:?}")]
    InvalidPath(PathBuf),
}
