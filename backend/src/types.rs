use std::str::FromStr;

use serde::{Serialize, Deserialize};
use thiserror::Error;

/// The output formats a document can be exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "sqlite")]
    Sqlite,
    #[serde(rename = "tsv-tar")]
    TsvTar,
    #[serde(rename = "custom-text")]
    CustomText,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Json,
        OutputFormat::Sqlite,
        OutputFormat::TsvTar,
        OutputFormat::CustomText,
    ];

    /// File extension used for output files, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Sqlite => "sqlite3",
            OutputFormat::TsvTar => "tar",
            OutputFormat::CustomText => "txt",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Sqlite => "sqlite",
            OutputFormat::TsvTar => "tsv-tar",
            OutputFormat::CustomText => "custom-text",
        }
    }

    /// SQLite databases and tar archives refuse to replace an existing file.
    pub fn requires_fresh_destination(&self) -> bool {
        matches!(self, OutputFormat::Sqlite | OutputFormat::TsvTar)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid OutputFormat value: {0}")]
pub struct ParseOutputFormatError(String);

impl FromStr for OutputFormat {
    type Err = ParseOutputFormatError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        OutputFormat::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| ParseOutputFormatError(s.to_string()))
    }
}
