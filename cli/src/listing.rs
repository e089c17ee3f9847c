//! The `bible_listing.json` manifest describing every converted file.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use aionian_backend::Document;

pub const LISTING_FILE_NAME: &str = "bible_listing.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    /// Output file name, relative to the destination directory.
    pub filename: String,
    pub bible_name: Option<String>,
    pub language: Option<String>,
    pub language_en: Option<String>,
    /// Output file size in bytes.
    pub size: u64,
}

impl ListingEntry {
    pub fn from_document(filename: &str, doc: &Document, size: u64) -> Self {
        let tag = |key: &str| doc.metadata_value(key).map(str::to_string);

        ListingEntry {
            filename: filename.to_string(),
            bible_name: tag("Bible Name"),
            language: tag("Bible Language"),
            language_en: tag("Bible Language English"),
            size,
        }
    }
}

/// Writes the listing into `dest_dir`, replacing an existing one.
pub fn write_listing(dest_dir: &Path, entries: &[ListingEntry]) -> Result<PathBuf> {
    let path = dest_dir.join(LISTING_FILE_NAME);
    let file = File::create(&path)
        .with_context(|| format!("Failed to create {:?}", path))?;
    serde_json::to_writer(BufWriter::new(file), entries)
        .with_context(|| format!("Failed to write {:?}", path))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_from_document() {
        let doc = aionian_backend::parse(
            "# Bible Name: Biblia Sacra\n# Bible Language: Latina\n".as_bytes(),
            &Default::default(),
        )
        .unwrap();

        let entry = ListingEntry::from_document("vulgata.json", &doc, 42);
        assert_eq!(entry.bible_name.as_deref(), Some("Biblia Sacra"));
        assert_eq!(entry.language.as_deref(), Some("Latina"));
        assert_eq!(entry.language_en, None);
        assert_eq!(entry.size, 42);
    }

    #[test]
    fn test_write_listing() {
        let dir = tempfile::tempdir().unwrap();
        let entries = vec![ListingEntry {
            filename: "a.json".to_string(),
            bible_name: Some("A".to_string()),
            language: None,
            language_en: Some("English".to_string()),
            size: 7,
        }];

        let path = write_listing(dir.path(), &entries).unwrap();
        let read_back: Vec<ListingEntry> = serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap();
        assert_eq!(read_back, entries);
    }
}
