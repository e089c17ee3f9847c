//! The canonical in-memory form of a parsed noia bible.
//!
//! Every map is an [`IndexMap`] so that iteration follows the order in which
//! entries first appeared in the source file. Book, chapter and verse ids are
//! not necessarily contiguous or sorted, and exporters must never re-sort them.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

pub type BookId = i64;
pub type ChapterId = i64;
pub type VerseId = i64;

/// verse id -> verse text
pub type Chapter = IndexMap<VerseId, String>;

/// chapter id -> chapter
pub type Book = IndexMap<ChapterId, Chapter>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Free-form `key: value` pairs from the comment lines, e.g. "Bible Name".
    pub metadata: IndexMap<String, String>,
    /// Book id -> regional display name, in order of declaration.
    pub index: IndexMap<BookId, String>,
    /// Book id -> chapters. Books without verses are absent.
    pub content: IndexMap<BookId, Book>,
}

/// Summary numbers over the books listed in the index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentStats {
    pub tag_count: usize,
    pub book_count: usize,
    pub chapter_count: usize,
    pub verse_count: usize,
    /// Longest verse text, counted in Unicode scalar values.
    pub max_verse_len: usize,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// The chapters of an indexed book. A book declared without any verses
    /// yields `None`, which callers treat as zero chapters.
    pub fn book(&self, book_id: BookId) -> Option<&Book> {
        self.content.get(&book_id)
    }

    /// Iterates `(book_id, name, chapters)` in index order.
    pub fn indexed_books(&self) -> impl Iterator<Item = (BookId, &str, Option<&Book>)> {
        self.index
            .iter()
            .map(|(id, name)| (*id, name.as_str(), self.content.get(id)))
    }

    pub fn stats(&self) -> DocumentStats {
        let mut stats = DocumentStats {
            tag_count: self.metadata.len(),
            book_count: self.index.len(),
            ..Default::default()
        };

        for (_, _, book) in self.indexed_books() {
            let Some(book) = book else { continue };
            stats.chapter_count += book.len();
            for chapter in book.values() {
                stats.verse_count += chapter.len();
                for text in chapter.values() {
                    stats.max_verse_len = stats.max_verse_len.max(text.chars().count());
                }
            }
        }

        stats
    }

    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}

/// Serializes as `{"tags": {...}, "index": {...}, "<book_id>": {...}, ...}`.
///
/// Integer keys are written as strings by serde_json.
impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2 + self.content.len()))?;
        map.serialize_entry("tags", &self.metadata)?;
        map.serialize_entry("index", &self.index)?;
        for (book_id, book) in &self.content {
            map.serialize_entry(&book_id.to_string(), book)?;
        }
        map.end()
    }
}
