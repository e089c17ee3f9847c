//! Parser for `.noia` bible data files.
//!
//! A noia file is line oriented. Each line is one of:
//!
//! - the column header `INDEX\tBOOK\tCHAPTER\tVERSE\tTEXT`
//! - a book declaration `# BOOK\t<id>\t<short name>\t<english name>\t<regional name>`
//! - a verse `<book id>\t<book short name>\t<chapter id>\t<verse id>\t<text>`
//! - a comment starting with `#`, which is stored as metadata when it has the form `key: value`
//!
//! Parsing happens in two steps. [`classify_line`] turns a single line into a
//! [`NoiaLine`], and [`ParseState::step`] folds the classified lines into a
//! [`Document`]. Chapters and books are only flushed into the document when
//! their boundary is crossed: a verse with a different chapter id closes the
//! chapter, the next book declaration (or the end of the input) closes the book.

use std::path::Path;

use crate::document::{Book, BookId, Chapter, ChapterId, Document, VerseId};
use crate::error::{DuplicateKind, ParseError};
use crate::logger;
use crate::settings::ParseOptions;

pub const HEADER_LINE: &str = "INDEX\tBOOK\tCHAPTER\tVERSE\tTEXT";
const BOOK_BEGIN_PREFIX: &str = "# BOOK";

/// A book declaration line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookBeginLine<'a> {
    pub book_id: BookId,
    pub short_name: &'a str,
    pub eng_name: &'a str,
    /// Name of the book in the language of the bible, possibly non-latin.
    pub reg_name: &'a str,
}

/// A verse line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseLine<'a> {
    pub book_id: BookId,
    pub book_short_name: &'a str,
    pub chapter_id: ChapterId,
    pub verse_id: VerseId,
    pub text: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoiaLine<'a> {
    Header,
    BookBegin(BookBeginLine<'a>),
    Verse(VerseLine<'a>),
    /// Comment text without the leading `#`, trimmed.
    Comment(&'a str),
    /// The trimmed line which matched nothing.
    Invalid(&'a str),
}

/// Splits a line into exactly five tab separated fields.
fn split_five_fields(line: &str) -> Option<[&str; 5]> {
    let mut fields = line.split('\t');
    let res = [
        fields.next()?,
        fields.next()?,
        fields.next()?,
        fields.next()?,
        fields.next()?,
    ];
    if fields.next().is_some() {
        return None;
    }
    Some(res)
}

fn parse_id(field: &str) -> Option<i64> {
    field.trim().parse::<i64>().ok()
}

fn parse_verse_line(line: &str) -> Option<VerseLine<'_>> {
    let [book_id, book_short_name, chapter_id, verse_id, text] = split_five_fields(line)?;
    Some(VerseLine {
        book_id: parse_id(book_id)?,
        book_short_name,
        chapter_id: parse_id(chapter_id)?,
        verse_id: parse_id(verse_id)?,
        text,
    })
}

fn parse_book_begin_line(line: &str) -> Option<BookBeginLine<'_>> {
    if !line.starts_with(BOOK_BEGIN_PREFIX) {
        return None;
    }
    let [_, book_id, short_name, eng_name, reg_name] = split_five_fields(line)?;
    Some(BookBeginLine {
        book_id: parse_id(book_id)?,
        short_name,
        eng_name,
        reg_name,
    })
}

/// Classifies a single line (without its line terminator).
///
/// The verse check runs before the book declaration check, so a five field
/// line with numeric book, chapter and verse fields is always a verse.
pub fn classify_line(line: &str) -> NoiaLine<'_> {
    let line = line.trim();

    if line == HEADER_LINE {
        return NoiaLine::Header;
    }
    if let Some(verse) = parse_verse_line(line) {
        return NoiaLine::Verse(verse);
    }
    if let Some(book) = parse_book_begin_line(line) {
        return NoiaLine::BookBegin(book);
    }
    if let Some(comment) = line.strip_prefix('#') {
        return NoiaLine::Comment(comment.trim());
    }

    NoiaLine::Invalid(line)
}

/// Splits a comment of the form `key: value` at the first colon.
pub fn metadata_pair(comment: &str) -> Option<(&str, &str)> {
    let (key, value) = comment.split_once(':')?;
    Some((key.trim(), value.trim()))
}

/// The assembler state between two lines.
#[derive(Debug, Clone, Default)]
pub struct ParseState {
    doc: Document,
    current_book_id: BookId,
    current_book: Book,
    current_chapter_id: ChapterId,
    current_chapter: Chapter,
    strict: bool,
}

impl ParseState {
    pub fn new(options: &ParseOptions) -> Self {
        ParseState {
            strict: options.strict,
            ..Default::default()
        }
    }

    pub fn current_book_id(&self) -> BookId {
        self.current_book_id
    }

    pub fn current_chapter_id(&self) -> ChapterId {
        self.current_chapter_id
    }

    /// The document as flushed so far, without the pending chapter and book.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Applies one classified line. `line_no` is 1-based and only used for errors.
    pub fn step(mut self, line: NoiaLine<'_>, line_no: usize) -> Result<Self, ParseError> {
        match line {
            NoiaLine::Header => {}

            NoiaLine::Comment(comment) => {
                if let Some((key, value)) = metadata_pair(comment) {
                    if self.strict && self.doc.metadata.contains_key(key) {
                        return Err(duplicate(DuplicateKind::MetadataKey, line_no, key));
                    }
                    self.doc.metadata.insert(key.to_string(), value.to_string());
                }
            }

            NoiaLine::Verse(verse) => {
                if verse.chapter_id != self.current_chapter_id {
                    self.finish_chapter();
                    if self.strict && self.current_book.contains_key(&verse.chapter_id) {
                        return Err(duplicate(DuplicateKind::Chapter, line_no, &verse.chapter_id.to_string()));
                    }
                    self.current_chapter_id = verse.chapter_id;
                }
                if self.strict && self.current_chapter.contains_key(&verse.verse_id) {
                    let key = format!("{}:{}", verse.chapter_id, verse.verse_id);
                    return Err(duplicate(DuplicateKind::Verse, line_no, &key));
                }
                self.current_chapter.insert(verse.verse_id, verse.text.to_string());
            }

            NoiaLine::BookBegin(book) => {
                self.finish_chapter();
                self.finish_book();
                if self.strict && self.doc.index.contains_key(&book.book_id) {
                    return Err(duplicate(DuplicateKind::Book, line_no, &book.book_id.to_string()));
                }
                self.doc.index.insert(book.book_id, book.reg_name.to_string());
                self.current_book_id = book.book_id;
            }

            NoiaLine::Invalid(text) => {
                return Err(ParseError::InvalidLine {
                    line_no,
                    line: text.to_string(),
                });
            }
        }

        Ok(self)
    }

    /// Flushes the pending chapter and book and returns the finished document.
    pub fn finish(mut self) -> Document {
        self.finish_chapter();
        self.finish_book();
        self.doc
    }

    fn finish_chapter(&mut self) {
        if !self.current_chapter.is_empty() {
            let chapter = std::mem::take(&mut self.current_chapter);
            self.current_book.insert(self.current_chapter_id, chapter);
        }
    }

    fn finish_book(&mut self) {
        if !self.current_book.is_empty() {
            let chapters = std::mem::take(&mut self.current_book);
            // A re-declared book id continues in the entry it had before.
            self.doc
                .content
                .entry(self.current_book_id)
                .or_default()
                .extend(chapters);
        }
    }
}

fn duplicate(kind: DuplicateKind, line_no: usize, key: &str) -> ParseError {
    ParseError::Duplicate {
        kind,
        line_no,
        key: key.to_string(),
    }
}

/// Parses the bytes of a noia file.
pub fn parse(bytes: &[u8], options: &ParseOptions) -> Result<Document, ParseError> {
    let text = std::str::from_utf8(bytes)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut state = ParseState::new(options);
    for (idx, line) in text.lines().enumerate() {
        state = state.step(classify_line(line), idx + 1)?;
    }

    Ok(state.finish())
}

/// Reads and parses a noia file.
pub fn parse_file(path: &Path, options: &ParseOptions) -> Result<Document, ParseError> {
    let bytes = std::fs::read(path).map_err(|source| ParseError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let doc = parse(&bytes, options)?;

    let stats = doc.stats();
    logger::debug(&format!(
        "Parsed {:?}: {} tags, {} books, {} chapters, {} verses",
        path, stats.tag_count, stats.book_count, stats.chapter_count, stats.verse_count
    ));

    Ok(doc)
}
