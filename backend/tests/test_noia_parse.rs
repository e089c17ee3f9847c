use aionian_backend::{ParseError, ParseOptions, parse_file};

mod helpers;
use helpers as h;

#[test]
fn test_parse_sample_file() {
    let doc = h::sample_document();

    assert_eq!(doc.metadata.len(), 5);
    assert_eq!(doc.metadata_value("Bible Name"), Some("Holy Bible Aionian Edition"));
    assert_eq!(doc.metadata_value("Source"), Some("https://www.aionianbible.org"));

    let index: Vec<(i64, &str)> = doc.index.iter().map(|(k, v)| (*k, v.as_str())).collect();
    assert_eq!(index, vec![(1, "Liber Genesis"), (2, "Liber Exodi"), (19, "Liber Psalmorum")]);

    // Exodus is declared without verses.
    assert_eq!(doc.content.keys().copied().collect::<Vec<_>>(), vec![1, 19]);
    assert_eq!(doc.content[&19].keys().copied().collect::<Vec<_>>(), vec![23, 1]);
    assert_eq!(doc.content[&1][&2][&1], "Igitur perfecti sunt caeli et terra.");
}

#[test]
fn test_sample_stats() {
    let stats = h::sample_document().stats();
    assert_eq!(stats.tag_count, 5);
    assert_eq!(stats.book_count, 3);
    assert_eq!(stats.chapter_count, 4);
    assert_eq!(stats.verse_count, 6);
    assert_eq!(stats.max_verse_len, "Beatus vir qui non abiit in consilio impiorum.".chars().count());
}

#[test]
fn test_corrupted_file_fails() {
    let res = parse_file(&h::data_path("corrupted.noia"), &ParseOptions::default());
    match res {
        Err(ParseError::InvalidLine { line_no, line }) => {
            assert_eq!(line_no, 4);
            assert_eq!(line, "not a tab delimited line");
        }
        other => panic!("Expected InvalidLine, got {:?}", other),
    }
}

#[test]
fn test_missing_file() {
    let res = parse_file(&h::data_path("does_not_exist.noia"), &ParseOptions::default());
    assert!(matches!(res, Err(ParseError::Read { .. })));
}

#[test]
fn test_sample_is_strict_clean() {
    let strict = parse_file(&h::data_path("vulgata_sample.noia"), &ParseOptions::strict()).unwrap();
    assert_eq!(strict, h::sample_document());
}
