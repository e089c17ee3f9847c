use std::path::{Path, PathBuf};

use aionian_backend::{Document, ParseOptions, parse_file};

pub fn data_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data").join(name)
}

pub fn sample_document() -> Document {
    parse_file(&data_path("vulgata_sample.noia"), &ParseOptions::default())
        .expect("Can't parse sample")
}

#[allow(dead_code)]
pub fn document_from_str(input: &str) -> Document {
    aionian_backend::parse(input.as_bytes(), &ParseOptions::default())
        .expect("Can't parse input")
}
