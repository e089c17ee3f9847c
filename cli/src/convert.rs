//! Converts every `.noia` file of a directory to the chosen output format.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use walkdir::WalkDir;

use aionian_backend::{
    Document, ExportOptions, NOIA_EXTENSION, OutputFormat, ParseOptions, encode, logger, parse_file,
};

use crate::listing::{ListingEntry, write_listing};

#[derive(Debug, Clone)]
pub struct ConvertSettings {
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
    pub format: OutputFormat,
    /// Remove existing output files of the chosen format before converting.
    pub clean: bool,
    pub write_listing: bool,
    pub parse_options: ParseOptions,
    pub export_options: ExportOptions,
}

#[derive(Debug, Default)]
pub struct ConvertReport {
    pub converted: Vec<ListingEntry>,
    pub failed: Vec<(PathBuf, String)>,
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub elapsed: Duration,
    pub listing_path: Option<PathBuf>,
}

impl ConvertReport {
    /// Output size relative to the input size of the converted files.
    pub fn size_ratio(&self) -> Option<f64> {
        if self.input_bytes == 0 {
            None
        } else {
            Some(self.output_bytes as f64 / self.input_bytes as f64)
        }
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(ext)
}

/// Lists the `.noia` files directly inside `dir`, sorted by name.
pub fn find_noia_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("Failed to read directory {:?}", dir))?;
        if entry.file_type().is_file() && has_extension(entry.path(), NOIA_EXTENSION) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Removes files with the format's extension from `dest_dir`. Returns the number removed.
pub fn clean_dest_dir(dest_dir: &Path, format: OutputFormat) -> Result<usize> {
    let mut removed = 0;
    for entry in WalkDir::new(dest_dir).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("Failed to read directory {:?}", dest_dir))?;
        if entry.file_type().is_file() && has_extension(entry.path(), format.extension()) {
            fs::remove_file(entry.path())
                .with_context(|| format!("Failed to remove {:?}", entry.path()))?;
            removed += 1;
        }
    }
    Ok(removed)
}

/// `<dest_dir>/<source stem>.<format extension>`
pub fn output_path(dest_dir: &Path, source: &Path, format: OutputFormat) -> PathBuf {
    let mut name = source.file_stem().unwrap_or(source.as_os_str()).to_os_string();
    name.push(".");
    name.push(format.extension());
    dest_dir.join(name)
}

/// Parses one file and exports it. Returns the document and the output size.
pub fn convert_file(source: &Path, dest: &Path, settings: &ConvertSettings) -> Result<(Document, u64)> {
    let doc = parse_file(source, &settings.parse_options)
        .with_context(|| format!("Failed to parse {:?}", source))?;

    encode(&doc, settings.format, dest, &settings.export_options)
        .with_context(|| format!("Failed to export {:?}", dest))?;

    let size = fs::metadata(dest)
        .with_context(|| format!("Failed to read size of {:?}", dest))?
        .len();

    Ok((doc, size))
}

pub fn run_convert(settings: &ConvertSettings) -> Result<ConvertReport> {
    if !settings.source_dir.is_dir() {
        bail!("Source directory does not exist: {:?}", settings.source_dir);
    }
    if !settings.dest_dir.is_dir() {
        bail!("Destination directory does not exist: {:?}", settings.dest_dir);
    }

    let start = Instant::now();

    if settings.clean {
        let n = clean_dest_dir(&settings.dest_dir, settings.format)?;
        logger::info(&format!("Removed {} existing .{} files", n, settings.format.extension()));
    }

    let sources = find_noia_files(&settings.source_dir)?;
    logger::info(&format!(
        "Converting {} files from {:?} to {}",
        sources.len(),
        settings.source_dir,
        settings.format.as_str()
    ));

    let mut report = ConvertReport::default();
    let total = sources.len();

    for (idx, source) in sources.iter().enumerate() {
        let dest = output_path(&settings.dest_dir, source, settings.format);
        let filename = dest
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        logger::info(&format!("[{}/{}] {}", idx + 1, total, filename));

        if settings.format.requires_fresh_destination() && dest.exists() {
            logger::warn(&format!("{} already exists, use --clean to replace it", filename));
        }

        match convert_file(source, &dest, settings) {
            Ok((doc, size)) => {
                report.input_bytes += fs::metadata(source).map(|m| m.len()).unwrap_or(0);
                report.output_bytes += size;
                report.converted.push(ListingEntry::from_document(&filename, &doc, size));
            }
            Err(e) => {
                logger::error(&format!("{:#}", e));
                report.failed.push((source.clone(), format!("{:#}", e)));
            }
        }
    }

    if settings.write_listing {
        let path = write_listing(&settings.dest_dir, &report.converted)?;
        report.listing_path = Some(path);
    }

    report.elapsed = start.elapsed();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD: &str = "# Bible Name: Biblia Sacra\n\
                        # Bible Language: Latina\n\
                        # Bible Language English: Latin\n\
                        # BOOK\t1\tGEN\tGenesis\tLiber Genesis\n\
                        1\tGEN\t1\t1\tIn principio creavit Deus caelum et terram.\n";

    const BAD: &str = "# Bible Name: Broken\nnot a tab delimited line\n";

    fn settings(source_dir: &Path, dest_dir: &Path, format: OutputFormat) -> ConvertSettings {
        ConvertSettings {
            source_dir: source_dir.to_path_buf(),
            dest_dir: dest_dir.to_path_buf(),
            format,
            clean: false,
            write_listing: true,
            parse_options: ParseOptions::default(),
            export_options: ExportOptions::default(),
        }
    }

    #[test]
    fn test_output_path() {
        let p = output_path(Path::new("out"), Path::new("src/Latin-Vulgata.noia"), OutputFormat::TsvTar);
        assert_eq!(p, PathBuf::from("out/Latin-Vulgata.tar"));

        let p = output_path(Path::new("out"), Path::new("Holy.Bible.noia"), OutputFormat::Sqlite);
        assert_eq!(p, PathBuf::from("out/Holy.Bible.sqlite3"));
    }

    #[test]
    fn test_find_noia_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.noia"), GOOD).unwrap();
        fs::write(dir.path().join("a.noia"), GOOD).unwrap();
        fs::write(dir.path().join("readme.txt"), "").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/c.noia"), GOOD).unwrap();

        let files = find_noia_files(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.noia", "b.noia"]);
    }

    #[test]
    fn test_run_convert_continues_after_failure() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        fs::write(src.path().join("bad.noia"), BAD).unwrap();
        fs::write(src.path().join("good.noia"), GOOD).unwrap();

        let report = run_convert(&settings(src.path(), dest.path(), OutputFormat::Json)).unwrap();

        assert_eq!(report.converted.len(), 1);
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].1.contains("Invalid line 2"));

        let entry = &report.converted[0];
        assert_eq!(entry.filename, "good.json");
        assert_eq!(entry.bible_name.as_deref(), Some("Biblia Sacra"));
        assert_eq!(entry.size, fs::metadata(dest.path().join("good.json")).unwrap().len());
        assert_eq!(report.output_bytes, entry.size);
        assert!(report.size_ratio().is_some());

        let listing: Vec<ListingEntry> =
            serde_json::from_slice(&fs::read(report.listing_path.unwrap()).unwrap()).unwrap();
        assert_eq!(listing, report.converted);
    }

    #[test]
    fn test_run_convert_clean_allows_rerun() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        fs::write(src.path().join("good.noia"), GOOD).unwrap();

        let mut s = settings(src.path(), dest.path(), OutputFormat::TsvTar);
        s.write_listing = false;

        let first = run_convert(&s).unwrap();
        assert_eq!(first.converted.len(), 1);

        // The archive already exists and is not overwritten.
        let second = run_convert(&s).unwrap();
        assert_eq!(second.failed.len(), 1);

        s.clean = true;
        let third = run_convert(&s).unwrap();
        assert_eq!(third.converted.len(), 1);
        assert!(third.failed.is_empty());
        assert!(!dest.path().join("bible_listing.json").exists());
    }

    #[test]
    fn test_run_convert_requires_directories() {
        let src = tempfile::tempdir().unwrap();
        let missing = src.path().join("missing");
        assert!(run_convert(&settings(src.path(), &missing, OutputFormat::Json)).is_err());
        assert!(run_convert(&settings(&missing, src.path(), OutputFormat::Json)).is_err());
    }
}
