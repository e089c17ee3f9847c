mod convert;
mod listing;

use std::path::{Path, PathBuf};
use std::process::exit;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use dotenvy::dotenv;

use aionian_backend::{ExportOptions, OutputFormat, ParseOptions, logger, parse_file};

use crate::convert::{ConvertReport, ConvertSettings, run_convert};

#[derive(Parser, Debug)]
#[command(author, version, about = "Aionian Bible noia converter", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert every .noia file in the source directory
    Convert {
        /// Directory with the .noia source files.
        #[arg(long, value_name = "DIRECTORY_PATH", env = "AIONIAN_SOURCE_DIR",
              default_value = "AionianBible_DataFileStandard")]
        source_dir: PathBuf,

        /// Directory for the converted files and the bible_listing.json manifest.
        #[arg(long, value_name = "DIRECTORY_PATH", env = "AIONIAN_DEST_DIR",
              default_value = "aionian-json-listing")]
        dest_dir: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = FormatArg::Json)]
        format: FormatArg,

        /// Remove existing output files of the chosen format first
        #[arg(long, default_value_t = false)]
        clean: bool,

        /// Indent JSON output
        #[arg(long, default_value_t = false)]
        pretty: bool,

        /// Reject duplicate tags, books, chapters and verses
        #[arg(long, default_value_t = false)]
        strict: bool,

        /// Don't write bible_listing.json
        #[arg(long, default_value_t = false)]
        no_listing: bool,
    },

    /// Parse a single .noia file and print its statistics
    #[command(arg_required_else_help = true)]
    Inspect {
        #[arg(value_name = "FILE_PATH")]
        path: PathBuf,

        #[arg(long, default_value_t = false)]
        strict: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum FormatArg {
    Json,
    Sqlite,
    TsvTar,
    CustomText,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Sqlite => OutputFormat::Sqlite,
            FormatArg::TsvTar => OutputFormat::TsvTar,
            FormatArg::CustomText => OutputFormat::CustomText,
        }
    }
}

fn parse_options(strict: bool) -> ParseOptions {
    if strict { ParseOptions::strict() } else { ParseOptions::default() }
}

fn print_summary(report: &ConvertReport) {
    println!();
    println!("{} {}", "Converted:".green().bold(), report.converted.len());

    if !report.failed.is_empty() {
        println!("{} {}", "Failed:".red().bold(), report.failed.len());
        for (path, err) in report.failed.iter() {
            println!("  {}: {}", path.display(), err);
        }
    }

    println!("Input size:  {} bytes", report.input_bytes);
    println!("Output size: {} bytes", report.output_bytes);
    if let Some(ratio) = report.size_ratio() {
        println!("Ratio:       {:.3}", ratio);
    }
    if let Some(path) = &report.listing_path {
        println!("Listing:     {}", path.display());
    }
    println!("Elapsed:     {}", logger::format_duration(report.elapsed));
}

fn inspect(path: &Path, strict: bool) -> Result<()> {
    let doc = parse_file(path, &parse_options(strict))
        .with_context(|| format!("Failed to parse {:?}", path))?;
    let stats = doc.stats();

    println!("{}", path.display().to_string().bold());
    for (key, value) in doc.metadata.iter() {
        println!("  {}: {}", key, value);
    }
    println!(
        "tags: {}, books: {}, chapters: {}, verses: {}, longest verse: {}",
        stats.tag_count, stats.book_count, stats.chapter_count, stats.verse_count, stats.max_verse_len,
    );

    for (book_id, name, book) in doc.indexed_books() {
        let chapters = book.map(|b| b.len()).unwrap_or(0);
        let verses: usize = book.map(|b| b.values().map(|c| c.len()).sum()).unwrap_or(0);
        println!("{:>4}  {:<32} {:>4} chapters {:>6} verses", book_id, name, chapters, verses);
    }

    Ok(())
}

fn main() {
    // Attempt to load .env file. It may define AIONIAN_SOURCE_DIR, AIONIAN_DEST_DIR
    // and the logger variables. Clap picks up the directories via `env = ...`.
    if dotenv().is_err() {
        logger::debug("No .env file found or failed to load.");
    }

    let cli = Cli::parse();

    let command_result = match cli.command {
        Commands::Convert { source_dir, dest_dir, format, clean, pretty, strict, no_listing } => {
            let settings = ConvertSettings {
                source_dir,
                dest_dir,
                format: format.into(),
                clean,
                write_listing: !no_listing,
                parse_options: parse_options(strict),
                export_options: ExportOptions { pretty_json: pretty },
            };

            run_convert(&settings).map(|report| {
                print_summary(&report);
                report.failed.is_empty()
            })
        }

        Commands::Inspect { path, strict } => inspect(&path, strict).map(|_| true),
    };

    match command_result {
        Ok(true) => {}
        Ok(false) => exit(1),
        Err(e) => {
            eprintln!("{} {:#}", "Error executing command:".red(), e);
            exit(1);
        }
    }
}
