use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Duration;

use chrono::{DateTime, Local};
use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;

/// Log levels representing increasing verbosity.
///
/// Setting a level enables that level and all less verbose levels below it:
///
/// - **Silent (0)**: No logging output
/// - **Error (1)**: Only error messages
/// - **Warn (2)**: Warning and error messages
/// - **Info (3)**: Informational, warning, and error messages (default)
/// - **Debug (4)**: All messages
///
/// The level is read from the `LOG_LEVEL` environment variable and can be
/// changed at runtime with [`set_log_level()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Silent = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Silent => "Silent",
            Level::Error => "Error",
            Level::Warn => "Warn",
            Level::Info => "Info",
            Level::Debug => "Debug",
        }
    }
}

impl FromStr for Level {
    type Err = String;

    /// Case insensitive: "silent", "error", "warn", "info", "debug".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" => Ok(Level::Silent),
            "error" => Ok(Level::Error),
            "warn" => Ok(Level::Warn),
            "info" => Ok(Level::Info),
            "debug" => Ok(Level::Debug),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(default)
}

/// Rotates log files, keeping only the last 5 rotated files next to `log_file`.
fn rotate_log_files(log_file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    // try_exists() so that permission errors skip rotation instead of failing
    if !log_file.try_exists().unwrap_or(false) {
        return Ok(());
    }

    let modified = std::fs::metadata(log_file)?.modified()?;
    let datetime: DateTime<Local> = modified.into();
    let timestamp = datetime.format("%Y-%m-%dT%H-%M-%S");

    let parent = log_file.parent().ok_or("No parent directory")?;
    let new_path = parent.join(format!("log.{}.txt", timestamp));
    std::fs::rename(log_file, &new_path)?;

    let mut log_files: Vec<PathBuf> = std::fs::read_dir(parent)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .map(|name| name.starts_with("log.") && name.ends_with(".txt") && name != "log.txt")
                .unwrap_or(false)
        })
        .collect();

    // Sorts by datetime
    log_files.sort();

    if log_files.len() > 5 {
        for file in &log_files[0..log_files.len() - 5] {
            if let Err(e) = std::fs::remove_file(file) {
                eprintln!("Failed to remove old log file {:?}: {}", file, e);
            }
        }
    }

    Ok(())
}

pub struct Logger {
    log_file: Option<PathBuf>,
    enable_print_log: bool,
    level: Mutex<Level>,
}

impl Logger {
    /// Reads `LOG_FILE`, `DISABLE_LOG`, `ENABLE_PRINT_LOG` and `LOG_LEVEL`.
    pub fn from_env() -> Self {
        let disable_log = env_flag("DISABLE_LOG", false);
        let enable_print_log = env_flag("ENABLE_PRINT_LOG", true);

        let log_file = match std::env::var("LOG_FILE") {
            Ok(s) if !s.is_empty() && !disable_log => Some(PathBuf::from(s)),
            _ => None,
        };

        if let Some(ref path) = log_file {
            if let Err(e) = rotate_log_files(path) {
                eprintln!("Failed to rotate log files: {}", e);
            }
        }

        let level = std::env::var("LOG_LEVEL")
            .ok()
            .and_then(|v| v.parse::<Level>().ok())
            .unwrap_or(Level::Info);

        Logger {
            log_file,
            enable_print_log,
            level: Mutex::new(level),
        }
    }

    pub fn init_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        // LOG_LEVEL filters in Logger::log, RUST_LOG can narrow it further.
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("debug"));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_writer(std::io::stderr)
            .finish();

        tracing::subscriber::set_global_default(subscriber)?;

        Ok(())
    }

    fn write_to_file(&self, message: &str) -> std::io::Result<()> {
        let Some(ref log_file) = self.log_file else {
            return Ok(());
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)?;

        let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3fZ");
        file.write_all(format!("[{}] {}\n", timestamp, message).as_bytes())
    }

    fn enabled(&self, level: Level) -> bool {
        *self.level.lock() >= level
    }

    fn log(&self, level: Level, msg: &str) {
        if !self.enabled(level) {
            return;
        }

        if self.enable_print_log {
            match level {
                Level::Error => tracing::error!("{}", msg),
                Level::Warn => tracing::warn!("{}", msg),
                Level::Info => tracing::info!("{}", msg),
                Level::Debug => tracing::debug!("{}", msg),
                Level::Silent => {}
            }
        }

        let formatted_msg = format!("{}: {}", level.as_str().to_uppercase(), msg);
        if let Err(e) = self.write_to_file(&formatted_msg) {
            eprintln!("Failed to write to log file: {}", e);
        }
    }

    pub fn get_level(&self) -> Level {
        *self.level.lock()
    }

    pub fn set_level(&self, new_level: Level) {
        *self.level.lock() = new_level;
    }
}

pub static LOGGER: OnceLock<Logger> = OnceLock::new();
static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();

fn with_logger<F, R>(f: F) -> R
where
    F: FnOnce(&Logger) -> R,
{
    TRACING_INITIALIZED.get_or_init(|| {
        // Fails when the host application already installed a subscriber, which is fine.
        if let Err(e) = Logger::init_tracing() {
            eprintln!("Failed to initialize tracing: {}", e);
        }
    });

    f(LOGGER.get_or_init(Logger::from_env))
}

pub fn info(msg: &str) {
    with_logger(|logger| logger.log(Level::Info, msg));
}

pub fn warn(msg: &str) {
    with_logger(|logger| logger.log(Level::Warn, msg));
}

pub fn error(msg: &str) {
    with_logger(|logger| logger.log(Level::Error, msg));
}

pub fn debug(msg: &str) {
    with_logger(|logger| logger.log(Level::Debug, msg));
}

pub fn get_log_level() -> Level {
    with_logger(|logger| logger.get_level())
}

pub fn set_log_level(level: Level) {
    with_logger(|logger| logger.set_level(level));
}

/// Returns false if the string is not a valid level.
pub fn set_log_level_str(level_str: &str) -> bool {
    match level_str.parse::<Level>() {
        Ok(level) => {
            set_log_level(level);
            true
        }
        Err(_) => false,
    }
}

/// Formats a duration as HH:MM:SS.
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_str() {
        assert_eq!("DEBUG".parse::<Level>(), Ok(Level::Debug));
        assert_eq!("silent".parse::<Level>(), Ok(Level::Silent));
        assert!("verbose".parse::<Level>().is_err());
        assert!(Level::Info > Level::Warn);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(3725)), "01:02:05");
        assert_eq!(format_duration(Duration::from_millis(999)), "00:00:00");
    }

    #[test]
    fn test_logger_writes_to_file_above_level() {
        let dir = tempfile::tempdir().unwrap();
        let log_file = dir.path().join("log.txt");
        let logger = Logger {
            log_file: Some(log_file.clone()),
            enable_print_log: false,
            level: Mutex::new(Level::Warn),
        };

        logger.log(Level::Info, "skipped");
        logger.log(Level::Error, "written");

        let content = std::fs::read_to_string(&log_file).unwrap();
        assert!(content.contains("ERROR: written"));
        assert!(!content.contains("skipped"));
    }

    #[test]
    fn test_rotate_log_files_keeps_last_five() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..6 {
            std::fs::write(dir.path().join(format!("log.2020-01-0{}T00-00-00.txt", i + 1)), "x").unwrap();
        }
        let log_file = dir.path().join("log.txt");
        std::fs::write(&log_file, "current").unwrap();

        rotate_log_files(&log_file).unwrap();

        assert!(!log_file.exists());
        let rotated = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(rotated, 5);
    }
}
