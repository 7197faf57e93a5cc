//! Logger setup. The TUI owns the terminal, so interactive runs log to a
//! file under the app data directory; one-shot commands log to stderr.

use std::fs::{self, File};
use std::path::Path;

use log::LevelFilter;
use simplelog::{ColorChoice, Config, ConfigBuilder, TermLogger, TerminalMode, WriteLogger};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    /// `--debug` wins over any number of `-v`.
    pub fn from_flags(verbose: u8, debug: bool) -> Self {
        if debug {
            return LogLevel::Debug;
        }
        match verbose {
            0 => LogLevel::Warn,
            1 => LogLevel::Info,
            _ => LogLevel::Debug,
        }
    }

    pub fn filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
        }
    }
}

pub enum LogDestination<'a> {
    File(&'a Path),
    Stderr,
}

pub fn init(level: LogLevel, destination: LogDestination<'_>) {
    let config = build_config();
    // A logger may already be installed in tests.
    let _ = match destination {
        LogDestination::File(path) => match open_log_file(path) {
            Some(file) => WriteLogger::init(level.filter(), config, file),
            None => return,
        },
        LogDestination::Stderr => TermLogger::init(
            level.filter(),
            config,
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ),
    };
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .add_filter_allow_str("hnav")
        .build()
}

fn open_log_file(path: &Path) -> Option<File> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    match File::create(path) {
        Ok(file) => Some(file),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", path, err);
            None
        }
    }
}
