//! Logger setup: a file log at the configured level, plus stderr at debug
//! level when `--verbose` is given.

use std::fs::OpenOptions;
use std::path::Path;
use std::str::FromStr;

use simplelog::{
    ColorChoice, CombinedLogger, Config as LogConfig, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};

use crate::config::LoggingConfig;

/// Parse a level name, falling back to `warn` for anything unrecognized.
pub fn parse_level(level: &str) -> LevelFilter {
    LevelFilter::from_str(level.trim()).unwrap_or(LevelFilter::Warn)
}

/// Install the global logger.
/// Best-effort: a log file that cannot be opened is skipped, and a logger
/// that is already installed is left alone (logging must never block the shell).
pub fn init(config: &LoggingConfig, verbose: bool) {
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    if verbose {
        loggers.push(TermLogger::new(
            LevelFilter::Debug,
            LogConfig::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }

    if !config.file.trim().is_empty() {
        let expanded = shellexpand::tilde(config.file.trim());
        let path = Path::new(expanded.as_ref());
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Ok(file) = OpenOptions::new().create(true).append(true).open(path) {
            loggers.push(WriteLogger::new(
                parse_level(&config.level),
                LogConfig::default(),
                file,
            ));
        }
    }

    if !loggers.is_empty() {
        let _ = CombinedLogger::init(loggers);
    }
}
