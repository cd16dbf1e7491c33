//! Logger installation for the harvester binary.
//!
//! File output goes to `./harvester.log` in the current working directory.

use std::fs::File;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

const LOG_FILE: &str = "./harvester.log";

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogDestination {
    /// Write to ./harvester.log in current directory.
    File,
    /// Write to terminal (stderr for warnings and errors, stdout otherwise).
    #[default]
    Terminal,
    /// Write to both file and terminal.
    Both,
}

/// Installs the global logger. A second call is a no-op.
pub fn initialize(destination: LogDestination, level: LevelFilter) {
    let _ = CombinedLogger::init(loggers(destination, level));
}

fn loggers(destination: LogDestination, level: LevelFilter) -> Vec<Box<dyn SharedLogger>> {
    let config = record_format();
    let to_terminal = matches!(destination, LogDestination::Terminal | LogDestination::Both);
    let to_file = matches!(destination, LogDestination::File | LogDestination::Both);

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if to_file {
        match File::create(LOG_FILE) {
            Ok(file) => loggers.push(WriteLogger::new(level, config.clone(), file)),
            Err(err) => eprintln!("Warning: cannot write {LOG_FILE}: {err}; logging to terminal"),
        }
    }
    if to_terminal || loggers.is_empty() {
        loggers.push(TermLogger::new(level, config, TerminalMode::Mixed, ColorChoice::Auto));
    }
    loggers
}

fn record_format() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        // sqlx and hyper are chatty at info.
        .add_filter_ignore_str("sqlx")
        .add_filter_ignore_str("hyper")
        .build()
}
