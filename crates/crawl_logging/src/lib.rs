#![deny(missing_docs)]
//! Logging macros shared by the vacancy harvester crates.
//!
//! Library code logs through `crawl_*` macros so every crate goes through the
//! `log` facade; the binary decides where records end up.

/// Trace-level record: per-element lookups and similar noise.
#[macro_export]
macro_rules! crawl_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Info-level record: session milestones and per-page progress.
#[macro_export]
macro_rules! crawl_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Debug-level record: field fallbacks, store conflicts, fetch details.
#[macro_export]
macro_rules! crawl_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Warn-level record: a listing or container that could not be used.
#[macro_export]
macro_rules! crawl_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Error-level record: the run stopped.
#[macro_export]
macro_rules! crawl_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Environment variable read by [`initialize_for_tests`].
pub const TEST_LOG_ENV: &str = "CRAWL_TEST_LOG";

/// Parses a textual level such as `"info"` or `"DEBUG"`.
///
/// Unknown names fall back to `Info`.
pub fn parse_level(name: &str) -> log::LevelFilter {
    name.trim()
        .parse::<log::LevelFilter>()
        .unwrap_or(log::LevelFilter::Info)
}

/// Installs a terminal logger for tests, at the level named by
/// `CRAWL_TEST_LOG` (`debug` when unset).
///
/// Does nothing when a logger is already installed.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

    let level = std::env::var(TEST_LOG_ENV)
        .map(|name| parse_level(&name))
        .unwrap_or(log::LevelFilter::Debug);
    let _ = TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto);
}
