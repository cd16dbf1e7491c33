//! On-disk configuration (`harvester.ron`) and its command-line overrides.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use vacancy_core::{CrawlOptions, FetchFailurePolicy, SearchQuery};
use vacancy_engine::{EngineConfig, FetchSettings};

use crate::logging::LogDestination;

pub const DEFAULT_CONFIG_PATH: &str = "harvester.ron";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Where a loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// No file at the given path; built-in defaults apply.
    Defaults(PathBuf),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "loaded from {path:?}"),
            ConfigSource::Defaults(path) => write!(f, "defaults ({path:?} not found)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvesterConfig {
    pub database_url: String,
    pub search: SearchQuery,
    pub max_pages: u32,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_bytes: u64,
    pub user_agent: String,
    pub fetch_failure_policy: FetchFailurePolicy,
    pub log_level: String,
    pub log_destination: LogDestination,
}

impl Default for HarvesterConfig {
    fn default() -> Self {
        let engine = EngineConfig::default();
        Self {
            database_url: engine.database_url,
            search: SearchQuery::default(),
            max_pages: engine.crawl.max_pages,
            connect_timeout_secs: engine.fetch.connect_timeout.as_secs(),
            request_timeout_secs: engine.fetch.request_timeout.as_secs(),
            max_bytes: engine.fetch.max_bytes,
            user_agent: engine.fetch.user_agent,
            fetch_failure_policy: engine.crawl.fetch_failure_policy,
            log_level: "info".to_string(),
            log_destination: LogDestination::default(),
        }
    }
}

impl HarvesterConfig {
    /// Reads the config file. A missing file yields the defaults.
    ///
    /// Runs before logging is set up, so the source is returned for the
    /// caller to report.
    pub fn load(path: &Path) -> Result<(Self, ConfigSource), ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok((Self::default(), ConfigSource::Defaults(path.to_path_buf())));
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config = ron::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok((config, ConfigSource::File(path.to_path_buf())))
    }

    pub fn log_level(&self) -> log::LevelFilter {
        crawl_logging::parse_level(&self.log_level)
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            database_url: self.database_url.clone(),
            fetch: FetchSettings {
                connect_timeout: Duration::from_secs(self.connect_timeout_secs),
                request_timeout: Duration::from_secs(self.request_timeout_secs),
                max_bytes: self.max_bytes,
                user_agent: self.user_agent.clone(),
                ..FetchSettings::default()
            },
            crawl: CrawlOptions {
                max_pages: self.max_pages,
                fetch_failure_policy: self.fetch_failure_policy,
            },
        }
    }
}
