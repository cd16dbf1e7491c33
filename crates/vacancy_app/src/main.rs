//! Command-line entry point: discovers vacancy listings on the aggregator,
//! then visits each pending one and stores its details.

mod config;
mod logging;
mod progress;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use crawl_logging::{crawl_error, crawl_info};
use vacancy_engine::{CrawlSession, RunPlan};

use crate::config::{HarvesterConfig, DEFAULT_CONFIG_PATH};
use crate::progress::LogProgress;

#[derive(Debug, Parser)]
#[command(name = "vacancy-harvester")]
#[command(about = "Collects job vacancies from trud.com and its partner sites into SQLite")]
struct Cli {
    /// Configuration file (RON)
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// City to search in
    #[arg(long)]
    city: Option<String>,

    /// Search phrase
    #[arg(long)]
    query: Option<String>,

    /// Drop every stored listing before starting
    #[arg(long)]
    reset: bool,

    /// Only visit listings already in the database
    #[arg(long)]
    skip_discovery: bool,

    /// Maximum number of results pages to walk
    #[arg(long)]
    max_pages: Option<u32>,
}

impl Cli {
    fn apply(&self, config: &mut HarvesterConfig) {
        if let Some(city) = &self.city {
            config.search.city = city.clone();
        }
        if let Some(query) = &self.query {
            config.search.query = query.clone();
        }
        if let Some(max_pages) = self.max_pages {
            config.max_pages = max_pages;
        }
    }

    fn plan(&self) -> RunPlan {
        RunPlan {
            reset: self.reset,
            discover: !self.skip_discovery,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            crawl_error!("{:#}", err);
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let (mut config, source) =
        HarvesterConfig::load(&cli.config).context("Failed to load configuration")?;
    cli.apply(&mut config);
    logging::initialize(config.log_destination, config.log_level());
    crawl_info!("Configuration {}", source);

    crawl_info!(
        "Searching {:?} in {} (up to {} pages)",
        config.search.query,
        config.search.city,
        config.max_pages
    );
    let session = CrawlSession::open(config.engine_config())
        .await
        .with_context(|| format!("Failed to open {}", config.database_url))?;
    let summary = session
        .run(&config.search, cli.plan(), &LogProgress::default())
        .await
        .context("Crawl stopped")?;

    if summary.failed > 0 {
        crawl_info!("{} listings could not be fetched", summary.failed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::Cli;
    use crate::config::HarvesterConfig;

    #[test]
    fn flags_override_the_search() {
        let cli = Cli::parse_from([
            "vacancy-harvester",
            "--city",
            "Томск",
            "--query",
            "rust",
            "--max-pages",
            "2",
        ]);
        let mut config = HarvesterConfig::default();

        cli.apply(&mut config);

        assert_eq!(config.search.city, "Томск");
        assert_eq!(config.search.query, "rust");
        assert_eq!(config.max_pages, 2);
    }

    #[test]
    fn plan_follows_flags() {
        let cli = Cli::parse_from(["vacancy-harvester", "--reset", "--skip-discovery"]);
        let plan = cli.plan();
        assert!(plan.reset);
        assert!(!plan.discover);

        let default = Cli::parse_from(["vacancy-harvester"]).plan();
        assert!(!default.reset);
        assert!(default.discover);
        assert_eq!(
            Cli::parse_from(["vacancy-harvester"]).config.to_str(),
            Some("harvester.ron")
        );
    }
}
