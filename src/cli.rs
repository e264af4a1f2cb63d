// src/cli.rs
// =============================================================================
// Command-line interface, built with clap's derive API.
//
//   doc-crawler discover https://docs.example.com/ --batch-size 20
//   doc-crawler scrape https://docs.example.com/ --json > pages.jsonl
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use doc_crawler::config::CrawlConfig;
use doc_crawler::error::Result;

#[derive(Parser, Debug)]
#[command(
    name = "doc-crawler",
    version,
    about = "Crawl a documentation site and extract clean page text",
    long_about = "doc-crawler discovers every page reachable from a base URL on the same site, \
                  fetching pages concurrently in bounded batches. It prints the discovered URLs, \
                  or the cleaned text of every page for indexing."
)]
pub struct Cli {
    /// Log at debug level (RUST_LOG overrides this)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every page of the site reachable from the base URL
    ///
    /// Example: doc-crawler discover https://docs.example.com/
    Discover {
        #[command(flatten)]
        crawl: CrawlArgs,
    },

    /// Crawl the site and print the cleaned text of every page
    ///
    /// Example: doc-crawler scrape https://docs.example.com/ --json
    Scrape {
        #[command(flatten)]
        crawl: CrawlArgs,

        /// Drop footer boilerplate ("privacy policy", "subscribe", ...)
        #[arg(long)]
        strip_boilerplate: bool,
    },
}

/// Arguments shared by every crawling subcommand.
#[derive(Args, Debug)]
pub struct CrawlArgs {
    /// Base URL of the documentation site (http or https)
    pub base_url: String,

    /// Number of pages fetched concurrently per batch [default: 10]
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Per-request timeout in seconds [default: 10]
    #[arg(long)]
    pub timeout: Option<u64>,

    /// TOML file with crawl settings; flags given here win over it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output JSON instead of plain text
    #[arg(long)]
    pub json: bool,
}

impl CrawlArgs {
    /// Defaults, then the config file, then flags.
    pub fn load_config(&self) -> Result<CrawlConfig> {
        let mut config = match &self.config {
            Some(path) => CrawlConfig::from_toml_file(path)?,
            None => CrawlConfig::default(),
        };

        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_crawler::error::CrawlError;

    #[test]
    fn test_parse_discover_with_flags() {
        let cli = Cli::parse_from([
            "doc-crawler",
            "discover",
            "https://docs.example.com/",
            "--batch-size",
            "4",
            "--json",
        ]);
        let Commands::Discover { crawl } = cli.command else {
            panic!("expected discover");
        };
        assert_eq!(crawl.base_url, "https://docs.example.com/");
        assert_eq!(crawl.load_config().unwrap().batch_size, 4);
        assert!(crawl.json);
    }

    #[test]
    fn test_parse_scrape_with_global_verbose() {
        let cli = Cli::parse_from([
            "doc-crawler",
            "scrape",
            "https://docs.example.com/",
            "--strip-boilerplate",
            "-v",
        ]);
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Scrape {
                strip_boilerplate: true,
                ..
            }
        ));
    }

    #[test]
    fn test_zero_batch_size_flag_is_config_error() {
        let cli = Cli::parse_from([
            "doc-crawler",
            "discover",
            "https://docs.example.com/",
            "--batch-size",
            "0",
        ]);
        let Commands::Discover { crawl } = cli.command else {
            panic!("expected discover");
        };
        assert!(matches!(
            crawl.load_config(),
            Err(CrawlError::InvalidBatchSize(0))
        ));
    }
}
