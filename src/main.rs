// src/main.rs
// =============================================================================
// Entry point of the doc-crawler CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing, to stderr so stdout stays clean for output)
// 3. Run the crawl for the chosen subcommand; Ctrl-C cancels between batches
// 4. Print results and exit with a proper code:
//    0 = every page fetched, 1 = some pages failed, 2 = error
//    (non-text pages such as PDFs are reported as skipped, not failed)
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands, CrawlArgs};
use doc_crawler::{CrawlConfig, CrawlOutcome, Crawler};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Discover { crawl } => {
            let config = crawl.load_config()?;
            handle_discover(&crawl, config).await
        }
        Commands::Scrape {
            crawl,
            strip_boilerplate,
        } => {
            let mut config = crawl.load_config()?;
            config.strip_boilerplate |= strip_boilerplate;
            handle_scrape(&crawl, config).await
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "doc_crawler=debug,info"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// Runs one crawl; Ctrl-C stops it at the next batch boundary
async fn crawl_site(args: &CrawlArgs, config: CrawlConfig) -> Result<CrawlOutcome> {
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, stopping after the current batch");
            on_interrupt.cancel();
        }
    });

    let crawler = Crawler::new(config)?.with_cancellation(cancel);
    let outcome = crawler
        .crawl(&args.base_url)
        .await
        .with_context(|| format!("crawl of {} failed", args.base_url))?;

    Ok(outcome)
}

// Handles the 'discover' subcommand: prints every discovered URL
async fn handle_discover(args: &CrawlArgs, config: CrawlConfig) -> Result<i32> {
    let outcome = crawl_site(args, config).await?;

    if args.json {
        let json_output = serde_json::to_string_pretty(&serde_json::json!({
            "base_url": args.base_url,
            "count": outcome.page_count(),
            "urls": outcome.urls,
            "failed": outcome.failed,
            "skipped": outcome.skipped,
        }))?;
        println!("{}", json_output);
    } else {
        for url in &outcome.urls {
            println!("{}", url);
        }
        println!();
        print_summary(&outcome);
    }

    Ok(exit_code(&outcome))
}

// Handles the 'scrape' subcommand: prints (url, text) for every page
async fn handle_scrape(args: &CrawlArgs, config: CrawlConfig) -> Result<i32> {
    let outcome = crawl_site(args, config).await?;

    if args.json {
        // One JSON object per line, ready to feed an indexer
        for page in &outcome.pages {
            println!("{}", serde_json::to_string(page)?);
        }
    } else {
        print_table(&outcome);
        print_summary(&outcome);
    }

    Ok(exit_code(&outcome))
}

fn exit_code(outcome: &CrawlOutcome) -> i32 {
    if outcome.failed.is_empty() {
        0
    } else {
        1
    }
}

fn print_table(outcome: &CrawlOutcome) {
    println!("{:<60} {:>8}  {:<40}", "URL", "CHARS", "TEXT");
    println!("{}", "=".repeat(110));

    for (url, text) in outcome.documents() {
        println!(
            "{:<60} {:>8}  {:<40}",
            truncate(url, 57),
            text.len(),
            truncate(text, 37)
        );
    }

    println!();
}

fn print_summary(outcome: &CrawlOutcome) {
    println!("📊 Summary:");
    println!("   📋 Discovered: {}", outcome.page_count());
    println!("   ✅ Indexed: {}", outcome.pages.len());
    println!("   ⏭️  Skipped (not text): {}", outcome.skipped.len());
    println!("   ❌ Failed: {}", outcome.failed.len());

    for failed in &outcome.failed {
        println!("      {} ({})", failed.url, failed.reason);
    }
}

// Cuts on a char boundary
fn truncate(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &value[..cut]),
        None => value.to_string(),
    }
}
