// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing)
// 3. Run the crawl and write the mapping
// 4. Print a summary and exit (0 = done, 2 = error)
// =============================================================================

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use pattern_mapper::{crawl_site, CrawlConfig, CrawlReport};
use tracing_subscriber::EnvFilter;

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
    init_logging(cli.verbose);

    let config = CrawlConfig::from(cli);
    let output = config.output.clone();

    println!("🔍 Crawling: {}", config.start_url);
    println!("🎯 Patterns: {}", config.patterns.join(", "));

    let report = crawl_site(config).await?;

    print_summary(&report, &output.display().to_string());
    Ok(0)
}

// RUST_LOG takes precedence; otherwise --verbose picks debug over info
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_summary(report: &CrawlReport, output: &str) {
    let counters = &report.counters;

    println!();
    println!("📊 Summary:");
    println!("   📄 Pages attempted: {}", counters.pages_attempted);
    println!("   ❌ Failed: {}", counters.pages_failed);
    println!("   🤖 Skipped (robots.txt): {}", counters.robots_skipped);
    println!("   🎯 Findings: {}", counters.findings);
    println!("   📁 Folders: {}", report.mapping.folder_count());
    if !report.unvisited.is_empty() {
        println!("   ⏸️  Left in queue: {}", report.unvisited.len());
    }
    println!("   💾 Written to: {}", output);
}
