//! Sitefreeze main entry point
//!
//! This is the command-line interface for the Sitefreeze static site generator.

use anyhow::Context;
use clap::Parser;
use sitefreeze::config::load_config;
use sitefreeze::Generator;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sitefreeze: freeze a running web application into a static site
///
/// Sitefreeze crawls the pages of a live HTTP application, runs each page
/// and static asset through a content pipeline, and writes the result to an
/// output folder ready for static hosting.
#[derive(Parser, Debug)]
#[command(name = "sitefreeze")]
#[command(version = "1.0.0")]
#[command(about = "Freeze a running web application into a static site", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Override the application origin to crawl, e.g. "http://localhost:5000"
    #[arg(long, value_name = "URL")]
    app_url: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what a run would do without generating
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let mut config = load_config(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;

    if let Some(app_url) = cli.app_url {
        config.site.app_url = Some(app_url);
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    Generator::new(config)
        .generate()
        .await
        .context("generation failed")?;
    tracing::info!("Generation complete");
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitefreeze=info,warn"),
            1 => EnvFilter::new("sitefreeze=debug,info"),
            2 => EnvFilter::new("sitefreeze=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what a run would do
fn handle_dry_run(config: &sitefreeze::SiteConfig) {
    println!("=== Sitefreeze Dry Run ===\n");

    println!("Site:");
    println!(
        "  App URL: {}",
        config.site.app_url.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  Site URL: {}",
        config.site.site_url.as_deref().unwrap_or("(not set)")
    );

    println!("\nOutput:");
    println!("  Folder: {}", config.output.folder.display());
    println!("  Style: {:?}", config.output.style);
    println!("  Index file name: {}", config.output.index_file_name);

    println!("\nCrawl:");
    println!("  Extra URLs: {}", config.crawl.extra_urls.len());
    for url in &config.crawl.extra_urls {
        println!("    {}", url);
    }
    println!("  Suppress generation: {}", config.crawl.suppress_generation);

    println!("\nPipeline stages: {:?}", config.pipeline.stages);

    println!("\nAssets:");
    match &config.assets.static_root {
        Some(root) => println!("  Static root: {}", root.display()),
        None => println!("  Static root: (none)"),
    }
    println!(
        "  Explicit copy entries: {}",
        config.assets.content_to_copy.len()
    );
    println!("  Ignored paths: {}", config.assets.ignored_paths.len());

    println!("\nSitemap enabled: {}", config.sitemap.enable);
}
